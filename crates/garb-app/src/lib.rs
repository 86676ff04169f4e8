//! Application flows for Garb.
//!
//! The stateful client-side workflows (capture pipeline, outfit composer,
//! closet browser) and the `Wardrobe` service that executes their effects
//! against a [`garb_core::store::WardrobeStore`] and
//! [`garb_core::store::ObjectStore`] pair.

pub mod browser;
pub mod capture;
pub mod composer;
pub mod error;
pub mod saga;
pub mod suggest;
pub mod wardrobe;

pub use error::{Error, Result};
pub use wardrobe::Wardrobe;
