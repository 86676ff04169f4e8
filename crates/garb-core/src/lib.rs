//! Core types and trait definitions for the Garb wardrobe store.
//!
//! This crate is deliberately free of HTTP and storage dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod event;
pub mod filter;
pub mod item;
pub mod outfit;
pub mod store;
pub mod taxonomy;

pub use error::{Error, Result};
