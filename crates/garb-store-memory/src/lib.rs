//! In-memory backend for the Garb wardrobe store.
//!
//! Used by tests and local development. Emulates the external service's
//! cascade behavior (deleting an item or outfit removes its slot rows) and
//! can inject storage-removal failures to exercise the documented
//! partial-failure paths.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::MemoryStore;

#[cfg(test)]
mod tests;
