//! Error type for `garb-store-memory`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("item not found: {0}")]
  ItemNotFound(Uuid),

  #[error("outfit not found: {0}")]
  OutfitNotFound(Uuid),

  #[error("duplicate id: {0}")]
  DuplicateId(Uuid),

  /// Returned by object removal when failure injection is armed.
  #[error("storage removal failed (injected)")]
  RemovalFailed,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
