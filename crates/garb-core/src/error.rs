//! Error types for `garb-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::taxonomy::Category;

#[derive(Debug, Error)]
pub enum Error {
  #[error("item not found: {0}")]
  ItemNotFound(Uuid),

  #[error("outfit not found: {0}")]
  OutfitNotFound(Uuid),

  #[error("subtype {subtype:?} is not valid for category {category}")]
  SubtypeMismatch { category: Category, subtype: String },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
