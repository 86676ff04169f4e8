//! Error types for `garb-store-supabase`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// A non-2xx answer from PostgREST or the storage endpoint.
  #[error("supabase error ({status}): {message}")]
  Api { status: u16, message: String },

  /// An update's `return=representation` came back empty.
  #[error("item {0} not found")]
  ItemNotFound(Uuid),

  #[error("outfit {0} not found")]
  OutfitNotFound(Uuid),

  /// An insert's `return=representation` came back empty.
  #[error("empty representation returned")]
  EmptyRepresentation,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
