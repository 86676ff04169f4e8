//! Error types for `garb-app`.

use garb_core::taxonomy::Slot;
use thiserror::Error;
use uuid::Uuid;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Domain(#[from] garb_core::Error),

  #[error(transparent)]
  Ai(#[from] garb_ai::Error),

  /// Failure in the structured-record backend.
  #[error("store error: {0}")]
  Store(#[source] BoxError),

  /// Failure in the object-storage backend.
  #[error("storage error: {0}")]
  Objects(#[source] BoxError),

  /// An outfit save attempted without all of top, bottom and shoes.
  #[error("outfit is missing required slots: {missing:?}")]
  IncompleteOutfit { missing: Vec<Slot> },

  /// A suggestion-session save with nothing to save.
  #[error("no active suggestion")]
  NoSuggestion,

  /// A non-image file offered to the capture pipeline.
  #[error("unsupported file type: {content_type}")]
  UnsupportedFile { content_type: String },

  /// An item offered to a composer slot whose category list excludes it.
  #[error("{category} items cannot fill the {slot} slot")]
  SlotMismatch {
    slot:     crate::composer::ComposerSlot,
    category: garb_core::taxonomy::Category,
  },

  #[error("outfit {0} not found")]
  OutfitNotFound(Uuid),

  #[error("item {0} not found")]
  ItemNotFound(Uuid),
}

impl Error {
  pub(crate) fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Store(Box::new(err))
  }

  pub(crate) fn objects<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Objects(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
