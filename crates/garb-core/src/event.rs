//! Suggestion events — an append-only log of AI-proposed item sets.
//!
//! Currently write-only; recorded for future personalisation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the user did with a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionAction {
  Saved,
  Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionEvent {
  pub id:                 Uuid,
  pub user_id:            Uuid,
  pub suggested_item_ids: Vec<Uuid>,
  pub action:             SuggestionAction,
  pub created_at:         DateTime<Utc>,
}

/// Input to [`crate::store::WardrobeStore::insert_suggestion_event`].
#[derive(Debug, Clone, Serialize)]
pub struct NewSuggestionEvent {
  pub user_id:            Uuid,
  pub suggested_item_ids: Vec<Uuid>,
  pub action:             SuggestionAction,
}
