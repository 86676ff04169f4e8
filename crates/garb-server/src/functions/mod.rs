//! The five proxy-function handlers.

pub mod analyze;
pub mod build;
pub mod detect;
pub mod remove_background;
pub mod suggest;

use serde::Deserialize;
use uuid::Uuid;

/// Body of the three image routes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBody {
  pub image_base64: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildBody {
  pub user_id:        Uuid,
  pub anchor_item_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestBody {
  pub user_id: Uuid,
}
