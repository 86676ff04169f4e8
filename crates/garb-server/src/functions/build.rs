//! `POST /functions/build-outfit`
//!
//! Anchored styling: fetch the anchor, give the model the rest of the
//! closet (underwear excluded) partitioned by category, and echo the
//! anchor row back so the client never re-fetches it.

use axum::{Json, extract::State};
use serde::Deserialize;

use garb_ai::{
  ChatGateway,
  contract::{BuildOutfitResponse, ClosetPicks, ShoppingSuggestion},
  extract,
  gateway::{CHAT_MODEL, ChatRequest},
  prompts::{self, ClosetPartition},
};
use garb_core::store::WardrobeStore;

use crate::{AppState, error::Error, functions::BuildBody};

/// The model's half of [`BuildOutfitResponse`].
#[derive(Debug, Deserialize)]
struct ModelAnswer {
  #[serde(default)]
  closet_picks:         ClosetPicks,
  #[serde(default)]
  shopping_suggestions: Vec<ShoppingSuggestion>,
  #[serde(default)]
  outfit_reasoning:     String,
  #[serde(default)]
  style_notes:          Option<String>,
}

pub async fn handler<S, G>(
  State(state): State<AppState<S, G>>,
  Json(body): Json<BuildBody>,
) -> Result<Json<BuildOutfitResponse>, Error>
where
  S: WardrobeStore + 'static,
  G: ChatGateway + 'static,
{
  let anchor = state
    .store
    .get_item(body.user_id, body.anchor_item_id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound("Anchor item not found".to_owned()))?;

  let items = state
    .store
    .list_items(body.user_id)
    .await
    .map_err(Error::store)?;
  let closet =
    ClosetPartition::from_items(items.iter().filter(|i| i.id != anchor.id));

  let prompt = prompts::build_outfit(&anchor, &closet);
  let completion = state
    .gateway
    .complete(ChatRequest::text(CHAT_MODEL, prompt))
    .await?;

  let value = extract::first_json_object(&completion.content)?;
  let answer: ModelAnswer =
    serde_json::from_value(value).map_err(garb_ai::Error::MalformedJson)?;

  Ok(Json(BuildOutfitResponse {
    anchor_item:          anchor,
    closet_picks:         answer.closet_picks,
    shopping_suggestions: answer.shopping_suggestions,
    outfit_reasoning:     answer.outfit_reasoning,
    style_notes:          answer.style_notes,
  }))
}
