//! `POST /functions/suggest-outfit`

use axum::{Json, extract::State};

use garb_ai::{
  ChatGateway,
  contract::{SuggestOutfitResponse, SuggestedPicks},
  extract,
  gateway::{CHAT_MODEL, ChatRequest},
  prompts::{self, ClosetPartition},
};
use garb_core::store::WardrobeStore;

use crate::{AppState, error::Error, functions::SuggestBody};

pub async fn handler<S, G>(
  State(state): State<AppState<S, G>>,
  Json(body): Json<SuggestBody>,
) -> Result<Json<SuggestOutfitResponse>, Error>
where
  S: WardrobeStore + 'static,
  G: ChatGateway + 'static,
{
  let items = state
    .store
    .list_items(body.user_id)
    .await
    .map_err(Error::store)?;
  let closet = ClosetPartition::from_items(&items);
  let missing = closet.missing_core();
  if !missing.is_empty() {
    return Err(Error::BadRequest(format!(
      "Missing required items: {}",
      missing.join(", ")
    )));
  }

  let prompt = prompts::suggest_outfit(&closet);
  let completion = state
    .gateway
    .complete(ChatRequest::text(CHAT_MODEL, prompt))
    .await?;

  let value = extract::first_json_object(&completion.content)?;
  let outfit: SuggestedPicks = serde_json::from_value(value.clone())
    .map_err(garb_ai::Error::MalformedJson)?;
  let reasoning = value
    .get("reasoning")
    .and_then(|v| v.as_str())
    .unwrap_or_default()
    .to_owned();

  Ok(Json(SuggestOutfitResponse { outfit, reasoning }))
}
