//! `POST /functions/analyze-clothing`

use axum::{Json, extract::State};

use garb_ai::{
  ChatGateway,
  contract::TagReport,
  extract,
  gateway::{CHAT_MODEL, ChatRequest},
  prompts,
};
use garb_core::store::WardrobeStore;

use crate::{AppState, error::Error, functions::ImageBody};

pub async fn handler<S, G>(
  State(state): State<AppState<S, G>>,
  Json(body): Json<ImageBody>,
) -> Result<Json<TagReport>, Error>
where
  S: WardrobeStore + 'static,
  G: ChatGateway + 'static,
{
  let request =
    ChatRequest::with_image(CHAT_MODEL, prompts::ANALYZE, &body.image_base64);
  let completion = state.gateway.complete(request).await?;

  let value = extract::first_json_object(&completion.content)?;
  let report: TagReport =
    serde_json::from_value(value).map_err(garb_ai::Error::MalformedJson)?;
  Ok(Json(report))
}
