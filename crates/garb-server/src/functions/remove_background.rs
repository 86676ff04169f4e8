//! `POST /functions/remove-background`

use axum::{Json, extract::State};

use garb_ai::{
  ChatGateway,
  contract::RemoveBackgroundResponse,
  gateway::{ChatRequest, IMAGE_MODEL},
  prompts,
};
use garb_core::store::WardrobeStore;

use crate::{AppState, error::Error, functions::ImageBody};

pub async fn handler<S, G>(
  State(state): State<AppState<S, G>>,
  Json(body): Json<ImageBody>,
) -> Result<Json<RemoveBackgroundResponse>, Error>
where
  S: WardrobeStore + 'static,
  G: ChatGateway + 'static,
{
  let request = ChatRequest::with_image(
    IMAGE_MODEL,
    prompts::REMOVE_BACKGROUND,
    &body.image_base64,
  )
  .expecting_image();
  let completion = state.gateway.complete(request).await?;

  let image = completion.image.ok_or(garb_ai::Error::MissingImage)?;
  Ok(Json(RemoveBackgroundResponse { image }))
}
