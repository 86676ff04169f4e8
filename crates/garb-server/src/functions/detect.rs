//! `POST /functions/detect-clothing`
//!
//! The one route that never fails: the scan loop polls it continuously and
//! a transient upstream problem must read as "keep holding", not as an
//! error toast. Rate limits and unusable model output both degrade to a
//! not-ready report under HTTP 200.

use axum::{Json, extract::State};
use tracing::warn;

use garb_ai::{
  ChatGateway,
  contract::DetectReport,
  extract,
  gateway::{CHAT_MODEL, ChatRequest},
  prompts,
};
use garb_core::store::WardrobeStore;

use crate::{AppState, functions::ImageBody};

pub async fn handler<S, G>(
  State(state): State<AppState<S, G>>,
  Json(body): Json<ImageBody>,
) -> Json<DetectReport>
where
  S: WardrobeStore + 'static,
  G: ChatGateway + 'static,
{
  Json(run(&*state.gateway, &body.image_base64).await)
}

async fn run<G: ChatGateway>(gateway: &G, image: &str) -> DetectReport {
  let request = ChatRequest::with_image(CHAT_MODEL, prompts::DETECT, image);
  let completion = match gateway.complete(request).await {
    Ok(completion) => completion,
    Err(garb_ai::Error::RateLimited) => {
      return DetectReport::not_ready("Please wait a moment...");
    }
    Err(err) => {
      warn!(%err, "detection gateway call failed");
      return DetectReport::not_ready("Error scanning");
    }
  };

  let parsed = extract::first_json_object(&completion.content)
    .and_then(|v| serde_json::from_value(v).map_err(garb_ai::Error::MalformedJson));
  match parsed {
    Ok(report) => report,
    Err(err) => {
      warn!(%err, "unusable detection output");
      DetectReport::not_ready("Scanning...")
    }
  }
}
