//! HTTP client for the five proxy functions.
//!
//! The capture and composer flows in `garb-app` talk to the gateway through
//! [`AiFunctions`] so tests can substitute canned responses.

use std::future::Future;

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{
  Error, Result,
  contract::{
    BuildOutfitResponse, DetectReport, RemoveBackgroundResponse,
    SuggestOutfitResponse, TagReport,
  },
};

/// The five proxy functions as the app consumes them.
pub trait AiFunctions: Send + Sync {
  /// Framing check for one scan frame. Never fails on model nonsense; the
  /// server degrades those to a not-ready verdict.
  fn detect<'a>(
    &'a self,
    image_base64: &'a str,
  ) -> impl Future<Output = Result<DetectReport>> + Send + 'a;

  fn analyze<'a>(
    &'a self,
    image_base64: &'a str,
  ) -> impl Future<Output = Result<TagReport>> + Send + 'a;

  /// Returns the cutout as a data URL.
  fn remove_background<'a>(
    &'a self,
    image_base64: &'a str,
  ) -> impl Future<Output = Result<String>> + Send + 'a;

  fn build_outfit(
    &self,
    user_id: Uuid,
    anchor_item_id: Uuid,
  ) -> impl Future<Output = Result<BuildOutfitResponse>> + Send + '_;

  fn suggest_outfit(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<SuggestOutfitResponse>> + Send + '_;
}

// ─── HTTP implementation ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImagePayload<'a> {
  image_base64: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutfitPayload {
  user_id:        Uuid,
  #[serde(skip_serializing_if = "Option::is_none")]
  anchor_item_id: Option<Uuid>,
}

/// Client for a deployed function gateway (`{base}/functions/<name>`).
#[derive(Clone)]
pub struct FunctionsClient {
  http:     reqwest::Client,
  base_url: String,
}

impl FunctionsClient {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      http:     reqwest::Client::new(),
      base_url: base_url.into(),
    }
  }

  async fn call<T, B>(&self, function: &str, body: &B) -> Result<T>
  where
    T: serde::de::DeserializeOwned,
    B: Serialize + Sync,
  {
    let response = self
      .http
      .post(format!("{}/functions/{function}", self.base_url))
      .json(body)
      .send()
      .await?;

    let status = response.status().as_u16();
    if status == 429 {
      return Err(Error::RateLimited);
    }
    if status == 402 {
      return Err(Error::CreditsExhausted);
    }
    if status >= 400 {
      let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|v| v.get("error")?.as_str().map(str::to_owned))
        .unwrap_or_else(|| "unknown error".to_owned());
      return Err(Error::Function { status, message });
    }

    Ok(response.json().await?)
  }
}

impl AiFunctions for FunctionsClient {
  async fn detect(&self, image_base64: &str) -> Result<DetectReport> {
    self.call("detect-clothing", &ImagePayload { image_base64 }).await
  }

  async fn analyze(&self, image_base64: &str) -> Result<TagReport> {
    self.call("analyze-clothing", &ImagePayload { image_base64 }).await
  }

  async fn remove_background(&self, image_base64: &str) -> Result<String> {
    let response: RemoveBackgroundResponse = self
      .call("remove-background", &ImagePayload { image_base64 })
      .await?;
    Ok(response.image)
  }

  async fn build_outfit(
    &self,
    user_id: Uuid,
    anchor_item_id: Uuid,
  ) -> Result<BuildOutfitResponse> {
    self
      .call("build-outfit", &OutfitPayload {
        user_id,
        anchor_item_id: Some(anchor_item_id),
      })
      .await
  }

  async fn suggest_outfit(&self, user_id: Uuid) -> Result<SuggestOutfitResponse> {
    self
      .call("suggest-outfit", &OutfitPayload {
        user_id,
        anchor_item_id: None,
      })
      .await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn payloads_use_camel_case_keys() {
    let json = serde_json::to_value(ImagePayload {
      image_base64: "data:image/jpeg;base64,xx",
    })
    .unwrap();
    assert!(json.get("imageBase64").is_some());

    let user_id = Uuid::new_v4();
    let json = serde_json::to_value(OutfitPayload {
      user_id,
      anchor_item_id: None,
    })
    .unwrap();
    assert_eq!(json["userId"], user_id.to_string());
    assert!(json.get("anchorItemId").is_none());
  }
}
