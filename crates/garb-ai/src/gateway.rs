//! Upstream chat-gateway client.
//!
//! One OpenAI-style chat endpoint serves all five functions; the
//! background-removal call additionally requests the image modality.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Model used for detection, tagging and outfit reasoning.
pub const CHAT_MODEL: &str = "google/gemini-2.5-flash";
/// Image-to-image model used for background removal.
pub const IMAGE_MODEL: &str = "google/gemini-2.5-flash-image-preview";

// ─── Request ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
  pub model:      String,
  pub messages:   Vec<Message>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub modalities: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
  pub role:    String,
  pub content: Content,
}

/// Plain text, or the multi-part form carrying an inline image.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Content {
  Text(String),
  Parts(Vec<Part>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
  Text { text: String },
  ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
  pub url: String,
}

impl ChatRequest {
  /// A single-turn text prompt.
  pub fn text(model: &str, prompt: impl Into<String>) -> Self {
    Self {
      model:      model.to_owned(),
      messages:   vec![Message {
        role:    "user".to_owned(),
        content: Content::Text(prompt.into()),
      }],
      modalities: None,
    }
  }

  /// A single-turn prompt over an inline (data-URL) image.
  pub fn with_image(
    model: &str,
    prompt: impl Into<String>,
    image_base64: impl Into<String>,
  ) -> Self {
    Self {
      model:      model.to_owned(),
      messages:   vec![Message {
        role:    "user".to_owned(),
        content: Content::Parts(vec![
          Part::Text {
            text: prompt.into(),
          },
          Part::ImageUrl {
            image_url: ImageUrl {
              url: image_base64.into(),
            },
          },
        ]),
      }],
      modalities: None,
    }
  }

  /// Request image output alongside text (background removal).
  pub fn expecting_image(mut self) -> Self {
    self.modalities = Some(vec!["image".to_owned(), "text".to_owned()]);
    self
  }
}

// ─── Response ────────────────────────────────────────────────────────────────

/// The parts of a completion the proxies care about.
#[derive(Debug, Clone)]
pub struct Completion {
  /// Text of the first choice; empty string when the model returned none.
  pub content: String,
  /// First returned image as a data URL, if any.
  pub image:   Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCompletion {
  #[serde(default)]
  choices: Vec<RawChoice>,
}

#[derive(Debug, Deserialize)]
struct RawChoice {
  message: RawMessage,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
  #[serde(default)]
  content: Option<String>,
  #[serde(default)]
  images:  Vec<RawImage>,
}

#[derive(Debug, Deserialize)]
struct RawImage {
  image_url: RawImageUrl,
}

#[derive(Debug, Deserialize)]
struct RawImageUrl {
  url: String,
}

impl From<RawCompletion> for Completion {
  fn from(mut raw: RawCompletion) -> Self {
    if raw.choices.is_empty() {
      return Completion {
        content: String::new(),
        image:   None,
      };
    }
    let message = raw.choices.swap_remove(0).message;
    Completion {
      content: message.content.unwrap_or_default(),
      image:   message.images.into_iter().next().map(|i| i.image_url.url),
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the upstream AI gateway, so handlers can be tested with
/// a canned implementation.
pub trait ChatGateway: Send + Sync {
  fn complete(
    &self,
    request: ChatRequest,
  ) -> impl Future<Output = Result<Completion>> + Send + '_;
}

// ─── HTTP implementation ─────────────────────────────────────────────────────

/// The real gateway client.
#[derive(Clone)]
pub struct HttpGateway {
  http:     reqwest::Client,
  base_url: String,
  api_key:  String,
}

impl HttpGateway {
  /// `base_url` without a trailing slash; `api_key` may be empty, in which
  /// case every call fails with [`Error::NotConfigured`] (surfaced as a 500
  /// on first use rather than at startup).
  pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
    Self {
      http:     reqwest::Client::new(),
      base_url: base_url.into(),
      api_key:  api_key.into(),
    }
  }
}

impl ChatGateway for HttpGateway {
  async fn complete(&self, request: ChatRequest) -> Result<Completion> {
    if self.api_key.is_empty() {
      return Err(Error::NotConfigured);
    }

    let response = self
      .http
      .post(format!("{}/v1/chat/completions", self.base_url))
      .bearer_auth(&self.api_key)
      .json(&request)
      .send()
      .await?;

    let status = response.status();
    if status.as_u16() == 429 {
      return Err(Error::RateLimited);
    }
    if status.as_u16() == 402 {
      return Err(Error::CreditsExhausted);
    }
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(Error::Upstream {
        status: status.as_u16(),
        body,
      });
    }

    let raw: RawCompletion = response.json().await?;
    Ok(raw.into())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn image_request_serialises_parts_and_modalities() {
    let req =
      ChatRequest::with_image(IMAGE_MODEL, "extract", "data:image/jpeg;base64,xx")
        .expecting_image();
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["model"], IMAGE_MODEL);
    assert_eq!(json["messages"][0]["content"][0]["type"], "text");
    assert_eq!(
      json["messages"][0]["content"][1]["image_url"]["url"],
      "data:image/jpeg;base64,xx"
    );
    assert_eq!(json["modalities"][0], "image");
  }

  #[test]
  fn text_request_serialises_plain_content() {
    let req = ChatRequest::text(CHAT_MODEL, "hello");
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["messages"][0]["content"], "hello");
    assert!(json.get("modalities").is_none());
  }

  #[test]
  fn completion_handles_missing_choices_and_images() {
    let raw: RawCompletion = serde_json::from_str(r#"{"choices": []}"#).unwrap();
    let completion = Completion::from(raw);
    assert_eq!(completion.content, "");
    assert!(completion.image.is_none());

    let raw: RawCompletion = serde_json::from_str(
      r#"{"choices": [{"message": {
            "content": "done",
            "images": [{"image_url": {"url": "data:image/png;base64,aa"}}]
          }}]}"#,
    )
    .unwrap();
    let completion = Completion::from(raw);
    assert_eq!(completion.content, "done");
    assert_eq!(completion.image.as_deref(), Some("data:image/png;base64,aa"));
  }
}
