//! Error types for `garb-ai`.
//!
//! Malformed or absent JSON in model output is a distinct, named error kind
//! (`MissingJson` / `MalformedJson`); each endpoint decides whether that
//! kind is fatal or defaulted.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Upstream 429 — the user must re-trigger manually.
  #[error("rate limit exceeded, try again in a moment")]
  RateLimited,

  /// Upstream 402.
  #[error("AI credits exhausted")]
  CreditsExhausted,

  /// The server-held API key is absent — a deployment configuration error.
  #[error("AI service not configured")]
  NotConfigured,

  #[error("AI gateway error: {status}")]
  Upstream { status: u16, body: String },

  /// The model's text contained no balanced `{...}` span.
  #[error("no JSON object in model output")]
  MissingJson,

  /// A `{...}` span was found but did not parse.
  #[error("malformed JSON in model output: {0}")]
  MalformedJson(#[source] serde_json::Error),

  /// The image model returned no image payload.
  #[error("no image returned from AI")]
  MissingImage,

  #[error("malformed data URL")]
  BadDataUrl,

  /// A proxy-function error that is none of the typed kinds above.
  #[error("AI function error ({status}): {message}")]
  Function { status: u16, message: String },

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
