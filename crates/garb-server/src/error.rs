//! Proxy-function error type and its HTTP mapping.
//!
//! Upstream 429/402 pass through with their status; model output without
//! usable JSON is a 502. The detection route never reaches this type — it
//! degrades to a not-ready report instead of erroring.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("Rate limit exceeded. Please try again in a moment.")]
  RateLimited,

  #[error("AI credits exhausted. Please add credits to continue.")]
  CreditsExhausted,

  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  NotFound(String),

  /// The model's text held no parseable JSON object.
  #[error("upstream returned no JSON")]
  NoJson,

  #[error("No image returned from AI")]
  MissingImage,

  /// Any other upstream gateway failure.
  #[error("AI gateway error: {0}")]
  Upstream(String),

  #[error("{0}")]
  Internal(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Store(Box::new(err))
  }
}

impl From<garb_ai::Error> for Error {
  fn from(err: garb_ai::Error) -> Self {
    use garb_ai::Error as Ai;
    match err {
      Ai::RateLimited => Error::RateLimited,
      Ai::CreditsExhausted => Error::CreditsExhausted,
      Ai::MissingJson | Ai::MalformedJson(_) => Error::NoJson,
      Ai::MissingImage => Error::MissingImage,
      Ai::Upstream { status, .. } => {
        Error::Upstream(format!("upstream status {status}"))
      }
      other => Error::Internal(other.to_string()),
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match &self {
      Error::RateLimited => StatusCode::TOO_MANY_REQUESTS,
      Error::CreditsExhausted => StatusCode::PAYMENT_REQUIRED,
      Error::BadRequest(_) => StatusCode::BAD_REQUEST,
      Error::NotFound(_) => StatusCode::NOT_FOUND,
      Error::NoJson | Error::MissingImage | Error::Upstream(_) => {
        StatusCode::BAD_GATEWAY
      }
      Error::Internal(_) | Error::Store(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
