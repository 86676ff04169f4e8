//! HTTP proxy layer for Garb's AI functions.
//!
//! Exposes an axum [`Router`] with the five `/functions/*` routes, backed
//! by any [`WardrobeStore`] and any [`ChatGateway`]. The routes exist so
//! the gateway API key stays server-side; clients only ever see these
//! endpoints.

pub mod error;
pub mod functions;

pub use error::Error;

use std::sync::Arc;

use axum::{Router, routing::post};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use garb_ai::ChatGateway;
use garb_core::store::WardrobeStore;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// `GARB_*` environment.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub supabase_url:         String,
  pub supabase_service_key: String,
  pub ai_gateway_url:       String,
  /// May be empty; the gateway then fails with a 500 on first use.
  pub ai_api_key:           String,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, G> {
  pub store:   Arc<S>,
  pub gateway: Arc<G>,
}

impl<S, G> Clone for AppState<S, G> {
  fn clone(&self) -> Self {
    Self {
      store:   Arc::clone(&self.store),
      gateway: Arc::clone(&self.gateway),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the proxy functions.
pub fn router<S, G>(state: AppState<S, G>) -> Router
where
  S: WardrobeStore + 'static,
  G: ChatGateway + 'static,
{
  Router::new()
    .route(
      "/functions/analyze-clothing",
      post(functions::analyze::handler::<S, G>),
    )
    .route(
      "/functions/detect-clothing",
      post(functions::detect::handler::<S, G>),
    )
    .route(
      "/functions/remove-background",
      post(functions::remove_background::handler::<S, G>),
    )
    .route(
      "/functions/build-outfit",
      post(functions::build::handler::<S, G>),
    )
    .route(
      "/functions/suggest-outfit",
      post(functions::suggest::handler::<S, G>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
  };

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use tower::ServiceExt as _;
  use uuid::Uuid;

  use garb_ai::gateway::{ChatRequest, Completion, Content};
  use garb_core::{
    item::NewClosetItem,
    taxonomy::Category,
  };
  use garb_store_memory::MemoryStore;

  use super::*;

  /// Scripted gateway: pops one reply per call, records every request.
  #[derive(Clone, Default)]
  struct StubGateway {
    replies: Arc<Mutex<VecDeque<garb_ai::Result<Completion>>>>,
    seen:    Arc<Mutex<Vec<ChatRequest>>>,
  }

  impl StubGateway {
    fn reply_text(&self, content: &str) {
      self.replies.lock().unwrap().push_back(Ok(Completion {
        content: content.to_owned(),
        image:   None,
      }));
    }

    fn reply_image(&self, content: &str, image: Option<&str>) {
      self.replies.lock().unwrap().push_back(Ok(Completion {
        content: content.to_owned(),
        image:   image.map(str::to_owned),
      }));
    }

    fn reply_err(&self, err: garb_ai::Error) {
      self.replies.lock().unwrap().push_back(Err(err));
    }

    fn last_prompt(&self) -> String {
      let seen = self.seen.lock().unwrap();
      let request = seen.last().expect("no request recorded");
      match &request.messages[0].content {
        Content::Text(text) => text.clone(),
        Content::Parts(_) => panic!("expected a text prompt"),
      }
    }
  }

  impl ChatGateway for StubGateway {
    async fn complete(
      &self,
      request: ChatRequest,
    ) -> garb_ai::Result<Completion> {
      self.seen.lock().unwrap().push(request);
      self
        .replies
        .lock()
        .unwrap()
        .pop_front()
        .expect("no scripted reply left")
    }
  }

  fn make_state(store: MemoryStore, gateway: StubGateway) -> AppState<MemoryStore, StubGateway> {
    AppState {
      store:   Arc::new(store),
      gateway: Arc::new(gateway),
    }
  }

  async fn post_json(
    state: AppState<MemoryStore, StubGateway>,
    uri: &str,
    body: serde_json::Value,
  ) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
      .method("POST")
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap();
    let response = router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
  }

  fn image_body() -> serde_json::Value {
    serde_json::json!({ "imageBase64": "data:image/jpeg;base64,xx" })
  }

  // ── detect-clothing ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn detect_degrades_rate_limits_to_a_not_ready_200() {
    let gateway = StubGateway::default();
    gateway.reply_err(garb_ai::Error::RateLimited);
    let (status, body) = post_json(
      make_state(MemoryStore::new(), gateway),
      "/functions/detect-clothing",
      image_body(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], false);
    assert_eq!(body["confidence"], 0);
    assert_eq!(body["feedback"], "Please wait a moment...");
  }

  #[tokio::test]
  async fn detect_degrades_prose_only_output_to_not_ready() {
    let gateway = StubGateway::default();
    gateway.reply_text("I cannot see any clothing in this frame, sorry!");
    let (status, body) = post_json(
      make_state(MemoryStore::new(), gateway),
      "/functions/detect-clothing",
      image_body(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], false);
  }

  #[tokio::test]
  async fn detect_passes_a_confident_verdict_through() {
    let gateway = StubGateway::default();
    gateway.reply_text(
      r#"{"ready": true, "confidence": 92, "feedback": "Good - capturing!",
          "clothing_type": "t-shirt"}"#,
    );
    let (status, body) = post_json(
      make_state(MemoryStore::new(), gateway),
      "/functions/detect-clothing",
      image_body(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
    assert_eq!(body["confidence"], 92);
    assert_eq!(body["clothing_type"], "t-shirt");
  }

  // ── analyze-clothing ──────────────────────────────────────────────────────

  #[tokio::test]
  async fn analyze_parses_fenced_model_output() {
    let gateway = StubGateway::default();
    gateway.reply_text(
      "```json\n{\"category\": \"tops\", \"subtype\": \"hoodie\", \
       \"primary_color\": \"gray\"}\n```",
    );
    let (status, body) = post_json(
      make_state(MemoryStore::new(), gateway),
      "/functions/analyze-clothing",
      image_body(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "tops");
    assert_eq!(body["subtype"], "hoodie");
  }

  #[tokio::test]
  async fn analyze_without_json_is_a_502() {
    let gateway = StubGateway::default();
    gateway.reply_text("no structured output");
    let (status, body) = post_json(
      make_state(MemoryStore::new(), gateway),
      "/functions/analyze-clothing",
      image_body(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "upstream returned no JSON");
  }

  // ── remove-background ─────────────────────────────────────────────────────

  #[tokio::test]
  async fn remove_background_returns_the_extracted_image() {
    let gateway = StubGateway::default();
    gateway.reply_image("", Some("data:image/png;base64,aa"));
    let (status, body) = post_json(
      make_state(MemoryStore::new(), gateway),
      "/functions/remove-background",
      image_body(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["image"], "data:image/png;base64,aa");
  }

  #[tokio::test]
  async fn remove_background_passes_402_and_429_through() {
    for (err, expected) in [
      (garb_ai::Error::RateLimited, StatusCode::TOO_MANY_REQUESTS),
      (garb_ai::Error::CreditsExhausted, StatusCode::PAYMENT_REQUIRED),
    ] {
      let gateway = StubGateway::default();
      gateway.reply_err(err);
      let (status, body) = post_json(
        make_state(MemoryStore::new(), gateway),
        "/functions/remove-background",
        image_body(),
      )
      .await;
      assert_eq!(status, expected);
      assert!(body["error"].as_str().unwrap().len() > 0);
    }
  }

  #[tokio::test]
  async fn remove_background_without_an_image_is_a_502() {
    let gateway = StubGateway::default();
    gateway.reply_image("here you go", None);
    let (status, body) = post_json(
      make_state(MemoryStore::new(), gateway),
      "/functions/remove-background",
      image_body(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "No image returned from AI");
  }

  // ── build-outfit ──────────────────────────────────────────────────────────

  async fn seed_item(
    store: &MemoryStore,
    user: Uuid,
    category: Category,
  ) -> Uuid {
    store
      .insert_item(NewClosetItem::new(user, category, "mem://orig"))
      .await
      .unwrap()
      .id
  }

  #[tokio::test]
  async fn build_outfit_404s_for_an_unknown_anchor() {
    let (status, body) = post_json(
      make_state(MemoryStore::new(), StubGateway::default()),
      "/functions/build-outfit",
      serde_json::json!({
        "userId": Uuid::new_v4(),
        "anchorItemId": Uuid::new_v4(),
      }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Anchor item not found");
  }

  #[tokio::test]
  async fn build_outfit_prompts_without_anchor_or_underwear_and_echoes_the_anchor()
  {
    let store = MemoryStore::new();
    let user = Uuid::new_v4();
    let anchor = seed_item(&store, user, Category::Shoes).await;
    let top = seed_item(&store, user, Category::Tops).await;
    let socks = seed_item(&store, user, Category::Underwear).await;

    let gateway = StubGateway::default();
    gateway.reply_text(&format!(
      r#"{{"closet_picks": {{"top": "{top}"}},
          "outfit_reasoning": "clean lines"}}"#
    ));

    let (status, body) = post_json(
      make_state(store, gateway.clone()),
      "/functions/build-outfit",
      serde_json::json!({ "userId": user, "anchorItemId": anchor }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["anchor_item"]["id"], anchor.to_string());
    assert_eq!(body["closet_picks"]["top"], top.to_string());
    assert_eq!(body["outfit_reasoning"], "clean lines");

    let prompt = gateway.last_prompt();
    assert!(prompt.contains(&top.to_string()));
    assert!(!prompt.contains(&anchor.to_string()));
    assert!(!prompt.contains(&socks.to_string()));
    // The anchor is shoes, so no shoes section is offered.
    assert!(!prompt.contains("AVAILABLE SHOES"));
  }

  // ── suggest-outfit ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn suggest_outfit_requires_the_core_categories() {
    let store = MemoryStore::new();
    let user = Uuid::new_v4();
    seed_item(&store, user, Category::Tops).await;

    let (status, body) = post_json(
      make_state(store, StubGateway::default()),
      "/functions/suggest-outfit",
      serde_json::json!({ "userId": user }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required items: bottoms, shoes");
  }

  #[tokio::test]
  async fn suggest_outfit_returns_picks_and_reasoning() {
    let store = MemoryStore::new();
    let user = Uuid::new_v4();
    let top = seed_item(&store, user, Category::Tops).await;
    let bottom = seed_item(&store, user, Category::Bottoms).await;
    let shoes = seed_item(&store, user, Category::Shoes).await;

    let gateway = StubGateway::default();
    gateway.reply_text(&format!(
      r#"{{"top": "{top}", "bottom": "{bottom}", "shoes": "{shoes}",
          "accessories": [], "reasoning": "monochrome works"}}"#
    ));

    let (status, body) = post_json(
      make_state(store, gateway),
      "/functions/suggest-outfit",
      serde_json::json!({ "userId": user }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outfit"]["top"], top.to_string());
    assert_eq!(body["outfit"]["shoes"], shoes.to_string());
    assert_eq!(body["reasoning"], "monochrome works");
  }
}
