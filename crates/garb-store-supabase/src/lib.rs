//! Supabase-backed implementation of the Garb store traits.
//!
//! Structured records go through the PostgREST endpoint (`/rest/v1`),
//! objects through the storage endpoint (`/storage/v1`). All requests carry
//! the service key; row-level security policies on the remote side scope
//! data per user on top of the explicit `user_id` filters used here.

mod error;
mod rest;
mod storage;

use std::{sync::Arc, time::Duration};

pub use error::{Error, Result};

/// Connection settings for a Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
  /// Project base URL, e.g. `https://abc.supabase.co`.
  pub base_url:    String,
  pub service_key: String,
}

/// Both store traits over one Supabase project.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct SupabaseStore {
  http:   reqwest::Client,
  config: Arc<SupabaseConfig>,
}

impl SupabaseStore {
  pub fn new(config: SupabaseConfig) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self {
      http,
      config: Arc::new(config),
    })
  }

  fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    req
      .header("apikey", &self.config.service_key)
      .bearer_auth(&self.config.service_key)
  }

  fn base(&self) -> &str {
    self.config.base_url.trim_end_matches('/')
  }
}
