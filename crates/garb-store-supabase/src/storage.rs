//! [`ObjectStore`] over the Supabase storage endpoint.
//!
//! The list endpoint is folder-based and returns one level at a time;
//! `list` walks folders breadth-first so callers get every key under a
//! prefix regardless of nesting.

use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;

use garb_core::store::{Bucket, ObjectStore};

use crate::{Error, Result, SupabaseStore};

#[derive(Debug, Deserialize)]
struct ListEntry {
  name: String,
  /// Present on objects, absent on folder placeholders.
  id:   Option<String>,
}

impl SupabaseStore {
  fn object_url(&self, bucket: Bucket, path: &str) -> String {
    format!("{}/storage/v1/object/{}/{path}", self.base(), bucket.as_str())
  }

  async fn list_folder(
    &self,
    bucket: Bucket,
    folder: &str,
  ) -> Result<Vec<ListEntry>> {
    let response = self
      .authed(self.http.post(format!(
        "{}/storage/v1/object/list/{}",
        self.base(),
        bucket.as_str()
      )))
      .json(&json!({ "prefix": folder, "limit": 1000 }))
      .send()
      .await?;
    let status = response.status();
    if !status.is_success() {
      let message = response.text().await.unwrap_or_default();
      return Err(Error::Api {
        status: status.as_u16(),
        message,
      });
    }
    Ok(response.json().await?)
  }
}

impl ObjectStore for SupabaseStore {
  type Error = Error;

  async fn upload(
    &self,
    bucket: Bucket,
    path: &str,
    bytes: Bytes,
    content_type: &str,
  ) -> Result<String> {
    let response = self
      .authed(self.http.post(self.object_url(bucket, path)))
      .header("Content-Type", content_type)
      .body(bytes)
      .send()
      .await?;
    let status = response.status();
    if !status.is_success() {
      let message = response.text().await.unwrap_or_default();
      return Err(Error::Api {
        status: status.as_u16(),
        message,
      });
    }
    Ok(format!(
      "{}/storage/v1/object/public/{}/{path}",
      self.base(),
      bucket.as_str()
    ))
  }

  async fn list(&self, bucket: Bucket, prefix: &str) -> Result<Vec<String>> {
    let mut keys = Vec::new();
    let mut folders = vec![prefix.trim_end_matches('/').to_owned()];

    while let Some(folder) = folders.pop() {
      for entry in self.list_folder(bucket, &folder).await? {
        let path = if folder.is_empty() {
          entry.name
        } else {
          format!("{folder}/{}", entry.name)
        };
        if entry.id.is_some() {
          keys.push(path);
        } else {
          folders.push(path);
        }
      }
    }
    Ok(keys)
  }

  async fn remove(&self, bucket: Bucket, paths: &[String]) -> Result<()> {
    if paths.is_empty() {
      return Ok(());
    }
    let response = self
      .authed(self.http.delete(format!(
        "{}/storage/v1/object/{}",
        self.base(),
        bucket.as_str()
      )))
      .json(&json!({ "prefixes": paths }))
      .send()
      .await?;
    let status = response.status();
    if !status.is_success() {
      let message = response.text().await.unwrap_or_default();
      return Err(Error::Api {
        status: status.as_u16(),
        message,
      });
    }
    Ok(())
  }
}
