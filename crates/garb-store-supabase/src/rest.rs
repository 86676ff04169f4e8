//! [`WardrobeStore`] over the PostgREST endpoint.
//!
//! Row shapes match the domain types column-for-column, so the domain
//! serde derives are the wire codec. Joined outfit reads use PostgREST
//! resource embedding (`select=*,outfit_items(*,closet_items(*))`).

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use garb_core::{
  event::{NewSuggestionEvent, SuggestionEvent},
  item::{ClosetItem, ItemPatch, NewClosetItem},
  outfit::{
    NewOutfit, NewOutfitItem, Outfit, OutfitItem, OutfitWithItems,
  },
  store::WardrobeStore,
};

use crate::{Error, Result, SupabaseStore};

const OUTFIT_EMBED: &str = "*,outfit_items(*,closet_items(*))";

#[derive(Debug, Deserialize)]
struct OutfitRow {
  #[serde(flatten)]
  outfit:       Outfit,
  #[serde(default)]
  outfit_items: Vec<OutfitItemRow>,
}

#[derive(Debug, Deserialize)]
struct OutfitItemRow {
  #[serde(flatten)]
  link:         OutfitItem,
  /// Absent when the joined item row is gone mid-request.
  closet_items: Option<ClosetItem>,
}

impl From<OutfitRow> for OutfitWithItems {
  fn from(row: OutfitRow) -> Self {
    OutfitWithItems {
      outfit: row.outfit,
      items:  row
        .outfit_items
        .into_iter()
        .filter_map(|r| r.closet_items.map(|item| (r.link, item)))
        .collect(),
    }
  }
}

impl SupabaseStore {
  fn table(&self, name: &str) -> String {
    format!("{}/rest/v1/{name}", self.base())
  }

  async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
      return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(Error::Api {
      status: status.as_u16(),
      message,
    })
  }

  async fn select<T>(&self, table: &str, query: &[(&str, String)]) -> Result<Vec<T>>
  where
    T: serde::de::DeserializeOwned,
  {
    let response = self
      .authed(self.http.get(self.table(table)))
      .query(query)
      .send()
      .await?;
    Ok(Self::check(response).await?.json().await?)
  }

  /// Insert with `return=representation`, yielding the stored rows.
  async fn insert_returning<B, T>(&self, table: &str, body: &B) -> Result<Vec<T>>
  where
    B: Serialize + Sync,
    T: serde::de::DeserializeOwned,
  {
    let response = self
      .authed(self.http.post(self.table(table)))
      .header("Prefer", "return=representation")
      .json(body)
      .send()
      .await?;
    Ok(Self::check(response).await?.json().await?)
  }

  /// Patch matching rows with `return=representation`.
  async fn update_returning<B, T>(
    &self,
    table: &str,
    query: &[(&str, String)],
    body: &B,
  ) -> Result<Vec<T>>
  where
    B: Serialize + Sync,
    T: serde::de::DeserializeOwned,
  {
    let response = self
      .authed(self.http.patch(self.table(table)))
      .query(query)
      .header("Prefer", "return=representation")
      .json(body)
      .send()
      .await?;
    Ok(Self::check(response).await?.json().await?)
  }

  async fn delete_rows(&self, table: &str, query: &[(&str, String)]) -> Result<()> {
    let response = self
      .authed(self.http.delete(self.table(table)))
      .query(query)
      .send()
      .await?;
    Self::check(response).await?;
    Ok(())
  }
}

fn eq(column: &str, value: impl std::fmt::Display) -> (&str, String) {
  (column, format!("eq.{value}"))
}

impl WardrobeStore for SupabaseStore {
  type Error = Error;

  // ── Closet items ──────────────────────────────────────────────────────────

  async fn list_items(&self, user: Uuid) -> Result<Vec<ClosetItem>> {
    self
      .select("closet_items", &[
        eq("user_id", user),
        ("order", "created_at.desc".to_owned()),
      ])
      .await
  }

  async fn get_item(&self, user: Uuid, id: Uuid) -> Result<Option<ClosetItem>> {
    let mut rows: Vec<ClosetItem> = self
      .select("closet_items", &[
        eq("user_id", user),
        eq("id", id),
        ("limit", "1".to_owned()),
      ])
      .await?;
    Ok(rows.pop())
  }

  async fn insert_item(&self, item: NewClosetItem) -> Result<ClosetItem> {
    self
      .insert_returning("closet_items", &item)
      .await?
      .into_iter()
      .next()
      .ok_or(Error::EmptyRepresentation)
  }

  async fn update_item(
    &self,
    user: Uuid,
    id: Uuid,
    patch: ItemPatch,
  ) -> Result<ClosetItem> {
    self
      .update_returning(
        "closet_items",
        &[eq("user_id", user), eq("id", id)],
        &patch,
      )
      .await?
      .into_iter()
      .next()
      .ok_or(Error::ItemNotFound(id))
  }

  async fn set_favorite(
    &self,
    user: Uuid,
    id: Uuid,
    favorite: bool,
  ) -> Result<()> {
    let rows: Vec<serde_json::Value> = self
      .update_returning(
        "closet_items",
        &[eq("user_id", user), eq("id", id)],
        &json!({ "favorite": favorite }),
      )
      .await?;
    if rows.is_empty() {
      return Err(Error::ItemNotFound(id));
    }
    Ok(())
  }

  async fn delete_item(&self, user: Uuid, id: Uuid) -> Result<()> {
    self
      .delete_rows("closet_items", &[eq("user_id", user), eq("id", id)])
      .await
  }

  async fn delete_all_items(&self, user: Uuid) -> Result<()> {
    self
      .delete_rows("closet_items", &[eq("user_id", user)])
      .await
  }

  // ── Outfits ───────────────────────────────────────────────────────────────

  async fn insert_outfit(&self, outfit: NewOutfit) -> Result<Outfit> {
    self
      .insert_returning("outfits", &outfit)
      .await?
      .into_iter()
      .next()
      .ok_or(Error::EmptyRepresentation)
  }

  async fn list_outfits(&self, user: Uuid) -> Result<Vec<OutfitWithItems>> {
    let rows: Vec<OutfitRow> = self
      .select("outfits", &[
        ("select", OUTFIT_EMBED.to_owned()),
        eq("user_id", user),
        ("order", "created_at.desc".to_owned()),
      ])
      .await?;
    Ok(rows.into_iter().map(Into::into).collect())
  }

  async fn get_outfit(
    &self,
    user: Uuid,
    id: Uuid,
  ) -> Result<Option<OutfitWithItems>> {
    let mut rows: Vec<OutfitRow> = self
      .select("outfits", &[
        ("select", OUTFIT_EMBED.to_owned()),
        eq("user_id", user),
        eq("id", id),
        ("limit", "1".to_owned()),
      ])
      .await?;
    Ok(rows.pop().map(Into::into))
  }

  async fn rename_outfit(
    &self,
    user: Uuid,
    id: Uuid,
    name: Option<String>,
  ) -> Result<()> {
    let rows: Vec<serde_json::Value> = self
      .update_returning(
        "outfits",
        &[eq("user_id", user), eq("id", id)],
        &json!({ "name": name }),
      )
      .await?;
    if rows.is_empty() {
      return Err(Error::OutfitNotFound(id));
    }
    Ok(())
  }

  async fn delete_outfit(&self, user: Uuid, id: Uuid) -> Result<()> {
    self
      .delete_rows("outfits", &[eq("user_id", user), eq("id", id)])
      .await
  }

  async fn delete_all_outfits(&self, user: Uuid) -> Result<()> {
    self.delete_rows("outfits", &[eq("user_id", user)]).await
  }

  // ── Outfit items ──────────────────────────────────────────────────────────

  async fn insert_outfit_items(&self, items: Vec<NewOutfitItem>) -> Result<()> {
    if items.is_empty() {
      return Ok(());
    }
    let response = self
      .authed(self.http.post(self.table("outfit_items")))
      .json(&items)
      .send()
      .await?;
    Self::check(response).await?;
    Ok(())
  }

  async fn delete_outfit_items(&self, outfit_id: Uuid) -> Result<()> {
    self
      .delete_rows("outfit_items", &[eq("outfit_id", outfit_id)])
      .await
  }

  // ── Suggestion events ─────────────────────────────────────────────────────

  async fn insert_suggestion_event(
    &self,
    event: NewSuggestionEvent,
  ) -> Result<SuggestionEvent> {
    self
      .insert_returning("suggestion_events", &event)
      .await?
      .into_iter()
      .next()
      .ok_or(Error::EmptyRepresentation)
  }

  async fn delete_all_suggestion_events(&self, user: Uuid) -> Result<()> {
    self
      .delete_rows("suggestion_events", &[eq("user_id", user)])
      .await
  }
}
