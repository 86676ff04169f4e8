//! The `WardrobeStore` and `ObjectStore` traits and supporting types.
//!
//! Implemented by storage backends (`garb-store-supabase` against the
//! external BaaS, `garb-store-memory` for tests and local development).
//! Higher layers depend on these abstractions, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  event::{NewSuggestionEvent, SuggestionEvent},
  item::{ClosetItem, ItemPatch, NewClosetItem},
  outfit::{NewOutfit, NewOutfitItem, Outfit, OutfitWithItems},
};

// ─── Buckets ─────────────────────────────────────────────────────────────────

/// The two logical object buckets. Objects are keyed
/// `{user_id}/{item_id}/{filename}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
  Originals,
  Cutouts,
}

impl Bucket {
  pub const ALL: [Bucket; 2] = [Bucket::Originals, Bucket::Cutouts];

  pub fn as_str(&self) -> &'static str {
    match self {
      Bucket::Originals => "closet-originals",
      Bucket::Cutouts => "closet-cutouts",
    }
  }
}

/// `{user_id}/{item_id}` — the key prefix shared by an item's objects.
pub fn item_prefix(user_id: Uuid, item_id: Uuid) -> String {
  format!("{user_id}/{item_id}")
}

/// Key for the as-captured photo; extension preserved from the source file.
pub fn original_path(user_id: Uuid, item_id: Uuid, ext: &str) -> String {
  format!("{user_id}/{item_id}/original.{ext}")
}

/// Key for the background-removed rendition (always png).
pub fn cutout_path(user_id: Uuid, item_id: Uuid) -> String {
  format!("{user_id}/{item_id}/cutout.png")
}

// ─── WardrobeStore ───────────────────────────────────────────────────────────

/// Abstraction over the structured-record side of the remote data gateway.
///
/// Every operation is scoped by the owning user id; row-level security on
/// the external service enforces the same boundary server-side.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait WardrobeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Closet items ──────────────────────────────────────────────────────

  /// All items for `user`, newest first.
  fn list_items(
    &self,
    user: Uuid,
  ) -> impl Future<Output = Result<Vec<ClosetItem>, Self::Error>> + Send + '_;

  /// A single item by id. Returns `None` if absent or owned by another user.
  fn get_item(
    &self,
    user: Uuid,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ClosetItem>, Self::Error>> + Send + '_;

  /// Insert a new item row; timestamps are set by the store.
  fn insert_item(
    &self,
    item: NewClosetItem,
  ) -> impl Future<Output = Result<ClosetItem, Self::Error>> + Send + '_;

  /// Overwrite the editable tag set of an item.
  fn update_item(
    &self,
    user: Uuid,
    id: Uuid,
    patch: ItemPatch,
  ) -> impl Future<Output = Result<ClosetItem, Self::Error>> + Send + '_;

  /// Single-field favorite update, used by the browser's optimistic toggle.
  fn set_favorite(
    &self,
    user: Uuid,
    id: Uuid,
    favorite: bool,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete one item row. The external service cascades its outfit rows.
  fn delete_item(
    &self,
    user: Uuid,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete every item row for `user`.
  fn delete_all_items(
    &self,
    user: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Outfits ───────────────────────────────────────────────────────────

  fn insert_outfit(
    &self,
    outfit: NewOutfit,
  ) -> impl Future<Output = Result<Outfit, Self::Error>> + Send + '_;

  /// All outfits for `user` with their slot rows and items, newest first.
  fn list_outfits(
    &self,
    user: Uuid,
  ) -> impl Future<Output = Result<Vec<OutfitWithItems>, Self::Error>> + Send + '_;

  fn get_outfit(
    &self,
    user: Uuid,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<OutfitWithItems>, Self::Error>> + Send + '_;

  fn rename_outfit(
    &self,
    user: Uuid,
    id: Uuid,
    name: Option<String>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete an outfit row; its slot rows cascade externally.
  fn delete_outfit(
    &self,
    user: Uuid,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_all_outfits(
    &self,
    user: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Outfit items ──────────────────────────────────────────────────────

  fn insert_outfit_items(
    &self,
    items: Vec<NewOutfitItem>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove every slot row of an outfit (the replace-semantics edit path).
  fn delete_outfit_items(
    &self,
    outfit_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Suggestion events ─────────────────────────────────────────────────

  fn insert_suggestion_event(
    &self,
    event: NewSuggestionEvent,
  ) -> impl Future<Output = Result<SuggestionEvent, Self::Error>> + Send + '_;

  fn delete_all_suggestion_events(
    &self,
    user: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── ObjectStore ─────────────────────────────────────────────────────────────

/// Abstraction over the file side of the remote data gateway.
pub trait ObjectStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Store `bytes` at `path` and return the object's public URL.
  fn upload<'a>(
    &'a self,
    bucket: Bucket,
    path: &'a str,
    bytes: bytes::Bytes,
    content_type: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;

  /// All object keys under `prefix` (recursive).
  fn list<'a>(
    &'a self,
    bucket: Bucket,
    prefix: &'a str,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + 'a;

  /// Remove the named objects. Missing keys are not an error.
  fn remove<'a>(
    &'a self,
    bucket: Bucket,
    paths: &'a [String],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
