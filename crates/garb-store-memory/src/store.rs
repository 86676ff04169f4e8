//! [`MemoryStore`] — the in-process implementation of both store traits.

use std::{
  collections::HashMap,
  sync::{
    Arc, Mutex, MutexGuard,
    atomic::{AtomicBool, Ordering},
  },
};

use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use garb_core::{
  event::{NewSuggestionEvent, SuggestionEvent},
  item::{ClosetItem, ItemPatch, NewClosetItem},
  outfit::{NewOutfit, NewOutfitItem, Outfit, OutfitItem, OutfitWithItems},
  store::{Bucket, ObjectStore, WardrobeStore},
};

use crate::{Error, Result};

#[derive(Default)]
struct Inner {
  items:        Vec<ClosetItem>,
  outfits:      Vec<Outfit>,
  outfit_items: Vec<OutfitItem>,
  events:       Vec<SuggestionEvent>,
  objects:      HashMap<(Bucket, String), Bytes>,
}

/// A wardrobe store held entirely in process memory.
///
/// Cloning is cheap — the inner state is reference-counted.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner:         Arc<Mutex<Inner>>,
  fail_removals: Arc<AtomicBool>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    // No await point ever holds the guard; poisoning can only come from a
    // panicking test, where the partial state is still what we want to see.
    self.inner.lock().unwrap_or_else(|e| e.into_inner())
  }

  /// Arm or disarm injected failure of [`ObjectStore::remove`].
  pub fn fail_removals(&self, fail: bool) {
    self.fail_removals.store(fail, Ordering::SeqCst);
  }

  /// Test accessor: the write-only suggestion log for `user`.
  pub fn suggestion_events_for(&self, user: Uuid) -> Vec<SuggestionEvent> {
    self
      .lock()
      .events
      .iter()
      .filter(|e| e.user_id == user)
      .cloned()
      .collect()
  }

  /// Test accessor: number of stored objects in `bucket`.
  pub fn object_count(&self, bucket: Bucket) -> usize {
    self
      .lock()
      .objects
      .keys()
      .filter(|(b, _)| *b == bucket)
      .count()
  }
}

impl WardrobeStore for MemoryStore {
  type Error = Error;

  // ── Closet items ──────────────────────────────────────────────────────────

  async fn list_items(&self, user: Uuid) -> Result<Vec<ClosetItem>> {
    let mut items: Vec<ClosetItem> = self
      .lock()
      .items
      .iter()
      .filter(|i| i.user_id == user)
      .cloned()
      .collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(items)
  }

  async fn get_item(&self, user: Uuid, id: Uuid) -> Result<Option<ClosetItem>> {
    Ok(
      self
        .lock()
        .items
        .iter()
        .find(|i| i.user_id == user && i.id == id)
        .cloned(),
    )
  }

  async fn insert_item(&self, item: NewClosetItem) -> Result<ClosetItem> {
    let mut inner = self.lock();
    if inner.items.iter().any(|i| i.id == item.id) {
      return Err(Error::DuplicateId(item.id));
    }
    let now = Utc::now();
    let stored = ClosetItem {
      id:                 item.id,
      user_id:            item.user_id,
      category:           item.category,
      subtype:            item.subtype,
      primary_color:      item.primary_color,
      season:             item.season,
      pattern:            item.pattern,
      dress_level:        item.dress_level,
      layer_role:         item.layer_role,
      favorite:           item.favorite,
      notes:              item.notes,
      original_image_url: item.original_image_url,
      cutout_image_url:   item.cutout_image_url,
      created_at:         now,
      updated_at:         now,
    };
    inner.items.push(stored.clone());
    Ok(stored)
  }

  async fn update_item(
    &self,
    user: Uuid,
    id: Uuid,
    patch: ItemPatch,
  ) -> Result<ClosetItem> {
    let mut inner = self.lock();
    let item = inner
      .items
      .iter_mut()
      .find(|i| i.user_id == user && i.id == id)
      .ok_or(Error::ItemNotFound(id))?;
    item.category = patch.category;
    item.subtype = patch.subtype;
    item.primary_color = patch.primary_color;
    item.season = patch.season;
    item.pattern = patch.pattern;
    item.dress_level = patch.dress_level;
    item.layer_role = patch.layer_role;
    item.favorite = patch.favorite;
    item.notes = patch.notes;
    item.updated_at = Utc::now();
    Ok(item.clone())
  }

  async fn set_favorite(
    &self,
    user: Uuid,
    id: Uuid,
    favorite: bool,
  ) -> Result<()> {
    let mut inner = self.lock();
    let item = inner
      .items
      .iter_mut()
      .find(|i| i.user_id == user && i.id == id)
      .ok_or(Error::ItemNotFound(id))?;
    item.favorite = favorite;
    item.updated_at = Utc::now();
    Ok(())
  }

  async fn delete_item(&self, user: Uuid, id: Uuid) -> Result<()> {
    let mut inner = self.lock();
    inner.items.retain(|i| !(i.user_id == user && i.id == id));
    // The external service cascades slot rows; emulate it.
    inner.outfit_items.retain(|oi| oi.item_id != id);
    Ok(())
  }

  async fn delete_all_items(&self, user: Uuid) -> Result<()> {
    let mut inner = self.lock();
    let gone: Vec<Uuid> = inner
      .items
      .iter()
      .filter(|i| i.user_id == user)
      .map(|i| i.id)
      .collect();
    inner.items.retain(|i| i.user_id != user);
    inner.outfit_items.retain(|oi| !gone.contains(&oi.item_id));
    Ok(())
  }

  // ── Outfits ───────────────────────────────────────────────────────────────

  async fn insert_outfit(&self, outfit: NewOutfit) -> Result<Outfit> {
    let now = Utc::now();
    let stored = Outfit {
      id:            Uuid::new_v4(),
      user_id:       outfit.user_id,
      name:          outfit.name,
      source:        outfit.source,
      thumbnail_url: None,
      created_at:    now,
      updated_at:    now,
    };
    self.lock().outfits.push(stored.clone());
    Ok(stored)
  }

  async fn list_outfits(&self, user: Uuid) -> Result<Vec<OutfitWithItems>> {
    let inner = self.lock();
    let mut outfits: Vec<OutfitWithItems> = inner
      .outfits
      .iter()
      .filter(|o| o.user_id == user)
      .map(|o| join_items(&inner, o.clone()))
      .collect();
    outfits.sort_by(|a, b| b.outfit.created_at.cmp(&a.outfit.created_at));
    Ok(outfits)
  }

  async fn get_outfit(
    &self,
    user: Uuid,
    id: Uuid,
  ) -> Result<Option<OutfitWithItems>> {
    let inner = self.lock();
    Ok(
      inner
        .outfits
        .iter()
        .find(|o| o.user_id == user && o.id == id)
        .map(|o| join_items(&inner, o.clone())),
    )
  }

  async fn rename_outfit(
    &self,
    user: Uuid,
    id: Uuid,
    name: Option<String>,
  ) -> Result<()> {
    let mut inner = self.lock();
    let outfit = inner
      .outfits
      .iter_mut()
      .find(|o| o.user_id == user && o.id == id)
      .ok_or(Error::OutfitNotFound(id))?;
    outfit.name = name;
    outfit.updated_at = Utc::now();
    Ok(())
  }

  async fn delete_outfit(&self, user: Uuid, id: Uuid) -> Result<()> {
    let mut inner = self.lock();
    inner.outfits.retain(|o| !(o.user_id == user && o.id == id));
    inner.outfit_items.retain(|oi| oi.outfit_id != id);
    Ok(())
  }

  async fn delete_all_outfits(&self, user: Uuid) -> Result<()> {
    let mut inner = self.lock();
    let gone: Vec<Uuid> = inner
      .outfits
      .iter()
      .filter(|o| o.user_id == user)
      .map(|o| o.id)
      .collect();
    inner.outfits.retain(|o| o.user_id != user);
    inner
      .outfit_items
      .retain(|oi| !gone.contains(&oi.outfit_id));
    Ok(())
  }

  // ── Outfit items ──────────────────────────────────────────────────────────

  async fn insert_outfit_items(&self, items: Vec<NewOutfitItem>) -> Result<()> {
    let mut inner = self.lock();
    for item in items {
      inner.outfit_items.push(OutfitItem {
        id:        Uuid::new_v4(),
        outfit_id: item.outfit_id,
        item_id:   item.item_id,
        slot:      item.slot,
      });
    }
    Ok(())
  }

  async fn delete_outfit_items(&self, outfit_id: Uuid) -> Result<()> {
    self
      .lock()
      .outfit_items
      .retain(|oi| oi.outfit_id != outfit_id);
    Ok(())
  }

  // ── Suggestion events ─────────────────────────────────────────────────────

  async fn insert_suggestion_event(
    &self,
    event: NewSuggestionEvent,
  ) -> Result<SuggestionEvent> {
    let stored = SuggestionEvent {
      id:                 Uuid::new_v4(),
      user_id:            event.user_id,
      suggested_item_ids: event.suggested_item_ids,
      action:             event.action,
      created_at:         Utc::now(),
    };
    self.lock().events.push(stored.clone());
    Ok(stored)
  }

  async fn delete_all_suggestion_events(&self, user: Uuid) -> Result<()> {
    self.lock().events.retain(|e| e.user_id != user);
    Ok(())
  }
}

fn join_items(inner: &Inner, outfit: Outfit) -> OutfitWithItems {
  let items = inner
    .outfit_items
    .iter()
    .filter(|oi| oi.outfit_id == outfit.id)
    .filter_map(|oi| {
      inner
        .items
        .iter()
        .find(|i| i.id == oi.item_id)
        .map(|i| (oi.clone(), i.clone()))
    })
    .collect();
  OutfitWithItems { outfit, items }
}

impl ObjectStore for MemoryStore {
  type Error = Error;

  async fn upload(
    &self,
    bucket: Bucket,
    path: &str,
    bytes: Bytes,
    _content_type: &str,
  ) -> Result<String> {
    self
      .lock()
      .objects
      .insert((bucket, path.to_owned()), bytes);
    Ok(format!("memory://{}/{path}", bucket.as_str()))
  }

  async fn list(&self, bucket: Bucket, prefix: &str) -> Result<Vec<String>> {
    Ok(
      self
        .lock()
        .objects
        .keys()
        .filter(|(b, path)| *b == bucket && path.starts_with(prefix))
        .map(|(_, path)| path.clone())
        .collect(),
    )
  }

  async fn remove(&self, bucket: Bucket, paths: &[String]) -> Result<()> {
    if self.fail_removals.load(Ordering::SeqCst) {
      return Err(Error::RemovalFailed);
    }
    let mut inner = self.lock();
    for path in paths {
      inner.objects.remove(&(bucket, path.clone()));
    }
    Ok(())
  }
}
