//! The `Wardrobe` service — every mutation the flows perform, executed
//! against a record store and an object store.
//!
//! Item creation is the one multi-backend write: object uploads and the row
//! insert are compensated through [`crate::saga::Saga`] so a failed save
//! leaves no orphaned storage object. Deletion goes the other way round and
//! is deliberately best-effort on the storage side: rows are removed first
//! and a failed object removal is logged, never surfaced.

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use garb_core::{
  event::{NewSuggestionEvent, SuggestionAction, SuggestionEvent},
  item::{ClosetItem, ItemPatch, NewClosetItem},
  outfit::{NewOutfit, NewOutfitItem, Outfit, OutfitSource, OutfitWithItems},
  store::{
    Bucket, ObjectStore, WardrobeStore, cutout_path, item_prefix,
    original_path,
  },
  taxonomy::Slot,
};

use crate::{Error, Result, capture::CapturedImage, saga::Saga};

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Everything the review screen submits on save.
///
/// The item id is allocated by the caller before any upload so storage
/// objects can be keyed by it.
#[derive(Debug, Clone)]
pub struct ReviewSubmission {
  pub item_id:    Uuid,
  pub user_id:    Uuid,
  pub original:   CapturedImage,
  /// Background-removed rendition, when the extraction succeeded.
  pub cutout_png: Option<Bytes>,
  pub tags:       ItemPatch,
}

/// Outcome of the global "delete all data" action. Row deletion always runs
/// to completion; storage failures are only counted.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PurgeReport {
  pub items_deleted:   usize,
  pub outfits_deleted: usize,
  pub objects_removed: usize,
  pub storage_errors:  usize,
}

// ─── Service ─────────────────────────────────────────────────────────────────

pub struct Wardrobe<S, O> {
  store:   S,
  objects: O,
}

impl<S, O> Wardrobe<S, O>
where
  S: WardrobeStore,
  O: ObjectStore,
{
  pub fn new(store: S, objects: O) -> Self {
    Self { store, objects }
  }

  // ── Closet items ──────────────────────────────────────────────────────────

  pub async fn list_items(&self, user: Uuid) -> Result<Vec<ClosetItem>> {
    self.store.list_items(user).await.map_err(Error::store)
  }

  pub async fn get_item(&self, user: Uuid, id: Uuid) -> Result<ClosetItem> {
    self
      .store
      .get_item(user, id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ItemNotFound(id))
  }

  /// Persist a reviewed capture: upload the original, upload the cutout if
  /// present, insert the row. Completed uploads are compensated if a later
  /// step fails.
  pub async fn save_review(
    &self,
    submission: ReviewSubmission,
  ) -> Result<ClosetItem> {
    submission.tags.validate()?;

    let ReviewSubmission {
      item_id,
      user_id,
      original,
      cutout_png,
      tags,
    } = submission;

    let mut saga = Saga::new();

    let original_key = original_path(user_id, item_id, &original.ext);
    let original_url = self
      .objects
      .upload(
        Bucket::Originals,
        &original_key,
        original.bytes.clone(),
        &original.content_type,
      )
      .await
      .map_err(Error::objects)?;
    {
      let objects = &self.objects;
      let keys = vec![original_key];
      saga.push("remove uploaded original", async move {
        objects
          .remove(Bucket::Originals, &keys)
          .await
          .map_err(|e| e.to_string())
      });
    }

    let mut cutout_url = None;
    if let Some(png) = cutout_png {
      let cutout_key = cutout_path(user_id, item_id);
      let url = match self
        .objects
        .upload(Bucket::Cutouts, &cutout_key, png, "image/png")
        .await
      {
        Ok(url) => url,
        Err(err) => {
          let err = Error::objects(err);
          saga.unwind().await;
          return Err(err);
        }
      };
      let objects = &self.objects;
      let keys = vec![cutout_key];
      saga.push("remove uploaded cutout", async move {
        objects
          .remove(Bucket::Cutouts, &keys)
          .await
          .map_err(|e| e.to_string())
      });
      cutout_url = Some(url);
    }

    let row = NewClosetItem {
      id: item_id,
      user_id,
      category: tags.category,
      subtype: tags.subtype,
      primary_color: tags.primary_color,
      season: tags.season,
      pattern: tags.pattern,
      dress_level: tags.dress_level,
      layer_role: tags.layer_role,
      favorite: tags.favorite,
      notes: tags.notes,
      original_image_url: original_url,
      cutout_image_url: cutout_url,
    };
    match self.store.insert_item(row).await {
      Ok(stored) => {
        saga.commit();
        info!(item = %stored.id, category = %stored.category, "item saved");
        Ok(stored)
      }
      Err(err) => {
        let err = Error::store(err);
        saga.unwind().await;
        Err(err)
      }
    }
  }

  /// Overwrite an item's editable tags after re-validating the subtype
  /// against the chosen category.
  pub async fn update_item(
    &self,
    user: Uuid,
    id: Uuid,
    patch: ItemPatch,
  ) -> Result<ClosetItem> {
    patch.validate()?;
    self
      .store
      .update_item(user, id, patch)
      .await
      .map_err(Error::store)
  }

  pub async fn set_favorite(
    &self,
    user: Uuid,
    id: Uuid,
    favorite: bool,
  ) -> Result<()> {
    self
      .store
      .set_favorite(user, id, favorite)
      .await
      .map_err(Error::store)
  }

  /// Delete one item. The row goes first; its storage objects are removed
  /// afterwards, best-effort.
  pub async fn delete_item(&self, user: Uuid, id: Uuid) -> Result<()> {
    self
      .store
      .delete_item(user, id)
      .await
      .map_err(Error::store)?;

    let prefix = item_prefix(user, id);
    for bucket in Bucket::ALL {
      if let Err(err) = self.remove_prefix(bucket, &prefix).await {
        warn!(item = %id, bucket = bucket.as_str(), %err,
              "orphaned storage objects after item delete");
      }
    }
    Ok(())
  }

  /// Remove everything the user owns. Rows are deleted unconditionally;
  /// storage failures are counted in the report, never propagated.
  pub async fn delete_all_data(&self, user: Uuid) -> Result<PurgeReport> {
    let mut report = PurgeReport {
      items_deleted:   self.store.list_items(user).await.map_err(Error::store)?.len(),
      outfits_deleted: self
        .store
        .list_outfits(user)
        .await
        .map_err(Error::store)?
        .len(),
      ..PurgeReport::default()
    };

    self
      .store
      .delete_all_suggestion_events(user)
      .await
      .map_err(Error::store)?;
    self
      .store
      .delete_all_outfits(user)
      .await
      .map_err(Error::store)?;
    self
      .store
      .delete_all_items(user)
      .await
      .map_err(Error::store)?;

    let prefix = format!("{user}/");
    for bucket in Bucket::ALL {
      match self.remove_prefix(bucket, &prefix).await {
        Ok(removed) => report.objects_removed += removed,
        Err(err) => {
          warn!(%user, bucket = bucket.as_str(), %err,
                "storage purge failed, rows already deleted");
          report.storage_errors += 1;
        }
      }
    }
    Ok(report)
  }

  async fn remove_prefix(&self, bucket: Bucket, prefix: &str) -> Result<usize> {
    let keys = self
      .objects
      .list(bucket, prefix)
      .await
      .map_err(Error::objects)?;
    if keys.is_empty() {
      return Ok(0);
    }
    self
      .objects
      .remove(bucket, &keys)
      .await
      .map_err(Error::objects)?;
    Ok(keys.len())
  }

  // ── Outfits ───────────────────────────────────────────────────────────────

  pub async fn list_outfits(&self, user: Uuid) -> Result<Vec<OutfitWithItems>> {
    self.store.list_outfits(user).await.map_err(Error::store)
  }

  pub async fn get_outfit(
    &self,
    user: Uuid,
    id: Uuid,
  ) -> Result<OutfitWithItems> {
    self
      .store
      .get_outfit(user, id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::OutfitNotFound(id))
  }

  /// Save a composed outfit: the outfit row, then one slot row per
  /// assignment. Requires top, bottom and shoes among the assignments.
  pub async fn save_outfit(
    &self,
    user: Uuid,
    name: Option<String>,
    source: OutfitSource,
    assignments: &[(Slot, Uuid)],
  ) -> Result<Outfit> {
    require_core_slots(assignments)?;

    let outfit = self
      .store
      .insert_outfit(NewOutfit {
        user_id: user,
        name,
        source,
      })
      .await
      .map_err(Error::store)?;

    let rows = slot_rows(outfit.id, assignments);
    if let Err(err) = self.store.insert_outfit_items(rows).await {
      let err = Error::store(err);
      if let Err(cleanup) = self.store.delete_outfit(user, outfit.id).await {
        warn!(outfit = %outfit.id, err = %cleanup,
              "orphaned outfit row after failed slot insert");
      }
      return Err(err);
    }
    Ok(outfit)
  }

  /// Rewrite an outfit's slots in place: delete every existing slot row,
  /// then reinsert from the current assignments. Never a diff.
  pub async fn replace_outfit_items(
    &self,
    user: Uuid,
    outfit_id: Uuid,
    assignments: &[(Slot, Uuid)],
  ) -> Result<()> {
    require_core_slots(assignments)?;
    if self
      .store
      .get_outfit(user, outfit_id)
      .await
      .map_err(Error::store)?
      .is_none()
    {
      return Err(Error::OutfitNotFound(outfit_id));
    }

    self
      .store
      .delete_outfit_items(outfit_id)
      .await
      .map_err(Error::store)?;
    self
      .store
      .insert_outfit_items(slot_rows(outfit_id, assignments))
      .await
      .map_err(Error::store)
  }

  pub async fn rename_outfit(
    &self,
    user: Uuid,
    id: Uuid,
    name: Option<String>,
  ) -> Result<()> {
    self
      .store
      .rename_outfit(user, id, name)
      .await
      .map_err(Error::store)
  }

  pub async fn delete_outfit(&self, user: Uuid, id: Uuid) -> Result<()> {
    self
      .store
      .delete_outfit(user, id)
      .await
      .map_err(Error::store)
  }

  // ── Suggestion events ─────────────────────────────────────────────────────

  /// Append to the write-only suggestion log.
  pub async fn log_suggestion(
    &self,
    user: Uuid,
    suggested_item_ids: Vec<Uuid>,
    action: SuggestionAction,
  ) -> Result<SuggestionEvent> {
    self
      .store
      .insert_suggestion_event(NewSuggestionEvent {
        user_id: user,
        suggested_item_ids,
        action,
      })
      .await
      .map_err(Error::store)
  }
}

fn require_core_slots(assignments: &[(Slot, Uuid)]) -> Result<()> {
  let missing: Vec<Slot> = [Slot::Top, Slot::Bottom, Slot::Shoes]
    .into_iter()
    .filter(|required| assignments.iter().all(|(slot, _)| slot != required))
    .collect();
  if missing.is_empty() {
    Ok(())
  } else {
    Err(Error::IncompleteOutfit { missing })
  }
}

fn slot_rows(outfit_id: Uuid, assignments: &[(Slot, Uuid)]) -> Vec<NewOutfitItem> {
  assignments
    .iter()
    .map(|&(slot, item_id)| NewOutfitItem {
      outfit_id,
      item_id,
      slot,
    })
    .collect()
}
