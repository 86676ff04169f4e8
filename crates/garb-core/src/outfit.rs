//! Outfits — named bags of slot assignments over closet items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{item::ClosetItem, taxonomy::Slot};

// ─── Source ──────────────────────────────────────────────────────────────────

/// How the outfit came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutfitSource {
  Manual,
  Suggested,
}

impl OutfitSource {
  pub fn as_str(&self) -> &'static str {
    match self {
      OutfitSource::Manual => "manual",
      OutfitSource::Suggested => "suggested",
    }
  }
}

// ─── Outfit ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outfit {
  pub id:            Uuid,
  pub user_id:       Uuid,
  pub name:          Option<String>,
  pub source:        OutfitSource,
  /// Defined in the schema but never written; carried for fidelity.
  pub thumbnail_url: Option<String>,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

/// Input to [`crate::store::WardrobeStore::insert_outfit`].
#[derive(Debug, Clone, Serialize)]
pub struct NewOutfit {
  pub user_id: Uuid,
  pub name:    Option<String>,
  pub source:  OutfitSource,
}

// ─── OutfitItem ──────────────────────────────────────────────────────────────

/// Join row placing a closet item in an outfit slot. No uniqueness
/// constraint on `slot`: an outfit may hold several `accessory` rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutfitItem {
  pub id:        Uuid,
  pub outfit_id: Uuid,
  pub item_id:   Uuid,
  pub slot:      Slot,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewOutfitItem {
  pub outfit_id: Uuid,
  pub item_id:   Uuid,
  pub slot:      Slot,
}

// ─── Joined read model ───────────────────────────────────────────────────────

/// An outfit with its slot rows and their items, as listed by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutfitWithItems {
  pub outfit: Outfit,
  pub items:  Vec<(OutfitItem, ClosetItem)>,
}

impl OutfitWithItems {
  /// The (slot, item id) pairs of this outfit, for replace-semantics
  /// comparisons.
  pub fn assignments(&self) -> Vec<(Slot, Uuid)> {
    self
      .items
      .iter()
      .map(|(link, _)| (link.slot, link.item_id))
      .collect()
  }
}
