//! Closet items — the unit of the digital wardrobe.
//!
//! An item is created at the end of the capture pipeline, after its images
//! are uploaded. Tag fields start at their `Unknown` defaults and are
//! refined by the AI tagger and the review editor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Result,
  error::Error,
  taxonomy::{Category, DressLevel, LayerRole, Pattern, Season},
};

// ─── ClosetItem ──────────────────────────────────────────────────────────────

/// A single wardrobe item as stored by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosetItem {
  pub id:                 Uuid,
  pub user_id:            Uuid,
  pub category:           Category,
  /// Category-scoped subtype (e.g. `"t-shirt"` under `tops`).
  pub subtype:            Option<String>,
  pub primary_color:      Option<String>,
  pub season:             Season,
  pub pattern:            Pattern,
  pub dress_level:        DressLevel,
  pub layer_role:         LayerRole,
  pub favorite:           bool,
  pub notes:              Option<String>,
  pub original_image_url: String,
  /// Background-removed rendition; falls back to the original when absent.
  pub cutout_image_url:   Option<String>,
  pub created_at:         DateTime<Utc>,
  pub updated_at:         DateTime<Utc>,
}

impl ClosetItem {
  /// The image to present: cutout preferred, else original.
  pub fn display_image_url(&self) -> &str {
    self
      .cutout_image_url
      .as_deref()
      .unwrap_or(&self.original_image_url)
  }

  /// One-line summary used in stylist prompts, keyed by id.
  pub fn prompt_summary(&self) -> String {
    format!(
      "{}: {} ({}, {})",
      self.id,
      self.subtype.as_deref().unwrap_or(self.category.as_str()),
      self.primary_color.as_deref().unwrap_or("unknown color"),
      match self.dress_level {
        DressLevel::Unknown => "unknown style".to_owned(),
        level => level.as_str().to_owned(),
      },
    )
  }
}

// ─── NewClosetItem ───────────────────────────────────────────────────────────

/// Input to [`crate::store::WardrobeStore::insert_item`].
///
/// The id is allocated by the caller (the capture pipeline names storage
/// objects after it before the row exists); timestamps are set by the store.
#[derive(Debug, Clone, Serialize)]
pub struct NewClosetItem {
  pub id:                 Uuid,
  pub user_id:            Uuid,
  pub category:           Category,
  pub subtype:            Option<String>,
  pub primary_color:      Option<String>,
  pub season:             Season,
  pub pattern:            Pattern,
  pub dress_level:        DressLevel,
  pub layer_role:         LayerRole,
  pub favorite:           bool,
  pub notes:              Option<String>,
  pub original_image_url: String,
  pub cutout_image_url:   Option<String>,
}

impl NewClosetItem {
  /// Convenience constructor with all tags at their defaults.
  pub fn new(user_id: Uuid, category: Category, original_image_url: impl Into<String>) -> Self {
    Self {
      id: Uuid::new_v4(),
      user_id,
      category,
      subtype: None,
      primary_color: None,
      season: Season::default(),
      pattern: Pattern::default(),
      dress_level: DressLevel::default(),
      layer_role: LayerRole::default(),
      favorite: false,
      notes: None,
      original_image_url: original_image_url.into(),
      cutout_image_url: None,
    }
  }

  /// Check the subtype against the category vocabulary.
  pub fn validate(&self) -> Result<()> {
    validate_subtype(self.category, self.subtype.as_deref())
  }
}

// ─── ItemPatch ───────────────────────────────────────────────────────────────

/// The full editable tag set, written back by the detail editor in one
/// update. Image urls and ownership are never patched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemPatch {
  pub category:      Category,
  pub subtype:       Option<String>,
  pub primary_color: Option<String>,
  pub season:        Season,
  pub pattern:       Pattern,
  pub dress_level:   DressLevel,
  pub layer_role:    LayerRole,
  pub favorite:      bool,
  pub notes:         Option<String>,
}

impl ItemPatch {
  pub fn validate(&self) -> Result<()> {
    validate_subtype(self.category, self.subtype.as_deref())
  }
}

impl From<&ClosetItem> for ItemPatch {
  fn from(item: &ClosetItem) -> Self {
    Self {
      category:      item.category,
      subtype:       item.subtype.clone(),
      primary_color: item.primary_color.clone(),
      season:        item.season,
      pattern:       item.pattern,
      dress_level:   item.dress_level,
      layer_role:    item.layer_role,
      favorite:      item.favorite,
      notes:         item.notes.clone(),
    }
  }
}

/// Subtype/category pairing invariant, enforced at the service layer rather
/// than only in the form UI.
pub fn validate_subtype(
  category: Category,
  subtype: Option<&str>,
) -> Result<()> {
  match subtype {
    None => Ok(()),
    Some(s) if category.validates_subtype(s) => Ok(()),
    Some(s) => Err(Error::SubtypeMismatch {
      category,
      subtype: s.to_owned(),
    }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn validate_rejects_cross_category_subtype() {
    let mut item =
      NewClosetItem::new(Uuid::new_v4(), Category::Tops, "http://img");
    item.subtype = Some("jeans".to_owned());
    assert!(matches!(
      item.validate(),
      Err(Error::SubtypeMismatch { .. })
    ));

    item.subtype = Some("hoodie".to_owned());
    assert!(item.validate().is_ok());

    item.subtype = None;
    assert!(item.validate().is_ok());
  }

  #[test]
  fn prompt_summary_falls_back_to_category_and_unknowns() {
    let item = NewClosetItem::new(Uuid::new_v4(), Category::Shoes, "u");
    let stored = ClosetItem {
      id:                 item.id,
      user_id:            item.user_id,
      category:           item.category,
      subtype:            None,
      primary_color:      None,
      season:             Season::Unknown,
      pattern:            Pattern::Unknown,
      dress_level:        DressLevel::Unknown,
      layer_role:         LayerRole::Unknown,
      favorite:           false,
      notes:              None,
      original_image_url: "u".into(),
      cutout_image_url:   None,
      created_at:         Utc::now(),
      updated_at:         Utc::now(),
    };
    let summary = stored.prompt_summary();
    assert!(summary.contains("shoes (unknown color, unknown style)"));
  }
}
