//! The outfit composer: a seven-slot draft shared by the manual builder,
//! the editor and the AI-assisted flows.
//!
//! Numbered accessory slots exist only in the composer; on save both map
//! down to the shared `accessory` slot label.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use garb_ai::contract::{BuildOutfitResponse, SuggestedPicks};
use garb_core::{
  item::ClosetItem,
  outfit::OutfitWithItems,
  taxonomy::{Category, Slot},
};

use crate::{Error, Result};

// ─── Slots ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComposerSlot {
  Top,
  Bottom,
  Shoes,
  MidLayer,
  Outerwear,
  Accessory1,
  Accessory2,
}

impl ComposerSlot {
  pub const ALL: [ComposerSlot; 7] = [
    ComposerSlot::Top,
    ComposerSlot::Bottom,
    ComposerSlot::Shoes,
    ComposerSlot::MidLayer,
    ComposerSlot::Outerwear,
    ComposerSlot::Accessory1,
    ComposerSlot::Accessory2,
  ];

  pub fn label(self) -> &'static str {
    match self {
      ComposerSlot::Top => "Top",
      ComposerSlot::Bottom => "Bottom",
      ComposerSlot::Shoes => "Shoes",
      ComposerSlot::MidLayer => "Mid layer",
      ComposerSlot::Outerwear => "Outerwear",
      ComposerSlot::Accessory1 => "Accessory 1",
      ComposerSlot::Accessory2 => "Accessory 2",
    }
  }

  /// Categories whose items may fill this slot. The mid layer admits both
  /// tops (sweaters, hoodies) and light outerwear.
  pub fn allowed_categories(self) -> &'static [Category] {
    match self {
      ComposerSlot::Top => &[Category::Tops],
      ComposerSlot::Bottom => &[Category::Bottoms],
      ComposerSlot::Shoes => &[Category::Shoes],
      ComposerSlot::MidLayer => &[Category::Tops, Category::Outerwear],
      ComposerSlot::Outerwear => &[Category::Outerwear],
      ComposerSlot::Accessory1 | ComposerSlot::Accessory2 => {
        &[Category::Accessories]
      }
    }
  }

  pub fn is_required(self) -> bool {
    matches!(
      self,
      ComposerSlot::Top | ComposerSlot::Bottom | ComposerSlot::Shoes
    )
  }

  /// The slot label persisted on save.
  pub fn storage_slot(self) -> Slot {
    match self {
      ComposerSlot::Top => Slot::Top,
      ComposerSlot::Bottom => Slot::Bottom,
      ComposerSlot::Shoes => Slot::Shoes,
      ComposerSlot::MidLayer => Slot::MidLayer,
      ComposerSlot::Outerwear => Slot::Outerwear,
      ComposerSlot::Accessory1 | ComposerSlot::Accessory2 => Slot::Accessory,
    }
  }
}

impl std::fmt::Display for ComposerSlot {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.label())
  }
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// The in-progress slot state, item ids only.
#[derive(Debug, Clone, Default)]
pub struct OutfitDraft {
  slots: HashMap<ComposerSlot, Uuid>,
}

impl OutfitDraft {
  pub fn new() -> Self {
    Self::default()
  }

  /// Seed a draft from a stored outfit, for the editor. Accessory rows fill
  /// the numbered slots in listed order; rows beyond the second are
  /// ignored.
  pub fn from_outfit(outfit: &OutfitWithItems) -> Self {
    let mut draft = Self::new();
    for (link, _) in &outfit.items {
      let slot = match link.slot {
        Slot::Top => ComposerSlot::Top,
        Slot::Bottom => ComposerSlot::Bottom,
        Slot::Shoes => ComposerSlot::Shoes,
        Slot::MidLayer => ComposerSlot::MidLayer,
        Slot::Outerwear => ComposerSlot::Outerwear,
        Slot::Accessory => {
          if !draft.slots.contains_key(&ComposerSlot::Accessory1) {
            ComposerSlot::Accessory1
          } else if !draft.slots.contains_key(&ComposerSlot::Accessory2) {
            ComposerSlot::Accessory2
          } else {
            debug!(item = %link.item_id, "outfit holds more than two accessories");
            continue;
          }
        }
      };
      draft.slots.insert(slot, link.item_id);
    }
    draft
  }

  /// Place an item in a slot, replacing any current occupant. The item's
  /// category must be in the slot's allowed list.
  pub fn assign(&mut self, slot: ComposerSlot, item: &ClosetItem) -> Result<()> {
    if !slot.allowed_categories().contains(&item.category) {
      return Err(Error::SlotMismatch {
        slot,
        category: item.category,
      });
    }
    self.slots.insert(slot, item.id);
    Ok(())
  }

  pub fn clear(&mut self, slot: ComposerSlot) {
    self.slots.remove(&slot);
  }

  pub fn get(&self, slot: ComposerSlot) -> Option<Uuid> {
    self.slots.get(&slot).copied()
  }

  /// Required slots not yet filled.
  pub fn missing_required(&self) -> Vec<ComposerSlot> {
    ComposerSlot::ALL
      .into_iter()
      .filter(|s| s.is_required() && !self.slots.contains_key(s))
      .collect()
  }

  /// Save is permitted once top, bottom and shoes are filled.
  pub fn can_save(&self) -> bool {
    self.missing_required().is_empty()
  }

  /// The (slot, item) pairs to persist, numbered accessory slots mapped
  /// down to `accessory`.
  pub fn assignments(&self) -> Vec<(Slot, Uuid)> {
    ComposerSlot::ALL
      .into_iter()
      .filter_map(|slot| {
        self
          .slots
          .get(&slot)
          .map(|&item_id| (slot.storage_slot(), item_id))
      })
      .collect()
  }

  /// Items eligible for `slot`, preserving the closet's ordering.
  pub fn candidates<'a>(
    &self,
    slot: ComposerSlot,
    items: &'a [ClosetItem],
  ) -> Vec<&'a ClosetItem> {
    items
      .iter()
      .filter(|i| slot.allowed_categories().contains(&i.category))
      .collect()
  }
}

// ─── AI pick resolution ──────────────────────────────────────────────────────

/// Resolve a whole-closet suggestion into a draft. Ids that do not parse,
/// do not exist locally, or sit in a disallowed category are dropped
/// without error.
pub fn resolve_suggestion(
  picks: &SuggestedPicks,
  items: &[ClosetItem],
) -> OutfitDraft {
  let mut draft = OutfitDraft::new();
  let singles = [
    (ComposerSlot::Top, picks.top.as_deref()),
    (ComposerSlot::Bottom, picks.bottom.as_deref()),
    (ComposerSlot::Shoes, picks.shoes.as_deref()),
    (ComposerSlot::MidLayer, picks.mid_layer.as_deref()),
    (ComposerSlot::Outerwear, picks.outerwear.as_deref()),
  ];
  for (slot, pick) in singles {
    if let Some(item) = pick.and_then(|id| find_item(items, id)) {
      try_assign(&mut draft, slot, item);
    }
  }
  assign_accessories(&mut draft, &picks.accessories, items);
  draft
}

/// Resolve an anchored build into a draft. The anchor claims its natural
/// slot first; picks never displace it.
pub fn resolve_build(
  response: &BuildOutfitResponse,
  items: &[ClosetItem],
) -> OutfitDraft {
  let mut draft = OutfitDraft::new();
  let anchor = &response.anchor_item;
  let anchor_slot = match Slot::for_anchor(anchor.category) {
    Slot::Top => ComposerSlot::Top,
    Slot::Bottom => ComposerSlot::Bottom,
    Slot::Shoes => ComposerSlot::Shoes,
    Slot::MidLayer => ComposerSlot::MidLayer,
    Slot::Outerwear => ComposerSlot::Outerwear,
    Slot::Accessory => ComposerSlot::Accessory1,
  };
  draft.slots.insert(anchor_slot, anchor.id);

  let picks = &response.closet_picks;
  let singles = [
    (ComposerSlot::Top, picks.top.as_deref()),
    (ComposerSlot::Bottom, picks.bottom.as_deref()),
    (ComposerSlot::Shoes, picks.shoes.as_deref()),
    (ComposerSlot::Outerwear, picks.outerwear.as_deref()),
  ];
  for (slot, pick) in singles {
    if slot == anchor_slot {
      continue;
    }
    if let Some(item) = pick.and_then(|id| find_item(items, id)) {
      try_assign(&mut draft, slot, item);
    }
  }
  assign_accessories(&mut draft, &picks.accessories, items);
  draft
}

fn assign_accessories(
  draft: &mut OutfitDraft,
  ids: &[String],
  items: &[ClosetItem],
) {
  let open: Vec<ComposerSlot> = [ComposerSlot::Accessory1, ComposerSlot::Accessory2]
    .into_iter()
    .filter(|s| draft.get(*s).is_none())
    .collect();
  let picked = ids.iter().filter_map(|id| find_item(items, id));
  for (slot, item) in open.into_iter().zip(picked) {
    try_assign(draft, slot, item);
  }
}

fn find_item<'a>(items: &'a [ClosetItem], id: &str) -> Option<&'a ClosetItem> {
  let id = Uuid::parse_str(id).ok()?;
  items.iter().find(|i| i.id == id)
}

fn try_assign(draft: &mut OutfitDraft, slot: ComposerSlot, item: &ClosetItem) {
  if let Err(err) = draft.assign(slot, item) {
    debug!(%err, "dropping AI pick");
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use garb_ai::contract::ClosetPicks;
  use garb_core::{
    outfit::{Outfit, OutfitItem, OutfitSource},
    taxonomy::{DressLevel, LayerRole, Pattern, Season},
  };

  use super::*;

  fn item(category: Category) -> ClosetItem {
    let now = Utc::now();
    ClosetItem {
      id: Uuid::new_v4(),
      user_id: Uuid::new_v4(),
      category,
      subtype: None,
      primary_color: None,
      season: Season::Unknown,
      pattern: Pattern::Unknown,
      dress_level: DressLevel::Unknown,
      layer_role: LayerRole::Unknown,
      favorite: false,
      notes: None,
      original_image_url: "mem://orig".to_owned(),
      cutout_image_url: None,
      created_at: now,
      updated_at: now,
    }
  }

  #[test]
  fn mid_layer_admits_tops_and_outerwear_only() {
    let mut draft = OutfitDraft::new();
    assert!(draft.assign(ComposerSlot::MidLayer, &item(Category::Tops)).is_ok());
    assert!(
      draft
        .assign(ComposerSlot::MidLayer, &item(Category::Outerwear))
        .is_ok()
    );
    assert!(matches!(
      draft.assign(ComposerSlot::MidLayer, &item(Category::Shoes)),
      Err(Error::SlotMismatch { .. })
    ));
  }

  #[test]
  fn save_gate_requires_exactly_the_core_slots() {
    let mut draft = OutfitDraft::new();
    draft.assign(ComposerSlot::Top, &item(Category::Tops)).unwrap();
    draft
      .assign(ComposerSlot::Bottom, &item(Category::Bottoms))
      .unwrap();
    assert!(!draft.can_save());
    assert_eq!(draft.missing_required(), vec![ComposerSlot::Shoes]);

    draft.assign(ComposerSlot::Shoes, &item(Category::Shoes)).unwrap();
    assert!(draft.can_save());
  }

  #[test]
  fn numbered_accessory_slots_share_one_storage_label() {
    let mut draft = OutfitDraft::new();
    let first = item(Category::Accessories);
    let second = item(Category::Accessories);
    draft.assign(ComposerSlot::Accessory1, &first).unwrap();
    draft.assign(ComposerSlot::Accessory2, &second).unwrap();

    let assignments = draft.assignments();
    let accessories: Vec<Uuid> = assignments
      .iter()
      .filter(|(slot, _)| *slot == Slot::Accessory)
      .map(|&(_, id)| id)
      .collect();
    assert_eq!(accessories, vec![first.id, second.id]);
  }

  #[test]
  fn editing_round_trips_through_the_draft_unchanged() {
    let top = item(Category::Tops);
    let bottom = item(Category::Bottoms);
    let shoes = item(Category::Shoes);
    let hat = item(Category::Accessories);
    let watch = item(Category::Accessories);

    let now = Utc::now();
    let outfit_id = Uuid::new_v4();
    let stored = OutfitWithItems {
      outfit: Outfit {
        id:            outfit_id,
        user_id:       top.user_id,
        name:          None,
        source:        OutfitSource::Manual,
        thumbnail_url: None,
        created_at:    now,
        updated_at:    now,
      },
      items:  [
        (Slot::Top, &top),
        (Slot::Bottom, &bottom),
        (Slot::Shoes, &shoes),
        (Slot::Accessory, &hat),
        (Slot::Accessory, &watch),
      ]
      .into_iter()
      .map(|(slot, i)| {
        (
          OutfitItem {
            id: Uuid::new_v4(),
            outfit_id,
            item_id: i.id,
            slot,
          },
          i.clone(),
        )
      })
      .collect(),
    };

    let draft = OutfitDraft::from_outfit(&stored);
    let mut expected = stored.assignments();
    let mut actual = draft.assignments();
    expected.sort_by_key(|&(slot, id)| (slot.as_str(), id));
    actual.sort_by_key(|&(slot, id)| (slot.as_str(), id));
    assert_eq!(actual, expected);
  }

  #[test]
  fn suggestion_resolution_drops_unknown_ids_silently() {
    let top = item(Category::Tops);
    let bottom = item(Category::Bottoms);
    let closet = vec![top.clone(), bottom.clone()];

    let picks = SuggestedPicks {
      top: Some(top.id.to_string()),
      bottom: Some(bottom.id.to_string()),
      shoes: Some(Uuid::new_v4().to_string()),
      mid_layer: Some("not-a-uuid".to_owned()),
      outerwear: None,
      accessories: vec![top.id.to_string()],
    };
    let draft = resolve_suggestion(&picks, &closet);

    assert_eq!(draft.get(ComposerSlot::Top), Some(top.id));
    assert_eq!(draft.get(ComposerSlot::Bottom), Some(bottom.id));
    assert!(draft.get(ComposerSlot::Shoes).is_none());
    assert!(draft.get(ComposerSlot::MidLayer).is_none());
    // A top offered as an accessory fails the category gate.
    assert!(draft.get(ComposerSlot::Accessory1).is_none());
    assert!(!draft.can_save());
  }

  #[test]
  fn build_resolution_anchors_first_and_fills_around_it() {
    let anchor = item(Category::Shoes);
    let top = item(Category::Tops);
    let bottom = item(Category::Bottoms);
    let hat = item(Category::Accessories);
    let closet = vec![top.clone(), bottom.clone(), hat.clone()];

    let response = BuildOutfitResponse {
      anchor_item:          anchor.clone(),
      closet_picks:         ClosetPicks {
        top: Some(top.id.to_string()),
        bottom: Some(bottom.id.to_string()),
        // The model echoing the anchor's own slot must not displace it.
        shoes: Some(Uuid::new_v4().to_string()),
        outerwear: None,
        accessories: vec![hat.id.to_string()],
      },
      shopping_suggestions: Vec::new(),
      outfit_reasoning:     String::new(),
      style_notes:          None,
    };

    let draft = resolve_build(&response, &closet);
    assert_eq!(draft.get(ComposerSlot::Shoes), Some(anchor.id));
    assert_eq!(draft.get(ComposerSlot::Top), Some(top.id));
    assert_eq!(draft.get(ComposerSlot::Accessory1), Some(hat.id));
    assert!(draft.can_save());
  }
}
