//! Closed vocabularies for wardrobe tagging.
//!
//! Every attribute a closet item carries is drawn from a small fixed list.
//! The serde representation is the canonical wire/database form; `as_str`
//! returns the same string for prompt building and display.

use serde::{Deserialize, Serialize};

// ─── Category ────────────────────────────────────────────────────────────────

/// The top-level garment category. Always set on an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Tops,
  Bottoms,
  Outerwear,
  Shoes,
  Accessories,
  Underwear,
}

impl Category {
  pub const ALL: [Category; 6] = [
    Category::Tops,
    Category::Bottoms,
    Category::Outerwear,
    Category::Shoes,
    Category::Accessories,
    Category::Underwear,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Category::Tops => "tops",
      Category::Bottoms => "bottoms",
      Category::Outerwear => "outerwear",
      Category::Shoes => "shoes",
      Category::Accessories => "accessories",
      Category::Underwear => "underwear",
    }
  }

  /// The subtype vocabulary valid for this category.
  pub fn subtypes(&self) -> &'static [&'static str] {
    match self {
      Category::Tops => &[
        "t-shirt", "polo", "button-up", "sweater", "hoodie", "tank-top",
        "henley",
      ],
      Category::Bottoms => &[
        "jeans", "chinos", "shorts", "sweatpants", "dress-pants", "joggers",
      ],
      Category::Outerwear => {
        &["jacket", "blazer", "coat", "vest", "parka", "bomber"]
      }
      Category::Shoes => &[
        "sneakers", "boots", "loafers", "sandals", "dress-shoes",
        "running-shoes",
      ],
      Category::Accessories => {
        &["hat", "belt", "watch", "sunglasses", "scarf", "tie", "bag"]
      }
      Category::Underwear => &["boxers", "briefs", "undershirt", "socks"],
    }
  }

  /// Whether `subtype` belongs to this category's vocabulary.
  pub fn validates_subtype(&self, subtype: &str) -> bool {
    self.subtypes().contains(&subtype)
  }
}

impl std::fmt::Display for Category {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Colors ──────────────────────────────────────────────────────────────────

/// The color palette offered by the UI. An item's `primary_color` is an open
/// string (the tagging model may answer outside this list); this constant
/// exists for filter and form option lists.
pub const COLORS: [&str; 17] = [
  "black", "white", "gray", "navy", "blue", "red", "green", "brown", "beige",
  "cream", "olive", "burgundy", "pink", "yellow", "orange", "purple",
  "multicolor",
];

// ─── Season ──────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Season {
  Summer,
  SpringFall,
  Winter,
  AllSeason,
  #[default]
  Unknown,
}

impl Season {
  pub fn as_str(&self) -> &'static str {
    match self {
      Season::Summer => "summer",
      Season::SpringFall => "spring-fall",
      Season::Winter => "winter",
      Season::AllSeason => "all-season",
      Season::Unknown => "unknown",
    }
  }
}

// ─── Pattern ─────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
  Solid,
  Patterned,
  #[default]
  Unknown,
}

impl Pattern {
  pub fn as_str(&self) -> &'static str {
    match self {
      Pattern::Solid => "solid",
      Pattern::Patterned => "patterned",
      Pattern::Unknown => "unknown",
    }
  }
}

// ─── Dress level ─────────────────────────────────────────────────────────────

/// Formality rating used to match compatible items.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum DressLevel {
  Casual,
  SmartCasual,
  Dressy,
  #[default]
  Unknown,
}

impl DressLevel {
  pub fn as_str(&self) -> &'static str {
    match self {
      DressLevel::Casual => "casual",
      DressLevel::SmartCasual => "smart-casual",
      DressLevel::Dressy => "dressy",
      DressLevel::Unknown => "unknown",
    }
  }
}

// ─── Layer role ──────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LayerRole {
  Base,
  Mid,
  Outer,
  #[default]
  Unknown,
}

impl LayerRole {
  pub fn as_str(&self) -> &'static str {
    match self {
      LayerRole::Base => "base",
      LayerRole::Mid => "mid",
      LayerRole::Outer => "outer",
      LayerRole::Unknown => "unknown",
    }
  }
}

// ─── Slot ────────────────────────────────────────────────────────────────────

/// A named position in an outfit. `top`, `bottom` and `shoes` are singular by
/// convention; multiple `accessory` rows may exist per outfit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
  Top,
  Bottom,
  Shoes,
  MidLayer,
  Outerwear,
  Accessory,
}

impl Slot {
  pub fn as_str(&self) -> &'static str {
    match self {
      Slot::Top => "top",
      Slot::Bottom => "bottom",
      Slot::Shoes => "shoes",
      Slot::MidLayer => "mid_layer",
      Slot::Outerwear => "outerwear",
      Slot::Accessory => "accessory",
    }
  }

  /// The slot an anchor item occupies in a built-around-it outfit,
  /// derived from its category. Pure and total.
  pub fn for_anchor(category: Category) -> Slot {
    match category {
      Category::Tops => Slot::Top,
      Category::Bottoms => Slot::Bottom,
      Category::Shoes => Slot::Shoes,
      Category::Outerwear => Slot::Outerwear,
      Category::Accessories | Category::Underwear => Slot::Accessory,
    }
  }
}

impl std::fmt::Display for Slot {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn anchor_slot_mapping_is_total() {
    assert_eq!(Slot::for_anchor(Category::Tops), Slot::Top);
    assert_eq!(Slot::for_anchor(Category::Bottoms), Slot::Bottom);
    assert_eq!(Slot::for_anchor(Category::Shoes), Slot::Shoes);
    assert_eq!(Slot::for_anchor(Category::Outerwear), Slot::Outerwear);
    assert_eq!(Slot::for_anchor(Category::Accessories), Slot::Accessory);
    assert_eq!(Slot::for_anchor(Category::Underwear), Slot::Accessory);
  }

  #[test]
  fn subtype_vocabulary_is_category_scoped() {
    assert!(Category::Tops.validates_subtype("t-shirt"));
    assert!(!Category::Bottoms.validates_subtype("t-shirt"));
    assert!(Category::Shoes.validates_subtype("dress-shoes"));
    assert!(!Category::Shoes.validates_subtype("dress-pants"));
  }

  #[test]
  fn serde_forms_match_the_wire_vocabulary() {
    assert_eq!(
      serde_json::to_string(&Season::SpringFall).unwrap(),
      "\"spring-fall\""
    );
    assert_eq!(
      serde_json::to_string(&DressLevel::SmartCasual).unwrap(),
      "\"smart-casual\""
    );
    assert_eq!(
      serde_json::to_string(&Slot::MidLayer).unwrap(),
      "\"mid_layer\""
    );
    let cat: Category = serde_json::from_str("\"underwear\"").unwrap();
    assert_eq!(cat, Category::Underwear);
  }

  #[test]
  fn as_str_round_trips_through_serde() {
    for cat in Category::ALL {
      let json = serde_json::to_string(&cat).unwrap();
      assert_eq!(json, format!("\"{}\"", cat.as_str()));
    }
  }
}
