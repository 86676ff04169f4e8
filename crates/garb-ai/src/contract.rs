//! Request/response contracts for the five proxy functions.
//!
//! Tag fields deserialise leniently: a field the model got wrong (bad enum
//! value, wrong type, empty string) degrades to `None` instead of failing
//! the whole report. Detection is the exception where even a completely
//! absent report has a usable default.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use garb_core::{
  item::ClosetItem,
  taxonomy::{Category, DressLevel, LayerRole, Pattern, Season},
};

// ─── Detection ───────────────────────────────────────────────────────────────

/// One framing verdict from the detection loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectReport {
  #[serde(default)]
  pub ready:         bool,
  /// 0..=100, clamped on deserialisation.
  #[serde(default, deserialize_with = "lenient_confidence")]
  pub confidence:    u8,
  #[serde(default)]
  pub feedback:      String,
  #[serde(default, deserialize_with = "lenient")]
  pub clothing_type: Option<String>,
}

impl DetectReport {
  /// The degraded verdict used when the detector itself fails.
  pub fn not_ready(feedback: impl Into<String>) -> Self {
    Self {
      ready:         false,
      confidence:    0,
      feedback:      feedback.into(),
      clothing_type: None,
    }
  }
}

fn lenient_confidence<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Value::deserialize(deserializer)?;
  let n = match value {
    Value::Number(n) => n.as_f64().unwrap_or(0.0),
    Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
    _ => 0.0,
  };
  Ok(n.clamp(0.0, 100.0) as u8)
}

// ─── Tagging ─────────────────────────────────────────────────────────────────

/// Auto-tags extracted from a captured garment photo. Every field is
/// best-effort; the review screen fills the gaps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagReport {
  #[serde(default, deserialize_with = "lenient")]
  pub category:      Option<Category>,
  #[serde(default, deserialize_with = "lenient")]
  pub subtype:       Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub primary_color: Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub season:        Option<Season>,
  #[serde(default, deserialize_with = "lenient")]
  pub dress_level:   Option<DressLevel>,
  #[serde(default, deserialize_with = "lenient")]
  pub pattern:       Option<Pattern>,
  #[serde(default, deserialize_with = "lenient")]
  pub layer_role:    Option<LayerRole>,
}

/// Deserialise to `Some(T)` when the value fits `T`, `None` otherwise.
/// Empty strings also collapse to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: serde::de::DeserializeOwned,
{
  let value = Value::deserialize(deserializer)?;
  if matches!(&value, Value::String(s) if s.trim().is_empty()) {
    return Ok(None);
  }
  Ok(serde_json::from_value(value).ok())
}

// ─── Background removal ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveBackgroundResponse {
  /// The cutout as a data URL.
  pub image: String,
}

// ─── Anchored outfit building ────────────────────────────────────────────────

/// Closet item ids the model picked for each slot, by id string. Ids that
/// do not resolve against the local closet are dropped by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClosetPicks {
  #[serde(default, deserialize_with = "lenient")]
  pub top:         Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub bottom:      Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub shoes:       Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub outerwear:   Option<String>,
  #[serde(default)]
  pub accessories: Vec<String>,
}

/// A purchase recommendation for a slot the closet cannot fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingSuggestion {
  #[serde(default)]
  pub category:    String,
  #[serde(default)]
  pub description: String,
  #[serde(default, deserialize_with = "lenient")]
  pub color:       Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub style:       Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub reasoning:   Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOutfitResponse {
  pub anchor_item:          ClosetItem,
  #[serde(default)]
  pub closet_picks:         ClosetPicks,
  #[serde(default)]
  pub shopping_suggestions: Vec<ShoppingSuggestion>,
  #[serde(default)]
  pub outfit_reasoning:     String,
  #[serde(default, deserialize_with = "lenient")]
  pub style_notes:          Option<String>,
}

// ─── Whole-closet suggestion ─────────────────────────────────────────────────

/// Slot picks for a closet-only suggested outfit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestedPicks {
  #[serde(default, deserialize_with = "lenient")]
  pub top:         Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub bottom:      Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub shoes:       Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub mid_layer:   Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub outerwear:   Option<String>,
  #[serde(default)]
  pub accessories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestOutfitResponse {
  pub outfit:    SuggestedPicks,
  #[serde(default)]
  pub reasoning: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn detect_clamps_and_coerces_confidence() {
    let r: DetectReport =
      serde_json::from_str(r#"{"ready": true, "confidence": 140.5}"#).unwrap();
    assert_eq!(r.confidence, 100);

    let r: DetectReport =
      serde_json::from_str(r#"{"ready": true, "confidence": "85"}"#).unwrap();
    assert_eq!(r.confidence, 85);

    let r: DetectReport =
      serde_json::from_str(r#"{"confidence": null}"#).unwrap();
    assert_eq!(r.confidence, 0);
    assert!(!r.ready);
  }

  #[test]
  fn tag_report_degrades_bad_fields_to_none() {
    let r: TagReport = serde_json::from_str(
      r#"{
        "category": "tops",
        "subtype": "",
        "primary_color": "navy",
        "season": "spring-fall",
        "dress_level": "business casual",
        "pattern": 7,
        "layer_role": "base"
      }"#,
    )
    .unwrap();
    assert_eq!(r.category, Some(Category::Tops));
    assert!(r.subtype.is_none());
    assert_eq!(r.primary_color.as_deref(), Some("navy"));
    assert_eq!(r.season, Some(Season::SpringFall));
    assert!(r.dress_level.is_none());
    assert!(r.pattern.is_none());
    assert_eq!(r.layer_role, Some(LayerRole::Base));
  }

  #[test]
  fn empty_report_deserialises() {
    let r: TagReport = serde_json::from_str("{}").unwrap();
    assert!(r.category.is_none());
    assert!(r.subtype.is_none());
  }

  #[test]
  fn unrequested_report_fields_are_ignored() {
    let r: TagReport = serde_json::from_str(
      r#"{"category": "tops", "notes": "slim fit"}"#,
    )
    .unwrap();
    assert_eq!(r.category, Some(Category::Tops));
  }

  #[test]
  fn suggested_picks_tolerate_missing_slots() {
    let r: SuggestOutfitResponse = serde_json::from_str(
      r#"{"outfit": {"top": "a", "bottom": "b", "shoes": "c"},
          "reasoning": "clean and simple"}"#,
    )
    .unwrap();
    assert_eq!(r.outfit.top.as_deref(), Some("a"));
    assert!(r.outfit.mid_layer.is_none());
    assert!(r.outfit.accessories.is_empty());
  }
}
