//! Prompt templates for the five proxy functions.
//!
//! The outfit prompts embed one summary line per closet item; the model
//! answers with item ids from those lines, which the caller resolves back
//! against the closet.

use garb_core::{item::ClosetItem, taxonomy::Category};

/// Framing-quality check run on every scan frame.
pub const DETECT: &str = "\
Analyze this camera frame and determine if it contains a CLEAR, WELL-VISIBLE \
clothing item that can be properly captured.

Respond with a JSON object (no markdown) with these fields:
- \"ready\": boolean - true ONLY if there is a single, clear clothing item \
that is:
  * Well-lit and in focus
  * Mostly visible in the frame (not cut off significantly)
  * The main subject of the image
  * A recognizable clothing article (shirt, pants, dress, jacket, shoes, etc.)
- \"confidence\": number 0-100 - how confident you are about the detection
- \"feedback\": string - brief feedback for the user (e.g., \"Move closer\", \
\"Hold steady\", \"Good - capturing!\", \"No clothing detected\")
- \"clothing_type\": string or null - what type of clothing is detected \
(e.g., \"t-shirt\", \"jeans\", \"dress\")

Be strict - only return ready:true when the clothing item is clearly visible \
and would make a good closet photo.";

/// Attribute extraction from a captured garment photo.
pub const ANALYZE: &str = "\
Analyze this clothing item image and return JSON with these fields:
- category: one of [tops, bottoms, outerwear, shoes, accessories, underwear]
- subtype: specific type (e.g., t-shirt, jeans, sneakers)
- primary_color: main color (e.g., black, white, navy, blue)
- season: one of [summer, spring-fall, winter, all-season, unknown]
- pattern: one of [solid, patterned, unknown]
- dress_level: one of [casual, smart-casual, dressy, unknown]
- layer_role: one of [base, mid, outer, unknown]

Return ONLY valid JSON, no markdown.";

/// Image-to-image garment extraction onto a white background.
pub const REMOVE_BACKGROUND: &str = "\
Extract ONLY the single main clothing item (shirt, pants, dress, jacket, \
shoes, etc.) from this image. Follow these rules strictly:

1. REMOVE COMPLETELY: background, people's body parts (hands, feet, arms, \
legs, torso), plants, furniture, hangers, mannequins, and ALL other objects
2. KEEP ONLY: The single main clothing article with all its details, colors, \
and textures preserved
3. ORIENTATION: Rotate the clothing item so it appears upright and properly \
oriented (e.g., shirts should have collar at top, pants should have \
waistband at top)
4. BACKGROUND: Output must have a pure white (#FFFFFF) background - not \
transparent, not gray, pure white
5. CENTERING: Center the clothing item in the frame with some padding around \
it

The final image should look like a professional product photo of just the \
clothing item on a clean white background.";

// ─── Closet partition ────────────────────────────────────────────────────────

/// A user's closet split by category, underwear excluded, each bucket as
/// prompt summary lines.
#[derive(Debug, Default)]
pub struct ClosetPartition {
  pub tops:        Vec<String>,
  pub bottoms:     Vec<String>,
  pub shoes:       Vec<String>,
  pub outerwear:   Vec<String>,
  pub accessories: Vec<String>,
}

impl ClosetPartition {
  pub fn from_items<'a>(items: impl IntoIterator<Item = &'a ClosetItem>) -> Self {
    let mut partition = Self::default();
    for item in items {
      let line = item.prompt_summary();
      match item.category {
        Category::Tops => partition.tops.push(line),
        Category::Bottoms => partition.bottoms.push(line),
        Category::Shoes => partition.shoes.push(line),
        Category::Outerwear => partition.outerwear.push(line),
        Category::Accessories => partition.accessories.push(line),
        Category::Underwear => {}
      }
    }
    partition
  }

  pub fn has_core_slots(&self) -> bool {
    self.missing_core().is_empty()
  }

  /// Names of the required buckets that are empty, for error messages.
  pub fn missing_core(&self) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if self.tops.is_empty() {
      missing.push("tops");
    }
    if self.bottoms.is_empty() {
      missing.push("bottoms");
    }
    if self.shoes.is_empty() {
      missing.push("shoes");
    }
    missing
  }
}

// ─── Outfit prompts ──────────────────────────────────────────────────────────

/// Prompt for an outfit anchored on one item. Sections for slots the anchor
/// itself covers are omitted; empty required buckets ask for a purchase.
pub fn build_outfit(anchor: &ClosetItem, closet: &ClosetPartition) -> String {
  let anchor_summary = format!(
    "{} ({}, {})",
    anchor
      .subtype
      .as_deref()
      .unwrap_or(anchor.category.as_str()),
    anchor.primary_color.as_deref().unwrap_or("unknown color"),
    anchor.dress_level.as_str(),
  );

  let mut prompt = format!(
    "You are a men's fashion stylist. Create a cohesive outfit built around \
     this anchor item:\n\nANCHOR ITEM ({}):\n{}\n\nThe user wants to build \
     an outfit around this piece. Select items that complement it.\n",
    anchor.category, anchor_summary,
  );

  let required = [
    (Category::Tops, "TOPS", &closet.tops),
    (Category::Bottoms, "BOTTOMS", &closet.bottoms),
    (Category::Shoes, "SHOES", &closet.shoes),
  ];
  for (category, label, bucket) in required {
    if anchor.category == category {
      continue;
    }
    if bucket.is_empty() {
      prompt.push_str(&format!(
        "\nAVAILABLE {label}:\nNO {label} IN CLOSET - Suggest a purchase\n"
      ));
    } else {
      prompt
        .push_str(&format!("\nAVAILABLE {label}:\n{}\n", bucket.join("\n")));
    }
  }

  if !closet.outerwear.is_empty() {
    prompt.push_str(&format!(
      "\nOUTERWEAR (optional):\n{}\n",
      closet.outerwear.join("\n")
    ));
  }
  if !closet.accessories.is_empty() {
    prompt.push_str(&format!(
      "\nACCESSORIES (optional, pick 0-2):\n{}\n",
      closet.accessories.join("\n")
    ));
  }

  prompt.push_str(
    "\nReturn JSON with:\n\
     - closet_picks: object with keys for each slot (top, bottom, shoes, \
     outerwear, accessories) containing item IDs from the user's closet. Use \
     null if not selecting for that slot. accessories should be an array.\n\
     - shopping_suggestions: array of objects with { category, description, \
     color, style, reasoning } for items the user should consider buying to \
     complete or enhance the outfit. Include suggestions if the user is \
     missing essential categories or if a purchase would significantly \
     improve the outfit.\n\
     - outfit_reasoning: a brief explanation of why these items work \
     together (1-2 sentences)\n\
     - style_notes: any styling tips for wearing this outfit\n\n\
     Make sure colors complement each other and dress levels match the \
     anchor item. Return ONLY valid JSON.",
  );
  prompt
}

/// Prompt for a closet-only suggestion. Requires `closet.has_core_slots()`.
pub fn suggest_outfit(closet: &ClosetPartition) -> String {
  let mut prompt = format!(
    "You are a men's fashion stylist. Create a cohesive outfit from these \
     items.\n\nTOPS:\n{}\n\nBOTTOMS:\n{}\n\nSHOES:\n{}\n",
    closet.tops.join("\n"),
    closet.bottoms.join("\n"),
    closet.shoes.join("\n"),
  );

  if !closet.outerwear.is_empty() {
    prompt.push_str(&format!(
      "\nOUTERWEAR (optional):\n{}\n",
      closet.outerwear.join("\n")
    ));
  }
  if !closet.accessories.is_empty() {
    prompt.push_str(&format!(
      "\nACCESSORIES (optional, pick 0-2):\n{}\n",
      closet.accessories.join("\n")
    ));
  }

  prompt.push_str(
    "\nReturn JSON with:\n\
     - top: item ID\n\
     - bottom: item ID\n\
     - shoes: item ID\n\
     - mid_layer: item ID or null\n\
     - outerwear: item ID or null\n\
     - accessories: array of item IDs (0-2)\n\
     - reasoning: brief style explanation (1 sentence)\n\n\
     Ensure colors complement each other and dress levels match. Return ONLY \
     JSON.",
  );
  prompt
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use garb_core::taxonomy::{DressLevel, Season};
  use uuid::Uuid;

  use super::*;

  fn item(category: Category, subtype: &str, color: &str) -> ClosetItem {
    let now = Utc::now();
    ClosetItem {
      id: Uuid::new_v4(),
      user_id: Uuid::new_v4(),
      category,
      subtype: Some(subtype.to_owned()),
      primary_color: Some(color.to_owned()),
      season: Season::Unknown,
      pattern: Default::default(),
      dress_level: DressLevel::Casual,
      layer_role: Default::default(),
      favorite: false,
      notes: None,
      original_image_url: "https://example.com/o.jpg".to_owned(),
      cutout_image_url: None,
      created_at: now,
      updated_at: now,
    }
  }

  #[test]
  fn partition_excludes_underwear() {
    let items = vec![
      item(Category::Tops, "t-shirt", "navy"),
      item(Category::Underwear, "socks", "black"),
    ];
    let partition = ClosetPartition::from_items(&items);
    assert_eq!(partition.tops.len(), 1);
    assert!(!partition.has_core_slots());
    assert_eq!(partition.missing_core(), ["bottoms", "shoes"]);
  }

  #[test]
  fn build_prompt_omits_anchor_slot_and_flags_empty_buckets() {
    let anchor = item(Category::Tops, "button-up", "white");
    let closet = ClosetPartition::from_items(&[
      item(Category::Bottoms, "chinos", "beige"),
    ]);
    let prompt = build_outfit(&anchor, &closet);
    assert!(!prompt.contains("AVAILABLE TOPS"));
    assert!(prompt.contains("AVAILABLE BOTTOMS"));
    assert!(prompt.contains("NO SHOES IN CLOSET - Suggest a purchase"));
    assert!(!prompt.contains("OUTERWEAR (optional)"));
  }

  #[test]
  fn suggest_prompt_lists_item_ids() {
    let top = item(Category::Tops, "t-shirt", "black");
    let closet = ClosetPartition::from_items(&[
      top.clone(),
      item(Category::Bottoms, "jeans", "blue"),
      item(Category::Shoes, "sneakers", "white"),
    ]);
    assert!(closet.has_core_slots());
    let prompt = suggest_outfit(&closet);
    assert!(prompt.contains(&top.id.to_string()));
    assert!(prompt.contains("mid_layer: item ID or null"));
  }
}
