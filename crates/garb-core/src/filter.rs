//! In-memory closet filtering.
//!
//! The browser fetches the whole collection once and filters client-side;
//! no query round-trips per filter change.

use serde::{Deserialize, Serialize};

use crate::{
  item::ClosetItem,
  taxonomy::{Category, DressLevel, Pattern, Season},
};

/// Conjunction of optional predicates over a fetched item collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClosetFilter {
  pub category:      Option<Category>,
  pub color:         Option<String>,
  pub season:        Option<Season>,
  pub dress_level:   Option<DressLevel>,
  pub pattern:       Option<Pattern>,
  #[serde(default)]
  pub favorite_only: bool,
  /// Case-insensitive free text over category, subtype and notes.
  pub search:        Option<String>,
}

impl ClosetFilter {
  pub fn is_empty(&self) -> bool {
    self.category.is_none()
      && self.color.is_none()
      && self.season.is_none()
      && self.dress_level.is_none()
      && self.pattern.is_none()
      && !self.favorite_only
      && self.search.as_deref().is_none_or(str::is_empty)
  }

  pub fn matches(&self, item: &ClosetItem) -> bool {
    if let Some(cat) = self.category
      && item.category != cat
    {
      return false;
    }
    if let Some(color) = &self.color
      && item.primary_color.as_deref() != Some(color.as_str())
    {
      return false;
    }
    if let Some(season) = self.season
      && item.season != season
    {
      return false;
    }
    if let Some(level) = self.dress_level
      && item.dress_level != level
    {
      return false;
    }
    if let Some(pattern) = self.pattern
      && item.pattern != pattern
    {
      return false;
    }
    if self.favorite_only && !item.favorite {
      return false;
    }
    if let Some(search) = &self.search
      && !search.is_empty()
    {
      let needle = search.to_lowercase();
      let hit = item.category.as_str().contains(&needle)
        || item
          .subtype
          .as_deref()
          .is_some_and(|s| s.to_lowercase().contains(&needle))
        || item
          .notes
          .as_deref()
          .is_some_and(|n| n.to_lowercase().contains(&needle));
      if !hit {
        return false;
      }
    }
    true
  }

  /// Filter a fetched collection, preserving order.
  pub fn apply<'a>(&self, items: &'a [ClosetItem]) -> Vec<&'a ClosetItem> {
    items.iter().filter(|item| self.matches(item)).collect()
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::taxonomy::LayerRole;

  fn item(category: Category, favorite: bool) -> ClosetItem {
    ClosetItem {
      id:                 Uuid::new_v4(),
      user_id:            Uuid::new_v4(),
      category,
      subtype:            None,
      primary_color:      Some("navy".into()),
      season:             Season::AllSeason,
      pattern:            Pattern::Solid,
      dress_level:        DressLevel::Casual,
      layer_role:         LayerRole::Unknown,
      favorite,
      notes:              Some("Worn to the office party".into()),
      original_image_url: "http://img".into(),
      cutout_image_url:   None,
      created_at:         Utc::now(),
      updated_at:         Utc::now(),
    }
  }

  #[test]
  fn category_and_favorite_are_a_conjunction() {
    let items = vec![
      item(Category::Shoes, true),
      item(Category::Shoes, false),
      item(Category::Tops, true),
    ];
    let filter = ClosetFilter {
      category: Some(Category::Shoes),
      favorite_only: true,
      ..Default::default()
    };
    let hits = filter.apply(&items);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].category, Category::Shoes);
    assert!(hits[0].favorite);
  }

  #[test]
  fn empty_result_is_a_normal_state() {
    let items = vec![item(Category::Tops, false)];
    let filter = ClosetFilter {
      category: Some(Category::Shoes),
      favorite_only: true,
      ..Default::default()
    };
    assert!(filter.apply(&items).is_empty());
  }

  #[test]
  fn search_covers_category_subtype_and_notes() {
    let mut with_subtype = item(Category::Tops, false);
    with_subtype.subtype = Some("Hoodie".into());

    let filter = ClosetFilter {
      search: Some("hoodie".into()),
      ..Default::default()
    };
    assert!(filter.matches(&with_subtype));

    let by_notes = ClosetFilter {
      search: Some("office".into()),
      ..Default::default()
    };
    assert!(by_notes.matches(&with_subtype));

    let by_category = ClosetFilter {
      search: Some("top".into()),
      ..Default::default()
    };
    assert!(by_category.matches(&with_subtype));

    let miss = ClosetFilter {
      search: Some("parka".into()),
      ..Default::default()
    };
    assert!(!miss.matches(&with_subtype));
  }

  #[test]
  fn color_compares_against_primary_color_only() {
    let navy = item(Category::Tops, false);
    let filter = ClosetFilter {
      color: Some("navy".into()),
      ..Default::default()
    };
    assert!(filter.matches(&navy));

    let red = ClosetFilter {
      color: Some("red".into()),
      ..Default::default()
    };
    assert!(!red.matches(&navy));
  }
}
