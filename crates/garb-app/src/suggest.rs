//! The whole-closet suggestion flow.
//!
//! Holds at most one active suggestion. Skip logs a `skipped` event and
//! immediately requests a fresh one; save persists the outfit as
//! `suggested`, logs a `saved` event and clears the session. The required
//! category pre-check runs locally so an unfillable closet never costs a
//! model call.

use uuid::Uuid;

use garb_ai::AiFunctions;
use garb_core::{
  event::SuggestionAction,
  item::ClosetItem,
  outfit::{Outfit, OutfitSource},
  store::{ObjectStore, WardrobeStore},
  taxonomy::{Category, Slot},
};

use crate::{
  Error, Result, Wardrobe,
  composer::{OutfitDraft, resolve_suggestion},
};

/// One resolved suggestion, ready to present.
#[derive(Debug, Clone)]
pub struct Suggestion {
  pub draft:     OutfitDraft,
  /// The resolved item ids, recorded on the suggestion log.
  pub item_ids:  Vec<Uuid>,
  pub reasoning: String,
}

pub struct SuggestionSession {
  user:    Uuid,
  current: Option<Suggestion>,
}

impl SuggestionSession {
  pub fn new(user: Uuid) -> Self {
    Self {
      user,
      current: None,
    }
  }

  pub fn current(&self) -> Option<&Suggestion> {
    self.current.as_ref()
  }

  /// Request a suggestion and resolve it against the fetched closet.
  /// Fails locally, without a model call, when the closet lacks any of the
  /// required categories.
  pub async fn request<A: AiFunctions>(
    &mut self,
    ai: &A,
    items: &[ClosetItem],
  ) -> Result<()> {
    let missing = missing_core(items);
    if !missing.is_empty() {
      return Err(Error::IncompleteOutfit { missing });
    }

    let response = ai.suggest_outfit(self.user).await?;
    let draft = resolve_suggestion(&response.outfit, items);
    let item_ids = draft.assignments().into_iter().map(|(_, id)| id).collect();
    self.current = Some(Suggestion {
      draft,
      item_ids,
      reasoning: response.reasoning,
    });
    Ok(())
  }

  /// Discard the current suggestion, log it as skipped, and request the
  /// next one.
  pub async fn skip<A, S, O>(
    &mut self,
    ai: &A,
    wardrobe: &Wardrobe<S, O>,
    items: &[ClosetItem],
  ) -> Result<()>
  where
    A: AiFunctions,
    S: WardrobeStore,
    O: ObjectStore,
  {
    if let Some(current) = self.current.take() {
      wardrobe
        .log_suggestion(self.user, current.item_ids, SuggestionAction::Skipped)
        .await?;
    }
    self.request(ai, items).await
  }

  /// Persist the current suggestion as a `suggested` outfit, log it as
  /// saved, and clear the session. A failed save keeps the suggestion.
  pub async fn save<S, O>(
    &mut self,
    wardrobe: &Wardrobe<S, O>,
    name: Option<String>,
  ) -> Result<Outfit>
  where
    S: WardrobeStore,
    O: ObjectStore,
  {
    let current = self.current.take().ok_or(Error::NoSuggestion)?;

    let outfit = match wardrobe
      .save_outfit(
        self.user,
        name,
        OutfitSource::Suggested,
        &current.draft.assignments(),
      )
      .await
    {
      Ok(outfit) => outfit,
      Err(err) => {
        self.current = Some(current);
        return Err(err);
      }
    };

    wardrobe
      .log_suggestion(self.user, current.item_ids, SuggestionAction::Saved)
      .await?;
    Ok(outfit)
  }
}

/// Required slots whose category has no item at all in the closet.
fn missing_core(items: &[ClosetItem]) -> Vec<Slot> {
  [
    (Category::Tops, Slot::Top),
    (Category::Bottoms, Slot::Bottom),
    (Category::Shoes, Slot::Shoes),
  ]
  .into_iter()
  .filter(|(category, _)| !items.iter().any(|i| i.category == *category))
  .map(|(_, slot)| slot)
  .collect()
}
