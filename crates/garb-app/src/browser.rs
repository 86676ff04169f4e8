//! The closet browser: one fetched collection, filtered and rearranged
//! entirely locally.
//!
//! Favorite toggling is optimistic: local state flips first, the
//! single-field update runs after, and a failed update rolls the flip back.

use uuid::Uuid;

use garb_core::{
  filter::ClosetFilter,
  item::ClosetItem,
  store::{ObjectStore, WardrobeStore},
};

use crate::{Result, wardrobe::Wardrobe};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
  #[default]
  Grid,
  Carousel,
}

/// Client-side state over an already-fetched item collection. Fetched once
/// per mount, newest first; every filter change re-derives locally.
#[derive(Debug, Default)]
pub struct ClosetBrowser {
  items:      Vec<ClosetItem>,
  pub filter: ClosetFilter,
  pub view:   ViewMode,
}

impl ClosetBrowser {
  pub fn new(items: Vec<ClosetItem>) -> Self {
    Self {
      items,
      filter: ClosetFilter::default(),
      view: ViewMode::default(),
    }
  }

  /// Fetch the user's closet and wrap it.
  pub async fn load<S, O>(
    wardrobe: &Wardrobe<S, O>,
    user: Uuid,
  ) -> Result<Self>
  where
    S: WardrobeStore,
    O: ObjectStore,
  {
    Ok(Self::new(wardrobe.list_items(user).await?))
  }

  /// The items the current filter admits, in fetch order.
  pub fn visible(&self) -> Vec<&ClosetItem> {
    self.filter.apply(&self.items)
  }

  pub fn item(&self, id: Uuid) -> Option<&ClosetItem> {
    self.items.iter().find(|i| i.id == id)
  }

  pub fn toggle_view(&mut self) {
    self.view = match self.view {
      ViewMode::Grid => ViewMode::Carousel,
      ViewMode::Carousel => ViewMode::Grid,
    };
  }

  /// Flip an item's favorite flag optimistically and persist it. On a
  /// failed update the local flip is reverted and the error returned.
  pub async fn toggle_favorite<S, O>(
    &mut self,
    wardrobe: &Wardrobe<S, O>,
    user: Uuid,
    id: Uuid,
  ) -> Result<bool>
  where
    S: WardrobeStore,
    O: ObjectStore,
  {
    let target = match self.flip_local(id) {
      Some(target) => target,
      None => return Err(crate::Error::ItemNotFound(id)),
    };

    match wardrobe.set_favorite(user, id, target).await {
      Ok(()) => Ok(target),
      Err(err) => {
        self.flip_local(id);
        Err(err)
      }
    }
  }

  fn flip_local(&mut self, id: Uuid) -> Option<bool> {
    let item = self.items.iter_mut().find(|i| i.id == id)?;
    item.favorite = !item.favorite;
    Some(item.favorite)
  }

  /// Patch local state after an external edit (the detail editor saves
  /// through the service, then pushes the result here).
  pub fn upsert(&mut self, item: ClosetItem) {
    match self.items.iter_mut().find(|i| i.id == item.id) {
      Some(existing) => *existing = item,
      None => self.items.insert(0, item),
    }
  }

  pub fn remove(&mut self, id: Uuid) {
    self.items.retain(|i| i.id != id);
  }
}

#[cfg(test)]
mod tests {
  use garb_core::{
    item::NewClosetItem,
    taxonomy::Category,
  };
  use garb_store_memory::MemoryStore;

  use super::*;

  async fn seeded() -> (Wardrobe<MemoryStore, MemoryStore>, MemoryStore, Uuid, Uuid)
  {
    let store = MemoryStore::new();
    let user = Uuid::new_v4();
    let item = store
      .insert_item(NewClosetItem::new(user, Category::Tops, "mem://orig"))
      .await
      .unwrap();
    (
      Wardrobe::new(store.clone(), store.clone()),
      store,
      user,
      item.id,
    )
  }

  #[tokio::test]
  async fn favorite_toggle_persists_through_the_service() {
    let (wardrobe, _store, user, item_id) = seeded().await;
    let mut browser = ClosetBrowser::load(&wardrobe, user).await.unwrap();

    assert!(browser.toggle_favorite(&wardrobe, user, item_id).await.unwrap());
    assert!(browser.item(item_id).unwrap().favorite);
    assert!(wardrobe.get_item(user, item_id).await.unwrap().favorite);
  }

  #[tokio::test]
  async fn failed_favorite_update_rolls_the_flip_back() {
    let (wardrobe, store, user, item_id) = seeded().await;
    let mut browser = ClosetBrowser::load(&wardrobe, user).await.unwrap();

    // Deleting the row behind the browser's back makes the update fail.
    store.delete_item(user, item_id).await.unwrap();
    assert!(
      browser
        .toggle_favorite(&wardrobe, user, item_id)
        .await
        .is_err()
    );
    assert!(!browser.item(item_id).unwrap().favorite);
  }

  #[tokio::test]
  async fn filtering_is_local_and_nondestructive() {
    let (wardrobe, store, user, _) = seeded().await;
    store
      .insert_item(NewClosetItem::new(user, Category::Shoes, "mem://orig"))
      .await
      .unwrap();

    let mut browser = ClosetBrowser::load(&wardrobe, user).await.unwrap();
    assert_eq!(browser.visible().len(), 2);

    browser.filter.category = Some(Category::Shoes);
    assert_eq!(browser.visible().len(), 1);

    browser.filter = ClosetFilter::default();
    assert_eq!(browser.visible().len(), 2);
  }

  #[tokio::test]
  async fn view_mode_toggles_between_grid_and_carousel() {
    let (wardrobe, _store, user, _) = seeded().await;
    let mut browser = ClosetBrowser::load(&wardrobe, user).await.unwrap();
    assert_eq!(browser.view, ViewMode::Grid);
    browser.toggle_view();
    assert_eq!(browser.view, ViewMode::Carousel);
  }
}
