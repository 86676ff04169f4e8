//! Tests for `MemoryStore` behavior the higher layers rely on.

use bytes::Bytes;
use garb_core::{
  item::{ItemPatch, NewClosetItem},
  outfit::{NewOutfit, NewOutfitItem, OutfitSource},
  store::{Bucket, ObjectStore, WardrobeStore, original_path},
  taxonomy::{Category, Slot},
};
use uuid::Uuid;

use crate::MemoryStore;

fn new_item(user: Uuid, category: Category) -> NewClosetItem {
  NewClosetItem::new(user, category, "memory://orig")
}

// ─── Items ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_items_is_user_scoped_and_newest_first() {
  let s = MemoryStore::new();
  let user = Uuid::new_v4();
  let other = Uuid::new_v4();

  let first = s.insert_item(new_item(user, Category::Tops)).await.unwrap();
  let second = s
    .insert_item(new_item(user, Category::Shoes))
    .await
    .unwrap();
  s.insert_item(new_item(other, Category::Tops)).await.unwrap();

  let items = s.list_items(user).await.unwrap();
  assert_eq!(items.len(), 2);
  // Same-instant inserts may tie on created_at; both orders place the two
  // items of this user and nothing else.
  let ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();
  assert!(ids.contains(&first.id) && ids.contains(&second.id));
}

#[tokio::test]
async fn update_item_overwrites_the_tag_set() {
  let s = MemoryStore::new();
  let user = Uuid::new_v4();
  let item = s.insert_item(new_item(user, Category::Tops)).await.unwrap();

  let mut patch = ItemPatch::from(&item);
  patch.subtype = Some("hoodie".into());
  patch.favorite = true;

  let updated = s.update_item(user, item.id, patch).await.unwrap();
  assert_eq!(updated.subtype.as_deref(), Some("hoodie"));
  assert!(updated.favorite);
}

#[tokio::test]
async fn delete_item_cascades_slot_rows() {
  let s = MemoryStore::new();
  let user = Uuid::new_v4();
  let top = s.insert_item(new_item(user, Category::Tops)).await.unwrap();

  let outfit = s
    .insert_outfit(NewOutfit {
      user_id: user,
      name:    None,
      source:  OutfitSource::Manual,
    })
    .await
    .unwrap();
  s.insert_outfit_items(vec![NewOutfitItem {
    outfit_id: outfit.id,
    item_id:   top.id,
    slot:      Slot::Top,
  }])
  .await
  .unwrap();

  s.delete_item(user, top.id).await.unwrap();

  let fetched = s.get_outfit(user, outfit.id).await.unwrap().unwrap();
  assert!(fetched.items.is_empty());
}

// ─── Objects ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_list_remove_round_trip() {
  let s = MemoryStore::new();
  let user = Uuid::new_v4();
  let item = Uuid::new_v4();
  let path = original_path(user, item, "jpg");

  let url = s
    .upload(Bucket::Originals, &path, Bytes::from_static(b"jpeg"), "image/jpeg")
    .await
    .unwrap();
  assert!(url.contains("closet-originals"));

  let listed = s
    .list(Bucket::Originals, &format!("{user}"))
    .await
    .unwrap();
  assert_eq!(listed, vec![path.clone()]);

  s.remove(Bucket::Originals, &[path]).await.unwrap();
  assert_eq!(s.object_count(Bucket::Originals), 0);
}

#[tokio::test]
async fn removal_failure_injection() {
  let s = MemoryStore::new();
  s.upload(Bucket::Cutouts, "a/b/cutout.png", Bytes::new(), "image/png")
    .await
    .unwrap();

  s.fail_removals(true);
  assert!(
    s.remove(Bucket::Cutouts, &["a/b/cutout.png".into()])
      .await
      .is_err()
  );
  assert_eq!(s.object_count(Bucket::Cutouts), 1);

  s.fail_removals(false);
  s.remove(Bucket::Cutouts, &["a/b/cutout.png".into()])
    .await
    .unwrap();
  assert_eq!(s.object_count(Bucket::Cutouts), 0);
}
