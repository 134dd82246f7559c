// Locator behaviour over paginated listings

mod common;

use common::MemoryObjects;
use crab_snapshot::locator::find_latest_backup;

#[tokio::test]
async fn test_empty_bucket_returns_none() {
    let objects = MemoryObjects::new();
    assert!(find_latest_backup(objects.as_ref()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_picks_newest_of_listing() {
    let objects = MemoryObjects::new();
    objects.insert("A", Vec::new(), 10);
    objects.insert("B", Vec::new(), 20);
    objects.insert("C", Vec::new(), 15);

    let found = find_latest_backup(objects.as_ref()).await.unwrap().unwrap();
    assert_eq!(found.key, "B");
}

#[tokio::test]
async fn test_newest_on_last_page_is_found() {
    let objects = MemoryObjects::with_page_size(1);
    objects.insert("a", Vec::new(), 30);
    objects.insert("b", Vec::new(), 20);
    objects.insert("c", Vec::new(), 10);
    objects.insert("z", Vec::new(), 99);

    let found = find_latest_backup(&objects).await.unwrap().unwrap();
    assert_eq!(found.key, "z");
}

#[tokio::test]
async fn test_tie_selects_member_of_tie_set() {
    let objects = MemoryObjects::with_page_size(2);
    objects.insert("early", Vec::new(), 1);
    objects.insert("tie-1", Vec::new(), 42);
    objects.insert("tie-2", Vec::new(), 42);

    let found = find_latest_backup(&objects).await.unwrap().unwrap();
    assert!(["tie-1", "tie-2"].contains(&found.key.as_str()));
}
