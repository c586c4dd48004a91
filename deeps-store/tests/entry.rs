//! Tests for synced entries and the theme preference.

use std::collections::BTreeMap;
use std::time::Duration;

use deeps_store::{StoreHandle, SyncedEntry, Theme, ThemePreference, THEME_KEY};
use simplelog::{Config, LevelFilter, TestLogger};

fn init_logger() {
    let _ = TestLogger::init(LevelFilter::Debug, Config::default());
}

#[tokio::test]
async fn test_missing_key_uses_initial() {
    let handle = StoreHandle::memory();
    let entry = SyncedEntry::open(handle, "count", 7u32).await;
    assert_eq!(*entry.value(), 7);
}

#[tokio::test]
async fn test_undecodable_value_uses_initial() {
    init_logger();
    let handle = StoreHandle::memory();
    handle.set("count", "not a number".into()).await.unwrap();

    let entry = SyncedEntry::open(handle.clone(), "count", 7u32).await;
    assert_eq!(*entry.value(), 7);

    handle.set("empty", String::new()).await.unwrap();
    let entry = SyncedEntry::open(handle, "empty", 1u32).await;
    assert_eq!(*entry.value(), 1);
}

#[tokio::test]
async fn test_set_and_update() {
    let handle = StoreHandle::memory();
    let mut entry = SyncedEntry::open(handle.clone(), "count", 0u32).await;

    entry.set(5).await.unwrap();
    entry.update(|n| n + 1).await.unwrap();

    assert_eq!(*entry.value(), 6);
    assert_eq!(handle.get("count").await.unwrap().as_deref(), Some("6"));
}

#[tokio::test]
async fn test_add_appends_and_merges() {
    let handle = StoreHandle::memory();

    let mut list = SyncedEntry::open(handle.clone(), "todos", Vec::<String>::new()).await;
    list.add("milk").await.unwrap();
    list.add("eggs").await.unwrap();
    assert_eq!(list.value(), &vec!["milk".to_string(), "eggs".to_string()]);

    let mut prefs = SyncedEntry::open(
        handle.clone(),
        "prefs",
        BTreeMap::from([("lang".to_string(), "en".to_string())]),
    )
    .await;
    prefs
        .add(BTreeMap::from([("tz".to_string(), "UTC".to_string())]))
        .await
        .unwrap();
    assert_eq!(prefs.value().len(), 2);

    let mut name = SyncedEntry::open(handle, "name", "ada".to_string()).await;
    name.add("grace").await.unwrap();
    assert_eq!(name.value(), "grace");
}

#[tokio::test]
async fn test_add_with_wrong_shape_fails() {
    let handle = StoreHandle::memory();
    let mut count = SyncedEntry::open(handle, "count", 1u32).await;
    assert!(count.add("text").await.is_err());
    assert_eq!(*count.value(), 1);
}

#[tokio::test]
async fn test_remove_and_clear_restore_initial() {
    let handle = StoreHandle::memory();
    let mut a = SyncedEntry::open(handle.clone(), "a", 0u32).await;
    let mut b = SyncedEntry::open(handle.clone(), "b", 0u32).await;

    a.set(1).await.unwrap();
    b.set(2).await.unwrap();

    a.remove().await.unwrap();
    assert_eq!(*a.value(), 0);
    assert_eq!(handle.get("a").await.unwrap(), None);

    b.clear_storage().await.unwrap();
    assert_eq!(*b.value(), 0);
    assert!(handle.keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_views_stay_in_sync() {
    let handle = StoreHandle::memory();
    let mut writer = SyncedEntry::open(handle.clone(), "todos", Vec::<String>::new()).await;
    let mut reader = SyncedEntry::open(handle.clone(), "todos", Vec::<String>::new()).await;
    let mut unrelated = SyncedEntry::open(handle, "other", 0u32).await;

    unrelated.set(3).await.unwrap();
    writer.add("milk").await.unwrap();

    // The event for "other" is skipped.
    let seen = tokio::time::timeout(Duration::from_secs(1), reader.changed())
        .await
        .expect("change notification")
        .unwrap();
    assert_eq!(seen, vec!["milk".to_string()]);
    assert_eq!(reader.value(), writer.value());
}

#[tokio::test]
async fn test_own_writes_do_not_wake_changed() {
    let handle = StoreHandle::memory();
    let mut entry = SyncedEntry::open(handle.clone(), "count", 0u32).await;

    entry.set(5).await.unwrap();
    entry.update(|n| n + 1).await.unwrap();
    entry.remove().await.unwrap();
    entry.clear_storage().await.unwrap();
    let idle = tokio::time::timeout(Duration::from_millis(100), entry.changed()).await;
    assert!(idle.is_err());

    // A write through the handle still counts as another writer.
    handle.set_json("count", &7u32).await.unwrap();
    let seen = tokio::time::timeout(Duration::from_secs(1), entry.changed())
        .await
        .expect("change notification")
        .unwrap();
    assert_eq!(seen, 7);
}

#[tokio::test]
async fn test_refresh_reports_change() {
    let handle = StoreHandle::memory();
    let mut entry = SyncedEntry::open(handle.clone(), "n", 0u32).await;

    assert!(!entry.refresh().await);
    handle.set_json("n", &9u32).await.unwrap();
    assert!(entry.refresh().await);
    assert_eq!(*entry.value(), 9);
}

#[tokio::test]
async fn test_theme_defaults_to_system() {
    let handle = StoreHandle::memory();
    let theme = ThemePreference::open(handle.clone(), true).await;
    assert_eq!(theme.theme(), Theme::Dark);

    let theme = ThemePreference::open(handle, false).await;
    assert_eq!(theme.theme(), Theme::Light);
}

#[tokio::test]
async fn test_theme_toggle_persists_and_syncs() {
    let handle = StoreHandle::memory();
    let mut first = ThemePreference::open(handle.clone(), false).await;
    let mut second = ThemePreference::open(handle.clone(), false).await;

    assert_eq!(first.toggle().await.unwrap(), Theme::Dark);
    assert_eq!(
        handle.get(THEME_KEY).await.unwrap().as_deref(),
        Some("\"dark\"")
    );

    let seen = tokio::time::timeout(Duration::from_secs(1), second.changed())
        .await
        .expect("theme notification")
        .unwrap();
    assert_eq!(seen, Theme::Dark);

    // A stored preference wins over the system default on reopen.
    let reopened = ThemePreference::open(handle, false).await;
    assert_eq!(reopened.theme(), Theme::Dark);
}

#[tokio::test]
async fn test_system_change_overrides_preference() {
    let handle = StoreHandle::memory();
    let mut theme = ThemePreference::open(handle, false).await;
    theme.set(Theme::Dark).await.unwrap();

    theme.system_changed(false).await.unwrap();
    assert_eq!(theme.theme(), Theme::Light);
    assert_eq!(theme.theme().to_string(), "light");
}
