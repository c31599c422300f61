//! Contract tests run against both backends.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use super::testing::ScriptedBackend;
use super::*;
use crate::models::{Event, EventDraft, NewsDraft, ResourceDraft, SiteConfigPatch};

fn tokens() -> Arc<TokenIssuer> {
    Arc::new(TokenIssuer::new("store-test-secret", Duration::from_secs(600)))
}

fn memory_store() -> RecordStore {
    RecordStore::new(Arc::new(MemoryBackend::new()), tokens())
}

async fn sqlite_store() -> (RecordStore, SqliteBackend, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let pool = init_database(&temp_dir.path().join("store.sqlite"), 5, Duration::from_secs(5))
        .await
        .expect("Failed to init DB");
    let backend = SqliteBackend::new(pool);
    let store = RecordStore::new(Arc::new(backend.clone()), tokens());
    (store, backend, temp_dir)
}

fn conf_draft() -> EventDraft {
    EventDraft {
        title: "Conf".to_string(),
        date: "2025-07-15".to_string(),
        description: "d".to_string(),
        location: "Nairobi".to_string(),
        image_url: None,
    }
}

fn resource_draft() -> ResourceDraft {
    ResourceDraft {
        title: "Peering Policy".to_string(),
        description: "Template peering agreement".to_string(),
        url: "/resources/peering.pdf".to_string(),
        category: "Operations".to_string(),
        resource_type: "PDF".to_string(),
    }
}

async fn create_then_fetch_event(store: &RecordStore) {
    let before = store.fetch_events().await;
    assert!(store.create_event(&conf_draft()).await);

    let after = store.fetch_events().await;
    assert_eq!(after.len(), before.len() + 1);

    let created = after
        .iter()
        .find(|e| e.title == "Conf")
        .expect("created event is listed");
    assert!(!created.id.is_empty());
    assert!(before.iter().all(|e| e.id != created.id));
    assert_eq!(created.date, "2025-07-15");
    assert_eq!(created.location, "Nairobi");
    assert_eq!(created.image_url, None);
}

async fn update_changes_one_field(store: &RecordStore) {
    assert!(store.create_event(&conf_draft()).await);
    let original = store.fetch_events().await.pop().unwrap();

    let changed = Event {
        location: "Kisumu".to_string(),
        ..original.clone()
    };
    assert!(store.update_event(&changed).await);

    let refetched = store
        .fetch_events()
        .await
        .into_iter()
        .find(|e| e.id == original.id)
        .unwrap();
    assert_eq!(refetched, changed);
}

async fn update_unknown_id_is_noop(store: &RecordStore) {
    let before = store.fetch_events().await;
    let ghost = conf_draft().with_id("does-not-exist");
    assert!(store.update_event(&ghost).await);
    assert_eq!(store.fetch_events().await, before);
}

async fn delete_is_idempotent(store: &RecordStore) {
    assert!(store.create_resource(&resource_draft()).await);
    let id = store.fetch_resources().await.pop().unwrap().id;

    assert!(store.delete_resource(&id).await);
    assert!(store.fetch_resources().await.iter().all(|r| r.id != id));
    assert!(store.delete_resource(&id).await);
}

async fn news_round_trip(store: &RecordStore) {
    let draft = NewsDraft {
        title: "AGM Announced".to_string(),
        date: "2025-09-01".to_string(),
        summary: "Annual general meeting".to_string(),
        content: "Members are invited...".to_string(),
        image_url: Some("/news/agm.jpg".to_string()),
        author: None,
    };
    assert!(store.create_news(&draft).await);

    let item = store.fetch_news().await.pop().unwrap();
    assert_eq!(item.clone(), draft.clone().with_id(item.id.clone()));

    let edited = NewsItem {
        author: Some("Secretariat".to_string()),
        ..item.clone()
    };
    assert!(store.update_news(&edited).await);
    assert!(store.fetch_news().await.contains(&edited));

    assert!(store.delete_news(&item.id).await);
    assert!(store.fetch_news().await.is_empty());
}

async fn banner_patch_keeps_other_fields(store: &RecordStore) {
    let before = store.fetch_site_config().await;
    assert!(store.update_site_config(&SiteConfigPatch::banner("X")).await);

    let after = store.fetch_site_config().await;
    assert_eq!(after.banner_text.as_deref(), Some("X"));
    assert_eq!(
        after,
        SiteConfig {
            banner_text: Some("X".to_string()),
            ..before
        }
    );

    let recolor = SiteConfigPatch {
        primary_color: Some("#000000".to_string()),
        ..SiteConfigPatch::default()
    };
    assert!(store.update_site_config(&recolor).await);
    let recolored = store.fetch_site_config().await;
    assert_eq!(recolored.primary_color, "#000000");
    assert_eq!(recolored.banner_text.as_deref(), Some("X"));

    assert!(store.update_site_config(&SiteConfigPatch::clear_banner()).await);
    let cleared = store.fetch_site_config().await;
    assert_eq!(cleared.banner_text, None);
    assert_eq!(cleared.primary_color, "#000000");
}

/// Two racing updates to one resource: the write that completes last is the one fetched.
async fn last_completed_update_wins(inner: Arc<dyn RecordBackend>) {
    let backend = Arc::new(ScriptedBackend::new(inner));
    let store = RecordStore::new(backend.clone(), tokens());
    assert!(store.create_resource(&resource_draft()).await);
    let resource = store.fetch_resources().await.pop().unwrap();

    for (held, other) in [("Legal", "Technical"), ("Technical", "Legal")] {
        let held_write = Resource {
            category: held.to_string(),
            ..resource.clone()
        };
        let other_write = Resource {
            category: other.to_string(),
            ..resource.clone()
        };

        let release = backend.hold_resource_update(held).await;
        let (ok_held, ok_other) = tokio::join!(store.update_resource(&held_write), async {
            let ok = store.update_resource(&other_write).await;
            let _ = release.send(());
            ok
        });
        assert!(ok_held && ok_other);

        let stored = store
            .fetch_resources()
            .await
            .into_iter()
            .find(|r| r.id == resource.id)
            .unwrap();
        assert_eq!(stored, held_write);
    }
}

async fn run_contract(store: &RecordStore) {
    create_then_fetch_event(store).await;
    update_changes_one_field(store).await;
    update_unknown_id_is_noop(store).await;
    delete_is_idempotent(store).await;
    news_round_trip(store).await;
    banner_patch_keeps_other_fields(store).await;
}

#[tokio::test]
async fn test_memory_backend_contract() {
    run_contract(&memory_store()).await;
}

#[tokio::test]
async fn test_sqlite_backend_contract() {
    let (store, _backend, _temp_dir) = sqlite_store().await;
    run_contract(&store).await;
}

#[tokio::test]
async fn test_memory_last_completed_update_wins() {
    last_completed_update_wins(Arc::new(MemoryBackend::new())).await;
}

#[tokio::test]
async fn test_sqlite_last_completed_update_wins() {
    let (_store, backend, _temp_dir) = sqlite_store().await;
    last_completed_update_wins(Arc::new(backend)).await;
}

#[tokio::test]
async fn test_sample_data_is_fixed() {
    let store = RecordStore::new(Arc::new(MemoryBackend::with_sample_data()), tokens());

    let events = store.fetch_events().await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].title, "Annual ISP Conference");
    assert_eq!(store.fetch_news().await.len(), 2);
    assert_eq!(store.fetch_resources().await[1].resource_type, "ZIP");
    assert!(store.fetch_site_config().await.banner_text.is_some());
}

#[tokio::test]
async fn test_site_config_defaults_when_nothing_persisted() {
    let store = memory_store();
    assert_eq!(store.fetch_site_config().await, SiteConfig::default());

    let (sqlite, _backend, _temp_dir) = sqlite_store().await;
    assert_eq!(sqlite.fetch_site_config().await, SiteConfig::default());
}

#[tokio::test]
async fn test_seed_if_empty_matches_samples() {
    let (store, backend, _temp_dir) = sqlite_store().await;
    backend.seed_if_empty().await.unwrap();
    backend.seed_if_empty().await.unwrap();

    assert_eq!(store.fetch_events().await, sample::events());
    assert_eq!(store.fetch_news().await, sample::news());
    assert_eq!(store.fetch_resources().await, sample::resources());
    assert_eq!(store.fetch_site_config().await, sample::site_config());
}

#[tokio::test]
async fn test_store_failure_degrades() {
    let (store, backend, _temp_dir) = sqlite_store().await;
    assert!(store.create_event(&conf_draft()).await);
    backend.close().await;

    assert!(store.fetch_events().await.is_empty());
    assert!(store.try_fetch_events().await.is_err());
    assert!(store.try_fetch_site_config().await.is_err());
    assert!(store.fetch_news().await.is_empty());
    assert!(store.fetch_resources().await.is_empty());
    assert_eq!(store.fetch_site_config().await, SiteConfig::default());
    assert!(!store.create_event(&conf_draft()).await);
    assert!(!store.delete_event("1").await);
    assert!(!store.update_site_config(&SiteConfigPatch::banner("X")).await);
    assert!(!store.authenticate("admin", "password").await.success);
}

async fn register(store: &RecordStore, username: &str, password: &str) {
    let password_hash = bcrypt::hash(password, 4).unwrap();
    store
        .register_admin(&AdminCredential {
            username: username.to_string(),
            password_hash,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_authenticate_success_issues_verifiable_token() {
    let store = memory_store();
    register(&store, "admin", "s3cret-pass").await;

    let result = store.authenticate("admin", "s3cret-pass").await;
    assert!(result.success);
    let token = result.token.expect("token issued");
    assert_eq!(store.tokens().verify(&token).unwrap().username, "admin");
    assert!(result.expires_at.is_some());
}

#[tokio::test]
async fn test_authenticate_wrong_password() {
    let (store, _backend, _temp_dir) = sqlite_store().await;
    register(&store, "admin", "s3cret-pass").await;

    let result = store.authenticate("admin", "wrong").await;
    assert_eq!(result, AuthResult::denied());

    let body = serde_json::to_value(&result).unwrap();
    assert_eq!(body, serde_json::json!({ "success": false }));
}

#[tokio::test]
async fn test_authenticate_unknown_user() {
    let store = memory_store();
    register(&store, "admin", "s3cret-pass").await;

    assert!(!store.authenticate("root", "s3cret-pass").await.success);
}

#[tokio::test]
async fn test_register_admin_replaces_password() {
    let (store, _backend, _temp_dir) = sqlite_store().await;
    register(&store, "admin", "first").await;
    register(&store, "admin", "second").await;

    assert!(!store.authenticate("admin", "first").await.success);
    assert!(store.authenticate("admin", "second").await.success);
}
