//! Failure injection: per-page load isolation, partial publishes and
//! results arriving after the consumer went away.

mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use site_sync::storage::{self, DeviceStorage, MemoryStorage};
use site_sync::site::Direction;
use site_sync::sync::{
    BaselineSource, ConfigLoader, LoadError, Liveness, PageLoad, PublishOutcome, Publisher,
    UpsertOutcome,
};
use site_sync::{Language, Localizer, PageKey, SiteConfig, SiteStore};
use tokio::sync::Barrier;

use common::ScriptedStore;

fn baseline() -> BaselineSource {
    BaselineSource::Document(
        SiteConfig::from_value(json!({
            "home": { "hero_title_en": "Base home", "hero_subtitle_en": "Base subtitle" },
            "contact": { "phone": "base-phone" },
            "experts": { "title_en": "Base experts" },
        }))
        .unwrap(),
    )
}

fn full_config() -> SiteConfig {
    let mut value = serde_json::Map::new();
    for page in PageKey::ALL {
        value.insert(page.as_str().to_string(), json!({ "title_en": page.as_str() }));
    }
    SiteConfig::from_value(serde_json::Value::Object(value)).unwrap()
}

#[tokio::test]
async fn test_failed_page_keeps_previous_layer() {
    let mut remote = ScriptedStore::default();
    remote.fetch.insert(PageKey::Home, json!({ "hero_title_en": "Remote home" }));
    remote.fetch.insert(PageKey::About, json!("{\"intro_en\":\"Remote about\"}"));
    remote.fetch.insert(PageKey::Experts, json!("not json at all"));
    remote.fetch_fails.insert(PageKey::Contact);
    let remote = Arc::new(remote);

    let device = Arc::new(MemoryStorage::new());
    let loader = ConfigLoader::new(remote.clone(), device, 5);
    let report = loader.load(&baseline()).await.unwrap();

    let home = report.config.get("home").unwrap();
    assert_eq!(home["hero_title_en"], "Remote home");
    assert_eq!(home["hero_subtitle_en"], "Base subtitle");
    assert_eq!(report.config.get("about").unwrap(), &json!({ "intro_en": "Remote about" }));
    assert_eq!(report.config.get("contact").unwrap(), &json!({ "phone": "base-phone" }));
    assert_eq!(report.config.get("experts").unwrap(), &json!({ "title_en": "Base experts" }));

    assert_eq!(report.failed_pages(), vec![PageKey::Contact]);
    let experts = report.pages.iter().find(|(p, _)| *p == PageKey::Experts).unwrap();
    assert_eq!(experts.1, PageLoad::Skipped);
    assert_eq!(remote.count("fetch"), 7);
}

#[tokio::test]
async fn test_draft_overrides_baseline_and_remote_overrides_draft() {
    let mut remote = ScriptedStore::default();
    remote.fetch.insert(PageKey::Home, json!({ "hero_title_en": "Remote home" }));
    remote.fetch_fails.insert(PageKey::Contact);
    let remote = Arc::new(remote);

    let device = Arc::new(MemoryStorage::new());
    let draft = SiteConfig::from_value(json!({
        "home": { "hero_title_en": "Draft home", "hero_title_ar": "مسودة" },
        "contact": { "phone": "draft-phone" },
    }))
    .unwrap();
    storage::save_draft(device.as_ref(), &draft).unwrap();

    let loader = ConfigLoader::new(remote, device, 5);
    let report = loader.load(&baseline()).await.unwrap();

    // Draft replaced the page wholesale; the base-only subtitle is gone.
    assert_eq!(
        report.config.get("home").unwrap(),
        &json!({ "hero_title_en": "Remote home", "hero_title_ar": "مسودة" })
    );
    assert_eq!(report.config.get("contact").unwrap(), &json!({ "phone": "draft-phone" }));
}

#[tokio::test]
async fn test_unreadable_baseline_aborts_load() {
    let remote = Arc::new(ScriptedStore::default());
    let store = SiteStore::default();
    let loader = ConfigLoader::new(remote.clone(), Arc::new(MemoryStorage::new()), 5);

    let err = loader
        .load_into(&BaselineSource::parse("/nonexistent/config.json"), &store, &Liveness::new())
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::Baseline(_)));
    assert!(store.snapshot().root().is_empty());
    assert_eq!(remote.count("fetch"), 0);
}

#[tokio::test]
async fn test_results_after_close_are_not_applied() {
    let mut remote = ScriptedStore::default();
    remote.fetch.insert(PageKey::Home, json!({ "hero_title_en": "Remote home" }));
    let remote = Arc::new(remote);
    let store = SiteStore::default();
    let liveness = Liveness::new();
    let loader = ConfigLoader::new(remote.clone(), Arc::new(MemoryStorage::new()), 5);

    let handle = liveness.clone();
    let closer = tokio::spawn(async move { handle.close() });
    closer.await.unwrap();

    let err = loader.load_into(&baseline(), &store, &liveness).await.unwrap_err();
    assert!(matches!(err, LoadError::Abandoned));
    // Requests still went out; only their results were dropped.
    assert_eq!(remote.count("fetch"), 7);
    assert!(store.snapshot().root().is_empty());
}

#[tokio::test]
async fn test_partial_publish_does_not_advance_canonical() {
    let mut remote = ScriptedStore::default();
    let third = PageKey::ALL[2];
    remote.update_fails.insert(third);
    remote.create_fails.insert(third);
    let remote = Arc::new(remote);

    let device = Arc::new(MemoryStorage::new());
    let before = SiteConfig::from_value(json!({ "home": { "title_en": "old" } })).unwrap();
    let store = SiteStore::new(before.clone());
    let publisher = Publisher::new(remote.clone(), device.clone());

    let report = publisher.publish(&store, full_config(), &Liveness::new()).await;

    assert_eq!(report.outcome, PublishOutcome::Partial);
    assert_eq!(report.succeeded, 6);
    assert_eq!(report.attempted, 7);
    assert_eq!(report.failed_pages(), vec![third]);
    assert_eq!(*store.snapshot(), before);
    assert!(device.get(storage::DRAFT_KEY).unwrap().is_none());

    // Other pages were written and are not rolled back.
    assert_eq!(remote.written.lock().unwrap().len(), 6);
}

#[tokio::test]
async fn test_full_publish_adopts_config_and_caches_draft() {
    let remote = Arc::new(ScriptedStore::default());
    let device = Arc::new(MemoryStorage::new());
    let store = SiteStore::default();
    let publisher = Publisher::new(remote.clone(), device.clone());

    let report = publisher.publish(&store, full_config(), &Liveness::new()).await;

    assert_eq!(report.outcome, PublishOutcome::Full);
    assert!(report.pages.iter().all(|(_, o)| matches!(o, UpsertOutcome::Updated)));
    assert_eq!(*store.snapshot(), full_config());
    assert_eq!(storage::load_draft(device.as_ref()), Some(full_config()));
    assert_eq!(remote.count("create"), 0);
}

#[tokio::test]
async fn test_update_failure_falls_back_to_create() {
    let mut remote = ScriptedStore::default();
    remote.update_fails.insert(PageKey::Founder);
    let remote = Arc::new(remote);
    let store = SiteStore::default();
    let publisher = Publisher::new(remote.clone(), Arc::new(MemoryStorage::new()));

    let report = publisher.publish(&store, full_config(), &Liveness::new()).await;

    assert_eq!(report.outcome, PublishOutcome::Full);
    let founder = report.pages.iter().find(|(p, _)| *p == PageKey::Founder).unwrap();
    assert!(matches!(founder.1, UpsertOutcome::Created));
    assert_eq!(remote.count("create"), 1);
}

#[tokio::test]
async fn test_everything_failing_is_failed() {
    let mut remote = ScriptedStore::default();
    for page in PageKey::ALL {
        remote.update_fails.insert(page);
        remote.create_fails.insert(page);
    }
    let store = SiteStore::default();
    let publisher = Publisher::new(Arc::new(remote), Arc::new(MemoryStorage::new()));

    let report = publisher.publish(&store, full_config(), &Liveness::new()).await;

    assert_eq!(report.outcome, PublishOutcome::Failed);
    assert_eq!(report.succeeded, 0);
    assert!(store.snapshot().root().is_empty());
}

#[tokio::test]
async fn test_full_publish_after_close_is_not_adopted() {
    let remote = Arc::new(ScriptedStore::default());
    let device = Arc::new(MemoryStorage::new());
    let store = SiteStore::default();
    let liveness = Liveness::new();
    liveness.close();

    let report = Publisher::new(remote, device.clone())
        .publish(&store, full_config(), &liveness)
        .await;

    assert_eq!(report.outcome, PublishOutcome::Full);
    assert!(store.snapshot().root().is_empty());
    assert!(storage::load_draft(device.as_ref()).is_none());
}

#[tokio::test]
async fn test_page_fetches_run_concurrently() {
    let remote = Arc::new(ScriptedStore {
        barrier: Some(Arc::new(Barrier::new(PageKey::ALL.len()))),
        ..ScriptedStore::default()
    });
    let loader = ConfigLoader::new(remote.clone(), Arc::new(MemoryStorage::new()), 5);

    // Each fetch blocks until all seven are in flight.
    let report = tokio::time::timeout(Duration::from_secs(5), loader.load(&baseline()))
        .await
        .expect("page fetches were not issued concurrently")
        .unwrap();
    assert!(report.failed_pages().is_empty());
    assert_eq!(remote.count("fetch"), 7);
}

#[tokio::test]
async fn test_page_upserts_run_concurrently() {
    let remote = Arc::new(ScriptedStore {
        barrier: Some(Arc::new(Barrier::new(PageKey::ALL.len()))),
        ..ScriptedStore::default()
    });
    let store = SiteStore::default();
    let publisher = Publisher::new(remote.clone(), Arc::new(MemoryStorage::new()));

    let liveness = Liveness::new();
    let publish = publisher.publish(&store, full_config(), &liveness);
    let report = tokio::time::timeout(Duration::from_secs(5), publish)
        .await
        .expect("page upserts were not issued concurrently");
    assert_eq!(report.outcome, PublishOutcome::Full);
    assert_eq!(remote.count("update"), 7);
}

/// `Localizer` holds no remote handle, so switching cannot reach the network;
/// what matters is that the direction follows immediately and the choice persists.
#[test]
fn test_language_switch_flips_direction_and_persists() {
    let device = Arc::new(MemoryStorage::new());
    let mut localizer = Localizer::restore(device.clone());
    assert_eq!(localizer.language(), Language::Ar);
    assert_eq!(localizer.direction(), Direction::Rtl);

    assert_eq!(localizer.set_language(Language::En).unwrap(), Direction::Ltr);
    assert_eq!(localizer.direction(), Direction::Ltr);
    assert_eq!(storage::load_language(device.as_ref()), Language::En);

    localizer.set_language(Language::Ar).unwrap();
    assert_eq!(localizer.direction(), Direction::Rtl);
    assert_eq!(Localizer::restore(device).language(), Language::Ar);
}
