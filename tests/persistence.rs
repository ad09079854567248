//! Persistence adapter scenarios against the memory and SQLite stores

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use layout_studio::geometry::MediaType;
use layout_studio::identity::Actor;
use layout_studio::persist::CreatePage;
use layout_studio::store::schema::{PAGES, PAGE_LAYOUTS, SHELF_LAYOUTS};
use layout_studio::store::{Row, SchemaVersion};
use layout_studio::{
    LayoutError, LayoutRepository, LayoutSource, MemoryStore, Namespace, ProfileKey, RowStore,
    SqliteStore,
};

fn admin() -> Actor {
    Actor::admin("owner")
}

fn memory_repo() -> LayoutRepository {
    LayoutRepository::new(Arc::new(MemoryStore::new()))
}

async fn sqlite_repo(url: &str, version: SchemaVersion) -> LayoutRepository {
    let store = SqliteStore::connect(url).await.unwrap();
    store.create_schema(version).await.unwrap();
    LayoutRepository::new(Arc::new(store))
}

fn create(key: &str, clone_from: Option<&str>) -> CreatePage {
    CreatePage {
        key: key.to_string(),
        label: None,
        clone_from: clone_from.map(str::to_string),
    }
}

#[tokio::test]
async fn test_unsaved_page_loads_defaults() {
    let repo = memory_repo();
    let loaded = repo.load_hotspot("creating", None).await;
    assert_eq!(loaded.source, LayoutSource::Default);
    assert_eq!((loaded.layout.x_percent, loaded.layout.y_percent), (26.0, 18.0));
    assert_eq!(loaded.warning, None);

    let with_profile = repo
        .load_hotspot("creating", Some(ProfileKey::TabletLandscape))
        .await;
    assert_eq!(with_profile.source, LayoutSource::Default);
}

#[tokio::test]
async fn test_save_clamps_out_of_range_values() {
    let repo = memory_repo();
    let saved = repo
        .save_hotspot("creating", None, &json!({"xPercent": 150}), Some(&admin()))
        .await
        .unwrap();
    assert!(saved.saved);
    assert_eq!(saved.layout.x_percent, 100.0);
    assert_eq!(saved.layout.y_percent, 18.0);
}

#[tokio::test]
async fn test_save_requires_admin() {
    let repo = memory_repo();
    let raw = json!({"xPercent": 10});
    let err = repo.save_hotspot("about", None, &raw, None).await.unwrap_err();
    assert_eq!(err.status_code(), 401);
    let err = repo
        .save_hotspot("about", None, &raw, Some(&Actor::member("reader")))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
    assert_eq!(repo.load_hotspot("about", None).await.source, LayoutSource::Default);
}

#[tokio::test]
async fn test_storage_error_on_load_returns_defaults_with_warning() {
    let store = Arc::new(MemoryStore::new());
    store.fail_selects(&PAGE_LAYOUTS, "contact");
    let repo = LayoutRepository::new(store);

    let loaded = repo.load_hotspot("contact", Some(ProfileKey::Desktop)).await;
    assert_eq!(loaded.source, LayoutSource::Default);
    assert_eq!((loaded.layout.x_percent, loaded.layout.y_percent), (84.0, 64.0));
    assert!(loaded.warning.unwrap().contains("simulated read failure"));
}

#[tokio::test]
async fn test_missing_optional_column_saves_with_warning() {
    let store = MemoryStore::new().without_column(&SHELF_LAYOUTS, "templates");
    let repo = LayoutRepository::new(Arc::new(store));
    let saved = repo
        .save_shelf(
            "library",
            &json!({"books": [{"label": "Essays", "targetPath": "/essays", "x": 30}]}),
            Some(&admin()),
        )
        .await
        .unwrap();
    assert!(saved.saved);
    let warning = saved.warning.unwrap();
    assert!(warning.contains("templates"), "warning was: {}", warning);

    let loaded = repo.load_shelf("library").await;
    assert_eq!(loaded.source, LayoutSource::Stored);
    assert_eq!(loaded.layout.books.len(), 1);
    assert_eq!(loaded.layout.books[0].label, "Essays");
    assert_eq!(loaded.layout.books[0].x, 30.0);
}

#[tokio::test]
async fn test_missing_templates_column_keeps_admin_logo() {
    let store = MemoryStore::new().without_column(&SHELF_LAYOUTS, "templates");
    let repo = LayoutRepository::new(Arc::new(store));
    let saved = repo
        .save_shelf("library", &json!({"adminLogo": {"x": 20, "y": 20}}), Some(&admin()))
        .await
        .unwrap();
    assert!(saved.warning.unwrap().contains("templates"));

    let loaded = repo.load_shelf("library").await;
    assert_eq!(loaded.layout.admin_logo, saved.layout.admin_logo);
    assert_eq!((loaded.layout.admin_logo.x, loaded.layout.admin_logo.y), (20.0, 20.0));
}

#[tokio::test]
async fn test_missing_required_column_is_a_storage_error() {
    let store = MemoryStore::new().without_column(&SHELF_LAYOUTS, "books");
    let repo = LayoutRepository::new(Arc::new(store));
    let err = repo
        .save_shelf("library", &json!({}), Some(&admin()))
        .await
        .unwrap_err();
    assert!(matches!(err, LayoutError::Storage(_)));
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn test_legacy_sqlite_hotspot_round_trip() {
    let repo = sqlite_repo("sqlite::memory:", SchemaVersion::Legacy).await;
    let saved = repo
        .save_hotspot(
            "reading",
            Some(ProfileKey::MobilePortrait),
            &json!({"xPercent": "33.5", "label": "Read"}),
            Some(&admin()),
        )
        .await
        .unwrap();
    assert!(saved.warning.unwrap().contains("hotspot"));

    let loaded = repo
        .load_hotspot("reading", Some(ProfileKey::MobilePortrait))
        .await;
    assert_eq!(loaded.source, LayoutSource::StoredProfile);
    assert_eq!(loaded.layout.x_percent, 33.5);
    assert_eq!(loaded.layout.label, "Read");
    assert_eq!(loaded.layout.target_path, "/reading");
}

#[tokio::test]
async fn test_sqlite_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("layouts.db").display());

    let saved = {
        let repo = sqlite_repo(&url, SchemaVersion::Current).await;
        repo.save_shelf(
            "library",
            &json!({
                "books": [
                    {"label": "Poems", "targetPath": "/poems", "spine": "brown", "sampleType": "pdf"},
                    {"label": "Essays", "targetPath": "/essays", "titleBox": {"y": 80, "height": 30}}
                ],
                "templates": {"gold": {"coverWindow": {"width": 70, "height": 77}}}
            }),
            Some(&admin()),
        )
        .await
        .unwrap()
    };
    assert_eq!(saved.warning, None);

    let repo = sqlite_repo(&url, SchemaVersion::Current).await;
    let loaded = repo.load_shelf("library").await;
    assert_eq!(loaded.source, LayoutSource::Stored);
    assert_eq!(loaded.layout, saved.layout);
    assert_eq!(loaded.layout.books[0].sample_type, MediaType::Pdf);
    assert_eq!(loaded.layout.templates.gold.cover_window.width, 100.0);
}

#[tokio::test]
async fn test_profile_vars_round_trip() {
    let repo = memory_repo();
    let defaults = repo.load_profile_vars(Namespace::Login, ProfileKey::Desktop).await;
    assert_eq!(defaults.source, LayoutSource::Default);

    let saved = repo
        .save_profile_vars(
            Namespace::Login,
            ProfileKey::Desktop,
            &json!({"login-popup-width": "2000px", "login-unknown": "1"}),
            Some(&admin()),
        )
        .await
        .unwrap();
    assert_eq!(saved.layout["login-popup-width"], "960px");
    assert!(!saved.layout.contains_key("login-unknown"));
    assert_eq!(
        saved.layout.keys().collect::<Vec<_>>(),
        defaults.layout.keys().collect::<Vec<_>>()
    );

    let err = repo
        .save_profile_vars(Namespace::Login, ProfileKey::Desktop, &json!([]), Some(&admin()))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_create_page_validation_and_conflict() {
    let repo = memory_repo();
    let created = repo.create_page(&create("poems", None), Some(&admin())).await.unwrap();
    assert!(created.created);
    assert_eq!(created.page.path, "/poems");
    assert_eq!(created.page.label, "Poems");
    assert_eq!(created.warning, None);

    let err = repo
        .create_page(&create("poems", None), Some(&admin()))
        .await
        .unwrap_err();
    assert!(matches!(err, LayoutError::Conflict { .. }));

    let err = repo
        .create_page(&create("admin", None), Some(&admin()))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);

    let err = repo.create_page(&create("essays", None), None).await.unwrap_err();
    assert_eq!(err.status_code(), 401);
}

#[tokio::test]
async fn test_create_page_conflicts_with_existing_shelf() {
    let repo = memory_repo();
    repo.save_shelf("essays", &json!({}), Some(&admin())).await.unwrap();
    let err = repo
        .create_page(&create("essays", None), Some(&admin()))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 409);
}

#[tokio::test]
async fn test_clone_copies_geometry_and_clears_content() {
    let repo = memory_repo();
    let source = repo
        .save_shelf(
            "library",
            &json!({
                "books": [{
                    "label": "Poems",
                    "targetPath": "/poems",
                    "x": 40,
                    "width": 12,
                    "coverUrl": "https://cdn.example/poems.jpg",
                    "sampleUrl": "https://cdn.example/poems.pdf",
                    "sampleType": "pdf"
                }],
                "adminLogo": {"x": 20, "y": 20}
            }),
            Some(&admin()),
        )
        .await
        .unwrap()
        .layout;

    repo.create_page(&create("poetry", Some("library")), Some(&admin()))
        .await
        .unwrap();
    let cloned = repo.load_shelf("poetry").await;
    assert_eq!(cloned.source, LayoutSource::Stored);

    let book = &cloned.layout.books[0];
    assert_eq!(book.rect(), source.books[0].rect());
    assert_eq!(book.sample_type, MediaType::Pdf);
    assert_eq!(book.label, "");
    assert_eq!(book.target_path, "");
    assert_eq!(book.cover_url, "");
    assert_eq!(book.sample_url, "");
    assert_eq!(cloned.layout.admin_logo, source.admin_logo);
    assert_eq!(cloned.layout.templates, source.templates);

    let err = repo
        .create_page(&create("fiction", Some("nowhere")), Some(&admin()))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_failed_clone_leaves_key_free() {
    let store = Arc::new(MemoryStore::new().without_column(&SHELF_LAYOUTS, "updated_by"));
    let source: Row = [
        ("page_key", json!("library")),
        ("books", json!([{"label": "Poems", "targetPath": "/poems"}])),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value))
    .collect();
    store.upsert(&SHELF_LAYOUTS, &source).await.unwrap();
    let repo = LayoutRepository::new(store.clone());

    for _ in 0..2 {
        let err = repo
            .create_page(&create("poetry", Some("library")), Some(&admin()))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 500);
    }
    assert_eq!(store.row_count(&PAGES), 0);

    let created = repo
        .create_page(&create("poetry", None), Some(&admin()))
        .await
        .unwrap();
    assert_eq!(created.page.key, "poetry");
}

#[tokio::test]
async fn test_clone_reports_missing_column_warning() {
    let store = MemoryStore::new().without_column(&SHELF_LAYOUTS, "templates");
    let repo = LayoutRepository::new(Arc::new(store));
    repo.save_shelf(
        "library",
        &json!({"books": [{"label": "Poems", "targetPath": "/poems"}]}),
        Some(&admin()),
    )
    .await
    .unwrap();

    let created = repo
        .create_page(&create("poetry", Some("library")), Some(&admin()))
        .await
        .unwrap();
    assert!(created.warning.unwrap().contains("templates"));
    assert_eq!(repo.load_shelf("poetry").await.layout.books.len(), 1);
}
