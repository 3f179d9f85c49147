//! Persistence tests against a SQLite database file.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use bookshelf::domain::{AuthorId, NewAuthor, NewBook};
use bookshelf::infrastructure::{
    DatabaseBackend, Dialect, LibraryStore, SqlStore, StoreConfig, StoreFactory,
    seed_demo_authors,
};
use common::{create_test_router, get, post_form};

#[fixture]
fn database_directory() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

fn database_url(directory: &TempDir) -> String {
    format!(
        "sqlite://{}?mode=rwc",
        directory.path().join("site.db").display()
    )
}

async fn open_store(url: &str) -> std::sync::Arc<dyn LibraryStore> {
    let config = StoreConfig::builder()
        .backend(DatabaseBackend::Sqlite)
        .database_url(url)
        .build()
        .unwrap();
    StoreFactory::new(config).create().await.unwrap()
}

#[rstest]
#[tokio::test]
async fn test_updated_name_survives_reopening(database_directory: TempDir) {
    let url = database_url(&database_directory);

    let router = create_test_router(open_store(&url).await);
    let created = post_form(&router, "/author/create", "name=Jane+Doe").await;
    assert_eq!(created.status, StatusCode::SEE_OTHER);
    let updated = post_form(&router, "/author/update/1", "name=Jane+Smith").await;
    assert_eq!(updated.status, StatusCode::SEE_OTHER);
    drop(router);

    let reopened = open_store(&url).await;
    let author = reopened.find_author(AuthorId::new(1)).await.unwrap().unwrap();
    assert_eq!(author.name, "Jane Smith");

    let listing = get(&create_test_router(reopened), "/", None).await;
    assert!(listing.body.contains("Jane Smith"));
    assert!(!listing.body.contains("Jane Doe"));
}

#[rstest]
#[tokio::test]
async fn test_restricted_delete_survives_reopening(database_directory: TempDir) {
    let url = database_url(&database_directory);

    let store = open_store(&url).await;
    let author = store.insert_author(NewAuthor::new("Frank")).await.unwrap();
    store
        .insert_book(NewBook::new("Dune", author.author_id))
        .await
        .unwrap();
    drop(store);

    let router = create_test_router(open_store(&url).await);
    let response = post_form(&router, "/author/delete/1", "").await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert!(get(&router, "/author/1", None).await.body.contains("Dune"));
}

#[rstest]
#[tokio::test]
async fn test_seed_writes_demo_authors_to_file(database_directory: TempDir) {
    let url = database_url(&database_directory);
    let store = SqlStore::connect(&url, Dialect::Sqlite, 2, Duration::from_secs(5))
        .await
        .unwrap();
    store.ensure_schema().await.unwrap();

    let authors = seed_demo_authors(&store).await.unwrap();

    let names: Vec<_> = authors.iter().map(|author| author.name.as_str()).collect();
    assert_eq!(names, ["Example 1", "Example 2"]);

    let reopened = open_store(&url).await;
    assert_eq!(reopened.list_authors().await.unwrap(), authors);
}
