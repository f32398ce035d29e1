//! Integration tests for the SQLite stores and database initialization

mod helpers;

use helpers::{cards, pathway, stores, user};
use pathways_common::db::init::init_database;
use pathways_common::db::seed::{default_pathways, seed_if_empty, DEFAULT_PATHWAYS};
use pathways_common::db::SqliteCatalog;
use pathways_common::models::PathwayUpdate;
use pathways_common::store::{CatalogStore, UserStore};
use pathways_common::Error;
use uuid::Uuid;

#[tokio::test]
async fn test_database_created_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("pathways.db");

    let pool = init_database(&db_path).await.unwrap();
    assert!(db_path.exists());

    // Opening again is idempotent
    drop(pool);
    let pool = init_database(&db_path).await.unwrap();
    let catalog = SqliteCatalog::new(pool);
    assert_eq!(catalog.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_find_all_sorted_by_name() {
    let (catalog, _) = stores().await;
    catalog.create("Web Designer", "").await.unwrap();
    catalog.create("Art Handler", "").await.unwrap();
    catalog.create("Muralist", "").await.unwrap();

    let names: Vec<String> = catalog
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Art Handler", "Muralist", "Web Designer"]);
}

#[tokio::test]
async fn test_duplicate_name_is_validation_error() {
    let (catalog, _) = stores().await;
    catalog.create("Illustrator", "").await.unwrap();

    let err = catalog.create("Illustrator", "again").await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_partial_update_keeps_other_fields() {
    let (catalog, _) = stores().await;
    let p = catalog.create("Illustrator", "Draws").await.unwrap();

    let updated = catalog
        .update(
            p.id,
            &PathwayUpdate {
                name: None,
                description: Some("Draws a lot".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Illustrator");
    assert_eq!(updated.description, "Draws a lot");
}

#[tokio::test]
async fn test_missing_pathway_writes_are_not_found() {
    let (catalog, _) = stores().await;
    let id = Uuid::new_v4();

    assert!(matches!(
        catalog.update(id, &PathwayUpdate::default()).await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(catalog.delete(id).await, Err(Error::NotFound(_))));
    assert!(matches!(
        catalog.replace_cards(id, &[]).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_leaves_user_references() {
    let (catalog, users) = stores().await;
    let a = pathway(&catalog, "A", "a").await;
    let b = pathway(&catalog, "B", "b").await;
    let c = pathway(&catalog, "C", "c").await;
    let u = user(&users, "learner@example.com").await;
    users
        .update_selected_pathways(u.id, &[a.id, b.id, c.id])
        .await
        .unwrap();
    users
        .upsert_progress(u.id, a.id, &cards("Mine", &[]))
        .await
        .unwrap();

    catalog.delete(a.id).await.unwrap();

    let reloaded = users.find_by_id(u.id).await.unwrap().unwrap();
    assert_eq!(reloaded.selected_pathways, vec![a.id, b.id, c.id]);
    assert!(users.get_progress(u.id, a.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_upsert_progress_keeps_one_record_per_pathway() {
    let (catalog, users) = stores().await;
    let p = pathway(&catalog, "A", "a").await;
    let u = user(&users, "learner@example.com").await;

    users
        .upsert_progress(u.id, p.id, &cards("First", &[]))
        .await
        .unwrap();
    users
        .upsert_progress(u.id, p.id, &cards("Second", &[("x", true)]))
        .await
        .unwrap();

    let record = users.get_progress(u.id, p.id).await.unwrap().unwrap();
    assert_eq!(record.pathway_id, p.id);
    assert_eq!(record.cards, cards("Second", &[("x", true)]));
}

#[tokio::test]
async fn test_user_lookup_by_provider_id() {
    let (_, users) = stores().await;
    let created = user(&users, "learner@example.com").await;

    let found = users
        .find_by_provider_id("google-learner@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, created);
    assert!(found.selected_pathways.is_empty());
    assert!(users.find_by_provider_id("other").await.unwrap().is_none());
}

#[tokio::test]
async fn test_selection_update_for_missing_user() {
    let (_, users) = stores().await;
    let err = users
        .update_selected_pathways(Uuid::new_v4(), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_seed_only_when_empty() {
    let (catalog, _) = stores().await;

    let inserted = seed_if_empty(&catalog).await.unwrap();
    assert_eq!(inserted, DEFAULT_PATHWAYS.len());
    assert_eq!(catalog.count().await.unwrap(), DEFAULT_PATHWAYS.len() as i64);

    let all = catalog.find_all().await.unwrap();
    assert!(all.iter().all(|p| p.cards.len() == 12));

    assert_eq!(seed_if_empty(&catalog).await.unwrap(), 0);
    assert_eq!(catalog.count().await.unwrap(), DEFAULT_PATHWAYS.len() as i64);
}

#[tokio::test]
async fn test_failed_bulk_insert_leaves_catalog_empty() {
    let (catalog, _) = stores().await;

    let mut pathways = default_pathways();
    let clash = pathways[0].name.clone();
    pathways[40].name = clash;

    let err = catalog.insert_all(&pathways).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(catalog.count().await.unwrap(), 0);

    // Nothing was left behind, so the next startup still seeds everything
    assert_eq!(seed_if_empty(&catalog).await.unwrap(), DEFAULT_PATHWAYS.len());
}
