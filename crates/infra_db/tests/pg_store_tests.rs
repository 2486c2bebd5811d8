//! PostgreSQL store tests
//!
//! These start a PostgreSQL container and are ignored by default:
//! `cargo test -p infra_db -- --ignored`

use std::sync::Arc;

use core_kernel::{AccessError, EntityRepository, EntityStore, PageRequestParser, StoreProbe};
use domain_region::{Region, REGION_DESCRIPTOR};
use infra_db::PgEntityStore;
use test_utils::{create_isolated_test_database, RegionBuilder, UserFixtures};

#[tokio::test]
#[ignore = "requires docker"]
async fn test_region_lifecycle() {
    let db = create_isolated_test_database().await.expect("database");
    let store = PgEntityStore::<Region>::new(db.pool().clone());
    store.ping().await.unwrap();
    let repo = EntityRepository::new(Arc::new(store.clone()));

    let saved = repo
        .insert(RegionBuilder::new().with_user_id("user-1").build())
        .await
        .unwrap();
    assert!(saved.id.is_set());
    assert_eq!(saved.user, Some(UserFixtures::alice()));

    let updated = repo
        .update(RegionBuilder::new().with_id(saved.id.value()).with_name("BBBBBBBBBB").build())
        .await
        .unwrap();
    assert!(updated.user.is_none());
    assert_eq!(updated.region_name.as_deref(), Some("BBBBBBBBBB"));

    let found = repo.get(saved.id).await.unwrap();
    assert!(found.user.is_none());

    repo.delete(saved.id).await.unwrap();
    repo.delete(saved.id).await.unwrap();
    assert!(repo.get(saved.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_unknown_user_is_rejected() {
    let db = create_isolated_test_database().await.expect("database");
    let repo = EntityRepository::<Region>::new(Arc::new(PgEntityStore::new(db.pool().clone())));

    let error = repo
        .insert(RegionBuilder::new().with_user_id(UserFixtures::unknown().id.as_str()).build())
        .await
        .unwrap_err();
    assert!(matches!(error, AccessError::UnknownReference { relation: "user", .. }));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_update_missing_row_is_not_found() {
    let db = create_isolated_test_database().await.expect("database");
    let repo = EntityRepository::<Region>::new(Arc::new(PgEntityStore::new(db.pool().clone())));

    let error = repo
        .update(RegionBuilder::new().with_id(999).build())
        .await
        .unwrap_err();
    assert!(error.is_not_found());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_paging_orders_and_counts() {
    let db = create_isolated_test_database().await.expect("database");
    let store = PgEntityStore::<Region>::new(db.pool().clone());
    for name in ["c", "a", "b"] {
        store
            .insert(&RegionBuilder::new().with_name(name).build())
            .await
            .unwrap();
    }
    store.insert(&RegionBuilder::new().without_name().build()).await.unwrap();

    let parser = PageRequestParser::default();
    let pager = EntityRepository::new(Arc::new(store)).pager();

    let first = parser
        .parse(&REGION_DESCRIPTOR, Some("0"), Some("2"), &["regionName,asc"])
        .unwrap();
    let page = pager.query(&first, true).await.unwrap();
    let names: Vec<_> = page.content().iter().map(|r| r.region_name.clone()).collect();
    assert_eq!(names, vec![Some("a".to_string()), Some("b".to_string())]);
    assert_eq!(page.total_elements(), 4);
    assert_eq!(page.total_pages(), 2);

    let second = parser
        .parse(&REGION_DESCRIPTOR, Some("1"), Some("2"), &["regionName,asc"])
        .unwrap();
    let page = pager.query(&second, true).await.unwrap();
    let names: Vec<_> = page.content().iter().map(|r| r.region_name.clone()).collect();
    assert_eq!(names, vec![Some("c".to_string()), None]);

    let past_end = parser
        .parse(&REGION_DESCRIPTOR, Some("9"), Some("2"), &["regionName,asc"])
        .unwrap();
    let page = pager.query(&past_end, true).await.unwrap();
    assert!(page.content().is_empty());
    assert_eq!(page.total_elements(), 4);
}
