//! Integration tests for Users domain
//!
//! These tests use real PostgreSQL via testcontainers to ensure:
//! - The migration matches the entity
//! - Paging order and counts hold on a real database
//! - The update/delete protocol behaves the same as in memory
//!
//! They need a Docker daemon: `cargo test -p domain_users -- --ignored`

use domain_users::*;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};
use uuid::Uuid;

fn service(db: &TestDatabase) -> UserService<PgUserRepository> {
    UserService::new(PgUserRepository::new(db.connection()))
}

fn input(builder: &TestDataBuilder, suffix: &str) -> CreateUser {
    CreateUser::new(
        builder.email(suffix),
        builder.name("given", suffix),
        builder.name("family", suffix),
    )
}

#[tokio::test]
#[ignore = "requires Docker for testcontainers"]
async fn test_create_and_find_one() {
    let db = TestDatabase::new().await;
    let service = service(&db);
    let builder = TestDataBuilder::from_test_name("create_and_find_one");

    let created = service.create(input(&builder, "main")).await.unwrap();
    assert_eq!(created.email, builder.email("main"));
    assert!(created.created > 0);

    let found = service.find_one(&created.id.to_string()).await.unwrap();
    let found = assert_some(found, "user should exist");

    assert_uuid_eq(found.id, created.id, "fetched user id");
    assert_eq!(found, created);
}

#[tokio::test]
#[ignore = "requires Docker for testcontainers"]
async fn test_find_page_orders_by_creation() {
    let db = TestDatabase::new().await;
    let service = service(&db);
    let builder = TestDataBuilder::from_test_name("find_page_order");

    let mut ids = Vec::new();
    for i in 0..3 {
        ids.push(
            service
                .create(input(&builder, &format!("u{i}")))
                .await
                .unwrap()
                .id,
        );
    }

    let page = service.find_page(0, 10).await.unwrap();
    assert_eq!(page.total_count, 3);
    assert_eq!((page.from, page.size), (0, 10));
    assert_eq!(page.result.iter().map(|u| u.id).collect::<Vec<_>>(), ids);

    let page = service.find_page(2, 10).await.unwrap();
    assert_eq!(page.total_count, 3);
    assert_eq!(page.result.len(), 1);
    assert_uuid_eq(page.result[0].id, ids[2], "last user");
}

#[tokio::test]
#[ignore = "requires Docker for testcontainers"]
async fn test_update_patches_single_column() {
    let db = TestDatabase::new().await;
    let service = service(&db);
    let builder = TestDataBuilder::from_test_name("update_single_column");

    let created = service.create(input(&builder, "main")).await.unwrap();
    let patch = UpdateUser {
        family_name: Some("X".to_string()),
        ..Default::default()
    };

    let outcome = service.update(&created.id.to_string(), patch).await.unwrap();
    let UpdateOutcome::Updated(updated) = outcome else {
        panic!("expected Updated, got {:?}", outcome);
    };

    assert_eq!(updated.family_name, "X");
    assert_eq!(updated.given_name, created.given_name);
    assert_eq!(updated.email, created.email);
    assert_eq!(updated.created, created.created);
}

#[tokio::test]
#[ignore = "requires Docker for testcontainers"]
async fn test_update_missing_is_not_found() {
    let db = TestDatabase::new().await;
    let service = service(&db);

    let patch = UpdateUser {
        email: Some("x@example.com".to_string()),
        ..Default::default()
    };

    let outcome = service
        .update(&Uuid::now_v7().to_string(), patch)
        .await
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::NotFound);
}

#[tokio::test]
#[ignore = "requires Docker for testcontainers"]
async fn test_remove_then_find_one_is_none() {
    let db = TestDatabase::new().await;
    let service = service(&db);
    let builder = TestDataBuilder::from_test_name("remove_then_find");

    let created = service.create(input(&builder, "main")).await.unwrap();
    let id = created.id.to_string();

    assert!(service.remove(&id).await.unwrap());
    assert_none(service.find_one(&id).await.unwrap(), "removed user");
    assert!(!service.remove(&id).await.unwrap());
}
