//! Concurrent writers against a file-backed database
#![allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable

use std::sync::Arc;

use common::sqlite::SqliteClient;
use errors::TraceError;
use tempfile::TempDir;

use tracesrv::store::{SqliteStore, UserRepository, VegetableRepository};
use tracesrv::{NewVegetable, VegetableEdit};

async fn file_store() -> (TempDir, SqliteClient, Arc<SqliteStore>) {
    let dir = tempfile::tempdir().unwrap();
    let client = SqliteClient::new(dir.path().join("trace.db")).await.unwrap();
    let store = SqliteStore::new(client.pool().clone());
    store.init_schema().await.unwrap();
    (dir, client, Arc::new(store))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_increments_are_not_lost() {
    const WRITERS: i64 = 100;
    let (_dir, client, store) = file_store().await;

    let created = store
        .create(&NewVegetable {
            name: "Carrot".to_string(),
            quantity: 0,
        })
        .await
        .unwrap();

    let tasks: Vec<_> = (0..WRITERS)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .edit(created.id, &VegetableEdit::IncQuantity { by: 1 })
                    .await
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let vegetable = store.get(created.id).await.unwrap();
    assert_eq!(vegetable.quantity, WRITERS);
    client.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_admits_one_user() {
    const CONTENDERS: usize = 20;
    let (_dir, client, store) = file_store().await;

    let tasks: Vec<_> = (0..CONTENDERS)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .create_user("alice", &format!("credential-{}", i), "user")
                    .await
            })
        })
        .collect();

    let mut created = 0;
    let mut duplicates = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(user) => {
                assert_eq!(user.username, "alice");
                created += 1;
            },
            Err(TraceError::DuplicateUser(_)) => duplicates += 1,
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(duplicates, CONTENDERS - 1);
    assert!(store.find_by_username("alice").await.unwrap().is_some());
    client.close().await;
}
