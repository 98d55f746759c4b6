//! 需要运行中的 MongoDB：
//! `MONGODB_URI=mongodb://localhost:27017 cargo test -p dao-adapter-mongodb -- --ignored`

use dao_adapter_mongodb::{MongoConnectionConfig, MongoDocumentStore, check_connection, connect_database};
use dao_errors::AppError;
use dao_ports::{DocumentStore, RecordId};
use mongodb::bson::{Bson, doc};
use std::env;

async fn test_store(collection: &str) -> MongoDocumentStore {
    let url = env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let config = MongoConnectionConfig::new(url, "dao_adapter_test");
    let db = connect_database(&config)
        .await
        .expect("Failed to connect to MongoDB");
    check_connection(&db).await.expect("MongoDB ping failed");

    db.collection::<mongodb::bson::Document>(collection)
        .drop()
        .await
        .expect("Failed to drop collection");

    MongoDocumentStore::new(db)
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_insert_find_update_delete() {
    let store = test_store("store_crud").await;

    let inserted = store
        .insert_one("store_crud", doc! { "color": "green", "size": 3 })
        .await
        .expect("insert failed");
    let Bson::ObjectId(oid) = inserted else {
        panic!("expected ObjectId, got {inserted:?}");
    };
    let id = RecordId::from(oid);

    let found = store.find_by_id("store_crud", &id).await.unwrap().unwrap();
    assert_eq!(found.get_str("color").unwrap(), "green");

    let previous = store
        .find_one_and_update("store_crud", &id, doc! { "color": "dark green" })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(previous.get_str("color").unwrap(), "green");

    let updated = store.find_by_id("store_crud", &id).await.unwrap().unwrap();
    assert_eq!(updated.get_str("color").unwrap(), "dark green");
    assert_eq!(updated.get_i32("size").unwrap(), 3);

    assert_eq!(store.delete_one("store_crud", &id).await.unwrap(), 1);
    assert_eq!(store.delete_one("store_crud", &id).await.unwrap(), 0);
    assert!(store.find_by_id("store_crud", &id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_aggregate_pages_in_natural_order() {
    let store = test_store("store_pages").await;
    for color in ["red", "green", "blue"] {
        store
            .insert_one("store_pages", doc! { "color": color })
            .await
            .unwrap();
    }

    let page = store
        .aggregate(
            "store_pages",
            vec![
                doc! { "$match": {} },
                doc! { "$skip": 1_i64 },
                doc! { "$limit": 1_i64 },
                doc! { "$sort": { "_id": -1 } },
            ],
        )
        .await
        .unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(page[0].get_str("color").unwrap(), "green");
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_invalid_stage_reports_database_error() {
    let store = test_store("store_errors").await;
    let err = store
        .aggregate("store_errors", vec![doc! { "$notAStage": 1 }])
        .await
        .unwrap_err();
    assert!(matches!(&err, AppError::Database(message) if message.contains("$notAStage")));
}
