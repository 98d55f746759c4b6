//! MongoDB DocumentStore 实现

use async_trait::async_trait;
use dao_errors::{AppError, AppResult};
use dao_ports::{DocumentStore, RecordId};
use futures::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{Bson, Document, doc},
};
use tracing::debug;

/// MongoDB 文档存储
///
/// 只持有数据库句柄，连接池归 `Client` 所有
#[derive(Clone)]
pub struct MongoDocumentStore {
    db: Database,
}

impl MongoDocumentStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database_name(&self) -> &str {
        self.db.name()
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }
}

/// 错误信息保留驱动原文，操作名只进日志
fn store_error(operation: &str, e: mongodb::error::Error) -> AppError {
    debug!(operation, error = %e, "MongoDB operation failed");
    AppError::database(e.to_string())
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn find_by_id(&self, collection: &str, id: &RecordId) -> AppResult<Option<Document>> {
        self.collection(collection)
            .find_one(id.filter())
            .await
            .map_err(|e| store_error("findOne", e))
    }

    async fn aggregate(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> AppResult<Vec<Document>> {
        debug!(collection, stages = pipeline.len(), "Running aggregation");

        let cursor = self
            .collection(collection)
            .aggregate(pipeline)
            .await
            .map_err(|e| store_error("aggregate", e))?;

        cursor
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| store_error("aggregate", e))
    }

    async fn insert_one(&self, collection: &str, record: Document) -> AppResult<Bson> {
        let result = self
            .collection(collection)
            .insert_one(record)
            .await
            .map_err(|e| store_error("insertOne", e))?;

        Ok(result.inserted_id)
    }

    async fn find_one_and_update(
        &self,
        collection: &str,
        id: &RecordId,
        changes: Document,
    ) -> AppResult<Option<Document>> {
        // 默认返回更新前的文档
        self.collection(collection)
            .find_one_and_update(id.filter(), doc! { "$set": changes })
            .await
            .map_err(|e| store_error("findOneAndUpdate", e))
    }

    async fn delete_one(&self, collection: &str, id: &RecordId) -> AppResult<u64> {
        let result = self
            .collection(collection)
            .delete_one(id.filter())
            .await
            .map_err(|e| store_error("deleteOne", e))?;

        Ok(result.deleted_count)
    }
}
