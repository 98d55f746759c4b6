//! DocumentStore trait 定义

use async_trait::async_trait;
use bson::{Bson, Document};
use dao_errors::AppResult;

use crate::RecordId;

/// 文档存储
///
/// 每个方法对应一次存储往返。连接的生命周期由调用方持有，
/// 实现不得在这里打开或关闭连接。
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 按 `_id` 查找单条记录
    async fn find_by_id(&self, collection: &str, id: &RecordId) -> AppResult<Option<Document>>;

    /// 执行聚合管道并收集全部结果
    async fn aggregate(&self, collection: &str, pipeline: Vec<Document>)
    -> AppResult<Vec<Document>>;

    /// 插入单条记录，返回分配的 `_id`
    async fn insert_one(&self, collection: &str, record: Document) -> AppResult<Bson>;

    /// 以 `$set` 更新单条记录，返回更新前的文档
    async fn find_one_and_update(
        &self,
        collection: &str,
        id: &RecordId,
        changes: Document,
    ) -> AppResult<Option<Document>>;

    /// 按 `_id` 删除单条记录，返回删除数量
    async fn delete_one(&self, collection: &str, id: &RecordId) -> AppResult<u64>;
}
