//! 读取请求

use bson::{Document, doc};
use dao_common::Pagination;
use dao_ports::RecordId;

/// 读取请求：按 id 查单条，或分页查询
#[derive(Debug, Clone, PartialEq)]
pub enum ReadRequest {
    Lookup(RecordId),
    Query(PageQuery),
}

/// 分页查询参数
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub filter: Document,
    pub pagination: Pagination,
    pub sort: Document,
    pub extra_stage: Option<Document>,
}

impl PageQuery {
    /// 聚合管道
    ///
    /// `$match` → `$skip` → `$limit` → 附加阶段 → `$sort`。
    /// 排序作用于当前页内，分页本身按集合的自然顺序进行。
    pub fn pipeline(&self) -> Vec<Document> {
        let mut pipeline = vec![
            doc! { "$match": self.filter.clone() },
            doc! { "$skip": i64::try_from(self.pagination.offset()).unwrap_or(i64::MAX) },
            doc! { "$limit": i64::from(self.pagination.page_size()) },
        ];

        if let Some(stage) = &self.extra_stage {
            pipeline.push(stage.clone());
        }

        if !self.sort.is_empty() {
            pipeline.push(doc! { "$sort": self.sort.clone() });
        }

        pipeline
    }
}
