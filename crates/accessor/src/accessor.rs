//! 记录访问器

use std::sync::Arc;
use std::time::Instant;

use bson::{Document, doc};
use dao_common::Pagination;
use dao_errors::{AppError, AppResult};
use dao_ports::{DocumentStore, RecordId};
use tracing::{debug, warn};

use crate::metrics::record_operation;
use crate::{AccessorSettings, Envelope, ErrorEntry, Head, PageQuery, ReadRequest};

/// 目标 id 的输入
#[derive(Debug, Clone)]
pub enum IdentifierInput<'a> {
    Validated(RecordId),
    Raw(&'a str),
    Clear,
}

impl From<RecordId> for IdentifierInput<'_> {
    fn from(id: RecordId) -> Self {
        Self::Validated(id)
    }
}

impl<'a> From<&'a str> for IdentifierInput<'a> {
    fn from(raw: &'a str) -> Self {
        Self::Raw(raw)
    }
}

impl<'a> From<&'a String> for IdentifierInput<'a> {
    fn from(raw: &'a String) -> Self {
        Self::Raw(raw.as_str())
    }
}

impl<'a, T: Into<IdentifierInput<'a>>> From<Option<T>> for IdentifierInput<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Clear, Into::into)
    }
}

/// 单个集合的记录访问器
///
/// 每次操作前都会清空上一次的 `data` / `error`，
/// 存储失败被记录到 `error` 中而不是以 `Err` 返回。
pub struct RecordAccessor {
    store: Arc<dyn DocumentStore>,
    settings: AccessorSettings,
    pagination: Pagination,
    id: Option<RecordId>,
    match_filter: Document,
    extra_stage: Option<Document>,
    data: Vec<Document>,
    error: Vec<ErrorEntry>,
}

impl RecordAccessor {
    pub fn new(settings: AccessorSettings, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            pagination: Pagination::with_page_size(settings.page_size),
            settings,
            id: None,
            match_filter: Document::new(),
            extra_stage: None,
            data: Vec::new(),
            error: Vec::new(),
        }
    }

    pub fn collection(&self) -> &str {
        self.settings.collection.as_str()
    }

    pub fn page(&self) -> u32 {
        self.pagination.page()
    }

    pub fn page_size(&self) -> u32 {
        self.pagination.page_size()
    }

    pub fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    pub fn sort(&self) -> &Document {
        &self.settings.sort
    }

    pub fn match_filter(&self) -> &Document {
        &self.match_filter
    }

    pub fn data(&self) -> &[Document] {
        &self.data
    }

    pub fn errors(&self) -> &[ErrorEntry] {
        &self.error
    }

    /// 设置页码，非正数被忽略
    pub fn set_page(&mut self, page: u32) -> bool {
        self.pagination.set_page(page)
    }

    /// 设置每页条数，非正数被忽略
    pub fn set_page_size(&mut self, page_size: u32) -> bool {
        self.pagination.set_page_size(page_size)
    }

    /// 从原始字符串设置页码，非法输入被忽略
    pub fn set_page_raw(&mut self, raw: &str) -> bool {
        self.pagination.set_page_raw(raw)
    }

    /// 从原始字符串设置每页条数，非法输入被忽略
    pub fn set_page_size_raw(&mut self, raw: &str) -> bool {
        self.pagination.set_page_size_raw(raw)
    }

    /// 设置目标记录
    ///
    /// 空字符串和 `None` 清除目标；短于 24 个字符的字符串返回 `InvalidIdentifier`，
    /// 此时原有目标保持不变。
    pub fn set_id<'a>(&mut self, input: impl Into<IdentifierInput<'a>>) -> AppResult<()> {
        self.id = match input.into() {
            IdentifierInput::Validated(id) => Some(id),
            IdentifierInput::Raw("") | IdentifierInput::Clear => None,
            IdentifierInput::Raw(raw) => Some(RecordId::parse(raw)?),
        };
        Ok(())
    }

    pub fn clear_id(&mut self) {
        self.id = None;
    }

    /// 设置过滤条件，空文档匹配全部
    pub fn set_match(&mut self, filter: Document) {
        self.match_filter = filter;
    }

    /// 设置追加在 `$limit` 之后的聚合阶段
    pub fn set_extra_stage(&mut self, stage: Option<Document>) {
        self.extra_stage = stage;
    }

    pub fn set_sort(&mut self, sort: Document) {
        self.settings.sort = sort;
    }

    /// 当前状态对应的读取请求
    pub fn read_request(&self) -> ReadRequest {
        match self.id {
            Some(id) => ReadRequest::Lookup(id),
            None => ReadRequest::Query(PageQuery {
                filter: self.match_filter.clone(),
                pagination: self.pagination,
                sort: self.settings.sort.clone(),
                extra_stage: self.extra_stage.clone(),
            }),
        }
    }

    pub fn head(&self) -> Head {
        Head {
            page: self.page(),
            page_size: self.page_size(),
            length: self.data.len(),
            dataset: self.collection().to_string(),
        }
    }

    pub fn output(&self) -> Envelope {
        Envelope {
            head: self.head(),
            data: self.data.clone(),
            error: self.error.clone(),
        }
    }

    pub fn into_output(self) -> Envelope {
        Envelope {
            head: self.head(),
            data: self.data,
            error: self.error,
        }
    }

    fn reset_output(&mut self) {
        self.data.clear();
        self.error.clear();
    }

    fn capture_failure(&mut self, operation: &str, err: AppError) {
        warn!(
            collection = self.collection(),
            operation,
            error = %err,
            "Record operation failed"
        );
        self.reset_output();
        let message = match err {
            AppError::Database(message) => message,
            other => other.to_string(),
        };
        self.error.push(ErrorEntry::message(message));
    }

    fn finish(&self, operation: &str, started: Instant) {
        let outcome = if self.error.is_empty() { "ok" } else { "error" };
        record_operation(self.collection(), operation, outcome, started.elapsed());
    }

    /// 读取记录
    ///
    /// 设置了目标 id 时按 id 查单条，否则执行分页聚合
    pub async fn find(&mut self) -> &[Document] {
        self.reset_output();
        let started = Instant::now();
        let collection = self.collection().to_string();

        let result = match self.read_request() {
            ReadRequest::Lookup(id) => {
                debug!(collection = %collection, id = %id, "Looking up record");
                self.store
                    .find_by_id(&collection, &id)
                    .await
                    .map(|found| found.into_iter().collect())
            }
            ReadRequest::Query(query) => {
                debug!(
                    collection = %collection,
                    page = query.pagination.page(),
                    page_size = query.pagination.page_size(),
                    "Querying records"
                );
                self.store.aggregate(&collection, query.pipeline()).await
            }
        };

        match result {
            Ok(records) => self.data = records,
            Err(e) => self.capture_failure("find", e),
        }

        self.finish("find", started);
        &self.data
    }

    /// 插入记录
    ///
    /// 空文档不访问存储，直接返回空结果
    pub async fn create(&mut self, record: Document) -> &[Document] {
        self.reset_output();
        if record.is_empty() {
            return &self.data;
        }

        let started = Instant::now();
        let collection = self.collection().to_string();

        match self.store.insert_one(&collection, record.clone()).await {
            Ok(inserted_id) => {
                debug!(collection = %collection, id = %inserted_id, "Record created");
                let mut created = doc! { "_id": inserted_id };
                created.extend(record);
                self.data = vec![created];
            }
            Err(e) => self.capture_failure("create", e),
        }

        self.finish("create", started);
        &self.data
    }

    /// 按目标 id 更新记录
    ///
    /// 未设置 id 返回 `MissingIdentifier`，空文档返回 `MissingData`，
    /// 两者都在访问存储之前检查。成功时 `data` 为更新前的字段合并本次字段。
    pub async fn update(&mut self, record: Document) -> AppResult<&[Document]> {
        self.reset_output();
        let id = self.id.ok_or(AppError::MissingIdentifier)?;
        if record.is_empty() {
            return Err(AppError::MissingData);
        }

        let started = Instant::now();
        let collection = self.collection().to_string();

        match self
            .store
            .find_one_and_update(&collection, &id, record.clone())
            .await
        {
            Ok(Some(mut previous)) => {
                debug!(collection = %collection, id = %id, "Record updated");
                previous.extend(record);
                self.data = vec![previous];
            }
            Ok(None) => {
                debug!(collection = %collection, id = %id, "No record to update");
                self.error.push(ErrorEntry::failed(id.to_hex()));
            }
            Err(e) => self.capture_failure("update", e),
        }

        self.finish("update", started);
        Ok(&self.data)
    }

    /// 按目标 id 删除记录
    ///
    /// 未设置 id 返回 `MissingIdentifier`；没有记录被删除时在 `error` 中记录
    /// `{fail: <hex id>}`。
    pub async fn delete(&mut self) -> AppResult<&[Document]> {
        self.reset_output();
        let id = self.id.ok_or(AppError::MissingIdentifier)?;

        let started = Instant::now();
        let collection = self.collection().to_string();

        match self.store.delete_one(&collection, &id).await {
            Ok(0) => {
                debug!(collection = %collection, id = %id, "No record to delete");
                self.error.push(ErrorEntry::failed(id.to_hex()));
            }
            Ok(_) => {
                debug!(collection = %collection, id = %id, "Record deleted");
                self.data = vec![doc! { "id": id.to_hex() }];
            }
            Err(e) => self.capture_failure("delete", e),
        }

        self.finish("delete", started);
        Ok(&self.data)
    }
}

impl std::fmt::Debug for RecordAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordAccessor")
            .field("collection", &self.settings.collection)
            .field("pagination", &self.pagination)
            .field("id", &self.id)
            .field("match_filter", &self.match_filter)
            .field("extra_stage", &self.extra_stage)
            .field("data", &self.data.len())
            .field("error", &self.error)
            .finish()
    }
}
