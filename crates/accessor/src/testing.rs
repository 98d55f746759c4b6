//! 内存版 DocumentStore
//!
//! 解释 `$match`（字段相等或 `$in`）、`$skip`、`$limit`、`$sort` 四种阶段，
//! 集合的自然顺序即插入顺序。可切换为每次调用都失败。

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bson::{Bson, Document, oid::ObjectId};
use dao_errors::{AppError, AppResult};
use dao_ports::{DocumentStore, RecordId};

#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    failure: Mutex<Option<String>>,
    calls: AtomicUsize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 之后的每次调用都返回该错误
    pub fn fail_with(&self, message: impl Into<String>) {
        *lock(&self.failure) = Some(message.into());
    }

    pub fn recover(&self) {
        *lock(&self.failure) = None;
    }

    /// 存储被调用的次数
    pub fn call_count(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    /// 集合当前内容
    pub fn records(&self, collection: &str) -> Vec<Document> {
        lock(&self.collections)
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    fn enter(&self) -> AppResult<()> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        match lock(&self.failure).as_ref() {
            Some(message) => Err(AppError::database(message.clone())),
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn has_id(record: &Document, id: &RecordId) -> bool {
    matches!(record.get("_id"), Some(Bson::ObjectId(oid)) if *oid == id.object_id())
}

/// 字段取值是否满足条件，支持相等和 `{$in: [...]}`
fn matches_condition(value: Option<&Bson>, expected: &Bson) -> bool {
    if let Bson::Document(condition) = expected {
        if let Ok(candidates) = condition.get_array("$in") {
            return value.is_some_and(|v| candidates.contains(v));
        }
    }
    value == Some(expected)
}

fn as_count(value: &Bson) -> AppResult<usize> {
    let count = match value {
        Bson::Int32(n) => i64::from(*n),
        Bson::Int64(n) => *n,
        Bson::Double(n) if n.fract() == 0.0 => *n as i64,
        other => {
            return Err(AppError::database(format!(
                "expected a number, got {}",
                other
            )));
        }
    };
    usize::try_from(count).map_err(|_| {
        AppError::database(format!("expected a non-negative number, got {}", count))
    })
}

fn compare_bson(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    fn number(value: &Bson) -> Option<f64> {
        match value {
            Bson::Int32(n) => Some(f64::from(*n)),
            Bson::Int64(n) => Some(*n as f64),
            Bson::Double(n) => Some(*n),
            _ => None,
        }
    }

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a, b) {
            (Bson::String(a), Bson::String(b)) => a.cmp(b),
            (Bson::ObjectId(a), Bson::ObjectId(b)) => a.bytes().cmp(&b.bytes()),
            (Bson::DateTime(a), Bson::DateTime(b)) => a.cmp(b),
            (Bson::Boolean(a), Bson::Boolean(b)) => a.cmp(b),
            _ => match (number(a), number(b)) {
                (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            },
        },
    }
}

fn apply_stage(records: Vec<Document>, stage: &Document) -> AppResult<Vec<Document>> {
    let Some((name, value)) = stage.iter().next() else {
        return Err(AppError::database(
            "A pipeline stage specification object must contain exactly one field.",
        ));
    };

    match name.as_str() {
        "$match" => {
            let Bson::Document(filter) = value else {
                return Err(AppError::database(
                    "the match filter must be an expression in an object",
                ));
            };
            Ok(records
                .into_iter()
                .filter(|record| {
                    filter
                        .iter()
                        .all(|(field, expected)| matches_condition(record.get(field), expected))
                })
                .collect())
        }
        "$skip" => {
            let skip = as_count(value)?;
            Ok(records.into_iter().skip(skip).collect())
        }
        "$limit" => {
            let limit = as_count(value)?;
            if limit == 0 {
                return Err(AppError::database("the limit must be positive"));
            }
            Ok(records.into_iter().take(limit).collect())
        }
        "$sort" => {
            let Bson::Document(spec) = value else {
                return Err(AppError::database(
                    "the $sort key specification must be an object",
                ));
            };
            let mut records = records;
            records.sort_by(|a, b| {
                spec.iter()
                    .map(|(field, direction)| {
                        let ordering = compare_bson(a.get(field), b.get(field));
                        let descending = match direction {
                            Bson::Int32(n) => *n < 0,
                            Bson::Int64(n) => *n < 0,
                            Bson::Double(n) => *n < 0.0,
                            _ => false,
                        };
                        if descending { ordering.reverse() } else { ordering }
                    })
                    .find(|ordering| *ordering != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
            Ok(records)
        }
        other => Err(AppError::database(format!(
            "Unrecognized pipeline stage name: '{}'",
            other
        ))),
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find_by_id(&self, collection: &str, id: &RecordId) -> AppResult<Option<Document>> {
        self.enter()?;
        Ok(lock(&self.collections)
            .get(collection)
            .and_then(|records| records.iter().find(|r| has_id(r, id)).cloned()))
    }

    async fn aggregate(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> AppResult<Vec<Document>> {
        self.enter()?;
        let mut records = self.records(collection);
        for stage in &pipeline {
            records = apply_stage(records, stage)?;
        }
        Ok(records)
    }

    async fn insert_one(&self, collection: &str, record: Document) -> AppResult<Bson> {
        self.enter()?;
        let mut collections = lock(&self.collections);
        let records = collections.entry(collection.to_string()).or_default();

        let id = record
            .get("_id")
            .cloned()
            .unwrap_or_else(|| Bson::ObjectId(ObjectId::new()));
        if records.iter().any(|r| r.get("_id") == Some(&id)) {
            return Err(AppError::database(format!(
                "E11000 duplicate key error collection: {} dup key: {{ _id: {} }}",
                collection, id
            )));
        }

        let mut stored = Document::new();
        stored.insert("_id", id.clone());
        stored.extend(record);
        records.push(stored);
        Ok(id)
    }

    async fn find_one_and_update(
        &self,
        collection: &str,
        id: &RecordId,
        changes: Document,
    ) -> AppResult<Option<Document>> {
        self.enter()?;
        let mut collections = lock(&self.collections);
        let Some(record) = collections
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|r| has_id(r, id)))
        else {
            return Ok(None);
        };

        let previous = record.clone();
        record.extend(changes);
        Ok(Some(previous))
    }

    async fn delete_one(&self, collection: &str, id: &RecordId) -> AppResult<u64> {
        self.enter()?;
        let mut collections = lock(&self.collections);
        let Some(records) = collections.get_mut(collection) else {
            return Ok(0);
        };

        match records.iter().position(|r| has_id(r, id)) {
            Some(index) => {
                records.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
