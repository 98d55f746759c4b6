//! 访问器配置

use bson::{Document, doc};
use dao_common::{CollectionName, DEFAULT_PAGE_SIZE};
use dao_config::{DaoConfig, SortKey};

/// 访问器构造参数
///
/// 默认值在这里显式给出，访问器内部不再做任何回退
#[derive(Debug, Clone, PartialEq)]
pub struct AccessorSettings {
    pub collection: CollectionName,
    pub page_size: u32,
    pub sort: Document,
}

impl AccessorSettings {
    /// 默认每页 20 条，按 `_id` 倒序
    pub fn new(collection: impl Into<CollectionName>) -> Self {
        Self {
            collection: collection.into(),
            page_size: DEFAULT_PAGE_SIZE,
            sort: default_sort(),
        }
    }

    /// 按配置文件生成指定集合的参数
    pub fn from_config(config: &DaoConfig, collection: &str) -> Self {
        Self {
            collection: CollectionName::from(collection),
            page_size: config.page_size_for(collection),
            sort: sort_document(config.sort_for(collection)),
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_sort(mut self, sort: Document) -> Self {
        self.sort = sort;
        self
    }
}

/// `{_id: -1}`
pub fn default_sort() -> Document {
    doc! { "_id": -1 }
}

/// 排序字段列表转换为 `$sort` 文档，保持字段顺序
pub fn sort_document(keys: &[SortKey]) -> Document {
    if keys.is_empty() {
        return default_sort();
    }

    keys.iter()
        .map(|key| (key.field.clone(), bson::Bson::Int32(key.direction.as_i32())))
        .collect()
}
