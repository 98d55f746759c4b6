//! 通用类型定义

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

use crate::utils::parse_positive;

/// 默认每页条数
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// 集合名称
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[display("{_0}")]
#[serde(transparent)]
pub struct CollectionName(pub String);

impl CollectionName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CollectionName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// 分页参数
///
/// 页码和每页条数始终为正整数。非法输入被忽略并保留原值，
/// setter 返回是否生效。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    page: u32,
    page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// 指定每页条数创建，非正数时回退到默认值
    pub fn with_page_size(page_size: u32) -> Self {
        let mut pagination = Self::default();
        pagination.set_page_size(page_size);
        pagination
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// 设置页码
    pub fn set_page(&mut self, page: u32) -> bool {
        if page == 0 {
            return false;
        }
        self.page = page;
        true
    }

    /// 设置每页条数
    pub fn set_page_size(&mut self, page_size: u32) -> bool {
        if page_size == 0 {
            return false;
        }
        self.page_size = page_size;
        true
    }

    /// 从原始字符串设置页码（如查询参数）
    pub fn set_page_raw(&mut self, raw: &str) -> bool {
        parse_positive(raw).is_some_and(|page| self.set_page(page))
    }

    /// 从原始字符串设置每页条数
    pub fn set_page_size_raw(&mut self, raw: &str) -> bool {
        parse_positive(raw).is_some_and(|size| self.set_page_size(size))
    }

    /// 跳过的记录数
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let pagination = Pagination::default();
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.page_size(), 20);
        assert_eq!(pagination.offset(), 0);
    }

    #[test]
    fn test_pagination_offset() {
        let mut pagination = Pagination::with_page_size(25);
        assert!(pagination.set_page(3));
        assert_eq!(pagination.offset(), 50);
    }

    #[test]
    fn test_pagination_offset_at_upper_bound() {
        let mut pagination = Pagination::default();
        assert!(pagination.set_page(u32::MAX));
        assert!(pagination.set_page_size(u32::MAX));
        assert_eq!(
            pagination.offset(),
            u64::from(u32::MAX - 1) * u64::from(u32::MAX)
        );
    }

    #[test]
    fn test_pagination_ignores_invalid_values() {
        let mut pagination = Pagination::with_page_size(5);
        assert!(!pagination.set_page(0));
        assert!(!pagination.set_page_size(0));
        assert!(!pagination.set_page_raw("abc"));
        assert!(!pagination.set_page_size_raw("-4"));
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.page_size(), 5);

        assert!(pagination.set_page_raw("7"));
        assert_eq!(pagination.page(), 7);
    }

    #[test]
    fn test_zero_page_size_falls_back_to_default() {
        assert_eq!(Pagination::with_page_size(0).page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_collection_name_display() {
        let name = CollectionName::from("facets");
        assert_eq!(name.to_string(), "facets");
        assert_eq!(name.as_str(), "facets");
    }
}
