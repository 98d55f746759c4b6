//! 输出信封 `{head, data, error}`

use bson::Document;
use serde::{Deserialize, Serialize};

/// 信封头
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Head {
    pub page: u32,
    pub page_size: u32,
    pub length: usize,
    pub dataset: String,
}

/// 错误条目
///
/// 存储报告的失败记为消息字符串；按 id 写入但未命中任何记录记为 `{fail: <hex id>}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorEntry {
    Failed { fail: String },
    Message(String),
}

impl ErrorEntry {
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }

    pub fn failed(id: impl Into<String>) -> Self {
        Self::Failed { fail: id.into() }
    }
}

/// 操作输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub head: Head,
    pub data: Vec<Document>,
    pub error: Vec<ErrorEntry>,
}

impl Envelope {
    pub fn is_ok(&self) -> bool {
        self.error.is_empty()
    }

    /// 是否有未命中记录的写入
    pub fn has_failed_target(&self) -> bool {
        self.error
            .iter()
            .any(|entry| matches!(entry, ErrorEntry::Failed { .. }))
    }

    /// 对每条记录做转换，`head.length` 保持不变
    pub fn map_data(mut self, f: impl FnMut(Document) -> Document) -> Self {
        self.data = self.data.into_iter().map(f).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_serialized_shape() {
        let envelope = Envelope {
            head: Head {
                page: 2,
                page_size: 1,
                length: 1,
                dataset: "facets".to_string(),
            },
            data: vec![doc! { "color": "green" }],
            error: vec![],
        };

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "head": { "page": 2, "pageSize": 1, "length": 1, "dataset": "facets" },
                "data": [{ "color": "green" }],
                "error": []
            })
        );
    }

    #[test]
    fn test_error_entries_serialize_untagged() {
        let entries = vec![
            ErrorEntry::message("connection refused"),
            ErrorEntry::failed("65a1f0c2e4b0a1b2c3d4e5f6"),
        ];
        let json = serde_json::to_value(&entries).unwrap();
        assert_eq!(
            json,
            serde_json::json!(["connection refused", { "fail": "65a1f0c2e4b0a1b2c3d4e5f6" }])
        );
    }
}
