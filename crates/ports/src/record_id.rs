//! 记录标识符

use std::str::FromStr;

use bson::{Document, doc, oid::ObjectId};
use dao_errors::{AppError, AppResult};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// 原始标识符字符串的最小长度
pub const MIN_ID_LENGTH: usize = 24;

/// 已校验的记录标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[display("{_0}")]
#[serde(transparent)]
pub struct RecordId(ObjectId);

impl RecordId {
    /// 生成新的标识符
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// 校验并转换原始字符串
    ///
    /// 短于 [`MIN_ID_LENGTH`] 返回 `InvalidIdentifier`，
    /// 长度足够但不是合法 ObjectId 返回 `MalformedIdentifier`。
    pub fn parse(raw: &str) -> AppResult<Self> {
        let actual = raw.chars().count();
        if actual < MIN_ID_LENGTH {
            return Err(AppError::invalid_identifier(MIN_ID_LENGTH, actual));
        }

        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|e| AppError::malformed_identifier(format!("{}: {}", raw, e)))
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// `{_id: <id>}` 过滤条件
    pub fn filter(&self) -> Document {
        doc! { "_id": self.0 }
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for RecordId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "65a1f0c2e4b0a1b2c3d4e5f6";

    #[test]
    fn test_parse_valid_id() {
        let id = RecordId::parse(VALID).unwrap();
        assert_eq!(id.to_hex(), VALID);
        assert_eq!(id.to_string(), VALID);
        assert_eq!(id.filter(), doc! { "_id": id.object_id() });
    }

    #[test]
    fn test_parse_rejects_short_id() {
        let err = RecordId::parse(&VALID[..23]).unwrap_err();
        match err {
            AppError::InvalidIdentifier { required, actual } => {
                assert_eq!(required, 24);
                assert_eq!(actual, 23);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        let err = RecordId::parse("zzzzzzzzzzzzzzzzzzzzzzzz").unwrap_err();
        assert!(matches!(err, AppError::MalformedIdentifier(_)));
    }

    #[test]
    fn test_generated_id_round_trips_through_hex() {
        let id = RecordId::new();
        assert_eq!(id.to_hex().len(), 24);
        assert_eq!(id.to_hex().parse::<RecordId>().unwrap(), id);
    }

    #[test]
    fn test_serializes_as_object_id() {
        let id = RecordId::parse(VALID).unwrap();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json["$oid"], VALID);
    }
}
