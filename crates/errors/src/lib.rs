//! dao-errors - 统一错误处理
//!
//! 基于 RFC 7807 Problem Details 规范

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用错误类型
///
/// 前置条件类错误（标识符、写入数据）在访问存储之前同步返回；
/// 存储类错误由访问器捕获并写入输出信封。
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid id, must be at least {required} characters long, current length {actual}")]
    InvalidIdentifier { required: usize, actual: usize },

    #[error("Malformed id: {0}")]
    MalformedIdentifier(String),

    #[error("id is required")]
    MissingIdentifier,

    #[error("missing data")]
    MissingData,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_identifier(required: usize, actual: usize) -> Self {
        Self::InvalidIdentifier { required, actual }
    }

    pub fn malformed_identifier(msg: impl Into<String>) -> Self {
        Self::MalformedIdentifier(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// 是否为调用方的前置条件错误
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentifier { .. }
                | Self::MalformedIdentifier(_)
                | Self::MissingIdentifier
                | Self::MissingData
        )
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::InvalidIdentifier { .. } => 400,
            Self::MalformedIdentifier(_) => 400,
            Self::MissingIdentifier => 400,
            Self::MissingData => 400,
            Self::Database(_) => 502,
            Self::Config(_) => 500,
            Self::Internal(_) => 500,
        }
    }

    /// 转换为 Problem Details
    pub fn to_problem_details(&self) -> ProblemDetails {
        ProblemDetails {
            r#type: format!("about:blank#{}", self.problem_slug()),
            title: self.problem_title().to_string(),
            status: self.status_code(),
            detail: self.to_string(),
            instance: None,
        }
    }

    fn problem_slug(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not-found",
            Self::Validation(_) => "validation",
            Self::InvalidIdentifier { .. } => "invalid-identifier",
            Self::MalformedIdentifier(_) => "malformed-identifier",
            Self::MissingIdentifier => "missing-identifier",
            Self::MissingData => "missing-data",
            Self::Database(_) => "database",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }

    fn problem_title(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Resource Not Found",
            Self::Validation(_) => "Validation Error",
            Self::InvalidIdentifier { .. } => "Invalid Identifier",
            Self::MalformedIdentifier(_) => "Malformed Identifier",
            Self::MissingIdentifier => "Missing Identifier",
            Self::MissingData => "Missing Data",
            Self::Database(_) => "Database Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Server Error",
        }
    }
}

/// RFC 7807 Problem Details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;
