//! dao-config - 配置加载库
//!
//! 加载顺序：`{dir}/default.toml` → `{dir}/{APP_ENV}.toml` → `DAO_` 前缀环境变量
//! （层级以 `__` 分隔，例如 `DAO_MONGO__DATABASE`）。

use std::collections::HashMap;

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use secrecy::Secret;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// MongoDB 配置
#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub url: Secret<String>,
    pub database: String,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_max_pool_size() -> u32 {
    match std::env::var("APP_ENV").as_deref() {
        Ok("production") => 50,
        _ => 10,
    }
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// 排序方向
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// MongoDB `$sort` 取值
    pub fn as_i32(&self) -> i32 {
        match self {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        }
    }
}

/// 单个排序字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// 集合级覆盖配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionOverride {
    pub page_size: Option<u32>,
    pub sort: Option<Vec<SortKey>>,
}

/// 访问器默认配置
#[derive(Debug, Clone, Deserialize)]
pub struct DaoConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_sort")]
    pub sort: Vec<SortKey>,
    #[serde(default)]
    pub collections: HashMap<String, CollectionOverride>,
}

fn default_page_size() -> u32 {
    20
}

fn default_sort() -> Vec<SortKey> {
    vec![SortKey::new("_id", SortDirection::Desc)]
}

impl Default for DaoConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            sort: default_sort(),
            collections: HashMap::new(),
        }
    }
}

impl DaoConfig {
    /// 指定集合的每页条数
    pub fn page_size_for(&self, collection: &str) -> u32 {
        self.collections
            .get(collection)
            .and_then(|o| o.page_size)
            .filter(|size| *size > 0)
            .unwrap_or(self.page_size)
    }

    /// 指定集合的排序
    pub fn sort_for(&self, collection: &str) -> &[SortKey] {
        self.collections
            .get(collection)
            .and_then(|o| o.sort.as_deref())
            .unwrap_or(&self.sort)
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    pub mongo: MongoConfig,
    #[serde(default)]
    pub dao: DaoConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_app_env() -> String {
    "development".to_string()
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| default_app_env());

        let config: Self = Self::figment(config_dir, &env).extract()?;
        Ok(config)
    }

    /// 构建配置源
    pub fn figment(config_dir: &str, env: &str) -> Figment {
        Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("DAO_").split("__"))
    }
}
