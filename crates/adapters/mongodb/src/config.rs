//! MongoDB 配置模块

use std::time::Duration;

/// MongoDB 连接配置
#[derive(Debug, Clone)]
pub struct MongoConnectionConfig {
    /// 连接 URI
    pub url: String,
    /// 数据库名
    pub database: String,
    /// 应用名称（用于连接标识）
    pub app_name: Option<String>,
    /// 最小连接数
    pub min_pool_size: u32,
    /// 最大连接数
    pub max_pool_size: u32,
    /// 连接超时
    pub connect_timeout: Duration,
    /// 服务器选择超时
    pub server_selection_timeout: Duration,
}

impl Default for MongoConnectionConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            database: "test".to_string(),
            app_name: None,
            min_pool_size: 0,
            max_pool_size: 10,
            connect_timeout: Duration::from_secs(10),
            server_selection_timeout: Duration::from_secs(30),
        }
    }
}

impl MongoConnectionConfig {
    pub fn new(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            ..Default::default()
        }
    }

    /// 设置连接池大小
    pub fn with_pool(mut self, min: u32, max: u32) -> Self {
        self.min_pool_size = min;
        self.max_pool_size = max.max(min).max(1);
        self
    }

    /// 设置连接超时
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// 设置服务器选择超时
    pub fn with_server_selection_timeout(mut self, timeout: Duration) -> Self {
        self.server_selection_timeout = timeout;
        self
    }

    /// 设置应用名称
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MongoConnectionConfig::default();
        assert_eq!(config.max_pool_size, 10);
        assert_eq!(config.min_pool_size, 0);
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.app_name.is_none());
    }

    #[test]
    fn test_builder() {
        let config = MongoConnectionConfig::new("mongodb://db.example.com:27017", "dao")
            .with_pool(2, 20)
            .with_connect_timeout(Duration::from_secs(3))
            .with_app_name("record-api");

        assert_eq!(config.url, "mongodb://db.example.com:27017");
        assert_eq!(config.database, "dao");
        assert_eq!(config.min_pool_size, 2);
        assert_eq!(config.max_pool_size, 20);
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.app_name.as_deref(), Some("record-api"));
    }

    #[test]
    fn test_pool_max_never_below_min() {
        let config = MongoConnectionConfig::default().with_pool(5, 2);
        assert_eq!(config.max_pool_size, 5);
    }
}
