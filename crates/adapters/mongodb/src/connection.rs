//! MongoDB 连接管理

use dao_errors::{AppError, AppResult};
use mongodb::{Client, Database, bson::doc, options::ClientOptions};
use tracing::info;

use crate::MongoConnectionConfig;

/// 创建 MongoDB 客户端
///
/// 驱动内部维护连接池，返回的 `Client` 可随意克隆共享
pub async fn create_client(config: &MongoConnectionConfig) -> AppResult<Client> {
    let mut options = ClientOptions::parse(&config.url)
        .await
        .map_err(|e| AppError::database(format!("Invalid MongoDB url: {}", e)))?;

    options.app_name = config.app_name.clone();
    options.min_pool_size = Some(config.min_pool_size);
    options.max_pool_size = Some(config.max_pool_size);
    options.connect_timeout = Some(config.connect_timeout);
    options.server_selection_timeout = Some(config.server_selection_timeout);

    let client = Client::with_options(options)
        .map_err(|e| AppError::database(format!("Failed to create client: {}", e)))?;

    info!(
        database = %config.database,
        max_pool_size = config.max_pool_size,
        "MongoDB client created"
    );

    Ok(client)
}

/// 创建客户端并返回配置的数据库句柄
pub async fn connect_database(config: &MongoConnectionConfig) -> AppResult<Database> {
    let client = create_client(config).await?;
    Ok(client.database(&config.database))
}

/// 检查数据库连接
pub async fn check_connection(db: &Database) -> AppResult<()> {
    db.run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| AppError::database(format!("MongoDB ping failed: {}", e)))?;
    Ok(())
}
