//! Record API 服务入口

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dao_adapter_mongodb::{
    MongoConnectionConfig, MongoDocumentStore, MongoHealthChecker, connect_database,
};
use dao_config::AppConfig;
use dao_errors::AppError;
use dao_telemetry::{init_metrics, init_tracing_with};
use record_api::{AppState, api_routes};
use secrecy::ExposeSecret;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // 加载配置
    let config = AppConfig::load("config").map_err(|e| AppError::config(e.to_string()))?;

    // 初始化 tracing 和 metrics
    init_tracing_with(&config.telemetry.log_level, config.telemetry.json);
    let metrics = init_metrics()
        .map_err(|e| AppError::internal(format!("Failed to install metrics recorder: {}", e)))?;

    // 连接数据库
    let app_name = config
        .mongo
        .app_name
        .clone()
        .unwrap_or_else(|| config.app_name.clone());
    let mongo = MongoConnectionConfig::new(
        config.mongo.url.expose_secret().as_str(),
        config.mongo.database.as_str(),
    )
    .with_pool(0, config.mongo.max_pool_size)
    .with_connect_timeout(Duration::from_secs(config.mongo.connect_timeout_secs))
    .with_app_name(app_name);

    info!(database = %config.mongo.database, env = %config.app_env, "Connecting to MongoDB");
    let db = connect_database(&mongo).await?;

    let state = AppState::new(
        Arc::new(MongoDocumentStore::new(db.clone())),
        config.dao.clone(),
    )
    .with_health_check(Arc::new(MongoHealthChecker::new(db)))
    .with_metrics(metrics);

    let app = api_routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // 启动服务器
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| AppError::config(format!("Invalid server address: {}", e)))?;
    info!(%addr, "Starting record API");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    info!("Record API stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            // 无法监听信号时持续运行
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
