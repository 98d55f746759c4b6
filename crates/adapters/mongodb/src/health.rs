//! MongoDB 健康检查模块

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dao_common::{BaseHealthResult, HealthCheck};
use mongodb::Database;
use tracing::{debug, error};

use crate::check_connection;

/// 健康检查器
pub struct MongoHealthChecker {
    db: Database,
    timeout: Duration,
}

impl MongoHealthChecker {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            timeout: Duration::from_secs(5),
        }
    }

    /// 设置超时时间
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl HealthCheck for MongoHealthChecker {
    async fn check(&self) -> BaseHealthResult {
        let start = Instant::now();

        match tokio::time::timeout(self.timeout, check_connection(&self.db)).await {
            Ok(Ok(())) => {
                let latency = start.elapsed().as_millis() as u64;
                debug!(latency_ms = latency, "MongoDB health check passed");
                BaseHealthResult::healthy(latency)
            }
            Ok(Err(e)) => {
                error!(error = %e, "MongoDB health check failed");
                BaseHealthResult::unhealthy(e.to_string())
            }
            Err(_) => {
                error!("MongoDB health check timed out");
                BaseHealthResult::timeout()
            }
        }
    }

    fn component_name(&self) -> &'static str {
        "mongodb"
    }
}
