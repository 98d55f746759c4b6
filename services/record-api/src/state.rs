//! 服务共享状态

use std::sync::Arc;

use dao_accessor::{AccessorSettings, RecordAccessor};
use dao_common::HealthCheck;
use dao_config::DaoConfig;
use dao_ports::DocumentStore;
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub dao: Arc<DaoConfig>,
    pub health: Option<Arc<dyn HealthCheck>>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, dao: DaoConfig) -> Self {
        Self {
            store,
            dao: Arc::new(dao),
            health: None,
            metrics: None,
        }
    }

    pub fn with_health_check(mut self, checker: Arc<dyn HealthCheck>) -> Self {
        self.health = Some(checker);
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// 每个请求一个访问器
    pub fn accessor(&self, collection: &str) -> RecordAccessor {
        RecordAccessor::new(
            AccessorSettings::from_config(&self.dao, collection),
            self.store.clone(),
        )
    }
}
