//! 访问器指标

use std::time::Duration;

use ::metrics::{counter, histogram};

/// 记录一次访问器操作
pub(crate) fn record_operation(collection: &str, operation: &str, outcome: &str, elapsed: Duration) {
    let labels = [
        ("collection", collection.to_string()),
        ("operation", operation.to_string()),
        ("outcome", outcome.to_string()),
    ];

    counter!("dao_operations_total", &labels).increment(1);
    histogram!("dao_operation_duration_seconds", &labels).record(elapsed.as_secs_f64());
}
