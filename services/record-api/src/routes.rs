//! API 路由

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
};
use bson::{Bson, Document, doc};
use dao_accessor::{RecordAccessor, clean_record_id};
use dao_common::AggregatedHealthResult;
use dao_errors::AppError;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// 分页参数名
const PAGE_PARAM: &str = "page";
const PAGE_SIZE_PARAM: &str = "pageSize";

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/records/{collection}",
            get(list_records).post(create_record),
        )
        .route(
            "/records/{collection}/{id}",
            get(get_record).put(update_record).delete(delete_record),
        )
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(render_metrics))
        .fallback(route_not_found)
        .with_state(state)
}

/// 信封转换为响应
///
/// 有未命中的写入返回 404，有存储错误返回 502
fn envelope_response(accessor: RecordAccessor, success: StatusCode) -> Response {
    let envelope = accessor.into_output().map_data(clean_record_id);
    let status = if envelope.has_failed_target() {
        StatusCode::NOT_FOUND
    } else if !envelope.is_ok() {
        StatusCode::BAD_GATEWAY
    } else {
        success
    };

    (status, Json(envelope)).into_response()
}

fn record_from_json(body: Value) -> ApiResult<Document> {
    let Value::Object(fields) = body else {
        return Err(AppError::validation("request body must be a JSON object").into());
    };

    bson::to_document(&fields)
        .map_err(|e| AppError::validation(format!("invalid record: {}", e)).into())
}

/// 查询参数转换为过滤值
///
/// 查询串里没有类型信息。形如整数、浮点数或布尔值的参数同时按原字符串和
/// 对应类型匹配，例如 `?n=1` 生成 `{n: {$in: ["1", 1]}}`。
fn match_value(raw: String) -> Bson {
    let typed = if let Ok(n) = raw.parse::<i64>() {
        Some(Bson::Int64(n))
    } else if let Ok(n) = raw.parse::<f64>() {
        n.is_finite().then_some(Bson::Double(n))
    } else {
        match raw.as_str() {
            "true" => Some(Bson::Boolean(true)),
            "false" => Some(Bson::Boolean(false)),
            _ => None,
        }
    };

    match typed {
        Some(typed) => Bson::Document(doc! { "$in": [Bson::String(raw), typed] }),
        None => Bson::String(raw),
    }
}

/// 查询记录
///
/// `page` / `pageSize` 之外的参数都作为相等过滤条件，取值见 [`match_value`]
async fn list_records(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Response> {
    let mut accessor = state.accessor(&collection);
    let mut filter = Document::new();

    for (name, value) in params {
        match name.as_str() {
            PAGE_PARAM => {
                accessor.set_page_raw(&value);
            }
            PAGE_SIZE_PARAM => {
                accessor.set_page_size_raw(&value);
            }
            _ => {
                filter.insert(name, match_value(value));
            }
        }
    }

    accessor.set_match(filter);
    accessor.find().await;
    Ok(envelope_response(accessor, StatusCode::OK))
}

/// 按 id 读取单条记录
async fn get_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> ApiResult<Response> {
    let mut accessor = state.accessor(&collection);
    accessor.set_id(&id)?;
    accessor.find().await;
    Ok(envelope_response(accessor, StatusCode::OK))
}

/// 创建记录
async fn create_record(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Response> {
    let record = record_from_json(body)?;
    if record.is_empty() {
        return Err(AppError::MissingData.into());
    }

    let mut accessor = state.accessor(&collection);
    accessor.create(record).await;
    Ok(envelope_response(accessor, StatusCode::CREATED))
}

/// 更新记录
async fn update_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> ApiResult<Response> {
    let record = record_from_json(body)?;

    let mut accessor = state.accessor(&collection);
    accessor.set_id(&id)?;
    accessor.update(record).await?;
    Ok(envelope_response(accessor, StatusCode::OK))
}

/// 删除记录
async fn delete_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> ApiResult<Response> {
    let mut accessor = state.accessor(&collection);
    accessor.set_id(&id)?;
    accessor.delete().await?;
    Ok(envelope_response(accessor, StatusCode::OK))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// 就绪检查，数据库不可达时返回 503
async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<AggregatedHealthResult>) {
    let mut result = AggregatedHealthResult::new();
    if let Some(checker) = &state.health {
        result.check(checker.as_ref()).await;
    }

    debug!(
        healthy = result.healthy_count(),
        total = result.components.len(),
        "Readiness checked"
    );

    let status = if result.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(result))
}

async fn render_metrics(State(state): State<AppState>) -> String {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

async fn route_not_found(uri: Uri) -> ApiError {
    AppError::not_found(format!("No route for {}", uri.path())).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_value_types() {
        assert_eq!(match_value("red".to_string()), Bson::String("red".to_string()));
        assert_eq!(
            match_value("1".to_string()),
            Bson::Document(doc! { "$in": ["1", 1_i64] })
        );
        assert_eq!(
            match_value("2.5".to_string()),
            Bson::Document(doc! { "$in": ["2.5", 2.5] })
        );
        assert_eq!(
            match_value("true".to_string()),
            Bson::Document(doc! { "$in": ["true", true] })
        );
        assert_eq!(match_value("NaN".to_string()), Bson::String("NaN".to_string()));
    }
}
