//! record-api - 文档集合的 HTTP 接口
//!
//! 每个请求构造一个 `RecordAccessor`，按路径中的集合名读取对应配置

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::api_routes;
pub use state::AppState;
