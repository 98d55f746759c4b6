//! ports - 抽象 trait 层
//!
//! 定义访问器依赖的文档存储接口

mod document_store;
mod record_id;

pub use document_store::*;
pub use record_id::*;
