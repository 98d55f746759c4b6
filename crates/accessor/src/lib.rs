//! dao-accessor - 文档集合记录访问器
//!
//! 每个请求创建一个 [`RecordAccessor`]，通过 setter 设置分页、过滤条件和目标 id，
//! 执行一次 find / create / update / delete，然后读取 [`Envelope`]。

mod accessor;
mod envelope;
mod metrics;
mod request;
mod settings;
mod util;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use accessor::*;
pub use envelope::*;
pub use request::*;
pub use settings::*;
pub use util::*;
