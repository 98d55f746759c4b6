//! dao-adapter-mongodb - MongoDB 适配器

mod config;
mod connection;
mod health;
mod store;

pub use config::*;
pub use connection::*;
pub use health::*;
pub use store::*;
