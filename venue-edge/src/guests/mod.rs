//! 客人 - 访问历史聚合
//!
//! - [`store`] - 按 hashed contact 缓存的客人文档
//! - [`summary`] - 访问统计

pub mod store;
pub mod summary;

pub use store::GuestStore;
pub use summary::{summarize, visit_percentage};
