//! 认证授权模块
//!
//! - [`CurrentUser`] - 当前用户上下文 (角色、权限、关联场地)
//! - [`permissions`] - 预订相关权限定义与能力检查

pub mod permissions;
pub mod user;

pub use user::CurrentUser;
