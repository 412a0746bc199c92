//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`AppResult`] - 应用错误类型 (from shared::error)
//! - [`logger`] - 日志初始化
//! - [`time`] - 时钟抽象与 HH:mm 工具

pub mod logger;
pub mod time;

pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};
