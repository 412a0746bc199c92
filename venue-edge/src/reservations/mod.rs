//! 预订协调
//!
//! # 结构
//!
//! ```text
//! store events ──► ReservationCoordinator ──► FloorView projection
//!                     │        ▲
//!      table clicks ──┘        └── ExpirySweeper (periodic)
//! ```
//!
//! - [`projection`] - 预订 → 桌台投影 (always rebuilt from scratch)
//! - [`transfer`] - 换桌 / 对调计划
//! - [`expiry`] - 超时未确认检查与定时任务
//! - [`coordinator`] - 对话框生命周期与所有写操作

pub mod coordinator;
pub mod expiry;
pub mod projection;
pub mod transfer;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use coordinator::{ClickOutcome, ReservationCoordinator};
pub use expiry::ExpirySweeper;
pub use transfer::{PlannedMove, TransferPlan};

/// Address of one table: (floor id, table label)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRef {
    pub floor_id: String,
    pub table_label: String,
}

impl TableRef {
    pub fn new(floor_id: impl Into<String>, table_label: impl Into<String>) -> Self {
        Self {
            floor_id: floor_id.into(),
            table_label: table_label.into(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.floor_id, self.table_label)
    }
}
