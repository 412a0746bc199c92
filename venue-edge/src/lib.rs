//! Venue Edge - 场地预订协调核心
//!
//! # 架构概述
//!
//! 一个活动 (event) 一个协调器：订阅预订文档，把预订投影到楼层桌台，
//! 处理桌台点击 (创建 / 查看 / 编辑 / 删除 / 换桌 / 对调)，并定时标记
//! 超时未确认的预订。
//!
//! - **预订** (`reservations`): 投影、换桌计划、超时检查、协调器
//! - **文档存储** (`store`): 实时文档库抽象 + 内存实现
//! - **交互** (`ui`): 对话框 / 确认框 / 通知抽象
//! - **客人** (`guests`): 访问历史缓存与统计
//! - **认证** (`auth`): 当前用户与权限判断
//!
//! # 模块结构
//!
//! ```text
//! venue-edge/src/
//! ├── core/          # 配置、后台任务
//! ├── auth/          # 当前用户、权限
//! ├── store/         # 文档存储
//! ├── ui/            # 对话框、通知
//! ├── reservations/  # 预订协调
//! ├── guests/        # 客人统计
//! └── utils/         # 日志、时钟
//! ```

pub mod auth;
pub mod core;
pub mod guests;
pub mod reservations;
pub mod store;
pub mod ui;
pub mod utils;

// Re-export 公共类型
pub use auth::CurrentUser;
pub use core::{BackgroundTasks, Config, TaskKind};
pub use guests::GuestStore;
pub use reservations::{ClickOutcome, ExpirySweeper, ReservationCoordinator, TableRef};
pub use store::{DocumentStore, GuestSource, InMemoryStore, StoreEvent};
pub use ui::{DialogPresenter, HeadlessDialogs, Notifier, RecordingNotifier};
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
 _    __
| |  / /__  ____  __  _____
| | / / _ \/ __ \/ / / / _ \
| |/ /  __/ / / / /_/ /  __/
|___/\___/_/ /_/\__,_/\___/   edge
"#
    );
}
