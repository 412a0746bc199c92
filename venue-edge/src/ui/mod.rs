//! 交互抽象 - 对话框、确认框、通知
//!
//! The core never touches widgets. It presents a modal and awaits one of a
//! fixed set of named outcomes ([`DialogPresenter`]), asks yes/no questions,
//! and reports through one [`Notifier`].

pub mod dialog;
pub mod headless;
pub mod notify;

pub use dialog::{
    ConfirmPrompt, DialogId, DialogKind, DialogOutcome, DialogPresenter, DialogRequest,
    PresentedDialog,
};
pub use headless::HeadlessDialogs;
pub use notify::{LoadingGuard, Notice, Notifier, RecordingNotifier, run_guarded};
