//! Modal dialog seam

use async_trait::async_trait;
use serde::Serialize;
use shared::models::{Reservation, ReservationDraft, StateToggle};
use std::fmt;
use tokio::sync::oneshot;

/// Handle of a presented dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DialogId(pub u64);

impl fmt::Display for DialogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dialog-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogKind {
    /// Empty form for a free table
    Create,
    /// Read-only card of an existing reservation with its actions
    Show,
    /// Form pre-filled from an existing reservation
    Edit,
}

/// What to present
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogRequest {
    pub kind: DialogKind,
    pub floor_id: String,
    pub table_label: String,
    pub draft: ReservationDraft,
    pub reservation: Option<Reservation>,
}

/// The named outcomes a dialog can resolve with
#[derive(Debug, Clone, PartialEq)]
pub enum DialogOutcome {
    /// Create form submitted
    Create(ReservationDraft),
    /// Edit form submitted
    Update(ReservationDraft),
    /// "Edit" chosen on the show card
    Edit,
    Delete,
    /// Mark this reservation as the transfer source
    Transfer,
    Toggle(StateToggle, bool),
    /// Closed without an action, or force-closed
    Dismissed,
}

/// A dialog on screen
pub struct PresentedDialog {
    pub id: DialogId,
    outcome: oneshot::Receiver<DialogOutcome>,
}

impl PresentedDialog {
    pub fn new(id: DialogId, outcome: oneshot::Receiver<DialogOutcome>) -> Self {
        Self { id, outcome }
    }

    /// Wait for the user; a dropped sender reads as [`DialogOutcome::Dismissed`]
    pub async fn outcome(self) -> DialogOutcome {
        self.outcome.await.unwrap_or(DialogOutcome::Dismissed)
    }
}

/// Yes/no question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmPrompt {
    pub title: String,
    pub message: String,
}

impl ConfirmPrompt {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait DialogPresenter: Send + Sync {
    /// Show a dialog without blocking; the outcome arrives on the handle
    fn present(&self, request: DialogRequest) -> PresentedDialog;

    /// Force-close a dialog; its outcome resolves as `Dismissed`
    fn dismiss(&self, id: DialogId);

    /// Ask for confirmation; `false` when declined or closed
    async fn confirm(&self, prompt: ConfirmPrompt) -> bool;
}
