//! Scripted, widget-less dialog presenter
//!
//! Outcomes are taken from a queue in presentation order. With an empty
//! queue a dialog stays open until [`HeadlessDialogs::resolve`] or a
//! dismissal, the way an unattended screen would.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::oneshot;

use super::dialog::{
    ConfirmPrompt, DialogId, DialogOutcome, DialogPresenter, DialogRequest, PresentedDialog,
};

#[derive(Default)]
pub struct HeadlessDialogs {
    next_id: AtomicU64,
    scripted: Mutex<VecDeque<DialogOutcome>>,
    answers: Mutex<VecDeque<bool>>,
    open: Mutex<HashMap<DialogId, oneshot::Sender<DialogOutcome>>>,
    presented: Mutex<Vec<(DialogId, DialogRequest)>>,
    dismissed: Mutex<Vec<DialogId>>,
    prompts: Mutex<Vec<ConfirmPrompt>>,
}

impl HeadlessDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next presented dialog
    pub fn script(&self, outcome: DialogOutcome) {
        self.scripted.lock().push_back(outcome);
    }

    /// Queue the answer to the next confirmation prompt (unanswered = no)
    pub fn answer(&self, yes: bool) {
        self.answers.lock().push_back(yes);
    }

    /// Resolve a dialog that is still open; `false` if it is gone
    pub fn resolve(&self, id: DialogId, outcome: DialogOutcome) -> bool {
        match self.open.lock().remove(&id) {
            Some(tx) => tx.send(outcome).is_ok(),
            None => false,
        }
    }

    pub fn is_open(&self, id: DialogId) -> bool {
        self.open.lock().contains_key(&id)
    }

    pub fn presented(&self) -> Vec<(DialogId, DialogRequest)> {
        self.presented.lock().clone()
    }

    pub fn last_presented(&self) -> Option<(DialogId, DialogRequest)> {
        self.presented.lock().last().cloned()
    }

    pub fn dismissed(&self) -> Vec<DialogId> {
        self.dismissed.lock().clone()
    }

    pub fn prompts(&self) -> Vec<ConfirmPrompt> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl DialogPresenter for HeadlessDialogs {
    fn present(&self, request: DialogRequest) -> PresentedDialog {
        let id = DialogId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let (tx, rx) = oneshot::channel();
        tracing::debug!(dialog = %id, kind = ?request.kind, table = %request.table_label, "Dialog presented");
        self.presented.lock().push((id, request));

        match self.scripted.lock().pop_front() {
            Some(outcome) => {
                let _ = tx.send(outcome);
            }
            None => {
                self.open.lock().insert(id, tx);
            }
        }
        PresentedDialog::new(id, rx)
    }

    fn dismiss(&self, id: DialogId) {
        tracing::debug!(dialog = %id, "Dialog dismissed");
        self.dismissed.lock().push(id);
        if let Some(tx) = self.open.lock().remove(&id) {
            let _ = tx.send(DialogOutcome::Dismissed);
        }
    }

    async fn confirm(&self, prompt: ConfirmPrompt) -> bool {
        tracing::debug!(title = %prompt.title, "Confirmation requested");
        self.prompts.lock().push(prompt);
        self.answers.lock().pop_front().unwrap_or(false)
    }
}
