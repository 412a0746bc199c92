//! Notifications and the mutation wrapper

use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::utils::AppResult;

/// User-facing notification primitive (toasts, dismissible errors, spinner)
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn show_loading(&self);
    fn hide_loading(&self);
}

/// Shows the loading indicator for its lifetime
pub struct LoadingGuard<'a> {
    notifier: &'a dyn Notifier,
}

impl<'a> LoadingGuard<'a> {
    pub fn new(notifier: &'a dyn Notifier) -> Self {
        notifier.show_loading();
        Self { notifier }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.notifier.hide_loading();
    }
}

/// Run one store mutation behind the loading indicator.
///
/// Failures are logged and shown through [`Notifier::error`]; the spinner is
/// hidden on success, failure, and when the future is dropped.
pub async fn run_guarded<T, F>(notifier: &dyn Notifier, operation: &str, fut: F) -> Option<T>
where
    F: Future<Output = AppResult<T>>,
{
    let _loading = LoadingGuard::new(notifier);
    match fut.await {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!(
                operation,
                code = %e.code,
                category = e.code.category().name(),
                error = %e,
                "Mutation failed"
            );
            notifier.error(&e.message);
            None
        }
    }
}

/// A message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Notifier that logs and keeps every message
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
    loading: AtomicUsize,
    loading_shown: AtomicUsize,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notices
            .lock()
            .iter()
            .filter_map(|n| match n {
                Notice::Error(m) => Some(m.clone()),
                Notice::Success(_) => None,
            })
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.notices
            .lock()
            .iter()
            .filter_map(|n| match n {
                Notice::Success(m) => Some(m.clone()),
                Notice::Error(_) => None,
            })
            .collect()
    }

    /// Spinner currently visible
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst) > 0
    }

    /// How many times the spinner was shown
    pub fn loading_shown(&self) -> usize {
        self.loading_shown.load(Ordering::SeqCst)
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(notice = "success", "{}", message);
        self.notices.lock().push(Notice::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        tracing::warn!(notice = "error", "{}", message);
        self.notices.lock().push(Notice::Error(message.to_string()));
    }

    fn show_loading(&self) {
        self.loading.fetch_add(1, Ordering::SeqCst);
        self.loading_shown.fetch_add(1, Ordering::SeqCst);
    }

    fn hide_loading(&self) {
        let _ = self
            .loading
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::AppError;

    #[tokio::test]
    async fn test_run_guarded_success() {
        let notifier = RecordingNotifier::new();
        let value = run_guarded(&notifier, "add", async { Ok::<_, AppError>(7) }).await;
        assert_eq!(value, Some(7));
        assert!(!notifier.is_loading());
        assert_eq!(notifier.loading_shown(), 1);
        assert!(notifier.errors().is_empty());
    }

    #[tokio::test]
    async fn test_run_guarded_failure_surfaces_message() {
        let notifier = RecordingNotifier::new();
        let value: Option<()> = run_guarded(&notifier, "delete", async {
            Err(AppError::store("network down"))
        })
        .await;
        assert!(value.is_none());
        assert!(!notifier.is_loading());
        assert_eq!(notifier.errors(), vec!["network down".to_string()]);
    }

    #[tokio::test]
    async fn test_loading_hidden_when_dropped() {
        let notifier = RecordingNotifier::new();
        {
            let fut = run_guarded(&notifier, "update", async {
                futures::future::pending::<AppResult<()>>().await
            });
            // Poll once so the guard is created, then drop
            let mut fut = Box::pin(fut);
            assert!(futures::poll!(fut.as_mut()).is_pending());
            assert!(notifier.is_loading());
        }
        assert!(!notifier.is_loading());
    }
}
