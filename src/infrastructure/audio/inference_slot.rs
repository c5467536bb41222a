use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::application::ports::TranscriptionError;

/// A model that runs one inference at a time.
///
/// A panic during an earlier inference poisons the lock. Holders reset their
/// per-run state on entry, so the poison is cleared instead of propagated.
pub struct InferenceSlot<T> {
    model: Mutex<T>,
}

impl<T> InferenceSlot<T> {
    pub fn new(model: T) -> Self {
        Self {
            model: Mutex::new(model),
        }
    }

    pub fn acquire(&self) -> MutexGuard<'_, T> {
        self.model.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Recovering model slot after a panicked inference");
            self.model.clear_poison();
            poisoned.into_inner()
        })
    }
}

/// Raised once the caller stops waiting for a blocking inference.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn check(&self) -> Result<(), TranscriptionError> {
        if self.is_cancelled() {
            return Err(TranscriptionError::InferenceFailed(
                "inference cancelled".to_string(),
            ));
        }
        Ok(())
    }
}

struct CancelOnDrop(CancelFlag);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Runs `job` on the blocking pool and waits at most `limit` for it.
///
/// The flag handed to `job` is raised when the wait ends for any reason:
/// timeout, completion, or the caller dropping this future.
pub async fn run_blocking_with_timeout<T, F>(limit: Duration, job: F) -> Result<T, TranscriptionError>
where
    T: Send + 'static,
    F: FnOnce(&CancelFlag) -> Result<T, TranscriptionError> + Send + 'static,
{
    let cancel = CancelFlag::default();
    let _cancel_on_drop = CancelOnDrop(cancel.clone());

    let task = tokio::task::spawn_blocking(move || job(&cancel));

    match tokio::time::timeout(limit, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(TranscriptionError::InferenceFailed(format!(
            "inference thread: {}",
            join_error
        ))),
        Err(_) => {
            tracing::warn!(limit_secs = limit.as_secs_f32(), "Inference timed out, cancelling");
            Err(TranscriptionError::Timeout(limit))
        }
    }
}
