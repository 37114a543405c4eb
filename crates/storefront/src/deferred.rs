//! Values loaded in the background while the page shell is already streaming.
//!
//! A [`Deferred`] is started before the handler awaits its critical data and
//! is settled later by the render step. Failures never escape: they are
//! logged and the value settles to `None`, which renders as an empty section.

use std::fmt::Display;
use std::future::Future;

use tokio::task::JoinHandle;
use tracing::Instrument;

/// A background load that settles to `Some(value)` or the `None` sentinel.
///
/// Dropping an unsettled `Deferred` detaches the task; it runs to completion
/// and its result is discarded.
#[derive(Debug)]
pub struct Deferred<T> {
    label: &'static str,
    handle: JoinHandle<Option<T>>,
}

impl<T: Send + 'static> Deferred<T> {
    /// Launch `future` on the runtime immediately.
    ///
    /// The task inherits the caller's tracing span. An `Err` is logged at
    /// error level under `label` and settles to `None`.
    pub fn spawn<F, E>(label: &'static str, future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        E: Display,
    {
        let task = async move {
            match future.await {
                Ok(value) => Some(value),
                Err(e) => {
                    // Below-the-fold data: log and render the section empty
                    tracing::error!(error = %e, deferred = label, "Deferred load failed");
                    None
                }
            }
        };

        Self {
            label,
            handle: tokio::spawn(task.in_current_span()),
        }
    }

    /// Whether the background load has finished.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the load to finish.
    ///
    /// Returns `None` if the load failed or the task panicked.
    pub async fn settle(self) -> Option<T> {
        match self.handle.await {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(error = %e, deferred = self.label, "Deferred task did not complete");
                None
            }
        }
    }
}
