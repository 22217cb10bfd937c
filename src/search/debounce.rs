//! Debounced execution of an action

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Runs an action with the latest submitted value once submissions have
/// been quiet for `delay`. Values superseded within the quiet period are
/// dropped without running.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    handle: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn the debouncing task on the current tokio runtime
    pub fn new<F>(delay: Duration, mut action: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        let handle = tokio::spawn(async move {
            let mut pending: Option<T> = None;
            loop {
                if pending.is_none() {
                    match rx.recv().await {
                        Some(value) => pending = Some(value),
                        None => break,
                    }
                    continue;
                }

                tokio::select! {
                    received = rx.recv() => match received {
                        Some(value) => pending = Some(value),
                        None => {
                            // Sender gone: run what is left
                            if let Some(value) = pending.take() {
                                action(value);
                            }
                            break;
                        }
                    },
                    _ = tokio::time::sleep(delay) => {
                        if let Some(value) = pending.take() {
                            action(value);
                        }
                    }
                }
            }
        });

        Self { tx, handle }
    }

    /// Submit a value, restarting the quiet period
    pub fn call(&self, value: T) {
        if self.tx.send(value).is_err() {
            tracing::debug!("Debouncer task already stopped");
        }
    }

    /// Stop accepting values, run any pending one, and wait for the task
    pub async fn finish(self) {
        drop(self.tx);
        if let Err(e) = self.handle.await {
            tracing::error!("Debouncer task failed: {}", e);
        }
    }
}
