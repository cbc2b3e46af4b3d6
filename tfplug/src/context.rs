//! Request-scoped cancellation
//!
//! Every trait call receives a [`Context`]. Clones share one cancellation
//! signal; a context derived with [`Context::with_timeout`] additionally
//! expires at its deadline.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

#[derive(Clone)]
pub struct Context {
    signal: Arc<watch::Sender<bool>>,
    deadline: Option<Instant>,
}

impl Context {
    pub fn new() -> Self {
        let (signal, _) = watch::channel(false);
        Self {
            signal: Arc::new(signal),
            deadline: None,
        }
    }

    /// Derives a context sharing this one's signal. An earlier existing
    /// deadline is kept.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        Self {
            signal: Arc::clone(&self.signal),
            deadline: Some(self.deadline.map_or(deadline, |d| d.min(deadline))),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancels this context and every clone or derivative of it
    pub fn cancel(&self) {
        self.signal.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.signal.borrow() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Resolves once the context is cancelled or its deadline passes
    pub async fn cancelled(&self) {
        let mut signal = self.signal.subscribe();
        let cancelled = async move {
            // The sender lives as long as `self`, so this only fails if dropped
            let closed = signal.wait_for(|cancelled| *cancelled).await.is_err();
            if closed {
                std::future::pending::<()>().await;
            }
        };

        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = cancelled => {}
                    _ = tokio::time::sleep_until(deadline.into()) => {}
                }
            }
            None => cancelled.await,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
