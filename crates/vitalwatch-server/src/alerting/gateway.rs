//! Alert dispatching.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Notify;

use super::{Alert, AlertError, AlertHandler};

/// Default per-handler delivery timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of one dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Handlers that delivered successfully
    pub delivered: usize,
    /// Handlers that failed or timed out
    pub failed: usize,
}

/// Running totals across all dispatches
#[derive(Debug, Clone, Serialize)]
pub struct AlertStats {
    /// Registered handler names
    pub handlers: Vec<String>,
    /// Successful handler deliveries
    pub sent: u64,
    /// Failed or timed-out handler deliveries
    pub failed: u64,
    /// Dispatches still running in the background
    pub pending: usize,
}

/// Fan-out of alert messages to every registered handler.
///
/// Dispatch is fire-and-forget from the caller's point of view: handler
/// errors and timeouts are logged and counted, never returned.
/// [`dispatch`](Self::dispatch) runs delivery on its own task, so it
/// completes even if the caller is cancelled.
pub struct AlertGateway {
    handlers: Vec<Box<dyn AlertHandler>>,
    timeout: Duration,
    sent: AtomicU64,
    failed: AtomicU64,
    in_flight: AtomicUsize,
    idle: Notify,
}

impl AlertGateway {
    /// Create a gateway with no handlers
    pub fn new(timeout: Duration) -> Self {
        Self {
            handlers: Vec::new(),
            timeout,
            sent: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            idle: Notify::new(),
        }
    }

    /// Add an alert handler
    pub fn add_handler(&mut self, handler: Box<dyn AlertHandler>) {
        self.handlers.push(handler);
    }

    /// Builder-style [`add_handler`](Self::add_handler)
    pub fn with_handler(mut self, handler: Box<dyn AlertHandler>) -> Self {
        self.add_handler(handler);
        self
    }

    /// Send a message on a background task and return immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn dispatch(self: &Arc<Self>, message: impl Into<String>) {
        let message = message.into();
        let guard = InFlight::new(Arc::clone(self));
        tokio::spawn(async move {
            guard.gateway.send(message).await;
            drop(guard);
        });
    }

    /// Wait until every background dispatch has finished
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if self.in_flight.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Send a message through every handler and wait for all of them
    pub async fn send(&self, message: impl Into<String>) -> DispatchReport {
        let alert = Alert::new(message);
        let mut report = DispatchReport::default();

        tracing::info!(
            alert_id = %alert.id(),
            handlers = self.handlers.len(),
            "Dispatching alert"
        );

        for handler in &self.handlers {
            let outcome = match tokio::time::timeout(self.timeout, handler.handle(&alert)).await {
                Ok(result) => result,
                Err(_) => Err(AlertError::Timeout {
                    handler: handler.name().to_string(),
                    timeout_ms: self.timeout.as_millis() as u64,
                }),
            };

            match outcome {
                Ok(()) => {
                    report.delivered += 1;
                    self.sent.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    report.failed += 1;
                    self.failed.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(
                        alert_id = %alert.id(),
                        handler = %handler.name(),
                        error = %e,
                        "Handler failed to deliver alert"
                    );
                }
            }
        }

        report
    }

    /// Snapshot of dispatch statistics
    pub fn stats(&self) -> AlertStats {
        AlertStats {
            handlers: self.handlers.iter().map(|h| h.name().to_string()).collect(),
            sent: self.sent.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            pending: self.in_flight.load(Ordering::Acquire),
        }
    }
}

// Counts a background dispatch from spawn until its task ends, including
// when the task panics or is aborted.
struct InFlight {
    gateway: Arc<AlertGateway>,
}

impl InFlight {
    fn new(gateway: Arc<AlertGateway>) -> Self {
        gateway.in_flight.fetch_add(1, Ordering::AcqRel);
        Self { gateway }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.gateway.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.gateway.idle.notify_waiters();
        }
    }
}

impl Default for AlertGateway {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

/// Writes alerts to the log. Installed when SMS is not configured.
pub struct LogAlertHandler;

#[async_trait::async_trait]
impl AlertHandler for LogAlertHandler {
    fn name(&self) -> &str {
        "log"
    }

    async fn handle(&self, alert: &Alert) -> Result<(), AlertError> {
        tracing::warn!(
            alert_id = %alert.id(),
            created_at = %alert.created_at(),
            message = %alert.message(),
            "ALERT"
        );
        Ok(())
    }
}
