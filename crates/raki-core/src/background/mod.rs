//! Periodic background tasks and the plumbing they share.
//!
//! * [`ReminderScheduler`]: fires due reminders (default every 60 s).
//! * [`SystemHealthMonitor`]: host thresholds advisory (default every 300 s).
//! * [`SecurityScanner`]: local services + IP location (default every 1800 s,
//!   300 s after a failed pass).
//!
//! Tasks speak only through the announcement channel and stop at the next sleep
//! point once the [`Shutdown`] signal is triggered.

mod health;
mod reminders;
mod security;

pub use health::SystemHealthMonitor;
pub use reminders::ReminderScheduler;
pub use security::{SecurityScanner, RISKY_SERVICES};

pub(crate) use health::DEFAULT_PERIOD as HEALTH_PERIOD;
pub(crate) use reminders::DEFAULT_PERIOD as REMINDER_PERIOD;
pub(crate) use security::{DEFAULT_PERIOD as SECURITY_PERIOD, DEFAULT_RETRY as SECURITY_RETRY};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnouncementSource {
    Reminder,
    Health,
    Security,
}

/// Something a background task wants said out loud.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub source: AnnouncementSource,
    pub text: String,
}

pub type AnnouncementSender = mpsc::UnboundedSender<Announcement>;
pub type AnnouncementReceiver = mpsc::UnboundedReceiver<Announcement>;

pub fn announcement_channel() -> (AnnouncementSender, AnnouncementReceiver) {
    mpsc::unbounded_channel()
}

pub(crate) fn announce(tx: &AnnouncementSender, source: AnnouncementSource, text: String) {
    if tx.send(Announcement { source, text }).is_err() {
        tracing::debug!(target: "raki::background", ?source, "announcement dropped; speaker has stopped");
    }
}

/// Process-wide stop signal. Cloning shares the same signal.
#[derive(Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown has been triggered (immediately if it already was).
    pub async fn wait(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Sleeps for `period`. Returns `true` when woken by shutdown instead.
    pub async fn sleep(&mut self, period: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(period) => self.is_triggered(),
            _ = self.wait() => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sleep_is_cut_short_by_shutdown() {
        let shutdown = Shutdown::new();
        let mut listener = shutdown.listener();
        let handle = tokio::spawn(async move { listener.sleep(Duration::from_secs(3600)).await });
        shutdown.trigger();
        let woke_for_shutdown = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("listener should wake promptly")
            .unwrap();
        assert!(woke_for_shutdown);
    }

    #[tokio::test]
    async fn late_listener_sees_earlier_trigger() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        let mut listener = shutdown.listener();
        assert!(listener.is_triggered());
        listener.wait().await;
        assert!(shutdown.is_triggered());
    }
}
