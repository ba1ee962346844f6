//! **ReminderScheduler**: `pending -> fired -> removed`, once per period.

use super::{announce, AnnouncementSender, AnnouncementSource, ShutdownListener};
use crate::documents::Reminder;
use crate::reminders::ReminderBook;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub const DEFAULT_PERIOD: Duration = Duration::from_secs(60);

pub struct ReminderScheduler {
    book: ReminderBook,
    period: Duration,
    announcer: AnnouncementSender,
}

impl ReminderScheduler {
    pub fn new(book: ReminderBook, period: Duration, announcer: AnnouncementSender) -> Self {
        Self {
            book,
            period,
            announcer,
        }
    }

    /// One pass: every reminder due at `now` is announced in stored order and removed
    /// from the set (and the set persisted) before this returns.
    pub async fn run_pass(&self, now: DateTime<Utc>) -> Vec<Reminder> {
        let fired = self.book.take_due(now).await;
        for reminder in &fired {
            info!(target: "raki::scheduler", due_at = %reminder.due_at, "reminder fired");
            announce(
                &self.announcer,
                AnnouncementSource::Reminder,
                format!("Reminder: {}", reminder.text),
            );
        }
        fired
    }

    /// Runs a pass immediately and then once per period until shutdown.
    pub fn spawn(self, mut shutdown: ShutdownListener) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(target: "raki::scheduler", period_secs = self.period.as_secs(), "reminder scheduler started");
            loop {
                let fired = self.run_pass(Utc::now()).await;
                debug!(target: "raki::scheduler", fired = fired.len(), "reminder pass complete");
                if shutdown.sleep(self.period).await {
                    break;
                }
            }
            info!(target: "raki::scheduler", "reminder scheduler stopped");
        })
    }
}
