//! **SystemHealthMonitor**: samples the host and speaks up when a threshold is crossed.

use super::{announce, AnnouncementSender, AnnouncementSource, ShutdownListener};
use crate::health::{advisory, diagnose, HealthThresholds};
use crate::services::MetricsSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub const DEFAULT_PERIOD: Duration = Duration::from_secs(300);

pub struct SystemHealthMonitor {
    source: Arc<dyn MetricsSource>,
    thresholds: HealthThresholds,
    period: Duration,
    announcer: AnnouncementSender,
}

impl SystemHealthMonitor {
    pub fn new(source: Arc<dyn MetricsSource>, period: Duration, announcer: AnnouncementSender) -> Self {
        Self {
            source,
            thresholds: HealthThresholds::default(),
            period,
            announcer,
        }
    }

    pub fn with_thresholds(mut self, thresholds: HealthThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// One pass; returns the advisory that was announced, if any.
    pub async fn run_pass(&self) -> Option<String> {
        let sample = self.source.sample().await;
        let issues = diagnose(&sample, &self.thresholds);
        debug!(target: "raki::health", issues = issues.len(), "health pass complete");
        let message = advisory(&issues)?;
        info!(target: "raki::health", issues = issues.len(), "system issues detected");
        announce(&self.announcer, AnnouncementSource::Health, message.clone());
        Some(message)
    }

    /// Waits one period before the first pass, then repeats until shutdown.
    pub fn spawn(self, mut shutdown: ShutdownListener) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(target: "raki::health", period_secs = self.period.as_secs(), "health monitor started");
            while !shutdown.sleep(self.period).await {
                self.run_pass().await;
            }
            info!(target: "raki::health", "health monitor stopped");
        })
    }
}
