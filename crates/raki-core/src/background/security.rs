//! **SecurityScanner**: best-effort local service inspection and IP geolocation.
//!
//! Findings are advisory. A failing probe aborts the pass; the loop then retries
//! after the shorter fallback period instead of stopping.

use super::{announce, AnnouncementSender, AnnouncementSource, ShutdownListener};
use crate::services::{SecurityProbe, ServiceResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1800);
pub const DEFAULT_RETRY: Duration = Duration::from_secs(300);

/// Services that should rarely listen on a personal machine.
pub const RISKY_SERVICES: &[(u16, &str)] = &[
    (21, "FTP"),
    (23, "Telnet"),
    (445, "SMB file sharing"),
    (3389, "Remote Desktop"),
    (5900, "VNC"),
];

/// Ports probed each pass.
const WATCHED_PORTS: &[u16] = &[21, 22, 23, 25, 80, 139, 445, 3306, 3389, 5432, 5900, 6379];

pub struct SecurityScanner {
    probe: Arc<dyn SecurityProbe>,
    period: Duration,
    retry: Duration,
    announcer: AnnouncementSender,
    last_country: Option<String>,
}

impl SecurityScanner {
    pub fn new(probe: Arc<dyn SecurityProbe>, announcer: AnnouncementSender) -> Self {
        Self {
            probe,
            period: DEFAULT_PERIOD,
            retry: DEFAULT_RETRY,
            announcer,
            last_country: None,
        }
    }

    pub fn with_periods(mut self, period: Duration, retry: Duration) -> Self {
        self.period = period;
        self.retry = retry;
        self
    }

    /// One pass. Returns the findings (announced as a single message when non-empty).
    pub async fn run_pass(&mut self) -> ServiceResult<Vec<String>> {
        let mut findings = Vec::new();

        let open = self.probe.listening_ports(WATCHED_PORTS).await?;
        debug!(target: "raki::security", open = ?open, "local port inspection done");
        for (port, service) in RISKY_SERVICES {
            if open.contains(port) {
                findings.push(format!("{} is listening on port {}", service, port));
            }
        }

        let location = self.probe.geolocate().await?;
        match self.last_country.as_deref() {
            Some(previous) if !previous.eq_ignore_ascii_case(&location.country) => {
                findings.push(format!(
                    "your network location changed from {} to {}",
                    previous, location.country
                ));
            }
            _ => {}
        }
        self.last_country = Some(location.country);

        if !findings.is_empty() {
            info!(target: "raki::security", findings = findings.len(), "security findings");
            announce(
                &self.announcer,
                AnnouncementSource::Security,
                format!("Security notice: {}.", findings.join("; ")),
            );
        }
        Ok(findings)
    }

    pub fn spawn(mut self, mut shutdown: ShutdownListener) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                target: "raki::security",
                period_secs = self.period.as_secs(),
                retry_secs = self.retry.as_secs(),
                "security scanner started"
            );
            loop {
                let wait = match self.run_pass().await {
                    Ok(_) => self.period,
                    Err(e) => {
                        warn!(target: "raki::security", error = %e, retry_secs = self.retry.as_secs(), "security pass aborted");
                        self.retry
                    }
                };
                if shutdown.sleep(wait).await {
                    break;
                }
            }
            info!(target: "raki::security", "security scanner stopped");
        })
    }
}
