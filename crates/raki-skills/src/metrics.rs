//! Host telemetry from sysinfo, plus Linux battery state and a reachability check.

use async_trait::async_trait;
use raki_core::services::{BatteryStatus, HostSample, MetricsSource};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use sysinfo::{Components, Disks, System};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::debug;

const REACHABILITY_TIMEOUT: Duration = Duration::from_secs(3);
const POWER_SUPPLY_DIR: &str = "/sys/class/power_supply";

pub struct SysinfoMetrics {
    sys: Mutex<System>,
    probe_addr: SocketAddr,
    power_supply_dir: PathBuf,
}

impl SysinfoMetrics {
    pub fn new() -> Self {
        Self {
            sys: Mutex::new(System::new()),
            probe_addr: SocketAddr::from(([8, 8, 8, 8], 53)),
            power_supply_dir: PathBuf::from(POWER_SUPPLY_DIR),
        }
    }

    /// Address whose TCP reachability stands for "network up".
    pub fn with_probe_addr(mut self, addr: SocketAddr) -> Self {
        self.probe_addr = addr;
        self
    }

    pub fn with_power_supply_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.power_supply_dir = dir.into();
        self
    }

    async fn cpu_and_memory(&self) -> (Option<f32>, Option<f32>) {
        let mut sys = self.sys.lock().await;
        sys.refresh_cpu();
        tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;
        sys.refresh_cpu();
        sys.refresh_memory();

        let cpu = Some(sys.global_cpu_info().cpu_usage()).filter(|v| v.is_finite());
        let memory = match sys.total_memory() {
            0 => None,
            total => Some(sys.used_memory() as f32 / total as f32 * 100.0),
        };
        (cpu, memory)
    }

    async fn network_reachable(&self) -> bool {
        matches!(
            tokio::time::timeout(REACHABILITY_TIMEOUT, TcpStream::connect(self.probe_addr)).await,
            Ok(Ok(_))
        )
    }
}

impl Default for SysinfoMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Usage of the root filesystem, or of the largest disk when `/` is not listed.
fn disk_percent() -> Option<f32> {
    let disks = Disks::new_with_refreshed_list();
    let disk = disks
        .iter()
        .find(|d| d.mount_point() == Path::new("/"))
        .or_else(|| disks.iter().max_by_key(|d| d.total_space()))?;
    let total = disk.total_space();
    if total == 0 {
        return None;
    }
    let used = total.saturating_sub(disk.available_space());
    Some(used as f32 / total as f32 * 100.0)
}

/// Hottest sensor reading, ignoring sensors that report nothing useful.
fn max_temperature() -> Option<f32> {
    let components = Components::new_with_refreshed_list();
    components
        .iter()
        .map(|c| c.temperature())
        .filter(|t| t.is_finite() && *t > 0.0)
        .fold(None, |max: Option<f32>, t| Some(max.map_or(t, |m| m.max(t))))
}

pub(crate) fn parse_battery(capacity: &str, status: &str) -> Option<BatteryStatus> {
    let percent: f32 = capacity.trim().parse().ok()?;
    let charging = matches!(status.trim(), "Charging" | "Full" | "Not charging");
    Some(BatteryStatus { percent, charging })
}

/// First `BAT*` entry under the power-supply directory.
fn read_battery(dir: &Path) -> Option<BatteryStatus> {
    let entries = std::fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        if !entry.file_name().to_string_lossy().starts_with("BAT") {
            continue;
        }
        let path = entry.path();
        let capacity = std::fs::read_to_string(path.join("capacity")).ok()?;
        let status = std::fs::read_to_string(path.join("status")).unwrap_or_default();
        return parse_battery(&capacity, &status);
    }
    None
}

#[async_trait]
impl MetricsSource for SysinfoMetrics {
    async fn sample(&self) -> HostSample {
        let (cpu_percent, memory_percent) = self.cpu_and_memory().await;
        let dir = self.power_supply_dir.clone();
        let (disk_percent, temperature_c, battery) =
            tokio::task::spawn_blocking(move || (disk_percent(), max_temperature(), read_battery(&dir)))
                .await
                .unwrap_or((None, None, None));
        let sample = HostSample {
            os: System::long_os_version(),
            cpu_percent,
            memory_percent,
            disk_percent,
            temperature_c,
            battery,
            network_reachable: Some(self.network_reachable().await),
        };
        debug!(target: "raki::metrics", ?sample, "host sampled");
        sample
    }
}
