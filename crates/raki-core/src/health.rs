//! Host health evaluation shared by the `diagnose` command and the background monitor.

use crate::services::HostSample;

/// Advisory messages summarize at most this many issues.
pub const MAX_REPORTED_ISSUES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthThresholds {
    pub cpu_percent: f32,
    pub memory_percent: f32,
    pub disk_percent: f32,
    pub temperature_c: f32,
    pub battery_percent: f32,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            cpu_percent: 85.0,
            memory_percent: 85.0,
            disk_percent: 90.0,
            temperature_c: 85.0,
            battery_percent: 15.0,
        }
    }
}

/// Issues found in `sample`, in fixed order (CPU, memory, disk, temperature,
/// battery, network). Unavailable sensors are skipped.
pub fn diagnose(sample: &HostSample, t: &HealthThresholds) -> Vec<String> {
    let mut issues = Vec::new();
    if let Some(cpu) = sample.cpu_percent.filter(|v| *v > t.cpu_percent) {
        issues.push(format!("High CPU usage: {:.1}%", cpu));
    }
    if let Some(mem) = sample.memory_percent.filter(|v| *v > t.memory_percent) {
        issues.push(format!("High RAM usage: {:.1}%", mem));
    }
    if let Some(disk) = sample.disk_percent.filter(|v| *v > t.disk_percent) {
        issues.push(format!("Low disk space: {:.1}% used", disk));
    }
    if let Some(temp) = sample.temperature_c.filter(|v| *v > t.temperature_c) {
        issues.push(format!("High temperature: {:.1}°C", temp));
    }
    if let Some(battery) = sample.battery {
        if battery.percent < t.battery_percent && !battery.charging {
            issues.push(format!("Low battery: {:.0}% remaining", battery.percent));
        }
    }
    if sample.network_reachable == Some(false) {
        issues.push("Network connection unavailable".to_string());
    }
    issues
}

/// First `MAX_REPORTED_ISSUES` issues joined for speech.
pub fn summarize_issues(issues: &[String]) -> String {
    issues
        .iter()
        .take(MAX_REPORTED_ISSUES)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}

/// The monitor's unsolicited message, or `None` when nothing crossed a threshold.
pub fn advisory(issues: &[String]) -> Option<String> {
    if issues.is_empty() {
        return None;
    }
    Some(format!(
        "I've detected some system issues: {}. Would you like me to attempt repairs?",
        summarize_issues(issues)
    ))
}

/// One-line host description for the `system info` command.
pub fn system_summary(sample: &HostSample) -> String {
    let mut parts = Vec::new();
    if let Some(os) = &sample.os {
        parts.push(format!("OS: {}", os));
    }
    if let Some(cpu) = sample.cpu_percent {
        parts.push(format!("CPU: {:.1}% usage", cpu));
    }
    if let Some(mem) = sample.memory_percent {
        parts.push(format!("Memory: {:.1}% used", mem));
    }
    if let Some(disk) = sample.disk_percent {
        parts.push(format!("Disk: {:.1}% full", disk));
    }
    if let Some(temp) = sample.temperature_c {
        parts.push(format!("Temperature: {:.1}°C", temp));
    }
    if let Some(b) = sample.battery {
        parts.push(format!(
            "Battery: {:.0}%{}",
            b.percent,
            if b.charging { " (charging)" } else { "" }
        ));
    }
    if parts.is_empty() {
        "no sensors available".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::BatteryStatus;

    fn healthy() -> HostSample {
        HostSample {
            os: Some("Linux 6.1".to_string()),
            cpu_percent: Some(12.0),
            memory_percent: Some(40.0),
            disk_percent: Some(55.0),
            temperature_c: Some(48.0),
            battery: Some(BatteryStatus { percent: 80.0, charging: false }),
            network_reachable: Some(true),
        }
    }

    #[test]
    fn healthy_host_has_no_issues() {
        assert!(diagnose(&healthy(), &HealthThresholds::default()).is_empty());
        assert_eq!(advisory(&[]), None);
    }

    #[test]
    fn thresholds_are_strict_upper_bounds() {
        let mut s = healthy();
        s.cpu_percent = Some(85.0);
        s.disk_percent = Some(90.5);
        let issues = diagnose(&s, &HealthThresholds::default());
        assert_eq!(issues, vec!["Low disk space: 90.5% used".to_string()]);
    }

    #[test]
    fn battery_only_counts_when_discharging() {
        let mut s = healthy();
        s.battery = Some(BatteryStatus { percent: 10.0, charging: true });
        assert!(diagnose(&s, &HealthThresholds::default()).is_empty());
        s.battery = Some(BatteryStatus { percent: 10.0, charging: false });
        assert_eq!(diagnose(&s, &HealthThresholds::default()).len(), 1);
    }

    #[test]
    fn missing_sensors_are_skipped() {
        let s = HostSample::default();
        assert!(diagnose(&s, &HealthThresholds::default()).is_empty());
        assert_eq!(system_summary(&s), "no sensors available");
    }

    #[test]
    fn advisory_mentions_at_most_three_issues() {
        let s = HostSample {
            cpu_percent: Some(99.0),
            memory_percent: Some(95.0),
            disk_percent: Some(97.0),
            temperature_c: Some(90.0),
            network_reachable: Some(false),
            ..HostSample::default()
        };
        let issues = diagnose(&s, &HealthThresholds::default());
        assert_eq!(issues.len(), 5);
        let msg = advisory(&issues).unwrap();
        assert!(msg.contains("High CPU usage"));
        assert!(msg.contains("Low disk space"));
        assert!(!msg.contains("temperature"));
        assert!(!msg.contains("Network"));
    }
}
