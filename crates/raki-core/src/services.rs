//! External collaborator contracts.
//!
//! The router and background tasks only sequence these calls and interpret the
//! results; protocols (SMTP, HTTP, process spawning, sensors) live in the
//! implementing crate. Every trait is object-safe and shared as `Arc<dyn _>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The request was refused by policy (e.g. a shell command outside the allow-list).
    #[error("not allowed: {0}")]
    NotAllowed(String),
    /// The collaborator is not configured or not present on this host.
    #[error("unavailable: {0}")]
    Unavailable(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("{0}")]
    Failed(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Runs allow-listed terminal commands and returns their combined output.
#[async_trait]
pub trait ShellRunner: Send + Sync {
    async fn run(&self, command: &str) -> ServiceResult<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> ServiceResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub url: Option<String>,
}

#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Top results for `query`, best first.
    async fn search(&self, query: &str, lang: &str) -> ServiceResult<Vec<SearchHit>>;
    /// A short encyclopedic summary of `topic`, if one exists.
    async fn summarize(&self, topic: &str, lang: &str) -> ServiceResult<Option<String>>;
}

#[async_trait]
pub trait Browser: Send + Sync {
    async fn open(&self, url: &str) -> ServiceResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryStatus {
    pub percent: f32,
    pub charging: bool,
}

/// One snapshot of host health. `None` means the sensor is unavailable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostSample {
    pub os: Option<String>,
    pub cpu_percent: Option<f32>,
    pub memory_percent: Option<f32>,
    pub disk_percent: Option<f32>,
    pub temperature_c: Option<f32>,
    pub battery: Option<BatteryStatus>,
    pub network_reachable: Option<bool>,
}

#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn sample(&self) -> HostSample;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub ip: String,
    pub country: String,
    pub city: Option<String>,
}

#[async_trait]
pub trait SecurityProbe: Send + Sync {
    /// Which of `ports` accept a TCP connection on the local host.
    async fn listening_ports(&self, ports: &[u16]) -> ServiceResult<Vec<u16>>;
    /// Location of the public IP address as seen by an external service.
    async fn geolocate(&self) -> ServiceResult<GeoLocation>;
}

/// Bundle of collaborators handed to the router and the background tasks.
#[derive(Clone)]
pub struct Services {
    pub shell: Arc<dyn ShellRunner>,
    pub mailer: Arc<dyn Mailer>,
    pub search: Arc<dyn WebSearch>,
    pub browser: Arc<dyn Browser>,
    pub metrics: Arc<dyn MetricsSource>,
    pub security: Arc<dyn SecurityProbe>,
}
