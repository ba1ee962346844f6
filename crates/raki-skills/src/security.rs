//! Local service inspection (TCP connect to loopback) and public-IP geolocation.

use crate::error::{SkillError, SkillResult};
use async_trait::async_trait;
use raki_core::services::{GeoLocation, SecurityProbe, ServiceResult};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

const GEO_ENDPOINT: &str = "http://ip-api.com/json/";
const CONNECT_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Deserialize)]
struct GeoReply {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    query: Option<String>,
}

fn location_from(reply: GeoReply) -> SkillResult<GeoLocation> {
    if reply.status != "success" {
        return Err(SkillError::Failed(format!(
            "geolocation lookup failed: {}",
            reply.message.as_deref().unwrap_or("unknown reason")
        )));
    }
    Ok(GeoLocation {
        ip: reply.query.unwrap_or_default(),
        country: reply.country.unwrap_or_default(),
        city: reply.city.filter(|c| !c.is_empty()),
    })
}

pub struct LocalSecurityProbe {
    client: reqwest::Client,
    host: IpAddr,
    offline: bool,
}

impl LocalSecurityProbe {
    pub fn new(offline: bool) -> SkillResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            offline,
        })
    }

    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    async fn accepts(&self, port: u16) -> bool {
        let addr = SocketAddr::new(self.host, port);
        matches!(
            tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(addr)).await,
            Ok(Ok(_))
        )
    }

    async fn lookup(&self) -> SkillResult<GeoLocation> {
        if self.offline {
            return Err(SkillError::Offline);
        }
        let reply: GeoReply = self
            .client
            .get(GEO_ENDPOINT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        location_from(reply)
    }
}

#[async_trait]
impl SecurityProbe for LocalSecurityProbe {
    async fn listening_ports(&self, ports: &[u16]) -> ServiceResult<Vec<u16>> {
        let mut open = Vec::new();
        for &port in ports {
            if self.accepts(port).await {
                open.push(port);
            }
        }
        debug!(target: "raki::security", host = %self.host, open = ?open, "ports inspected");
        Ok(open)
    }

    async fn geolocate(&self) -> ServiceResult<GeoLocation> {
        Ok(self.lookup().await?)
    }
}
