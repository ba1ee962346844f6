//! Hands URLs to the desktop's default browser.

use crate::error::{SkillError, SkillResult};
use async_trait::async_trait;
use raki_core::services::{Browser, ServiceResult};
use std::io::ErrorKind;
use tracing::info;

pub struct SystemBrowser;

/// Only web pages are handed to the browser; `file:` and custom schemes are refused.
fn check_scheme(url: &str) -> SkillResult<()> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(SkillError::NotAllowed(url.to_string()))
    }
}

impl SystemBrowser {
    async fn launch(&self, url: &str) -> SkillResult<()> {
        check_scheme(url)?;
        let target = url.to_string();
        tokio::task::spawn_blocking(move || webbrowser::open(&target))
            .await
            .map_err(|e| SkillError::Failed(format!("browser task failed: {}", e)))?
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => SkillError::NotConfigured("no browser available on this host".into()),
                _ => SkillError::Io(e),
            })?;
        info!(target: "raki::browser", url, "opened in browser");
        Ok(())
    }
}

#[async_trait]
impl Browser for SystemBrowser {
    async fn open(&self, url: &str) -> ServiceResult<()> {
        Ok(self.launch(url).await?)
    }
}
