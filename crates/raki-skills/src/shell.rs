//! Allow-listed command execution (`sh -c` on Unix, PowerShell on Windows).
//!
//! A command runs only when every `&&`-joined segment starts with an allowed
//! program (`sudo` is skipped over) and the text contains no other shell control
//! operator, redirection or substitution.

use crate::error::{SkillError, SkillResult};
use async_trait::async_trait;
use raki_core::services::{ServiceResult, ShellRunner};
use raki_core::AssistantConfig;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(900);

const FORBIDDEN: &[&str] = &[";", "|", "`", "$(", "${", ">", "<", "\n", "\r"];

pub struct AllowListedShell {
    allowed: Vec<String>,
    timeout: Duration,
}

impl AllowListedShell {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(config.allowed_commands.iter().cloned())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accepts or refuses `command` without running it.
    pub fn check(&self, command: &str) -> SkillResult<()> {
        let refuse = || SkillError::NotAllowed(command.to_string());
        if command.trim().is_empty() || FORBIDDEN.iter().any(|f| command.contains(f)) {
            return Err(refuse());
        }
        for segment in command.split("&&") {
            if segment.contains('&') {
                return Err(refuse());
            }
            let mut words = segment.split_whitespace();
            let program = match words.next() {
                Some("sudo") => words.next(),
                other => other,
            };
            let name = program
                .and_then(|p| Path::new(p).file_name())
                .and_then(|n| n.to_str())
                .ok_or_else(refuse)?;
            if !self.allowed.iter().any(|a| a == name) {
                return Err(refuse());
            }
        }
        Ok(())
    }

    async fn execute(&self, command: &str) -> SkillResult<String> {
        self.check(command)?;
        info!(target: "raki::shell", command, "running command");

        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("powershell.exe");
            c.args(["-NoProfile", "-ExecutionPolicy", "Bypass", "-Command", command]);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(command);
            c
        };
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| SkillError::Failed(format!("command timed out after {}s", self.timeout.as_secs())))??;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if output.status.success() {
            debug!(target: "raki::shell", bytes = stdout.len(), "command succeeded");
            return Ok(stdout);
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = stderr
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .unwrap_or("command failed")
            .trim()
            .to_string();
        warn!(target: "raki::shell", code = ?output.status.code(), %reason, "command failed");
        Err(SkillError::Failed(reason))
    }
}

#[async_trait]
impl ShellRunner for AllowListedShell {
    async fn run(&self, command: &str) -> ServiceResult<String> {
        Ok(self.execute(command).await?)
    }
}
