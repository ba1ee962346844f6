//! Configuration.
//!
//! Two layers:
//!
//! * [`RuntimeSettings`]: process settings (paths, task periods) from defaults, an
//!   optional TOML file and `RAKI__*` environment variables, read once at startup.
//! * [`AssistantConfig`]: the user's Config document, kept encrypted in the
//!   [`StateStore`](crate::store::StateStore) next to reminders and history.
//!
//! | Env | Default | Description |
//! |-----|---------|-------------|
//! | RAKI_CONFIG | config/raki | Settings file (extension optional) |
//! | RAKI__DATA_DIR | ./data | Directory for the key and encrypted documents |
//! | RAKI__KEY_FILE | <data_dir>/secret.key | Key file override |
//! | RAKI__REMINDER_INTERVAL_SECS | 60 | ReminderScheduler period |
//! | RAKI__HEALTH_INTERVAL_SECS | 300 | SystemHealthMonitor period |
//! | RAKI__SECURITY_INTERVAL_SECS | 1800 | SecurityScanner period |
//! | RAKI__SECURITY_RETRY_SECS | 300 | SecurityScanner period after a failed pass |
//! | RAKI__HEALTH_MONITOR | true | Run the health monitor |
//! | RAKI__SECURITY_SCAN | true | Run the security scanner |
//! | RAKI__ASSISTANT__<FIELD> | | Overrides one [`AssistantOverrides`] field |
//! | RAKI_EMAIL_PASSWORD | | Fallback for `email_password` |
//!
//! The `[assistant]` table (or `RAKI__ASSISTANT__*`) is the only way to change the
//! encrypted Config document from outside: [`AssistantConfig::load_or_init`] applies it
//! at startup and saves the result.

use crate::background::{HEALTH_PERIOD, REMINDER_PERIOD, SECURITY_PERIOD, SECURITY_RETRY};
use crate::error::CoreResult;
use crate::store::{Document, StateStore};
use serde::{Deserialize, Serialize};
use tracing::info;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_SETTINGS_PATH: &str = "config/raki";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeSettings {
    pub data_dir: String,
    #[serde(default)]
    pub key_file: Option<String>,
    pub reminder_interval_secs: u64,
    pub health_interval_secs: u64,
    pub security_interval_secs: u64,
    pub security_retry_secs: u64,
    pub health_monitor: bool,
    pub security_scan: bool,
    #[serde(default)]
    pub assistant: AssistantOverrides,
}

/// Startup values for the user's Config document. Unset fields leave the stored
/// value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantOverrides {
    pub default_language: Option<String>,
    pub voice_provider: Option<String>,
    pub email: Option<String>,
    pub email_password: Option<String>,
    pub smtp_host: Option<String>,
    pub offline_mode: Option<bool>,
    pub allowed_commands: Option<Vec<String>>,
}

impl RuntimeSettings {
    /// Precedence: env `RAKI_CONFIG` path > `config/raki.toml` > defaults; `RAKI__*` env wins over all.
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var("RAKI_CONFIG").unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());
        Self::load_from(Some(Path::new(&path)))
    }

    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("data_dir", "./data")?
            .set_default("reminder_interval_secs", REMINDER_PERIOD.as_secs() as i64)?
            .set_default("health_interval_secs", HEALTH_PERIOD.as_secs() as i64)?
            .set_default("security_interval_secs", SECURITY_PERIOD.as_secs() as i64)?
            .set_default("security_retry_secs", SECURITY_RETRY.as_secs() as i64)?
            .set_default("health_monitor", true)?
            .set_default("security_scan", true)?;

        let builder = match path {
            Some(p) if p.exists() || p.with_extension("toml").exists() => {
                builder.add_source(config::File::with_name(&p.to_string_lossy()))
            }
            _ => builder,
        };

        builder
            .add_source(
                config::Environment::with_prefix("RAKI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn key_path(&self) -> PathBuf {
        match &self.key_file {
            Some(p) if !p.trim().is_empty() => PathBuf::from(p),
            _ => self.data_dir().join("secret.key"),
        }
    }

    pub fn reminder_interval(&self) -> Duration {
        Duration::from_secs(self.reminder_interval_secs.max(1))
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health_interval_secs.max(1))
    }

    pub fn security_interval(&self) -> Duration {
        Duration::from_secs(self.security_interval_secs.max(1))
    }

    pub fn security_retry(&self) -> Duration {
        Duration::from_secs(self.security_retry_secs.max(1))
    }
}

/// The user's Config document. Missing keys take the defaults below; unknown keys
/// in a persisted document are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub default_language: String,
    pub email: String,
    pub email_password: String,
    pub smtp_host: String,
    pub offline_mode: bool,
    /// Program names the shell collaborator may run (checked per `&&` segment).
    pub allowed_commands: Vec<String>,
    pub voice_activation: bool,
    pub voice_provider: String,
    pub temperature_unit: String,
    pub security_scan_enabled: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            default_language: "en".to_string(),
            email: String::new(),
            email_password: String::new(),
            smtp_host: "smtp.gmail.com".to_string(),
            offline_mode: false,
            allowed_commands: ["apt", "systemctl", "ls", "df", "du", "cat"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            voice_activation: true,
            voice_provider: "console".to_string(),
            temperature_unit: "celsius".to_string(),
            security_scan_enabled: true,
        }
    }
}

impl Document for AssistantConfig {
    const ID: &'static str = "config";
    const FILE_NAME: &'static str = "raki_config.rak";
}

impl AssistantConfig {
    pub fn set_default_language(&mut self, code: impl Into<String>) {
        self.default_language = code.into();
    }

    pub fn set_voice_provider(&mut self, provider: impl Into<String>) {
        self.voice_provider = provider.into();
    }

    pub fn set_email_credentials(&mut self, email: impl Into<String>, password: impl Into<String>) {
        self.email = email.into();
        self.email_password = password.into();
    }

    pub fn set_offline_mode(&mut self, offline: bool) {
        self.offline_mode = offline;
    }

    /// Applies every set override. Returns whether anything changed.
    pub fn apply_overrides(&mut self, overrides: &AssistantOverrides) -> bool {
        let before = self.clone();
        if let Some(code) = &overrides.default_language {
            self.set_default_language(code.trim());
        }
        if let Some(provider) = &overrides.voice_provider {
            self.set_voice_provider(provider.trim());
        }
        if overrides.email.is_some() || overrides.email_password.is_some() {
            let email = overrides.email.clone().unwrap_or_else(|| self.email.clone());
            let password = overrides
                .email_password
                .clone()
                .unwrap_or_else(|| self.email_password.clone());
            self.set_email_credentials(email.trim(), password);
        }
        if let Some(host) = &overrides.smtp_host {
            self.smtp_host = host.trim().to_string();
        }
        if let Some(offline) = overrides.offline_mode {
            self.set_offline_mode(offline);
        }
        if let Some(commands) = &overrides.allowed_commands {
            self.allowed_commands = commands.clone();
        }
        *self != before
    }

    /// Loads the stored document (defaults on first run), applies `overrides` and
    /// saves when this is the first run or something changed.
    pub fn load_or_init(store: &StateStore, overrides: &AssistantOverrides) -> CoreResult<Self> {
        let first_run = !store.exists::<Self>();
        let mut config: Self = if first_run { Self::default() } else { store.load() };
        let changed = config.apply_overrides(overrides);
        if first_run || changed {
            store.save(&config)?;
            info!(target: "raki::config", first_run, changed, "configuration document written");
        }
        Ok(config)
    }

    /// Stored password, falling back to `RAKI_EMAIL_PASSWORD`.
    pub fn email_password(&self) -> Option<String> {
        Some(self.email_password.clone())
            .filter(|s| !s.trim().is_empty())
            .or_else(|| std::env::var("RAKI_EMAIL_PASSWORD").ok())
            .filter(|s| !s.trim().is_empty())
    }

    pub fn has_email_account(&self) -> bool {
        !self.email.trim().is_empty()
    }
}
