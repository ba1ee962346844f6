//! raki-skills: the host-facing implementations of the assistant's collaborator traits.
//!
//! | Trait            | Implementation          | Backing                                |
//! |------------------|-------------------------|----------------------------------------|
//! | `ShellRunner`    | [`AllowListedShell`]    | `sh -c` / PowerShell, allow-listed     |
//! | `Mailer`         | [`SmtpMailer`]          | lettre, SMTP over TLS                  |
//! | `WebSearch`      | [`DuckDuckGoSearch`]    | reqwest: DuckDuckGo + Wikipedia        |
//! | `Browser`        | [`SystemBrowser`]       | xdg-open / open / start                |
//! | `MetricsSource`  | [`SysinfoMetrics`]      | sysinfo + /sys/class/power_supply      |
//! | `SecurityProbe`  | [`LocalSecurityProbe`]  | loopback TCP connect + ip-api.com      |

mod browser;
mod error;
mod mail;
mod metrics;
mod search;
mod security;
mod shell;

pub use browser::SystemBrowser;
pub use error::{SkillError, SkillResult};
pub use mail::SmtpMailer;
pub use metrics::SysinfoMetrics;
pub use search::DuckDuckGoSearch;
pub use security::LocalSecurityProbe;
pub use shell::AllowListedShell;

use raki_core::services::Services;
use raki_core::AssistantConfig;
use std::sync::Arc;

/// Wires every collaborator from the user's Config document.
pub fn build_services(config: &AssistantConfig) -> SkillResult<Services> {
    Ok(Services {
        shell: Arc::new(AllowListedShell::from_config(config)),
        mailer: Arc::new(SmtpMailer::from_config(config)),
        search: Arc::new(DuckDuckGoSearch::new(config.offline_mode)?),
        browser: Arc::new(SystemBrowser),
        metrics: Arc::new(SysinfoMetrics::new()),
        security: Arc::new(LocalSecurityProbe::new(config.offline_mode)?),
    })
}
