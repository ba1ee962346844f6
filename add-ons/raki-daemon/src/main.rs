//! Raki assistant daemon.
//!
//! One control loop (listen, route, speak, record) plus the background tasks
//! (reminders, health, security). Background tasks never speak directly: their
//! announcements go through a channel to a single speaker task. Ctrl-C, an exit
//! command or a closed input source triggers the shutdown signal, and every task
//! is joined before the process exits.

use anyhow::Context;
use raki_core::background::{
    announcement_channel, AnnouncementReceiver, ReminderScheduler, SecurityScanner, Shutdown,
    ShutdownListener, SystemHealthMonitor,
};
use raki_core::{
    AssistantConfig, AssistantContext, CommandRouter, CryptoBox, Language, PrivacyGate,
    RuntimeSettings, StateStore,
};
use raki_voice::{create_voice, VoiceError, VoiceIo};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pause after a failed listen so a broken microphone does not spin the loop.
const LISTEN_RETRY: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[raki] .env not loaded: {} (using system environment)", e);
    }

    // Logs go to stderr so they never interleave with the console conversation.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = RuntimeSettings::load().context("load runtime settings")?;
    let data_dir = settings.data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("create data directory {}", data_dir.display()))?;

    let crypto = Arc::new(
        CryptoBox::load_or_create(&settings.key_path()).context("load encryption key")?,
    );
    let store = StateStore::new(&data_dir, crypto, PrivacyGate::new());
    let config = AssistantConfig::load_or_init(&store, &settings.assistant).context("load configuration")?;

    let voice = create_voice(&config.voice_provider)
        .with_context(|| format!("start voice provider {:?}", config.voice_provider))?;
    let services = raki_skills::build_services(&config).context("build services")?;
    let ctx = AssistantContext::with_store(store, config, services, Arc::clone(&voice));
    let router = CommandRouter::new(ctx.clone()).context("compile command rules")?;

    let mut language = Language::from_code(&ctx.config.default_language);
    let (language_tx, language_rx) = watch::channel(language);

    tracing::info!(
        data_dir = %data_dir.display(),
        language = language.code(),
        voice = voice.name(),
        reminders = ctx.reminders.len().await,
        "Raki started"
    );

    let shutdown = Shutdown::new();
    let handles = spawn_background(&ctx, &settings, &shutdown, Arc::clone(&voice), language_rx);

    speak(voice.as_ref(), greeting(language), language).await;

    loop {
        let heard = tokio::select! {
            heard = voice.listen() => heard,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("CTRL-C received; shutting down");
                break;
            }
        };
        let text = match heard {
            Ok(Some(text)) => text,
            Ok(None) => continue,
            Err(VoiceError::InputClosed) => {
                tracing::info!("voice input closed; shutting down");
                break;
            }
            Err(e) => {
                tracing::warn!(error = %e, "listen failed");
                tokio::time::sleep(LISTEN_RETRY).await;
                continue;
            }
        };

        let outcome = router.route(&text, language).await;
        if let Some(next) = outcome.language_switch {
            tracing::info!(from = language.code(), to = next.code(), "session language switched");
            language = next;
            language_tx.send_replace(next);
        }
        if !outcome.response.is_empty() {
            speak(voice.as_ref(), &outcome.response, language).await;
            ctx.conversation.record(&text, &outcome.response, language).await;
        }
        if !outcome.continue_running {
            break;
        }
    }

    shutdown.trigger();
    for handle in handles {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "background task ended abnormally");
        }
    }
    tracing::info!("Raki stopped");
    Ok(())
}

fn spawn_background(
    ctx: &AssistantContext,
    settings: &RuntimeSettings,
    shutdown: &Shutdown,
    voice: Arc<dyn VoiceIo>,
    language: watch::Receiver<Language>,
) -> Vec<JoinHandle<()>> {
    let (announcer, announcements) = announcement_channel();
    let mut handles = vec![ReminderScheduler::new(
        ctx.reminders.clone(),
        settings.reminder_interval(),
        announcer.clone(),
    )
    .spawn(shutdown.listener())];

    if settings.health_monitor {
        handles.push(
            SystemHealthMonitor::new(
                Arc::clone(&ctx.services.metrics),
                settings.health_interval(),
                announcer.clone(),
            )
            .with_thresholds(ctx.thresholds)
            .spawn(shutdown.listener()),
        );
    }
    if settings.security_scan && ctx.config.security_scan_enabled {
        handles.push(
            SecurityScanner::new(Arc::clone(&ctx.services.security), announcer.clone())
                .with_periods(settings.security_interval(), settings.security_retry())
                .spawn(shutdown.listener()),
        );
    }
    drop(announcer);

    handles.push(tokio::spawn(run_speaker(
        voice,
        announcements,
        language,
        shutdown.listener(),
    )));
    handles
}

/// Speaks background announcements in the current session language until shutdown.
async fn run_speaker(
    voice: Arc<dyn VoiceIo>,
    mut announcements: AnnouncementReceiver,
    language: watch::Receiver<Language>,
    mut shutdown: ShutdownListener,
) {
    loop {
        tokio::select! {
            _ = shutdown.wait() => break,
            next = announcements.recv() => match next {
                Some(announcement) => {
                    let lang = *language.borrow();
                    tracing::debug!(source = ?announcement.source, "speaking announcement");
                    speak(voice.as_ref(), &announcement.text, lang).await;
                }
                None => break,
            },
        }
    }
}

async fn speak(voice: &dyn VoiceIo, text: &str, lang: Language) {
    if let Err(e) = voice.speak(text, lang.code()).await {
        tracing::warn!(error = %e, "speech output failed");
    }
}

fn greeting(lang: Language) -> &'static str {
    match lang {
        Language::French => "Bonjour ! Je suis Raki, votre assistant. Comment puis-je vous aider ?",
        _ => "Hello! I'm Raki, your AI assistant. How can I help you today?",
    }
}
