//! Integration test: collaborators built from a Config document drive the router.

use raki_core::{AssistantConfig, AssistantContext, CommandRouter, CryptoBox, Language, PrivacyGate, StateStore};
use raki_skills::build_services;
use raki_voice::ScriptedVoice;
use std::sync::Arc;

fn context(dir: &std::path::Path, config: AssistantConfig) -> AssistantContext {
    let services = build_services(&config).unwrap();
    let store = StateStore::new(dir, Arc::new(CryptoBox::new(&[7u8; 32])), PrivacyGate::new());
    AssistantContext::with_store(store, config, services, Arc::new(ScriptedVoice::new(Vec::<String>::new())))
}

#[tokio::test]
async fn offline_research_reports_unreachable_service() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AssistantConfig::default();
    config.set_offline_mode(true);
    let router = CommandRouter::new(context(dir.path(), config)).unwrap();

    let outcome = router.route("research black holes", Language::English).await;
    assert!(outcome.handled);
    assert_eq!(outcome.response, "I couldn't reach the search service right now.");
}

#[tokio::test]
async fn email_without_account_points_at_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let router = CommandRouter::new(context(dir.path(), AssistantConfig::default())).unwrap();

    let outcome = router
        .route("email bob@example.com about the report", Language::English)
        .await;
    assert_eq!(
        outcome.response,
        "I had trouble sending that email. Please check your email configuration."
    );
}

#[tokio::test]
async fn disallowed_program_is_refused_before_running() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AssistantConfig::default();
    config.allowed_commands = vec!["ls".to_string()];
    let router = CommandRouter::new(context(dir.path(), config)).unwrap();

    let outcome = router.route("update my system", Language::English).await;
    assert_eq!(outcome.response, "For security reasons, I can't execute that command.");
}
