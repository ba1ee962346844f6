//! Integration test: CommandRouter end to end against in-memory collaborators.

mod common;

use chrono::{Duration, Utc};
use common::harness;
use raki_core::background::{announcement_channel, ReminderScheduler};
use raki_core::{Action, CommandRouter, ConversationLog, Language, ReminderSet};
use raki_voice::ScriptedVoice;

#[tokio::test]
async fn update_wins_over_fallback_and_runs_apt() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), ScriptedVoice::new(Vec::<String>::new()));
    let router = CommandRouter::new(h.ctx.clone()).unwrap();

    assert_eq!(router.classify("update system", Language::English), Some(Action::Update));
    let outcome = router.route("Update system", Language::English).await;
    assert!(outcome.handled);
    assert!(outcome.continue_running);
    assert_eq!(
        h.shell.commands.lock().unwrap().as_slice(),
        ["sudo apt update && sudo apt upgrade -y"]
    );
}

#[tokio::test]
async fn install_rejects_shell_metacharacters() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), ScriptedVoice::new(Vec::<String>::new()));
    let router = CommandRouter::new(h.ctx.clone()).unwrap();

    router.route("install vlc; reboot", Language::English).await;
    assert!(h.shell.commands.lock().unwrap().is_empty());

    let outcome = router.route("install vlc", Language::English).await;
    assert_eq!(outcome.response, "I've successfully installed vlc for you.");
    assert_eq!(
        h.shell.commands.lock().unwrap().as_slice(),
        ["sudo apt install vlc -y"]
    );
}

#[tokio::test]
async fn email_asks_for_subject_before_sending() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), ScriptedVoice::new(["Lunch plans"]));
    let router = CommandRouter::new(h.ctx.clone()).unwrap();

    let outcome = router
        .route("email bob@example.com about lunch tomorrow", Language::English)
        .await;

    assert_eq!(h.voice.spoken_texts(), vec!["What should the subject be?".to_string()]);
    let sent = h.mailer.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "bob@example.com");
    assert_eq!(sent[0].subject, "Lunch plans");
    assert_eq!(sent[0].body, "lunch tomorrow");
    assert_eq!(outcome.response, "Email sent to bob@example.com successfully.");
}

#[tokio::test]
async fn email_without_subject_answer_uses_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let voice = ScriptedVoice::new(Vec::<String>::new());
    voice.push_silence();
    let h = harness(dir.path(), voice);
    let router = CommandRouter::new(h.ctx.clone()).unwrap();

    router.route("email ann@example.com hello there", Language::English).await;
    let sent = h.mailer.sent.lock().unwrap().clone();
    assert_eq!(sent[0].subject, "No subject");
}

#[tokio::test]
async fn relative_reminder_fires_after_its_delay() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), ScriptedVoice::new(Vec::<String>::new()));
    let router = CommandRouter::new(h.ctx.clone()).unwrap();

    let t0 = Utc::now();
    let outcome = router
        .route("remind me to stretch in 2 minute", Language::English)
        .await;
    assert!(outcome.response.starts_with("Okay, I'll remind you about stretch at "));
    assert_eq!(h.ctx.reminders.len().await, 1);

    let (tx, mut rx) = announcement_channel();
    let scheduler = ReminderScheduler::new(h.ctx.reminders.clone(), std::time::Duration::from_secs(60), tx);
    assert!(scheduler.run_pass(t0 + Duration::seconds(30)).await.is_empty());
    let fired = scheduler.run_pass(t0 + Duration::seconds(121)).await;
    assert_eq!(fired.len(), 1);
    assert_eq!(rx.recv().await.unwrap().text, "Reminder: stretch");

    let on_disk: ReminderSet = h.ctx.store.load();
    assert!(on_disk.is_empty());
}

#[tokio::test]
async fn incognito_keeps_exchanges_off_disk() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), ScriptedVoice::new(Vec::<String>::new()));
    let router = CommandRouter::new(h.ctx.clone()).unwrap();

    router.route("incognito on", Language::English).await;
    assert!(h.ctx.privacy.is_enabled());

    h.ctx.conversation.record("tell me a joke", "a joke", Language::English).await;
    router.route("remind me to water plants at 18:00", Language::English).await;
    assert!(!h.ctx.store.exists::<ConversationLog>());
    assert!(!h.ctx.store.exists::<ReminderSet>());
    assert_eq!(h.ctx.conversation.len().await, 1);

    router.route("incognito off", Language::English).await;
    assert!(!h.ctx.privacy.is_enabled());
    h.ctx.conversation.record("thanks", "You're welcome!", Language::English).await;
    assert!(h.ctx.store.exists::<ConversationLog>());
}

#[tokio::test]
async fn wipe_clears_disk_and_memory() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), ScriptedVoice::new(Vec::<String>::new()));
    let router = CommandRouter::new(h.ctx.clone()).unwrap();

    router.route("remind me to call mom in 1 hour", Language::English).await;
    h.ctx.conversation.record("hello", "Hi!", Language::English).await;

    let outcome = router.route("wipe history", Language::English).await;
    assert_eq!(outcome.response, "All personal data has been securely erased.");
    assert!(!h.ctx.store.exists::<ReminderSet>());
    assert!(!h.ctx.store.exists::<ConversationLog>());
    assert_eq!(h.ctx.reminders.len().await, 0);
    assert_eq!(h.ctx.conversation.len().await, 0);
}

#[tokio::test]
async fn incidental_wipe_keeps_stored_data() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), ScriptedVoice::new(Vec::<String>::new()));
    let router = CommandRouter::new(h.ctx.clone()).unwrap();

    router.route("remind me to call mom in 1 hour", Language::English).await;
    let outcome = router
        .route("how do i wipe my laptop screen", Language::English)
        .await;
    assert_ne!(outcome.response, "All personal data has been securely erased.");
    assert!(h.ctx.store.exists::<ReminderSet>());
    assert_eq!(h.ctx.reminders.len().await, 1);
}

#[tokio::test]
async fn help_request_never_runs_a_command() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), ScriptedVoice::new(Vec::<String>::new()));
    let router = CommandRouter::new(h.ctx.clone()).unwrap();

    assert_eq!(router.classify("help me install vim", Language::English), Some(Action::Help));
    let outcome = router.route("help me install vim", Language::English).await;
    assert!(outcome.handled);
    assert!(outcome.response.starts_with("I can install software"));
    assert!(h.shell.commands.lock().unwrap().is_empty());
}

#[tokio::test]
async fn fallback_mentions_recurring_topic() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), ScriptedVoice::new(Vec::<String>::new()));
    let router = CommandRouter::new(h.ctx.clone()).unwrap();

    h.ctx
        .conversation
        .record("my garden needs work", "ok", Language::English)
        .await;
    let outcome = router.route("the garden again", Language::English).await;
    assert!(!outcome.handled);
    assert!(outcome.response.contains("garden"));

    let outcome = router.route("blue sky", Language::English).await;
    assert!(!outcome.handled);
    assert!(outcome.response.starts_with("I'm not sure I understood"));
}

#[tokio::test]
async fn empty_input_is_not_handled() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), ScriptedVoice::new(Vec::<String>::new()));
    let router = CommandRouter::new(h.ctx.clone()).unwrap();

    let outcome = router.route("   ", Language::English).await;
    assert!(!outcome.handled);
    assert!(outcome.continue_running);
    assert!(outcome.response.is_empty());
}

#[tokio::test]
async fn exit_and_language_switch() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), ScriptedVoice::new(Vec::<String>::new()));
    let router = CommandRouter::new(h.ctx.clone()).unwrap();

    let outcome = router.route("speak French", Language::English).await;
    assert_eq!(outcome.language_switch, Some(Language::French));

    let outcome = router.route("parle anglais", Language::French).await;
    assert_eq!(outcome.language_switch, Some(Language::English));

    let outcome = router.route("goodbye", Language::English).await;
    assert!(!outcome.continue_running);
    let outcome = router.route("au revoir", Language::French).await;
    assert!(!outcome.continue_running);
}

#[tokio::test]
async fn amharic_session_uses_english_rules() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), ScriptedVoice::new(Vec::<String>::new()));
    let router = CommandRouter::new(h.ctx.clone()).unwrap();

    assert_eq!(router.classify("open example.com", Language::Amharic), Some(Action::OpenSite));
    router.route("open example.com", Language::Amharic).await;
    assert_eq!(
        h.browser.opened.lock().unwrap().as_slice(),
        ["https://example.com"]
    );
}

#[tokio::test]
async fn discuss_uses_summary() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), ScriptedVoice::new(Vec::<String>::new()));
    let router = CommandRouter::new(h.ctx.clone()).unwrap();

    let outcome = router.route("let's discuss rust", Language::English).await;
    assert_eq!(
        outcome.response,
        "Let's talk about rust. Rust is a systems language. It is memory safe. What would you like to know?"
    );
}
