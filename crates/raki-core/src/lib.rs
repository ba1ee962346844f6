//! raki-core: the Raki assistant's state, background tasks and command router.
//!
//! Everything that is persisted goes through the [`StateStore`] as an encrypted
//! document; nothing reaches disk while the [`PrivacyGate`] is on.

mod config;
mod context;
mod conversation;
mod crypto;
mod documents;
mod error;
mod health;
mod language;
mod privacy;
mod reminders;
mod secure_memory;
mod store;
pub mod background;
pub mod router;
pub mod services;

pub use config::{AssistantConfig, AssistantOverrides, RuntimeSettings};
pub use context::AssistantContext;
pub use conversation::{recurring_topic, ConversationRecorder};
pub use crypto::CryptoBox;
pub use documents::{
    ConversationExchange, ConversationLog, Reminder, ReminderSet, CONVERSATION_WINDOW,
};
pub use error::{CoreError, CoreResult, DecryptError};
pub use health::{advisory, diagnose, summarize_issues, system_summary, HealthThresholds, MAX_REPORTED_ISSUES};
pub use language::Language;
pub use privacy::PrivacyGate;
pub use reminders::{parse_due_time, ReminderBook};
pub use router::{Action, CommandRouter, RouteOutcome, RuleSpec, RuleTable, Trigger};
pub use secure_memory::SecretBuf;
pub use store::{Document, SaveOutcome, StateStore};

// Speech trait re-exported so callers need only one import path.
pub use raki_voice::{VoiceError, VoiceIo};
