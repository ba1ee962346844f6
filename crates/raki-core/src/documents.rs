//! Persisted entities: reminders and conversation history.
//!
//! Both collections serialize as bare JSON arrays so a decrypted document is a plain
//! list of records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Most recent exchanges kept in the conversation log.
pub const CONVERSATION_WINDOW: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub text: String,
    pub due_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    pub fn new(text: impl Into<String>, due_at: DateTime<Utc>, created_at: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            due_at,
            created_at,
        }
    }

    #[inline]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at <= now
    }
}

/// Reminders in insertion order. Duplicate texts are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderSet(pub Vec<Reminder>);

impl ReminderSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reminder> {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationExchange {
    pub timestamp: DateTime<Utc>,
    pub user_text: String,
    pub assistant_text: String,
    pub language: String,
}

/// FIFO window of the most recent exchanges, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationLog(pub Vec<ConversationExchange>);

impl ConversationLog {
    /// Appends and evicts from the front until at most `CONVERSATION_WINDOW` remain.
    pub fn push(&mut self, exchange: ConversationExchange) {
        self.0.push(exchange);
        if self.0.len() > CONVERSATION_WINDOW {
            let excess = self.0.len() - CONVERSATION_WINDOW;
            self.0.drain(..excess);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The last `n` exchanges, oldest first.
    pub fn recent(&self, n: usize) -> &[ConversationExchange] {
        let start = self.0.len().saturating_sub(n);
        &self.0[start..]
    }
}
