//! **ConversationRecorder**: appends every handled exchange to the ConversationLog.
//!
//! The in-memory window is always updated so the session keeps its context; the
//! save is suppressed by the store while incognito is on.

use crate::documents::{ConversationExchange, ConversationLog};
use crate::language::Language;
use crate::store::{SaveOutcome, StateStore};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// Words must be longer than this to count as a conversation topic.
const SIGNIFICANT_WORD_LEN: usize = 5;

#[derive(Clone)]
pub struct ConversationRecorder {
    log: Arc<Mutex<ConversationLog>>,
    store: StateStore,
}

impl ConversationRecorder {
    pub fn open(store: StateStore) -> Self {
        let log: ConversationLog = store.load();
        debug!(target: "raki::conversation", entries = log.len(), "conversation log loaded");
        Self {
            log: Arc::new(Mutex::new(log)),
            store,
        }
    }

    pub async fn record(&self, user_text: &str, assistant_text: &str, language: Language) {
        self.record_at(user_text, assistant_text, language, Utc::now()).await
    }

    pub async fn record_at(
        &self,
        user_text: &str,
        assistant_text: &str,
        language: Language,
        timestamp: DateTime<Utc>,
    ) {
        let mut log = self.log.lock().await;
        log.push(ConversationExchange {
            timestamp,
            user_text: user_text.to_string(),
            assistant_text: assistant_text.to_string(),
            language: language.code().to_string(),
        });
        match self.store.save(&*log) {
            Ok(SaveOutcome::Written) => {}
            Ok(SaveOutcome::Suppressed) => {
                debug!(target: "raki::conversation", "incognito: exchange kept in memory only")
            }
            Err(e) => warn!(target: "raki::conversation", error = %e, "failed to persist conversation log"),
        }
    }

    /// Up to `n` most recent exchanges, oldest first.
    pub async fn recent(&self, n: usize) -> Vec<ConversationExchange> {
        self.log.lock().await.recent(n).to_vec()
    }

    pub async fn len(&self) -> usize {
        self.log.lock().await.len()
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, ConversationLog> {
        self.log.lock().await
    }
}

/// The most frequent word longer than five letters that appears at least twice
/// across `texts`. Ties go to the word seen most recently.
pub fn recurring_topic<'a, I>(texts: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let mut position = 0usize;
    for text in texts {
        for raw in text.split(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-') {
            let word = raw.trim_matches(|c| c == '\'' || c == '-').to_lowercase();
            if word.chars().count() <= SIGNIFICANT_WORD_LEN {
                continue;
            }
            position += 1;
            let entry = counts.entry(word).or_insert((0, 0));
            entry.0 += 1;
            entry.1 = position;
        }
    }
    counts
        .into_iter()
        .filter(|(_, (count, _))| *count >= 2)
        .max_by_key(|(_, (count, last_seen))| (*count, *last_seen))
        .map(|(word, _)| word)
}
