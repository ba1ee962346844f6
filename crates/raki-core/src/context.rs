//! Explicit context handed to the router and the daemon's tasks (no globals).

use crate::config::AssistantConfig;
use crate::conversation::ConversationRecorder;
use crate::crypto::CryptoBox;
use crate::error::CoreResult;
use crate::health::HealthThresholds;
use crate::privacy::PrivacyGate;
use crate::reminders::ReminderBook;
use crate::services::Services;
use crate::store::StateStore;
use raki_voice::VoiceIo;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AssistantContext {
    pub config: Arc<AssistantConfig>,
    pub store: StateStore,
    pub privacy: PrivacyGate,
    pub reminders: ReminderBook,
    pub conversation: ConversationRecorder,
    pub services: Services,
    pub voice: Arc<dyn VoiceIo>,
    pub thresholds: HealthThresholds,
}

impl AssistantContext {
    /// Opens the store in `data_dir` and loads reminders and history from it.
    pub fn open(
        data_dir: impl Into<PathBuf>,
        crypto: Arc<CryptoBox>,
        config: AssistantConfig,
        services: Services,
        voice: Arc<dyn VoiceIo>,
    ) -> Self {
        let privacy = PrivacyGate::new();
        let store = StateStore::new(data_dir, crypto, privacy.clone());
        Self::with_store(store, config, services, voice)
    }

    pub fn with_store(
        store: StateStore,
        config: AssistantConfig,
        services: Services,
        voice: Arc<dyn VoiceIo>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            privacy: store.privacy().clone(),
            reminders: ReminderBook::open(store.clone()),
            conversation: ConversationRecorder::open(store.clone()),
            store,
            services,
            voice,
            thresholds: HealthThresholds::default(),
        }
    }

    /// Deletes the stored documents and forgets the in-memory reminders and history.
    ///
    /// Both collection locks are held across the file removal, so a scheduler pass
    /// or a recorded exchange cannot write the old contents back afterwards.
    /// Lock order is reminders, then conversation.
    pub async fn wipe_history(&self) -> CoreResult<usize> {
        let mut reminders = self.reminders.lock().await;
        let mut log = self.conversation.lock().await;
        let removed = self.store.wipe()?;
        reminders.0.clear();
        log.0.clear();
        Ok(removed)
    }
}
