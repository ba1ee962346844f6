//! **StateStore**: encrypted JSON documents, one file per document.
//!
//! * `load` is fail-open: a missing, unreadable, undecryptable or unparsable file
//!   yields `D::default()` and a warning, never an error.
//! * `save` replaces the whole document atomically (temp file + rename) and is a
//!   silent no-op while the [`PrivacyGate`] is enabled.
//! * There is no transaction protocol. Callers serialize their own
//!   read-modify-write cycles (see `ReminderBook` and `ConversationRecorder`).

use crate::config::AssistantConfig;
use crate::crypto::CryptoBox;
use crate::documents::{ConversationLog, ReminderSet};
use crate::error::CoreResult;
use crate::privacy::PrivacyGate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// One logical unit of persisted state.
pub trait Document: Serialize + DeserializeOwned + Default {
    /// Short identifier used in logs.
    const ID: &'static str;
    /// File name inside the data directory.
    const FILE_NAME: &'static str;
}

impl Document for ReminderSet {
    const ID: &'static str = "reminders";
    const FILE_NAME: &'static str = "reminders.rak";
}

impl Document for ConversationLog {
    const ID: &'static str = "conversation";
    const FILE_NAME: &'static str = "conversation.rak";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Written,
    /// Privacy mode was on; nothing touched the disk.
    Suppressed,
}

#[derive(Clone)]
pub struct StateStore {
    dir: PathBuf,
    crypto: Arc<CryptoBox>,
    privacy: PrivacyGate,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>, crypto: Arc<CryptoBox>, privacy: PrivacyGate) -> Self {
        Self {
            dir: dir.into(),
            crypto,
            privacy,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn privacy(&self) -> &PrivacyGate {
        &self.privacy
    }

    pub fn path_of<D: Document>(&self) -> PathBuf {
        self.dir.join(D::FILE_NAME)
    }

    pub fn exists<D: Document>(&self) -> bool {
        self.path_of::<D>().is_file()
    }

    pub fn load<D: Document>(&self) -> D {
        let path = self.path_of::<D>();
        let token = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(target: "raki::store", document = D::ID, "no document on disk; using empty default");
                return D::default();
            }
            Err(e) => {
                warn!(target: "raki::store", document = D::ID, error = %e, "document unreadable; using empty default");
                return D::default();
            }
        };
        let plain = match self.crypto.decrypt_secret(&token) {
            Ok(plain) => plain,
            Err(e) => {
                warn!(target: "raki::store", document = D::ID, error = %e, "document failed to decrypt; using empty default");
                return D::default();
            }
        };
        match serde_json::from_slice(plain.as_slice()) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(target: "raki::store", document = D::ID, error = %e, "document is not valid JSON; using empty default");
                D::default()
            }
        }
    }

    pub fn save<D: Document>(&self, doc: &D) -> CoreResult<SaveOutcome> {
        if self.privacy.is_enabled() {
            debug!(target: "raki::store", document = D::ID, "incognito: save suppressed");
            return Ok(SaveOutcome::Suppressed);
        }
        let plain = serde_json::to_vec(doc)?;
        let token = self.crypto.encrypt(&plain)?;
        write_atomic(&self.path_of::<D>(), &token)?;
        debug!(target: "raki::store", document = D::ID, bytes = token.len(), "document saved");
        Ok(SaveOutcome::Written)
    }

    /// Deletes one document file. Returns whether a file was removed.
    pub fn remove<D: Document>(&self) -> CoreResult<bool> {
        match fs::remove_file(self.path_of::<D>()) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes the Config, ReminderSet and ConversationLog documents. The key is kept.
    pub fn wipe(&self) -> CoreResult<usize> {
        let removed = [
            self.remove::<AssistantConfig>()?,
            self.remove::<ReminderSet>()?,
            self.remove::<ConversationLog>()?,
        ]
        .iter()
        .filter(|r| **r)
        .count();
        warn!(target: "raki::store", removed, "stored documents wiped");
        Ok(removed)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)?;
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let tmp = dir.join(format!(".{}.tmp", file_name));
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Reminder;
    use chrono::Utc;

    fn store_in(dir: &Path) -> StateStore {
        let crypto = Arc::new(CryptoBox::new(&[7u8; 32]));
        StateStore::new(dir, crypto, PrivacyGate::new())
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let now = Utc::now();
        let set = ReminderSet(vec![Reminder::new("water plants", now, now)]);
        assert_eq!(store.save(&set).unwrap(), SaveOutcome::Written);
        assert_eq!(store.load::<ReminderSet>(), set);
        let raw = fs::read(store.path_of::<ReminderSet>()).unwrap();
        assert!(!String::from_utf8_lossy(&raw).contains("water plants"));
    }

    #[test]
    fn missing_document_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(store.load::<ConversationLog>().is_empty());
        assert!(!store.exists::<ConversationLog>());
    }

    #[test]
    fn leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store.save(&AssistantConfig::default()).unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["raki_config.rak".to_string()]);
    }

    #[test]
    fn wipe_removes_documents() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store.save(&AssistantConfig::default()).unwrap();
        store.save(&ReminderSet::default()).unwrap();
        assert_eq!(store.wipe().unwrap(), 2);
        assert_eq!(store.wipe().unwrap(), 0);
        assert!(!store.exists::<AssistantConfig>());
    }
}
