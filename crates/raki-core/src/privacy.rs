//! Incognito flag shared by the control path and every store handle.
//!
//! While enabled, [`StateStore::save`](crate::store::StateStore::save) writes nothing.
//! Reads are never affected, and turning the flag on does not scrub data that was
//! already persisted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct PrivacyGate {
    incognito: Arc<AtomicBool>,
}

impl PrivacyGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&self) {
        self.set(true);
    }

    pub fn disable(&self) {
        self.set(false);
    }

    pub fn set(&self, enabled: bool) {
        let was = self.incognito.swap(enabled, Ordering::SeqCst);
        if was != enabled {
            tracing::info!(target: "raki::privacy", incognito = enabled, "privacy mode changed");
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.incognito.load(Ordering::SeqCst)
    }
}
