use crate::options::model::ListKind;
use crate::options::persistence::Fallback;
use crate::options::store::OptionStore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Change counter shared between surfaces. Carries no data; a higher value
/// only means "the stored lists may have changed".
#[derive(Debug, Clone, Default)]
pub struct VersionToken {
    value: Arc<AtomicU64>,
}

impl VersionToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }

    /// Signal a completed edit session, returning the new version
    pub fn bump(&self) -> u64 {
        self.value.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Reloads a surface's store whenever the token has moved on
#[derive(Debug)]
pub struct SyncBridge {
    token: VersionToken,
    observed: u64,
}

impl SyncBridge {
    /// Bridge that treats the token's current value as already seen
    pub fn new(token: VersionToken) -> Self {
        let observed = token.current();
        SyncBridge { token, observed }
    }

    pub fn observed(&self) -> u64 {
        self.observed
    }

    pub fn needs_reload(&self) -> bool {
        self.token.current() != self.observed
    }

    /// Reload all lists wholesale if the token advanced. Returns whether a
    /// reload happened, along with any kinds that fell back to defaults.
    pub fn sync(&mut self, store: &mut OptionStore) -> (bool, Vec<(ListKind, Fallback)>) {
        let current = self.token.current();
        if current == self.observed {
            return (false, Vec::new());
        }

        log::debug!("Option version {} -> {}, reloading", self.observed, current);
        let fallbacks = store.load_all();
        self.observed = current;
        (true, fallbacks)
    }
}
