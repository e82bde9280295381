use crate::options::{ListKind, OptionEntry, OptionStore, PersistenceAdapter, VersionToken};
use crate::utils::error_handling::{CraftError, CraftResult};
use serde::{Deserialize, Serialize};

/// What the draft text will be committed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum EditTarget {
    Existing { kind: ListKind, index: usize },
    New { kind: ListKind },
}

impl EditTarget {
    pub fn kind(&self) -> ListKind {
        match self {
            EditTarget::Existing { kind, .. } | EditTarget::New { kind } => *kind,
        }
    }
}

/// Configuration editor for the three option lists.
///
/// Mutations persist immediately; closing the editor bumps the shared
/// version so other surfaces reload.
pub struct ConfigSurface {
    store: OptionStore,
    token: VersionToken,
    open: bool,
    edit_target: Option<EditTarget>,
    draft: String,
}

impl ConfigSurface {
    pub fn new(adapter: PersistenceAdapter, token: VersionToken) -> Self {
        ConfigSurface {
            store: OptionStore::new(adapter),
            token,
            open: false,
            edit_target: None,
            draft: String::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn store(&self) -> &OptionStore {
        &self.store
    }

    pub fn options(&self, kind: ListKind) -> &[OptionEntry] {
        self.store.list(kind)
    }

    pub fn edit_target(&self) -> Option<EditTarget> {
        self.edit_target
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Start an editing session from the stored lists
    pub fn open(&mut self) {
        if self.open {
            return;
        }
        log::info!("Opening option configuration");
        for (kind, reason) in self.store.load_all() {
            log::debug!("{} options fell back to defaults: {:?}", kind, reason);
        }
        self.open = true;
    }

    /// End the session and announce the change. Returns the new version, or
    /// `None` if the editor was not open.
    pub fn close(&mut self) -> Option<u64> {
        self.cancel_edit();
        if !self.open {
            return None;
        }
        self.open = false;
        let version = self.token.bump();
        log::info!("Option configuration closed, version {}", version);
        Some(version)
    }

    /// Edit the option at `index`, seeding the draft with its label
    pub fn begin_edit(&mut self, kind: ListKind, index: usize) -> CraftResult<()> {
        self.ensure_open();
        let entry = self
            .store
            .list(kind)
            .get(index)
            .ok_or(CraftError::IndexOutOfRange {
                index,
                len: self.store.list(kind).len(),
            })?;
        self.draft = entry.label().to_string();
        self.edit_target = Some(EditTarget::Existing { kind, index });
        Ok(())
    }

    /// Start typing into the "new option" input for `kind`
    pub fn begin_add(&mut self, kind: ListKind) {
        self.ensure_open();
        if self.edit_target != Some(EditTarget::New { kind }) {
            self.draft.clear();
        }
        self.edit_target = Some(EditTarget::New { kind });
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn cancel_edit(&mut self) {
        self.edit_target = None;
        self.draft.clear();
    }

    /// Apply the draft to the current target. Rejected input keeps the draft
    /// so it can be corrected.
    pub fn commit(&mut self) -> CraftResult<()> {
        let target = self
            .edit_target
            .ok_or_else(|| CraftError::protocol("No option is being edited"))?;

        let result = match target {
            EditTarget::Existing { kind, index } => self.store.edit(kind, index, &self.draft),
            EditTarget::New { kind } => self.store.add(kind, &self.draft),
        };

        match result {
            Err(e) if e.is_rejection() => Err(e),
            other => {
                self.cancel_edit();
                other
            }
        }
    }

    pub fn add(&mut self, kind: ListKind, label: &str) -> CraftResult<()> {
        self.ensure_open();
        self.store.add(kind, label)
    }

    pub fn edit(&mut self, kind: ListKind, index: usize, label: &str) -> CraftResult<()> {
        self.ensure_open();
        self.store.edit(kind, index, label)
    }

    /// Delete the option at `index`, dropping an edit that pointed at it
    pub fn delete(&mut self, kind: ListKind, index: usize) -> CraftResult<()> {
        self.ensure_open();
        let removed = self.store.delete(kind, index);
        if removed.is_ok() || matches!(removed, Err(CraftError::PersistFailure(_))) {
            if let Some(EditTarget::Existing { kind: k, .. }) = self.edit_target {
                if k == kind {
                    self.cancel_edit();
                }
            }
        }
        removed
    }

    /// Changes always belong to a session, so the next `close` announces them
    fn ensure_open(&mut self) {
        if !self.open {
            self.open();
        }
    }
}
