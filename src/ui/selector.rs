use crate::options::{filter, ListKind, OptionEntry, OptionStore, PersistenceAdapter, SyncBridge, VersionToken};
use crate::prompt::{PromptField, PromptForm};
use crate::utils::error_handling::CraftResult;
use std::collections::HashMap;

/// Open state and search text of one dropdown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropdownState {
    pub open: bool,
    pub search: String,
}

/// Inline dropdowns next to the role, task and output-format fields.
///
/// Keeps its own copy of the lists and reloads it when the configuration
/// editor has bumped the version since the last look.
pub struct SelectorSurface {
    store: OptionStore,
    bridge: SyncBridge,
    dropdowns: HashMap<ListKind, DropdownState>,
}

impl SelectorSurface {
    pub fn new(adapter: PersistenceAdapter, token: VersionToken) -> Self {
        SelectorSurface {
            store: OptionStore::new(adapter),
            bridge: SyncBridge::new(token),
            dropdowns: ListKind::ALL.iter().map(|&kind| (kind, DropdownState::default())).collect(),
        }
    }

    pub fn store(&self) -> &OptionStore {
        &self.store
    }

    /// Pick up edits committed elsewhere. Returns whether the lists were reloaded.
    pub fn refresh(&mut self) -> bool {
        let (reloaded, fallbacks) = self.bridge.sync(&mut self.store);
        for (kind, reason) in fallbacks {
            log::debug!("Selector {} options fell back to defaults: {:?}", kind, reason);
        }
        reloaded
    }

    pub fn dropdown(&self, kind: ListKind) -> DropdownState {
        self.dropdowns.get(&kind).cloned().unwrap_or_default()
    }

    fn dropdown_mut(&mut self, kind: ListKind) -> &mut DropdownState {
        self.dropdowns.entry(kind).or_default()
    }

    pub fn set_dropdown_open(&mut self, kind: ListKind, open: bool) {
        if open {
            self.refresh();
        }
        self.dropdown_mut(kind).open = open;
    }

    pub fn toggle_dropdown(&mut self, kind: ListKind) -> bool {
        let open = !self.dropdown(kind).open;
        self.set_dropdown_open(kind, open);
        open
    }

    pub fn set_search(&mut self, kind: ListKind, search: impl Into<String>) {
        self.dropdown_mut(kind).search = search.into();
    }

    /// Options matching the dropdown's current search text
    pub fn options(&self, kind: ListKind) -> Vec<&OptionEntry> {
        let search = self.dropdowns.get(&kind).map(|d| d.search.as_str()).unwrap_or("");
        filter(kind, self.store.list(kind), search)
    }

    /// Write a picked value into the bound field and move it to the front of
    /// its list. The form and dropdown update even if the reorder cannot be saved.
    pub fn select(&mut self, kind: ListKind, value: &str, form: &mut PromptForm) -> CraftResult<()> {
        self.refresh();
        form.set(PromptField::for_list(kind), value);

        let dropdown = self.dropdown_mut(kind);
        dropdown.open = false;
        dropdown.search.clear();

        self.store.promote_to_top(kind, value)
    }
}
