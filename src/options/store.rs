use crate::options::model::{ListKind, OptionEntry, OptionList};
use crate::options::persistence::{Fallback, PersistenceAdapter};
use crate::utils::error_handling::{CraftError, CraftResult};
use std::collections::HashMap;

/// In-memory copy of the three option lists, written through to storage.
///
/// Each UI surface owns its own `OptionStore`; they only meet at the
/// [`PersistenceAdapter`]. Caller-input errors (`EmptyLabel`,
/// `DuplicateOption`, `IndexOutOfRange`) leave the list untouched. A
/// `PersistFailure` is returned after the in-memory change has been applied
/// and is kept, so the session stays usable until a later write succeeds.
pub struct OptionStore {
    adapter: PersistenceAdapter,
    lists: HashMap<ListKind, OptionList>,
}

impl OptionStore {
    /// Create a store and load every list from storage
    pub fn new(adapter: PersistenceAdapter) -> Self {
        let mut store = OptionStore {
            adapter,
            lists: HashMap::new(),
        };
        store.load_all();
        store
    }

    pub fn adapter(&self) -> &PersistenceAdapter {
        &self.adapter
    }

    /// Replace the in-memory list for `kind` with the persisted one.
    /// Returns the fallback reason if defaults were substituted.
    pub fn load(&mut self, kind: ListKind) -> Option<Fallback> {
        let loaded = self.adapter.read(kind);
        match &loaded.fallback {
            None => log::debug!("Loaded {} {} options", loaded.options.len(), kind),
            Some(Fallback::Missing) => log::debug!("No stored {} options, using defaults", kind),
            Some(reason) => {
                if let Some(e) = reason.as_error() {
                    log::warn!("Stored {} options unusable, using defaults: {}", kind, e);
                }
            }
        }
        self.lists.insert(kind, loaded.options);
        loaded.fallback
    }

    /// Reload all three lists, collecting any fallbacks
    pub fn load_all(&mut self) -> Vec<(ListKind, Fallback)> {
        ListKind::ALL
            .iter()
            .filter_map(|&kind| self.load(kind).map(|reason| (kind, reason)))
            .collect()
    }

    /// Current options for `kind`, most recently used first
    pub fn list(&self, kind: ListKind) -> &[OptionEntry] {
        self.lists.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, kind: ListKind, label: &str) -> bool {
        self.position_of_label(kind, label.trim(), None).is_some()
    }

    /// Append a new option
    pub fn add(&mut self, kind: ListKind, label: &str) -> CraftResult<()> {
        let label = normalize_label(label)?;
        if self.position_of_label(kind, &label, None).is_some() {
            return Err(CraftError::DuplicateOption(label));
        }

        self.list_mut(kind).push(OptionEntry::new(label));
        self.persist(kind)
    }

    /// Rename the option at `index`, keeping its position
    pub fn edit(&mut self, kind: ListKind, index: usize, new_label: &str) -> CraftResult<()> {
        self.check_index(kind, index)?;
        let label = normalize_label(new_label)?;
        if self.position_of_label(kind, &label, Some(index)).is_some() {
            return Err(CraftError::DuplicateOption(label));
        }

        self.list_mut(kind)[index] = OptionEntry::new(label);
        self.persist(kind)
    }

    /// Remove the option at `index`
    pub fn delete(&mut self, kind: ListKind, index: usize) -> CraftResult<()> {
        self.check_index(kind, index)?;
        let removed = self.list_mut(kind).remove(index);
        log::debug!("Removed {} option {:?}", kind, removed.label());
        self.persist(kind)
    }

    /// Move the option whose value is `value` to the front. Unknown values
    /// leave the order as is; the list is written either way.
    pub fn promote_to_top(&mut self, kind: ListKind, value: &str) -> CraftResult<()> {
        let list = self.list_mut(kind);
        if let Some(index) = list.iter().position(|entry| entry.value() == value) {
            list[..=index].rotate_right(1);
        }
        self.persist(kind)
    }

    fn list_mut(&mut self, kind: ListKind) -> &mut OptionList {
        self.lists.entry(kind).or_default()
    }

    fn check_index(&self, kind: ListKind, index: usize) -> CraftResult<()> {
        let len = self.list(kind).len();
        if index >= len {
            return Err(CraftError::IndexOutOfRange { index, len });
        }
        Ok(())
    }

    fn position_of_label(&self, kind: ListKind, label: &str, skip: Option<usize>) -> Option<usize> {
        self.list(kind)
            .iter()
            .enumerate()
            .position(|(i, entry)| Some(i) != skip && entry.label() == label)
    }

    fn persist(&self, kind: ListKind) -> CraftResult<()> {
        self.adapter.write(kind, self.list(kind)).map_err(|e| {
            log::warn!("{} options kept in memory only: {}", kind, e);
            e
        })
    }
}

/// Trim and reject empty labels
fn normalize_label(label: &str) -> CraftResult<String> {
    let label = label.trim();
    if label.is_empty() {
        return Err(CraftError::EmptyLabel);
    }
    Ok(label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::persistence::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    fn labels(store: &OptionStore, kind: ListKind) -> Vec<String> {
        store.list(kind).iter().map(|o| o.label().to_string()).collect()
    }

    fn store_with(kind: ListKind, items: &[&str]) -> OptionStore {
        let adapter = PersistenceAdapter::in_memory();
        let list: OptionList = items.iter().map(|s| OptionEntry::new(*s)).collect();
        adapter.write(kind, &list).unwrap();
        OptionStore::new(adapter)
    }

    /// Store whose writes always fail
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> CraftResult<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> CraftResult<()> {
            Err(CraftError::persist("quota exceeded"))
        }

        fn remove(&self, _key: &str) -> CraftResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_new_store_starts_from_defaults() {
        let store = OptionStore::new(PersistenceAdapter::in_memory());
        for kind in ListKind::ALL {
            assert_eq!(store.list(kind), kind.defaults().as_slice());
        }
    }

    #[test]
    fn test_add_appends_and_persists() {
        let mut store = OptionStore::new(PersistenceAdapter::in_memory());
        let before = store.list(ListKind::Role).len();

        store.add(ListKind::Role, "  Editor  ").unwrap();

        let mut reloaded = OptionStore::new(store.adapter().clone());
        reloaded.load(ListKind::Role);
        let list = reloaded.list(ListKind::Role);
        assert_eq!(list.len(), before + 1);
        assert_eq!(list.last().unwrap(), &OptionEntry::new("Editor"));
    }

    #[test]
    fn test_add_rejects_empty_and_duplicate() {
        let mut store = store_with(ListKind::Task, &["Summarize"]);

        assert!(matches!(store.add(ListKind::Task, "   "), Err(CraftError::EmptyLabel)));
        assert!(matches!(
            store.add(ListKind::Task, " Summarize "),
            Err(CraftError::DuplicateOption(label)) if label == "Summarize"
        ));
        assert_eq!(labels(&store, ListKind::Task), vec!["Summarize"]);
    }

    #[test]
    fn test_duplicate_check_is_case_sensitive() {
        let mut store = store_with(ListKind::Role, &["Editor"]);
        store.add(ListKind::Role, "editor").unwrap();
        assert_eq!(labels(&store, ListKind::Role), vec!["Editor", "editor"]);
    }

    #[test]
    fn test_edit_checks_other_entries_only() {
        let mut store = store_with(ListKind::Role, &["A", "B", "C"]);

        assert!(matches!(store.edit(ListKind::Role, 0, "B"), Err(CraftError::DuplicateOption(_))));
        store.edit(ListKind::Role, 1, " B ").unwrap();
        store.edit(ListKind::Role, 2, "D").unwrap();

        assert_eq!(labels(&store, ListKind::Role), vec!["A", "B", "D"]);
    }

    #[test]
    fn test_edit_rejects_bad_index_and_empty_label() {
        let mut store = store_with(ListKind::Format, &["JSON"]);

        assert!(matches!(
            store.edit(ListKind::Format, 1, "YAML"),
            Err(CraftError::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert!(matches!(store.edit(ListKind::Format, 0, ""), Err(CraftError::EmptyLabel)));
        assert_eq!(labels(&store, ListKind::Format), vec!["JSON"]);
    }

    #[test]
    fn test_delete_removes_only_that_entry() {
        let mut store = store_with(ListKind::Task, &["A", "B", "C"]);

        store.delete(ListKind::Task, 1).unwrap();
        assert_eq!(labels(&store, ListKind::Task), vec!["A", "C"]);

        assert!(matches!(
            store.delete(ListKind::Task, 2),
            Err(CraftError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert_eq!(labels(&store, ListKind::Task), vec!["A", "C"]);
    }

    #[test]
    fn test_promote_moves_to_front_preserving_order() {
        let mut store = store_with(ListKind::Role, &["A", "B", "C", "D"]);

        store.promote_to_top(ListKind::Role, "C").unwrap();
        assert_eq!(labels(&store, ListKind::Role), vec!["C", "A", "B", "D"]);

        store.promote_to_top(ListKind::Role, "C").unwrap();
        assert_eq!(labels(&store, ListKind::Role), vec!["C", "A", "B", "D"]);

        store.promote_to_top(ListKind::Role, "missing").unwrap();
        assert_eq!(labels(&store, ListKind::Role), vec!["C", "A", "B", "D"]);

        let reloaded = OptionStore::new(store.adapter().clone());
        assert_eq!(labels(&reloaded, ListKind::Role), vec!["C", "A", "B", "D"]);
    }

    #[test]
    fn test_persist_failure_keeps_memory_state() {
        let mut store = OptionStore::new(PersistenceAdapter::new(Arc::new(ReadOnlyStore)));
        let mut expected = labels(&store, ListKind::Role);

        let persist_failed = |result: CraftResult<()>| matches!(result, Err(CraftError::PersistFailure(_)));

        assert!(persist_failed(store.add(ListKind::Role, "Editor")));
        expected.push("Editor".to_string());
        assert_eq!(labels(&store, ListKind::Role), expected);

        assert!(persist_failed(store.edit(ListKind::Role, 0, "Staff Engineer")));
        expected[0] = "Staff Engineer".to_string();
        assert_eq!(labels(&store, ListKind::Role), expected);

        assert!(persist_failed(store.delete(ListKind::Role, 1)));
        expected.remove(1);
        assert_eq!(labels(&store, ListKind::Role), expected);

        assert!(persist_failed(store.promote_to_top(ListKind::Role, "Editor")));
        let editor = expected.pop().unwrap();
        expected.insert(0, editor);
        assert_eq!(labels(&store, ListKind::Role), expected);
        assert_eq!(store.list(ListKind::Role)[0].label(), "Editor");
    }

    #[test]
    fn test_rejections_skip_the_write() {
        let mut store = OptionStore::new(PersistenceAdapter::new(Arc::new(ReadOnlyStore)));
        let before = labels(&store, ListKind::Task);

        assert!(matches!(store.add(ListKind::Task, " "), Err(CraftError::EmptyLabel)));
        assert!(matches!(store.delete(ListKind::Task, 99), Err(CraftError::IndexOutOfRange { .. })));
        assert_eq!(labels(&store, ListKind::Task), before);
    }

    #[test]
    fn test_corrupted_record_loads_defaults() {
        let memory = Arc::new(MemoryStore::new());
        memory.set(ListKind::Role.storage_key(), "not json").unwrap();
        let mut store = OptionStore::new(PersistenceAdapter::new(memory));

        assert_eq!(store.list(ListKind::Role), ListKind::Role.defaults().as_slice());
        assert!(matches!(store.load(ListKind::Role), Some(Fallback::Malformed(_))));
    }

    #[test]
    fn test_end_to_end_add_promote_edit() {
        let mut store = OptionStore::new(PersistenceAdapter::in_memory());
        let defaults_len = ListKind::Role.defaults().len();

        store.add(ListKind::Role, "Editor").unwrap();
        store.promote_to_top(ListKind::Role, "Editor").unwrap();
        store.edit(ListKind::Role, 0, "Senior Editor").unwrap();

        let list = store.list(ListKind::Role);
        assert_eq!(list[0].label(), "Senior Editor");
        assert_eq!(list[0].value(), "Senior Editor");
        assert_eq!(list.len(), defaults_len + 1);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn unique_labels() -> impl Strategy<Value = Vec<String>> {
            prop::collection::hash_set("[A-Za-z][A-Za-z ]{0,10}[a-z]", 1..8)
                .prop_map(|set| set.into_iter().collect())
        }

        proptest! {
            #[test]
            fn add_then_load_appends_exactly_one(items in unique_labels(), label in "[A-Za-z]{1,12}") {
                let refs: Vec<&str> = items.iter().map(String::as_str).collect();
                let mut store = store_with(ListKind::Task, &refs);
                prop_assume!(!items.contains(&label));

                store.add(ListKind::Task, &label).unwrap();
                store.load(ListKind::Task);

                let expected: Vec<OptionEntry> = refs.iter().map(|s| OptionEntry::new(*s)).collect();
                let list = store.list(ListKind::Task);
                prop_assert_eq!(list.len(), items.len() + 1);
                prop_assert_eq!(&list[..items.len()], expected.as_slice());
                prop_assert_eq!(list.last().unwrap(), &OptionEntry::new(label));
            }

            #[test]
            fn add_existing_label_is_rejected(items in unique_labels(), pick in any::<prop::sample::Index>()) {
                let refs: Vec<&str> = items.iter().map(String::as_str).collect();
                let mut store = store_with(ListKind::Role, &refs);
                let existing = pick.get(&items).clone();

                let padded = format!("  {}\t", existing);
                prop_assert!(
                    matches!(store.add(ListKind::Role, &padded), Err(CraftError::DuplicateOption(_))),
                    "expected duplicate rejection"
                );
                prop_assert_eq!(labels(&store, ListKind::Role), items);
            }

            #[test]
            fn promote_is_idempotent(items in unique_labels(), pick in any::<prop::sample::Index>()) {
                let refs: Vec<&str> = items.iter().map(String::as_str).collect();
                let mut once = store_with(ListKind::Format, &refs);
                let mut twice = store_with(ListKind::Format, &refs);
                let value = pick.get(&items).clone();

                once.promote_to_top(ListKind::Format, &value).unwrap();
                twice.promote_to_top(ListKind::Format, &value).unwrap();
                twice.promote_to_top(ListKind::Format, &value).unwrap();

                prop_assert_eq!(labels(&once, ListKind::Format), labels(&twice, ListKind::Format));
                prop_assert_eq!(&labels(&once, ListKind::Format)[0], &value);
            }

            #[test]
            fn delete_removes_exactly_one(items in unique_labels(), index in 0usize..10) {
                let refs: Vec<&str> = items.iter().map(String::as_str).collect();
                let mut store = store_with(ListKind::Task, &refs);

                let result = store.delete(ListKind::Task, index);
                if index < items.len() {
                    prop_assert!(result.is_ok());
                    let mut expected = items.clone();
                    expected.remove(index);
                    prop_assert_eq!(labels(&store, ListKind::Task), expected);
                } else {
                    let rejected = matches!(result, Err(CraftError::IndexOutOfRange { .. }));
                    prop_assert!(rejected, "expected index rejection");
                    prop_assert_eq!(labels(&store, ListKind::Task), items);
                }
            }
        }
    }
}
