//! Backend for a prompt builder whose role, task and output-format fields
//! offer user-editable option lists.

pub mod communication;
pub mod config;
pub mod options;
pub mod prompt;
pub mod ui;
pub mod utils;

use crate::config::Settings;
use crate::options::{PersistenceAdapter, VersionToken};
use crate::prompt::PromptForm;
use crate::ui::{ConfigSurface, SelectorSurface};
use crate::utils::error_handling::CraftResult;

/// Both option surfaces plus the form they feed.
///
/// The surfaces share only the storage adapter and the version token; each
/// keeps its own copy of the lists.
pub struct PromptCraft {
    pub config: ConfigSurface,
    pub selector: SelectorSurface,
    pub form: PromptForm,
}

impl PromptCraft {
    /// Wire both surfaces to `adapter`
    pub fn new(adapter: PersistenceAdapter) -> Self {
        let token = VersionToken::new();
        PromptCraft {
            config: ConfigSurface::new(adapter.clone(), token.clone()),
            selector: SelectorSurface::new(adapter, token),
            form: PromptForm::new(),
        }
    }

    /// Open the storage described by `settings`
    pub fn from_settings(settings: &Settings) -> CraftResult<Self> {
        let adapter = settings.open_storage()?;
        log::info!("Option storage ready ({:?} backend)", settings.storage.backend);
        Ok(Self::new(adapter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ListKind;
    use crate::prompt::PromptField;

    #[test]
    fn test_edit_session_reaches_selector_and_prompt() {
        let mut app = PromptCraft::new(PersistenceAdapter::in_memory());

        app.config.open();
        app.config.add(ListKind::Role, "Editor").unwrap();
        assert_eq!(app.config.close(), Some(1));

        app.selector.set_dropdown_open(ListKind::Role, true);
        app.selector.set_search(ListKind::Role, "edit");
        let matches: Vec<_> = app.selector.options(ListKind::Role).iter().map(|o| o.label().to_string()).collect();
        assert_eq!(matches, vec!["Editor"]);

        app.selector.select(ListKind::Role, "Editor", &mut app.form).unwrap();
        app.form.set(PromptField::Task, "Proofread the draft");

        assert_eq!(app.form.compose(), "You are: Editor\nTask: Proofread the draft");
        assert_eq!(app.selector.store().list(ListKind::Role)[0].label(), "Editor");
    }
}
