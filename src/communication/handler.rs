use super::types::*;
use crate::options::{ListKind, OptionEntry};
use crate::prompt::PromptField;
use crate::utils::error_handling::{CraftError, CraftResult};
use crate::PromptCraft;
use log::{debug, info, warn};

/// Routes front-end messages to the option surfaces and prompt form
pub struct MessageHandler {
    app: PromptCraft,
    shutdown: bool,
}

impl MessageHandler {
    pub fn new(app: PromptCraft) -> Self {
        Self { app, shutdown: false }
    }

    pub fn app(&self) -> &PromptCraft {
        &self.app
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown
    }

    /// Handle incoming message and return optional response
    pub fn handle_message(&mut self, message: Message) -> CraftResult<Option<Message>> {
        debug!("Handling message: {:?}", message.payload);

        let expects_response = message.expects_response();
        let Message { id, payload, .. } = message;

        let response_payload = match self.dispatch(payload) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Request rejected: {}", e);
                Some(MessagePayload::Error {
                    message: e.user_message(),
                    details: Some(e.to_string()),
                })
            }
        };

        let response = response_payload.map(|payload| {
            if expects_response {
                Message::new_response(id, payload)
            } else {
                Message::new_notification(payload)
            }
        });

        Ok(response)
    }

    fn dispatch(&mut self, payload: MessagePayload) -> CraftResult<Option<MessagePayload>> {
        let response = match payload {
            // System
            MessagePayload::Ping => Some(MessagePayload::Pong),
            MessagePayload::Shutdown => {
                info!("Shutdown requested");
                self.shutdown = true;
                None
            }
            MessagePayload::Error { message, .. } => {
                warn!("Front end reported error: {}", message);
                None
            }

            // Configuration editor
            MessagePayload::OpenConfig => {
                self.app.config.open();
                Some(self.edit_state())
            }
            MessagePayload::CloseConfig => {
                let version = self.app.config.close();
                Some(MessagePayload::ConfigClosed { version })
            }
            MessagePayload::BeginEdit { kind, index } => {
                self.app.config.begin_edit(kind, index)?;
                Some(self.edit_state())
            }
            MessagePayload::BeginAdd { kind } => {
                self.app.config.begin_add(kind);
                Some(self.edit_state())
            }
            MessagePayload::SetDraft { text } => {
                self.app.config.set_draft(text);
                Some(self.edit_state())
            }
            MessagePayload::CancelEdit => {
                self.app.config.cancel_edit();
                Some(self.edit_state())
            }
            MessagePayload::CommitEdit => {
                let kind = self
                    .app
                    .config
                    .edit_target()
                    .map(|target| target.kind())
                    .ok_or_else(|| CraftError::protocol("No option is being edited"))?;
                let result = self.app.config.commit();
                Some(self.config_options(kind, result)?)
            }
            MessagePayload::AddOption { kind, label } => {
                let result = self.app.config.add(kind, &label);
                Some(self.config_options(kind, result)?)
            }
            MessagePayload::EditOption { kind, index, label } => {
                let result = self.app.config.edit(kind, index, &label);
                Some(self.config_options(kind, result)?)
            }
            MessagePayload::DeleteOption { kind, index } => {
                let result = self.app.config.delete(kind, index);
                Some(self.config_options(kind, result)?)
            }
            MessagePayload::ListOptions { kind } => Some(self.config_options(kind, Ok(()))?),

            // Selector dropdowns
            MessagePayload::OpenDropdown { kind } => {
                self.app.selector.set_dropdown_open(kind, true);
                Some(self.dropdown(kind))
            }
            MessagePayload::CloseDropdown { kind } => {
                self.app.selector.set_dropdown_open(kind, false);
                Some(self.dropdown(kind))
            }
            MessagePayload::Search { kind, query } => {
                self.app.selector.set_search(kind, query);
                Some(self.dropdown(kind))
            }
            MessagePayload::SelectOption { kind, value } => {
                let warning = persist_warning(self.app.selector.select(kind, &value, &mut self.app.form))?;
                let field = PromptField::for_list(kind);
                Some(MessagePayload::FieldUpdated {
                    field,
                    value: self.app.form.get(field).to_string(),
                    warning,
                })
            }

            // Prompt form
            MessagePayload::DescribeForm => Some(MessagePayload::Form {
                fields: PromptField::ALL
                    .iter()
                    .map(|&field| FieldInfo {
                        field,
                        label: field.label().to_string(),
                        placeholder: field.placeholder().to_string(),
                        single_line: field.single_line(),
                        option_list: field.option_list(),
                        value: self.app.form.get(field).to_string(),
                    })
                    .collect(),
            }),
            MessagePayload::SetField { field, value } => {
                self.app.form.set(field, value);
                Some(MessagePayload::FieldUpdated {
                    field,
                    value: self.app.form.get(field).to_string(),
                    warning: None,
                })
            }
            MessagePayload::Compose => Some(MessagePayload::Prompt {
                text: self.app.form.compose(),
            }),

            other => {
                warn!("Unhandled message type: {:?}", other);
                return Err(CraftError::protocol(&format!("Unhandled message type: {:?}", other)));
            }
        };

        Ok(response)
    }

    fn edit_state(&self) -> MessagePayload {
        MessagePayload::EditState {
            target: self.app.config.edit_target(),
            draft: self.app.config.draft().to_string(),
        }
    }

    fn config_options(&self, kind: ListKind, result: CraftResult<()>) -> CraftResult<MessagePayload> {
        let warning = persist_warning(result)?;
        Ok(MessagePayload::Options {
            kind,
            options: self.app.config.options(kind).to_vec(),
            warning,
        })
    }

    fn dropdown(&self, kind: ListKind) -> MessagePayload {
        let state = self.app.selector.dropdown(kind);
        MessagePayload::Dropdown {
            kind,
            open: state.open,
            search: state.search,
            options: self
                .app
                .selector
                .options(kind)
                .into_iter()
                .cloned()
                .collect::<Vec<OptionEntry>>(),
        }
    }
}

/// A failed write still left the change in memory, so it becomes a warning
/// on an otherwise normal response
fn persist_warning(result: CraftResult<()>) -> CraftResult<Option<String>> {
    match result {
        Ok(()) => Ok(None),
        Err(e @ CraftError::PersistFailure(_)) => Ok(Some(e.user_message())),
        Err(e) => Err(e),
    }
}
