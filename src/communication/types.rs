use crate::options::{ListKind, OptionEntry};
use crate::prompt::PromptField;
use crate::ui::EditTarget;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for correlating requests and responses
pub type MessageId = String;

/// Envelope for every line exchanged with the front end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(default = "new_message_id")]
    pub id: MessageId,
    #[serde(default)]
    pub message_type: MessageType,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    pub payload: MessagePayload,
}

fn new_message_id() -> MessageId {
    Uuid::new_v4().to_string()
}

/// Type of message being sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MessageType {
    /// Request expecting a response
    Request { correlation_id: Option<MessageId> },
    /// Response to a previous request
    Response { correlation_id: MessageId },
    /// One-way notification (no response expected)
    Notification,
}

impl Default for MessageType {
    fn default() -> Self {
        MessageType::Request { correlation_id: None }
    }
}

/// All possible message payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum MessagePayload {
    // System
    Ping,
    Pong,
    Startup { status: String },
    Shutdown,
    Error { message: String, details: Option<String> },

    // Configuration editor
    OpenConfig,
    CloseConfig,
    ConfigClosed { version: Option<u64> },
    BeginEdit { kind: ListKind, index: usize },
    BeginAdd { kind: ListKind },
    SetDraft { text: String },
    CommitEdit,
    CancelEdit,
    EditState { target: Option<EditTarget>, draft: String },
    AddOption { kind: ListKind, label: String },
    EditOption { kind: ListKind, index: usize, label: String },
    DeleteOption { kind: ListKind, index: usize },
    ListOptions { kind: ListKind },
    Options { kind: ListKind, options: Vec<OptionEntry>, warning: Option<String> },

    // Selector dropdowns
    OpenDropdown { kind: ListKind },
    CloseDropdown { kind: ListKind },
    Search { kind: ListKind, query: String },
    SelectOption { kind: ListKind, value: String },
    Dropdown { kind: ListKind, open: bool, search: String, options: Vec<OptionEntry> },

    // Prompt form
    DescribeForm,
    Form { fields: Vec<FieldInfo> },
    SetField { field: PromptField, value: String },
    FieldUpdated { field: PromptField, value: String, warning: Option<String> },
    Compose,
    Prompt { text: String },
}

/// How one prompt field should be rendered, with its current value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub field: PromptField,
    pub label: String,
    pub placeholder: String,
    pub single_line: bool,
    pub option_list: Option<ListKind>,
    pub value: String,
}

impl Message {
    /// Create a new request message
    pub fn new_request(payload: MessagePayload) -> Self {
        Message {
            id: new_message_id(),
            message_type: MessageType::Request { correlation_id: None },
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Create a response to the request with `request_id`
    pub fn new_response(request_id: MessageId, payload: MessagePayload) -> Self {
        Message {
            id: new_message_id(),
            message_type: MessageType::Response { correlation_id: request_id },
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Create a notification message
    pub fn new_notification(payload: MessagePayload) -> Self {
        Message {
            id: new_message_id(),
            message_type: MessageType::Notification,
            timestamp: Utc::now(),
            payload,
        }
    }

    pub fn expects_response(&self) -> bool {
        matches!(self.message_type, MessageType::Request { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_request_parses() {
        let message: Message =
            serde_json::from_str(r#"{"payload":{"type":"add_option","data":{"kind":"role","label":"Editor"}}}"#)
                .unwrap();

        assert!(message.expects_response());
        assert!(!message.id.is_empty());
        assert_eq!(
            message.payload,
            MessagePayload::AddOption { kind: ListKind::Role, label: "Editor".to_string() }
        );
    }

    #[test]
    fn test_unit_payload_parses() {
        let message: Message = serde_json::from_str(r#"{"payload":{"type":"ping"}}"#).unwrap();
        assert_eq!(message.payload, MessagePayload::Ping);
    }

    #[test]
    fn test_response_carries_correlation() {
        let response = Message::new_response("abc".to_string(), MessagePayload::Pong);
        assert_eq!(response.message_type, MessageType::Response { correlation_id: "abc".to_string() });
        assert!(!response.expects_response());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["payload"]["type"], "pong");
    }
}
