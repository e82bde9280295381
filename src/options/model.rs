use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error_handling::CraftError;

/// One selectable option. The persisted shape is `{label, value}`, but the
/// value always mirrors the label, so only the label is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "RawOption", from = "RawOption")]
pub struct OptionEntry {
    label: String,
}

/// Wire shape of an option record
#[derive(Serialize, Deserialize)]
struct RawOption {
    label: String,
    value: String,
}

impl From<OptionEntry> for RawOption {
    fn from(entry: OptionEntry) -> Self {
        RawOption {
            value: entry.label.clone(),
            label: entry.label,
        }
    }
}

impl From<RawOption> for OptionEntry {
    fn from(raw: RawOption) -> Self {
        if raw.value != raw.label {
            log::debug!("Option value {:?} differs from label {:?}; using label", raw.value, raw.label);
        }
        OptionEntry { label: raw.label }
    }
}

impl OptionEntry {
    /// Build an entry from an already validated label
    pub fn new(label: impl Into<String>) -> Self {
        OptionEntry { label: label.into() }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &str {
        &self.label
    }
}

/// Ordered options; index 0 is the most recently used
pub type OptionList = Vec<OptionEntry>;

/// The three fixed option categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Role,
    Task,
    Format,
}

impl ListKind {
    pub const ALL: [ListKind; 3] = [ListKind::Role, ListKind::Task, ListKind::Format];

    /// Storage key for the persisted record
    pub fn storage_key(&self) -> &'static str {
        match self {
            ListKind::Role => "promptcraft_roles",
            ListKind::Task => "promptcraft_tasks",
            ListKind::Format => "promptcraft_formats",
        }
    }

    /// Tab title in the configuration editor
    pub fn title(&self) -> &'static str {
        match self {
            ListKind::Role => "Role options",
            ListKind::Task => "Task options",
            ListKind::Format => "Output format options",
        }
    }

    /// Whether search also matches the option value
    pub fn matches_value(&self) -> bool {
        matches!(self, ListKind::Format)
    }

    /// Bootstrap list used when nothing valid is persisted
    pub fn defaults(&self) -> OptionList {
        let labels: &[&str] = match self {
            ListKind::Role => &[
                "Software Engineer",
                "Product Manager",
                "Data Analyst",
                "Technical Writer",
                "UX Designer",
                "Marketing Specialist",
                "Teacher",
            ],
            ListKind::Task => &[
                "Write a technical design document",
                "Review this code and suggest improvements",
                "Summarize the following text",
                "Translate the following text into English",
                "Draft a project proposal",
                "Generate unit tests",
            ],
            ListKind::Format => &[
                "Markdown",
                "JSON",
                "Table",
                "Bullet list",
                "Plain text",
                "Step-by-step guide",
            ],
        };
        labels.iter().map(|label| OptionEntry::new(*label)).collect()
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ListKind::Role => "role",
            ListKind::Task => "task",
            ListKind::Format => "format",
        };
        f.write_str(name)
    }
}

impl FromStr for ListKind {
    type Err = CraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "role" => Ok(ListKind::Role),
            "task" => Ok(ListKind::Task),
            "format" | "output_format" => Ok(ListKind::Format),
            other => Err(CraftError::protocol(&format!("Unknown option list: {}", other))),
        }
    }
}
