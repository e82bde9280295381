use crate::options::ListKind;
use crate::utils::error_handling::CraftError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Labeled inputs of the prompt form, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptField {
    Role,
    Background,
    Task,
    Requirements,
    Constraints,
    OutputFormat,
    Examples,
}

impl PromptField {
    pub const ALL: [PromptField; 7] = [
        PromptField::Role,
        PromptField::Background,
        PromptField::Task,
        PromptField::Requirements,
        PromptField::Constraints,
        PromptField::OutputFormat,
        PromptField::Examples,
    ];

    pub fn index(&self) -> usize {
        match self {
            PromptField::Role => 0,
            PromptField::Background => 1,
            PromptField::Task => 2,
            PromptField::Requirements => 3,
            PromptField::Constraints => 4,
            PromptField::OutputFormat => 5,
            PromptField::Examples => 6,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PromptField::Role => "Role",
            PromptField::Background => "Background",
            PromptField::Task => "Task",
            PromptField::Requirements => "Requirements",
            PromptField::Constraints => "Constraints",
            PromptField::OutputFormat => "Output Format",
            PromptField::Examples => "Examples",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            PromptField::Role => "e.g. Senior backend engineer",
            PromptField::Background => "What the model should know before starting",
            PromptField::Task => "What you want done",
            PromptField::Requirements => "Must-haves for the answer",
            PromptField::Constraints => "Limits on length, tone or scope",
            PromptField::OutputFormat => "e.g. Markdown table",
            PromptField::Examples => "Sample input and output",
        }
    }

    /// Single-line input rather than a text area
    pub fn single_line(&self) -> bool {
        matches!(self, PromptField::Role | PromptField::OutputFormat)
    }

    /// Option list feeding this field's dropdown, if any
    pub fn option_list(&self) -> Option<ListKind> {
        match self {
            PromptField::Role => Some(ListKind::Role),
            PromptField::Task => Some(ListKind::Task),
            PromptField::OutputFormat => Some(ListKind::Format),
            _ => None,
        }
    }

    /// Field a dropdown selection is written into
    pub fn for_list(kind: ListKind) -> PromptField {
        match kind {
            ListKind::Role => PromptField::Role,
            ListKind::Task => PromptField::Task,
            ListKind::Format => PromptField::OutputFormat,
        }
    }

    fn render(&self, value: &str) -> String {
        match self {
            PromptField::Role => format!("You are: {}", value),
            PromptField::Background => format!("Background: {}", value),
            other => format!("{}: {}", other.label(), value),
        }
    }
}

impl FromStr for PromptField {
    type Err = CraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "role" => Ok(PromptField::Role),
            "background" => Ok(PromptField::Background),
            "task" => Ok(PromptField::Task),
            "requirements" => Ok(PromptField::Requirements),
            "constraints" => Ok(PromptField::Constraints),
            "output_format" | "format" => Ok(PromptField::OutputFormat),
            "examples" => Ok(PromptField::Examples),
            other => Err(CraftError::protocol(&format!("Unknown prompt field: {}", other))),
        }
    }
}

/// Current values typed or selected into the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptForm {
    values: [String; 7],
}

impl PromptForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: PromptField) -> &str {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: PromptField, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    pub fn clear(&mut self) {
        self.values = Default::default();
    }

    /// Assemble the prompt text, one line per filled field
    pub fn compose(&self) -> String {
        PromptField::ALL
            .iter()
            .filter(|field| !self.get(**field).is_empty())
            .map(|field| field.render(self.get(*field)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_form_composes_nothing() {
        assert_eq!(PromptForm::new().compose(), "");
    }

    #[test]
    fn test_compose_skips_empty_fields() {
        let mut form = PromptForm::new();
        form.set(PromptField::Role, "Technical Writer");
        form.set(PromptField::Background, "Launching a CLI tool");
        form.set(PromptField::OutputFormat, "Markdown");

        assert_eq!(
            form.compose(),
            "You are: Technical Writer\nBackground: Launching a CLI tool\nOutput Format: Markdown"
        );
    }

    #[test]
    fn test_fields_bound_to_lists() {
        for kind in ListKind::ALL {
            assert_eq!(PromptField::for_list(kind).option_list(), Some(kind));
        }
        assert_eq!(PromptField::Examples.option_list(), None);
        assert_eq!(PromptField::ALL.iter().filter(|f| f.option_list().is_some()).count(), 3);
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!("Output Format".parse::<PromptField>().unwrap(), PromptField::OutputFormat);
        assert_eq!("constraints".parse::<PromptField>().unwrap(), PromptField::Constraints);
        assert!("tone".parse::<PromptField>().is_err());
    }

    #[test]
    fn test_clear_resets_values() {
        let mut form = PromptForm::new();
        form.set(PromptField::Task, "Summarize");
        form.clear();
        assert_eq!(form, PromptForm::new());
    }
}
