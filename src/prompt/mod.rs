pub mod form;

pub use form::{PromptField, PromptForm};
