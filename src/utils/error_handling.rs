use thiserror::Error;

/// Errors raised by option management, storage and the front-end protocol
#[derive(Error, Debug)]
pub enum CraftError {
    #[error("Option label must not be empty")]
    EmptyLabel,

    #[error("Option already exists: {0}")]
    DuplicateOption(String),

    #[error("Index {index} is out of range for a list of {len} options")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Persisted record could not be parsed: {0}")]
    Parse(String),

    #[error("Failed to persist options: {0}")]
    PersistFailure(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// Result type alias for crate operations
pub type CraftResult<T> = Result<T, CraftError>;

impl CraftError {
    /// Create a configuration error
    pub fn config(msg: &str) -> Self {
        CraftError::Configuration(msg.to_string())
    }

    /// Create a persistence failure
    pub fn persist(msg: &str) -> Self {
        CraftError::PersistFailure(msg.to_string())
    }

    /// Create a parse error
    pub fn parse(msg: &str) -> Self {
        CraftError::Parse(msg.to_string())
    }

    /// Create a protocol error
    pub fn protocol(msg: &str) -> Self {
        CraftError::Protocol(msg.to_string())
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            CraftError::EmptyLabel => "Please enter an option label".to_string(),
            CraftError::DuplicateOption(label) => {
                format!("\"{}\" is already in the list; duplicates are not allowed", label)
            }
            CraftError::IndexOutOfRange { index, .. } => {
                format!("There is no option at position {}", index)
            }
            CraftError::Parse(msg) => format!("Saved options were unreadable and have been reset: {}", msg),
            CraftError::PersistFailure(msg) => {
                format!("Changes are kept for this session but could not be saved: {}", msg)
            }
            CraftError::Configuration(msg) => format!("Configuration issue: {}", msg),
            CraftError::FileSystem(e) => format!("File operation failed: {}", e),
            CraftError::Serialization(e) => format!("Data processing error: {}", e),
            CraftError::Protocol(msg) => format!("Invalid request: {}", msg),
        }
    }

    /// Whether the error was a rejected caller input (nothing was changed)
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            CraftError::EmptyLabel | CraftError::DuplicateOption(_) | CraftError::IndexOutOfRange { .. }
        )
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            CraftError::EmptyLabel => true,
            CraftError::DuplicateOption(_) => true,
            CraftError::IndexOutOfRange { .. } => true,
            CraftError::Parse(_) => true,
            CraftError::PersistFailure(_) => true,
            CraftError::Configuration(_) => false,
            CraftError::FileSystem(_) => true,
            CraftError::Serialization(_) => true,
            CraftError::Protocol(_) => true,
        }
    }
}
