pub mod settings;

pub use settings::{LoggingSettings, Settings, StorageBackend, StorageSettings, CONFIG_PATH_ENV};
