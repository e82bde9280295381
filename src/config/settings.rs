use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use crate::options::{FileStore, KeyValueStore, MemoryStore, PersistenceAdapter};
use crate::utils::error_handling::{CraftResult, CraftError};
use chrono::{DateTime, Utc};

/// Environment variable overriding the settings file location
pub const CONFIG_PATH_ENV: &str = "PROMPTCRAFT_CONFIG";

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub data_directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

impl Settings {
    /// Current configuration version
    pub const CURRENT_VERSION: &'static str = "1.0.0";

    /// Load settings from `path`, writing defaults there if it does not exist
    pub fn load_or_default(path: &Path) -> CraftResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| CraftError::config(&format!("Failed to read config file: {}", e)))?;

            let mut settings = serde_json::from_str::<Settings>(&content)
                .map_err(|e| CraftError::config(&format!("Failed to parse config file: {}", e)))?;

            if settings.version != Self::CURRENT_VERSION {
                log::info!("Upgrading settings from version {}", settings.version);
                settings.version = Self::CURRENT_VERSION.to_string();
                settings.save(path)?;
            }
            settings.validate()?;
            Ok(settings)
        } else {
            let default_settings = Self::default();
            default_settings.save(path)?;
            Ok(default_settings)
        }
    }

    /// Save settings to `path`, stamping the update time
    pub fn save(&self, path: &Path) -> CraftResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| CraftError::config(&format!("Failed to create config directory: {}", e)))?;
        }

        let mut updated_settings = self.clone();
        updated_settings.updated_at = Utc::now();

        let content = serde_json::to_string_pretty(&updated_settings)
            .map_err(|e| CraftError::config(&format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| CraftError::config(&format!("Failed to write config file: {}", e)))?;
        Ok(())
    }

    /// Settings file location: `$PROMPTCRAFT_CONFIG`, else
    /// `$HOME/.config/promptcraft/config.json`
    pub fn default_path() -> CraftResult<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        Ok(home_dir()?.join(".config").join("promptcraft").join("config.json"))
    }

    /// Validate configuration settings
    pub fn validate(&self) -> CraftResult<()> {
        if self.storage.backend == StorageBackend::File
            && self.storage.data_directory.as_os_str().is_empty()
        {
            return Err(CraftError::config("data_directory must not be empty"));
        }

        self.log_level()?;
        Ok(())
    }

    /// Parsed log level filter
    pub fn log_level(&self) -> CraftResult<log::LevelFilter> {
        log::LevelFilter::from_str(&self.logging.level)
            .map_err(|_| CraftError::config(&format!("Unknown log level: {}", self.logging.level)))
    }

    /// Build the persistence adapter the settings describe
    pub fn open_storage(&self) -> CraftResult<PersistenceAdapter> {
        let store: Arc<dyn KeyValueStore> = match self.storage.backend {
            StorageBackend::File => Arc::new(FileStore::new(&self.storage.data_directory)?),
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
        };
        Ok(PersistenceAdapter::new(store))
    }
}

fn home_dir() -> CraftResult<PathBuf> {
    std::env::var("HOME")
        .map(PathBuf::from)
        .map_err(|_| CraftError::config("HOME environment variable not found"))
}

impl Default for Settings {
    fn default() -> Self {
        let now = Utc::now();
        let data_directory = home_dir()
            .map(|home| home.join(".local").join("share").join("promptcraft"))
            .unwrap_or_else(|_| PathBuf::from(".promptcraft"));

        Settings {
            version: Self::CURRENT_VERSION.to_string(),
            created_at: now,
            updated_at: now,
            storage: StorageSettings {
                backend: StorageBackend::File,
                data_directory,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}
