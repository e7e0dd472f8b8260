use crate::EpcisKgError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database_path: String,
    pub server_port: u16,
    pub log_level: String,
    pub parsing: ParsingConfig,
    pub aggregation: AggregationConfig,
    pub server: ServerConfig,
    pub persistence: PersistenceConfig,
}

/// Resource bounds on a single `validate_document` call. These bound how
/// much of a document the caller is willing to hand the engine before
/// treating it as hostile input; they don't change validation outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsingConfig {
    pub max_document_bytes: usize,
    pub max_events_per_document: usize,
}

/// Tunables for the error aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// How many example identifiers to list per merged error group.
    pub example_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub request_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    pub auto_save: bool,
    pub save_interval: u64,
    pub backup_on_startup: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: "./data".to_string(),
            server_port: 8080,
            log_level: "info".to_string(),
            parsing: ParsingConfig::default(),
            aggregation: AggregationConfig::default(),
            server: ServerConfig::default(),
            persistence: PersistenceConfig::default(),
        }
    }
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: 20 * 1024 * 1024,
            max_events_per_document: 50_000,
        }
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self { example_limit: 3 }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
            request_timeout: 30,
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            auto_save: true,
            save_interval: 300,
            backup_on_startup: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, EpcisKgError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EpcisKgError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(EpcisKgError::Io)?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            EpcisKgError::Config(format!("Failed to parse configuration file: {}", e))
        })?;

        Ok(config)
    }

    /// Load configuration from file or use defaults if file doesn't exist
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self, EpcisKgError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EpcisKgError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| EpcisKgError::Config(format!("Failed to serialize configuration: {}", e)))?;

        std::fs::write(path, content).map_err(EpcisKgError::Io)?;

        Ok(())
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), EpcisKgError> {
        if self.database_path.is_empty() {
            return Err(EpcisKgError::Config(
                "Database path cannot be empty".to_string(),
            ));
        }

        if self.server_port == 0 {
            return Err(EpcisKgError::Config(
                "Server port must be greater than 0".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(EpcisKgError::Config(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.log_level
                )));
            }
        }

        if self.parsing.max_document_bytes == 0 {
            return Err(EpcisKgError::Config(
                "max_document_bytes must be greater than 0".to_string(),
            ));
        }

        if self.parsing.max_events_per_document == 0 {
            return Err(EpcisKgError::Config(
                "max_events_per_document must be greater than 0".to_string(),
            ));
        }

        if self.aggregation.example_limit == 0 {
            return Err(EpcisKgError::Config(
                "aggregation.example_limit must be greater than 0".to_string(),
            ));
        }

        if self.server.request_timeout == 0 {
            return Err(EpcisKgError::Config(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.persistence.save_interval == 0 {
            return Err(EpcisKgError::Config(
                "Save interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Create a new configuration with specific overrides
    pub fn with_overrides<F>(mut self, overrides: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        overrides(&mut self);
        self
    }
}
