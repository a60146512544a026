//! TUI configuration persistence
//!
//! Where the secret comes from, the feedback delays and display preferences.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pinlock_core::{EnvSecret, GateConfig, Secret, SecretProvider, StaticSecret, DEFAULT_SECRET_VAR};
use serde::{Deserialize, Serialize};

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Configuration directory under ~/.config
const CONFIG_DIR_NAME: &str = "pinlock";

/// Where the expected PIN is read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum SecretSource {
    /// Environment variable holding the PIN
    Env { var: String },
    /// PIN written into the configuration file
    Inline { pin: String },
}

impl Default for SecretSource {
    fn default() -> Self {
        SecretSource::Env {
            var: DEFAULT_SECRET_VAR.to_string(),
        }
    }
}

impl SecretSource {
    /// Build the provider for this source
    pub fn provider(&self) -> Result<Box<dyn SecretProvider>, ConfigError> {
        match self {
            SecretSource::Env { var } => Ok(Box::new(EnvSecret::new(var.clone()))),
            SecretSource::Inline { pin } => {
                let secret =
                    Secret::parse(pin).map_err(|e| ConfigError::InvalidSecret(e.to_string()))?;
                Ok(Box::new(StaticSecret::new(secret)))
            }
        }
    }
}

/// TUI configuration that persists across sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Secret source
    #[serde(default)]
    pub secret: SecretSource,

    /// Delay before a complete PIN is verified automatically
    #[serde(default = "default_auto_submit_delay_ms")]
    pub auto_submit_delay_ms: u64,

    /// Delay between a correct PIN and the dashboard
    #[serde(default = "default_success_delay_ms")]
    pub success_delay_ms: u64,

    /// Duration of the shake effect after a wrong PIN
    #[serde(default = "default_shake_ms")]
    pub shake_ms: u64,

    /// Directory for the session flag (defaults to the runtime directory)
    #[serde(default)]
    pub session_dir: Option<PathBuf>,

    /// Use the high-contrast palette
    #[serde(default)]
    pub high_contrast: bool,
}

fn default_auto_submit_delay_ms() -> u64 {
    pinlock_core::AUTO_SUBMIT_DELAY.as_millis() as u64
}

fn default_success_delay_ms() -> u64 {
    pinlock_core::SUCCESS_DELAY.as_millis() as u64
}

fn default_shake_ms() -> u64 {
    pinlock_core::SHAKE_DURATION.as_millis() as u64
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            secret: SecretSource::default(),
            auto_submit_delay_ms: default_auto_submit_delay_ms(),
            success_delay_ms: default_success_delay_ms(),
            shake_ms: default_shake_ms(),
            session_dir: None,
            high_contrast: false,
        }
    }
}

impl TuiConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        // Try XDG_CONFIG_HOME first, then fall back to ~/.config
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config).join(CONFIG_DIR_NAME);
            return Some(path);
        }

        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME))
    }

    /// Get the full config file path
    pub fn config_file_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location
    ///
    /// Returns default configuration if file doesn't exist or can't be parsed.
    pub fn load() -> Self {
        match Self::config_file_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file: {}", e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_file_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| ConfigError::Io(e.to_string()))?;
            }
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, contents).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Delays for the gate
    pub fn gate_config(&self) -> GateConfig {
        GateConfig {
            auto_submit_delay: Duration::from_millis(self.auto_submit_delay_ms),
            success_delay: Duration::from_millis(self.success_delay_ms),
            shake_duration: Duration::from_millis(self.shake_ms),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Invalid secret in config: {0}")]
    InvalidSecret(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = TuiConfig::default();
        assert_eq!(
            config.secret,
            SecretSource::Env {
                var: "PINLOCK_SECRET".to_string()
            }
        );
        assert_eq!(config.gate_config(), GateConfig::default());
        assert!(config.session_dir.is_none());
        assert!(!config.high_contrast);
    }

    #[test]
    fn test_config_serialization() {
        let config = TuiConfig {
            secret: SecretSource::Inline {
                pin: "534271".to_string(),
            },
            auto_submit_delay_ms: 100,
            success_delay_ms: 200,
            shake_ms: 300,
            session_dir: Some(PathBuf::from("/run/user/1000/pinlock")),
            high_contrast: true,
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"source\":\"inline\""));
        let parsed: TuiConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.secret, config.secret);
        assert_eq!(
            parsed.gate_config().shake_duration,
            Duration::from_millis(300)
        );
        assert!(parsed.high_contrast);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: TuiConfig = serde_json::from_str(r#"{"shake_ms": 900}"#).unwrap();
        assert_eq!(parsed.shake_ms, 900);
        assert_eq!(parsed.auto_submit_delay_ms, 300);
        assert_eq!(parsed.success_delay_ms, 500);
        assert_eq!(parsed.secret, SecretSource::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let config = TuiConfig {
            high_contrast: true,
            ..TuiConfig::default()
        };
        config.save_to(&path).unwrap();

        let loaded = TuiConfig::load_from(&path);
        assert!(loaded.high_contrast);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let loaded = TuiConfig::load_from(&path);
        assert_eq!(loaded.auto_submit_delay_ms, 300);
    }

    #[test]
    fn test_inline_secret_provider() {
        let source = SecretSource::Inline {
            pin: "123456".to_string(),
        };
        let secret = source.provider().unwrap().secret().unwrap();
        assert!(secret.matches("123456"));

        let bad = SecretSource::Inline {
            pin: "12".to_string(),
        };
        assert!(matches!(bad.provider(), Err(ConfigError::InvalidSecret(_))));
    }
}
