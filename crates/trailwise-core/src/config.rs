use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, TrailwiseError};

/// Top-level configuration for the Trailwise assistant.
///
/// Loaded from a TOML file by the host application. Each section corresponds
/// to a bounded context or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrailwiseConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub dialogue: DialogueConfig,
}

impl TrailwiseConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TrailwiseConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| TrailwiseError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Dialogue engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    /// Whether the assistant is enabled.
    pub enabled: bool,
    /// Seconds of inactivity before an idle re-engagement prompt.
    pub idle_timeout_secs: i64,
    /// Probability of prefixing a matched reply with an empathy phrase.
    pub empathy_probability: f64,
    /// Probability of appending a travel tip to a reply.
    pub tip_probability: f64,
    /// Minutes of inactivity before a session is considered expired.
    pub session_timeout_minutes: u32,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            idle_timeout_secs: 300,
            empathy_probability: 0.3,
            tip_probability: 0.2,
            session_timeout_minutes: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dialogue_config() {
        let config = DialogueConfig::default();
        assert!(config.enabled);
        assert_eq!(config.idle_timeout_secs, 300);
        assert!((config.empathy_probability - 0.3).abs() < f64::EPSILON);
        assert!((config.tip_probability - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.session_timeout_minutes, 30);
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let config = TrailwiseConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert!(config.dialogue.enabled);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let result = TrailwiseConfig::load(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = TrailwiseConfig::default();
        config.dialogue.idle_timeout_secs = 120;
        config.dialogue.tip_probability = 0.5;
        config.save(&path).unwrap();

        let loaded = TrailwiseConfig::load(&path).unwrap();
        assert_eq!(loaded.dialogue.idle_timeout_secs, 120);
        assert!((loaded.dialogue.tip_probability - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_toml_uses_field_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[dialogue]\nenabled = false\n").unwrap();

        let loaded = TrailwiseConfig::load(&path).unwrap();
        assert!(!loaded.dialogue.enabled);
        // Unspecified fields keep their defaults
        assert_eq!(loaded.dialogue.idle_timeout_secs, 300);
        assert_eq!(loaded.general.log_level, "info");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[dialogue\nbroken").unwrap();

        let result = TrailwiseConfig::load(&path);
        assert!(matches!(result, Err(TrailwiseError::Config(_))));
    }
}
