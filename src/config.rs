use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{Result, StoryGraphError};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

/// Mention extraction policy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Match names/aliases case-sensitively. Off by default: screenplay text
    /// freely mixes "ALEX" (sluglines) with "Alex" (action lines).
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,
    /// Names or aliases shorter than this are never matched.
    #[serde(default = "default_min_name_len")]
    pub min_name_len: usize,
    /// Mentions below this confidence are discarded by the rebuild engine.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            case_sensitive: default_case_sensitive(),
            min_name_len: default_min_name_len(),
            min_confidence: default_min_confidence(),
        }
    }
}

fn default_case_sensitive() -> bool {
    false
}

fn default_min_name_len() -> usize {
    2
}

fn default_min_confidence() -> f64 {
    0.0
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in STORYGRAPH_CONFIG environment variable
    /// 2. ./config.toml in current directory
    ///
    /// Every setting has a default, so a missing config file yields the
    /// default configuration rather than an error.
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = std::env::var("STORYGRAPH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let config_str = std::fs::read_to_string(&config_path)?;

        let config: Config = toml::from_str(&config_str).map_err(|e| {
            StoryGraphError::Config(format!(
                "failed to parse {}: {}",
                config_path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string (used by tests and embedders)
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str)
            .map_err(|e| StoryGraphError::Config(format!("failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let c = self.extraction.min_confidence;
        if !(0.0..=1.0).contains(&c) {
            return Err(StoryGraphError::Config(format!(
                "extraction.min_confidence must be within [0, 1], got {}",
                c
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.extraction.case_sensitive);
        assert_eq!(config.extraction.min_name_len, 2);
        assert_eq!(config.extraction.min_confidence, 0.0);
    }

    #[test]
    fn test_from_toml_partial_overrides() {
        let config = Config::from_toml(
            "[extraction]\ncase_sensitive = true\nmin_confidence = 0.5\n",
        )
        .unwrap();
        assert!(config.extraction.case_sensitive);
        assert_eq!(config.extraction.min_confidence, 0.5);
        // Unset keys keep their defaults
        assert_eq!(config.extraction.min_name_len, 2);
    }

    #[test]
    fn test_from_toml_empty_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.extraction.min_name_len, 2);
    }

    #[test]
    fn test_from_toml_rejects_bad_confidence() {
        let err = Config::from_toml("[extraction]\nmin_confidence = 1.5\n").unwrap_err();
        assert!(matches!(err, StoryGraphError::Config(_)));
    }

    #[test]
    fn test_from_toml_rejects_malformed_toml() {
        let err = Config::from_toml("[extraction\ncase_sensitive = true").unwrap_err();
        assert!(matches!(err, StoryGraphError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[extraction]\nmin_name_len = 3\n").unwrap();
        file.flush().unwrap();
        std::env::set_var("STORYGRAPH_CONFIG", file.path());
        let config = Config::load().unwrap();
        std::env::remove_var("STORYGRAPH_CONFIG");
        assert_eq!(config.extraction.min_name_len, 3);
    }
}
