use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure for Convene
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ConveneConfig {
    /// Logging settings
    pub observability: ObservabilityConfig,
    /// Reminder timing
    pub reminders: ReminderConfig,
    /// Draft store settings
    pub storage: StorageConfig,
    /// Notice composition and export
    pub notice: NoticeConfig,
    /// Subscription-gated features
    pub features: FeatureConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output
    pub json_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Interval between reminder prompts
    pub interval_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one JSON file per saved draft
    pub draft_directory: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NoticeConfig {
    /// Where exported notices are written
    pub export_directory: PathBuf,
    /// Replaces the built-in notice body template
    pub body_template: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub ai_notice_generation: bool,
    pub e_voting: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 60,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            draft_directory: PathBuf::from(".convene/drafts"),
        }
    }
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            export_directory: PathBuf::from(".convene/notices"),
            body_template: None,
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            ai_notice_generation: false,
            e_voting: true,
        }
    }
}

impl ReminderConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds.max(1))
    }
}

impl ConveneConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file at `path`, when it exists
    /// 3. Environment variables (prefixed with CONVENE_)
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut builder = Config::builder();

        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        // CONVENE_REMINDERS__INTERVAL_SECONDS=30
        builder = builder.add_source(
            Environment::with_prefix("CONVENE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let convene_config: ConveneConfig = config.try_deserialize()?;

        Ok(convene_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ConveneConfig::default();
        assert_eq!(config.reminders.interval(), Duration::from_secs(60));
        assert!(!config.features.ai_notice_generation);
        assert_eq!(config.storage.draft_directory, PathBuf::from(".convene/drafts"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("convene.toml");
        std::fs::write(
            &path,
            "[reminders]\ninterval_seconds = 15\n\n[features]\nai_notice_generation = true\n",
        )
        .unwrap();

        let config = ConveneConfig::load_from(&path).unwrap();
        assert_eq!(config.reminders.interval_seconds, 15);
        assert!(config.features.ai_notice_generation);
        // Untouched sections keep their defaults
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("convene.toml");
        let mut config = ConveneConfig::default();
        config.reminders.interval_seconds = 42;
        config.save_to_file(&path).unwrap();

        let reloaded = ConveneConfig::load_from(&path).unwrap();
        assert_eq!(reloaded.reminders.interval_seconds, 42);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = ReminderConfig { interval_seconds: 0 };
        assert_eq!(config.interval(), Duration::from_secs(1));
    }
}
