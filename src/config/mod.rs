/// Configuration system for microannotate
///
/// Supports loading from multiple sources with priority:
/// CLI args > Environment variables > Config file > Defaults
use crate::error::{AnnotateError, ConfigError};
use crate::git::FallbackIdentity;
use crate::replay::ReplayOptions;
use crate::transform::LanguageRegistry;
use crate::types::TransformConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Which transforms to apply to every touched file
    #[serde(default)]
    pub transform: TransformConfig,

    /// History replay configuration
    #[serde(default)]
    pub replay: ReplayConfig,

    /// Extra extension mappings
    #[serde(default)]
    pub languages: LanguagesConfig,
}

/// History replay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Log progress every N revisions
    #[serde(default = "default_log_every")]
    pub log_every: usize,

    /// Author name for revisions without author information
    #[serde(default = "default_author_name")]
    pub fallback_author_name: String,

    /// Author email for revisions without author information
    #[serde(default = "default_author_email")]
    pub fallback_author_email: String,
}

/// Extension mapping configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LanguagesConfig {
    /// New extension -> built-in extension whose rules it shares (e.g. "jsxm" = "js")
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

// Default value functions
fn default_log_every() -> usize {
    50
}

fn default_author_name() -> String {
    "microannotate".to_string()
}

fn default_author_email() -> String {
    "microannotate@localhost".to_string()
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            log_every: default_log_every(),
            fallback_author_name: default_author_name(),
            fallback_author_email: default_author_email(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self, AnnotateError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed(format!("Invalid TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default location or create default
    pub fn load_or_default() -> Result<Self, AnnotateError> {
        let config_path = crate::paths::PlatformPaths::default_config_path();

        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            Self::from_file(&config_path)
        } else {
            tracing::debug!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), AnnotateError> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::SaveFailed(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), AnnotateError> {
        if self.replay.log_every == 0 {
            return Err(ConfigError::InvalidValue {
                key: "replay.log_every".to_string(),
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.replay.fallback_author_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "replay.fallback_author_name".to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        if self.replay.fallback_author_email.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "replay.fallback_author_email".to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        for alias in self.languages.aliases.keys() {
            if alias.is_empty() || alias.contains('.') || alias.contains('/') {
                return Err(ConfigError::InvalidValue {
                    key: format!("languages.aliases.{}", alias),
                    reason: "must be a bare extension without '.' or '/'".to_string(),
                }
                .into());
            }
        }

        // Alias targets must name a built-in extension
        self.registry()?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("MICROANNOTATE_TOKENIZE")
            && let Some(tokenize) = parse_bool(&value)
        {
            self.transform.tokenize = tokenize;
        }

        if let Ok(value) = std::env::var("MICROANNOTATE_REMOVE_COMMENTS")
            && let Some(remove_comments) = parse_bool(&value)
        {
            self.transform.remove_comments = remove_comments;
        }

        if let Ok(value) = std::env::var("MICROANNOTATE_LOG_EVERY")
            && let Ok(log_every) = value.parse()
        {
            self.replay.log_every = log_every;
        }

        if let Ok(name) = std::env::var("MICROANNOTATE_AUTHOR_NAME") {
            self.replay.fallback_author_name = name;
        }

        if let Ok(email) = std::env::var("MICROANNOTATE_AUTHOR_EMAIL") {
            self.replay.fallback_author_email = email;
        }
    }

    /// Load from an explicit file (or the default location), then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, AnnotateError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::load_or_default()?,
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Language registry including the configured aliases
    pub fn registry(&self) -> Result<LanguageRegistry, AnnotateError> {
        LanguageRegistry::with_aliases(&self.languages.aliases).map_err(|target| {
            ConfigError::InvalidValue {
                key: "languages.aliases".to_string(),
                reason: format!("'{}' is not a built-in extension", target),
            }
            .into()
        })
    }

    pub fn fallback_identity(&self) -> FallbackIdentity {
        FallbackIdentity {
            name: self.replay.fallback_author_name.clone(),
            email: self.replay.fallback_author_email.clone(),
        }
    }

    pub fn replay_options(&self) -> ReplayOptions {
        ReplayOptions {
            log_every: self.replay.log_every,
        }
    }
}
