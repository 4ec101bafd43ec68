use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid interval_secs: {0}. Must be positive")]
    InvalidInterval(u64),

    #[error("Invalid max_iterations: {0}. Must be at least 1")]
    InvalidMaxIterations(u32),

    #[error("Actor command cannot be empty")]
    EmptyActorCommand,

    #[error("Invalid actor timeout: {0}. Must be positive")]
    InvalidActorTimeout(u64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .prmend/config.yaml (project config, created by init)
    /// 3. .prmend/local.yaml (project local overrides, optional)
    /// 4. Environment variables (`PRMEND_*` prefix, highest priority)
    ///
    /// Configuration is always project-local (pwd/.prmend/) so each
    /// repository carries its own trust list and actor settings.
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".prmend/config.yaml"))
            .merge(Yaml::file(".prmend/local.yaml"))
            .merge(Env::prefixed("PRMEND_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if config.run.interval_secs == 0 {
            return Err(ConfigError::InvalidInterval(config.run.interval_secs));
        }

        if config.run.max_iterations == 0 {
            return Err(ConfigError::InvalidMaxIterations(config.run.max_iterations));
        }

        if config.actor.command.is_empty() {
            return Err(ConfigError::EmptyActorCommand);
        }

        if config.actor.timeout_secs == 0 {
            return Err(ConfigError::InvalidActorTimeout(config.actor.timeout_secs));
        }

        Ok(())
    }
}
