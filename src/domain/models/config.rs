use serde::{Deserialize, Serialize};

/// Main configuration structure for prmend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Default repository (`owner/repo`) used when a bare PR number is given
    #[serde(default)]
    pub repository: Option<String>,

    /// GitHub API configuration
    #[serde(default)]
    pub github: GithubConfig,

    /// External actor (AI coding agent) configuration
    #[serde(default)]
    pub actor: ActorConfig,

    /// Reconciliation loop configuration
    #[serde(default)]
    pub run: RunConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// GitHub API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GithubConfig {
    /// API token; falls back to the `GITHUB_TOKEN` environment variable
    #[serde(default)]
    pub token: Option<String>,

    /// GraphQL endpoint (overridable for GitHub Enterprise and tests)
    #[serde(default = "default_graphql_url")]
    pub graphql_url: String,
}

fn default_graphql_url() -> String {
    "https://api.github.com/graphql".to_string()
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            graphql_url: default_graphql_url(),
        }
    }
}

impl GithubConfig {
    /// Resolve the token from config or environment.
    pub fn resolved_token(&self) -> Option<String> {
        self.token
            .clone()
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
            .filter(|t| !t.is_empty())
    }
}

/// External actor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ActorConfig {
    /// Executable to invoke (the actor-provider choice)
    #[serde(default = "default_actor_command")]
    pub command: String,

    /// Arguments passed before the prompt is written to stdin
    #[serde(default = "default_actor_args")]
    pub args: Vec<String>,

    /// Hard timeout for a single actor invocation
    #[serde(default = "default_actor_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_actor_command() -> String {
    "claude".to_string()
}

fn default_actor_args() -> Vec<String> {
    vec!["--print".to_string()]
}

const fn default_actor_timeout_secs() -> u64 {
    900
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            command: default_actor_command(),
            args: default_actor_args(),
            timeout_secs: default_actor_timeout_secs(),
        }
    }
}

/// Reconciliation loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RunConfig {
    /// Seconds to sleep between cycles
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Maximum number of cycles per invocation
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Run the validity classification stage before fixing
    #[serde(default)]
    pub validate: bool,

    /// Author allow-list; empty means no restriction
    #[serde(default)]
    pub trusted_authors: Vec<String>,

    /// Pass `-S` to git commit
    #[serde(default)]
    pub sign_commits: bool,

    /// Review-bot login to poll for between cycles instead of a fixed sleep
    #[serde(default)]
    pub wait_for_bot: Option<String>,

    /// How long to poll for the bot before continuing anyway
    #[serde(default = "default_bot_timeout_secs")]
    pub bot_timeout_secs: u64,

    /// Interval between bot polls
    #[serde(default = "default_bot_poll_secs")]
    pub bot_poll_secs: u64,
}

const fn default_interval_secs() -> u64 {
    60
}

const fn default_max_iterations() -> u32 {
    5
}

const fn default_bot_timeout_secs() -> u64 {
    600
}

const fn default_bot_poll_secs() -> u64 {
    30
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_iterations: default_max_iterations(),
            validate: false,
            trusted_authors: vec![],
            sign_commits: false,
            wait_for_bot: None,
            bot_timeout_secs: default_bot_timeout_secs(),
            bot_poll_secs: default_bot_poll_secs(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to the `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,
}

fn default_database_path() -> String {
    ".prmend/prmend.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.run.interval_secs, 60);
        assert_eq!(config.run.max_iterations, 5);
        assert!(!config.run.validate);
        assert_eq!(config.actor.command, "claude");
        assert_eq!(config.database.path, ".prmend/prmend.db");
    }

    #[test]
    fn empty_yaml_deserializes_to_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.github.graphql_url, "https://api.github.com/graphql");
        assert!(config.run.trusted_authors.is_empty());
    }
}
