//! Process configuration read from the environment.
//!
//! # Responsibility
//! - Resolve every server setting from environment variables.
//! - Fail fast on missing required values or unparsable numbers.
//!
//! # Invariants
//! - Blank values are treated as unset.

use lecturenote_core::{default_log_level, EnrichPolicy, OpenAiBackend};
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Environment variable names.
pub mod env_vars {
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
    pub const BIND_ADDR: &str = "BIND_ADDR";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    /// Absolute directory for rotating log files; stderr when unset.
    pub const LOG_DIR: &str = "LOG_DIR";
    pub const ENRICH_TIMEOUT_SECS: &str = "ENRICH_TIMEOUT_SECS";
    pub const ENRICH_MAX_RETRIES: &str = "ENRICH_MAX_RETRIES";
}

/// Default values.
pub mod defaults {
    pub const BIND_ADDR: &str = "0.0.0.0:3000";
    pub const ENRICH_TIMEOUT_SECS: u64 = 60;
    pub const ENRICH_MAX_RETRIES: u32 = 1;
}

/// Configuration failures detected at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { name: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(name) => write!(f, "missing required environment variable {name}"),
            Self::Invalid { name, value } => {
                write!(f, "invalid value `{value}` for environment variable {name}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub bind_addr: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub enrich_timeout: Duration,
    pub enrich_max_retries: u32,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let enrich_timeout_secs = parse_or(
            env_vars::ENRICH_TIMEOUT_SECS,
            get(env_vars::ENRICH_TIMEOUT_SECS),
            defaults::ENRICH_TIMEOUT_SECS,
        )?;
        if enrich_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: env_vars::ENRICH_TIMEOUT_SECS,
                value: "0".to_string(),
            });
        }

        Ok(Self {
            database_url: require(env_vars::DATABASE_URL)?,
            openai_api_key: require(env_vars::OPENAI_API_KEY)?,
            openai_model: get(env_vars::OPENAI_MODEL)
                .unwrap_or_else(|| OpenAiBackend::DEFAULT_MODEL.to_string()),
            openai_base_url: get(env_vars::OPENAI_BASE_URL)
                .unwrap_or_else(|| OpenAiBackend::DEFAULT_BASE_URL.to_string()),
            bind_addr: get(env_vars::BIND_ADDR).unwrap_or_else(|| defaults::BIND_ADDR.to_string()),
            log_level: get(env_vars::LOG_LEVEL)
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: get(env_vars::LOG_DIR),
            enrich_timeout: Duration::from_secs(enrich_timeout_secs),
            enrich_max_retries: parse_or(
                env_vars::ENRICH_MAX_RETRIES,
                get(env_vars::ENRICH_MAX_RETRIES),
                defaults::ENRICH_MAX_RETRIES,
            )?,
        })
    }

    pub fn enrich_policy(&self) -> EnrichPolicy {
        EnrichPolicy {
            timeout: self.enrich_timeout,
            max_retries: self.enrich_max_retries,
            ..EnrichPolicy::default()
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}
