//! Worker configuration, read from the environment at startup.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use roastduel_core::retry::RetryPolicy;
use roastduel_http::generator::{DEFAULT_BASE_URL, DEFAULT_MODEL};

use crate::error::AppError;

/// Where generated roasts are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Upload endpoint plus read gateway.
    Gateway {
        /// Endpoint accepting uploads.
        upload_url: String,
        /// Gateway serving `{gateway_url}/{address}`.
        gateway_url: String,
        /// Bearer token for uploads.
        token: Option<String>,
    },
    /// The PostgreSQL content table.
    Postgres {
        /// Connection string.
        database_url: String,
    },
}

/// Typed worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Base URL of the duel-state gateway.
    pub ledger_url: String,
    /// Bearer token for ledger commits.
    pub ledger_token: Option<String>,
    /// Generation service key.
    pub openai_api_key: String,
    /// Generation service base URL.
    pub openai_base_url: String,
    /// Generation model.
    pub openai_model: String,
    /// Content store selection.
    pub store: StoreConfig,
    /// Period of the generation pass.
    pub generation_interval: Duration,
    /// Period of the narrative pass.
    pub narrative_interval: Duration,
    /// How far back a finished duel may lie to be narrated.
    pub narrative_window: chrono::Duration,
    /// Finished duels requested per narrative pass.
    pub finished_duels_limit: usize,
    /// Duels processed concurrently per generation pass.
    pub generation_concurrency: usize,
    /// Retry and timeout policy for every external call.
    pub retry: RetryPolicy,
    /// Status server bind host.
    pub host: String,
    /// Status server bind port.
    pub port: u16,
}

impl WorkerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value does not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let store = match env.get("CONTENT_STORE").as_deref().unwrap_or("gateway") {
            "gateway" => StoreConfig::Gateway {
                upload_url: env.require("STORE_UPLOAD_URL")?,
                gateway_url: env.require("STORE_GATEWAY_URL")?,
                token: env.get("STORE_TOKEN"),
            },
            "postgres" => StoreConfig::Postgres {
                database_url: env.require("DATABASE_URL")?,
            },
            other => {
                return Err(AppError::Config(format!(
                    "CONTENT_STORE must be `gateway` or `postgres`, got `{other}`"
                )));
            }
        };

        let window_hours: i64 = env.parse_or("NARRATIVE_WINDOW_HOURS", 24)?;
        let narrative_window = chrono::Duration::try_hours(window_hours)
            .filter(|window| *window > chrono::Duration::zero())
            .ok_or_else(|| AppError::Config("NARRATIVE_WINDOW_HOURS is out of range".into()))?;

        let retry = RetryPolicy {
            max_attempts: env.parse_or("RETRY_MAX_ATTEMPTS", 4)?,
            base_delay: Duration::from_millis(env.parse_or("RETRY_BASE_DELAY_MS", 500)?),
            max_delay: Duration::from_millis(env.parse_or("RETRY_MAX_DELAY_MS", 10_000)?),
            call_timeout: Duration::from_secs(env.parse_or("CALL_TIMEOUT_SECS", 30)?),
            ..RetryPolicy::default()
        };

        Ok(Self {
            ledger_url: env.require("LEDGER_URL")?,
            ledger_token: env.get("LEDGER_TOKEN"),
            openai_api_key: env.require("OPENAI_API_KEY")?,
            openai_base_url: env
                .get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            openai_model: env
                .get("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            store,
            generation_interval: env.seconds_or("GENERATION_INTERVAL_SECS", 300)?,
            narrative_interval: env.seconds_or("NARRATIVE_INTERVAL_SECS", 86_400)?,
            narrative_window,
            finished_duels_limit: env.parse_or("FINISHED_DUELS_LIMIT", 50)?,
            generation_concurrency: env.parse_or("GENERATION_CONCURRENCY", 4)?,
            retry,
            host: env.get("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: env.parse_or("PORT", 3000)?,
        })
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Blank values count as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    fn require(&self, key: &str) -> Result<String, AppError> {
        self.get(key)
            .ok_or_else(|| AppError::Config(format!("{key} environment variable must be set")))
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, AppError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| AppError::Config(format!("{key} is invalid: {e}"))),
            None => Ok(default),
        }
    }

    fn seconds_or(&self, key: &str, default: u64) -> Result<Duration, AppError> {
        let seconds: u64 = self.parse_or(key, default)?;
        if seconds == 0 {
            return Err(AppError::Config(format!("{key} must be positive")));
        }
        Ok(Duration::from_secs(seconds))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    const MINIMAL: [(&str, &str); 4] = [
        ("LEDGER_URL", "http://ledger.local"),
        ("OPENAI_API_KEY", "sk-test"),
        ("STORE_UPLOAD_URL", "http://store.local/upload"),
        ("STORE_GATEWAY_URL", "http://store.local/ipfs"),
    ];

    #[test]
    fn test_defaults_apply() {
        // Act
        let config = WorkerConfig::from_lookup(lookup(&MINIMAL)).unwrap();

        // Assert
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert_eq!(config.openai_model, "gpt-4");
        assert_eq!(config.generation_interval, Duration::from_secs(300));
        assert_eq!(config.narrative_interval, Duration::from_secs(86_400));
        assert_eq!(config.narrative_window, chrono::Duration::hours(24));
        assert_eq!(config.finished_duels_limit, 50);
        assert_eq!(config.generation_concurrency, 4);
        assert_eq!(config.retry.max_attempts, 4);
        assert_eq!(config.retry.base_delay, Duration::from_millis(500));
        assert_eq!(config.retry.max_delay, Duration::from_secs(10));
        assert_eq!(config.retry.call_timeout, Duration::from_secs(30));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert!(matches!(config.store, StoreConfig::Gateway { token: None, .. }));
    }

    #[test]
    fn test_missing_ledger_url_is_rejected() {
        let err = WorkerConfig::from_lookup(lookup(&MINIMAL[1..])).unwrap_err();

        assert!(err.to_string().contains("LEDGER_URL"));
    }

    #[test]
    fn test_postgres_store_requires_database_url() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("CONTENT_STORE", "postgres"));

        let err = WorkerConfig::from_lookup(lookup(&pairs)).unwrap_err();

        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_postgres_store_selected() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("CONTENT_STORE", "postgres"));
        pairs.push(("DATABASE_URL", "postgres://localhost/roasts"));

        let config = WorkerConfig::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(
            config.store,
            StoreConfig::Postgres {
                database_url: "postgres://localhost/roasts".into()
            }
        );
    }

    #[test]
    fn test_unparsable_number_is_rejected() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("PORT", "eighty"));

        let err = WorkerConfig::from_lookup(lookup(&pairs)).unwrap_err();

        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("GENERATION_INTERVAL_SECS", "0"));

        assert!(WorkerConfig::from_lookup(lookup(&pairs)).is_err());
    }

    #[test]
    fn test_unknown_store_is_rejected() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("CONTENT_STORE", "s3"));

        assert!(WorkerConfig::from_lookup(lookup(&pairs)).is_err());
    }
}
