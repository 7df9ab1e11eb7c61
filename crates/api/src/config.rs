use std::path::PathBuf;
use std::str::FromStr;

use axum::http::HeaderValue;

/// Default database: a throwaway in-memory SQLite database.
pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";

/// Default path of the agents YAML file.
pub const DEFAULT_AGENTS_CONFIG: &str = "config.yaml";

/// Errors raised while reading server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`). Covers generation
    /// round trips, so it sits above the LLM client timeout.
    pub request_timeout_secs: u64,
    /// Time allowed for agents and background jobs to stop (default: `10`).
    pub shutdown_timeout_secs: u64,
    /// SQLite URL (default: `sqlite::memory:`).
    pub database_url: String,
    /// Agents YAML file (default: `config.yaml`).
    pub agents_config: PathBuf,
    /// Persisted vital readings older than this many days are purged
    /// (default: `90`).
    pub vitals_retention_days: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `HOST`                  | `0.0.0.0`                |
    /// | `PORT`                  | `8000`                   |
    /// | `CORS_ORIGINS`          | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`  | `120`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `10`                     |
    /// | `DATABASE_URL`          | `sqlite::memory:`        |
    /// | `AGENTS_CONFIG`         | `config.yaml`            |
    /// | `VITALS_RETENTION_DAYS` | `90`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`ServerConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_var(&lookup, "PORT", 8000)?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                var: "CORS_ORIGINS",
                value: origin.clone(),
                reason: e.to_string(),
            })?;
        }

        let request_timeout_secs = parse_var(&lookup, "REQUEST_TIMEOUT_SECS", 120)?;
        let shutdown_timeout_secs = parse_var(&lookup, "SHUTDOWN_TIMEOUT_SECS", 10)?;

        let database_url = match lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(url) => url,
            None => {
                tracing::warn!(
                    default = DEFAULT_DATABASE_URL,
                    "DATABASE_URL not set, data will not survive a restart"
                );
                DEFAULT_DATABASE_URL.to_string()
            }
        };

        let agents_config = lookup("AGENTS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_AGENTS_CONFIG));

        let vitals_retention_days: i64 = parse_var(&lookup, "VITALS_RETENTION_DAYS", 90)?;
        if vitals_retention_days < 1 {
            return Err(ConfigError::Invalid {
                var: "VITALS_RETENTION_DAYS",
                value: vitals_retention_days.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            database_url,
            agents_config,
            vitals_retention_days,
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            value,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|var| map.get(var).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.agents_config, PathBuf::from("config.yaml"));
        assert_eq!(config.vitals_retention_days, 90);
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = load(&[("CORS_ORIGINS", "http://a.test, http://b.test,,")]).unwrap();
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn bad_port_is_reported_with_its_variable() {
        assert_matches!(
            load(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid { var: "PORT", .. })
        );
    }

    #[test]
    fn retention_must_be_positive() {
        assert_matches!(
            load(&[("VITALS_RETENTION_DAYS", "0")]),
            Err(ConfigError::Invalid {
                var: "VITALS_RETENTION_DAYS",
                ..
            })
        );
    }
}
