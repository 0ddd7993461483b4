//! Process configuration, read from environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use daybook_observability::LogFormat;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEV_JWT_SECRET: &str = "dev-secret";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(var: &'static str, reason: impl ToString) -> Self {
        Self::Invalid {
            var,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,
    pub jwt_issuer: Option<String>,
    pub cors_origins: Vec<String>,
    /// PostgreSQL connection string; the in-memory store is used when unset.
    pub database_url: Option<String>,
    /// Period of the background streak sweep; disabled when unset.
    pub streak_sweep_interval: Option<Duration>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// True when no `JWT_SECRET` was supplied.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid("BIND_ADDR", e))?;

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| DEV_JWT_SECRET.to_string());

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        let streak_sweep_interval = var("STREAK_SWEEP_INTERVAL_SECS")
            .map(|raw| match raw.parse::<u64>() {
                Ok(0) => Err(ConfigError::invalid("STREAK_SWEEP_INTERVAL_SECS", "must be positive")),
                Ok(secs) => Ok(Duration::from_secs(secs)),
                Err(e) => Err(ConfigError::invalid("STREAK_SWEEP_INTERVAL_SECS", e)),
            })
            .transpose()?;

        let log_format = var("LOG_FORMAT")
            .map(|raw| raw.parse::<LogFormat>())
            .transpose()
            .map_err(|e| ConfigError::invalid("LOG_FORMAT", e))?
            .unwrap_or_default();

        Ok(Self {
            bind_addr,
            jwt_secret,
            jwt_audience: var("JWT_AUDIENCE"),
            jwt_issuer: var("JWT_ISSUER"),
            cors_origins,
            database_url: var("DATABASE_URL"),
            streak_sweep_interval,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
        assert_eq!(cfg.jwt_secret, DEV_JWT_SECRET);
        assert!(cfg.uses_dev_secret());
        assert_eq!(cfg.cors_origins, vec![DEFAULT_CORS_ORIGIN.to_string()]);
        assert_eq!(cfg.database_url, None);
        assert_eq!(cfg.streak_sweep_interval, None);
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn reads_all_variables() {
        let cfg = load(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_AUDIENCE", "daybook"),
            ("JWT_ISSUER", "https://id.example.com"),
            ("CORS_ORIGINS", "https://a.example.com, https://b.example.com,"),
            ("DATABASE_URL", "postgres://localhost/daybook"),
            ("STREAK_SWEEP_INTERVAL_SECS", "3600"),
            ("LOG_FORMAT", "pretty"),
        ])
        .unwrap();

        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.jwt_secret, "s3cret");
        assert_eq!(cfg.jwt_audience.as_deref(), Some("daybook"));
        assert_eq!(cfg.jwt_issuer.as_deref(), Some("https://id.example.com"));
        assert_eq!(cfg.cors_origins.len(), 2);
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/daybook"));
        assert_eq!(cfg.streak_sweep_interval, Some(Duration::from_secs(3600)));
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = load(&[("DATABASE_URL", "  "), ("JWT_AUDIENCE", "")]).unwrap();
        assert_eq!(cfg.database_url, None);
        assert_eq!(cfg.jwt_audience, None);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(
            load(&[("BIND_ADDR", "nope")]),
            Err(ConfigError::Invalid { var: "BIND_ADDR", .. })
        ));
        assert!(matches!(
            load(&[("STREAK_SWEEP_INTERVAL_SECS", "0")]),
            Err(ConfigError::Invalid { var: "STREAK_SWEEP_INTERVAL_SECS", .. })
        ));
        assert!(matches!(
            load(&[("LOG_FORMAT", "xml")]),
            Err(ConfigError::Invalid { var: "LOG_FORMAT", .. })
        ));
    }
}
