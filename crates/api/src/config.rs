//! Process configuration, read from environment variables.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `BIND_ADDR` | `0.0.0.0:8080` | listen address |
//! | `DATABASE_URL` | unset | Postgres URL; unset means in-memory sources |
//! | `DB_MAX_CONNECTIONS` | `5` | pool size |
//! | `STOCK_LOCALE` | `pt-BR` | collation used to order product names |
//! | `LOG_FORMAT` | `json` | `json` or `pretty` |

use std::net::SocketAddr;

use thiserror::Error;

use farmstock_observability::LogFormat;
use farmstock_stock::Collation;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not valid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub collation: Collation,
    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            database_url: None,
            db_max_connections: 5,
            collation: Collation::PtBr,
            log_format: LogFormat::Json,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// `LOG_FORMAT` alone, so logging can be installed before the rest of the
    /// configuration is read (locale fallback warnings are logged while parsing).
    pub fn log_format_from_env() -> Result<LogFormat, ConfigError> {
        Self::log_format_from_lookup(|var| std::env::var(var).ok())
    }

    pub fn log_format_from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<LogFormat, ConfigError> {
        match lookup("LOG_FORMAT").filter(|v| !v.trim().is_empty()) {
            Some(fmt) => LogFormat::parse(&fmt).ok_or_else(|| ConfigError::Invalid {
                var: "LOG_FORMAT",
                reason: format!("expected json or pretty, got '{fmt}'"),
            }),
            None => Ok(LogFormat::default()),
        }
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self {
            log_format: Self::log_format_from_lookup(&lookup)?,
            ..Self::default()
        };
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(addr) = get("BIND_ADDR") {
            config.bind_addr = addr.trim().parse().map_err(|e| ConfigError::Invalid {
                var: "BIND_ADDR",
                reason: format!("{e}"),
            })?;
        }

        config.database_url = get("DATABASE_URL");

        if let Some(n) = get("DB_MAX_CONNECTIONS") {
            config.db_max_connections = match n.trim().parse::<u32>() {
                Ok(v) if v > 0 => v,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        var: "DB_MAX_CONNECTIONS",
                        reason: "must be at least 1".to_string(),
                    });
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        var: "DB_MAX_CONNECTIONS",
                        reason: format!("{e}"),
                    });
                }
            };
        }

        if let Some(tag) = get("STOCK_LOCALE") {
            config.collation = Collation::from_locale_tag(&tag);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_env() {
        assert_eq!(ApiConfig::from_lookup(lookup(&[])).unwrap(), ApiConfig::default());
    }

    #[test]
    fn reads_all_variables() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("DATABASE_URL", "postgres://localhost/farm"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("STOCK_LOCALE", "C"),
            ("LOG_FORMAT", "pretty"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/farm"));
        assert_eq!(config.db_max_connections, 12);
        assert_eq!(config.collation, Collation::CodePoint);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn empty_database_url_means_in_memory() {
        let config = ApiConfig::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap();
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn rejects_bad_values() {
        let err = ApiConfig::from_lookup(lookup(&[("DB_MAX_CONNECTIONS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "DB_MAX_CONNECTIONS", .. }));

        let err = ApiConfig::from_lookup(lookup(&[("BIND_ADDR", "nowhere")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "BIND_ADDR", .. }));
    }

    #[test]
    fn log_format_is_readable_before_the_rest() {
        // A bad bind address must not stop logging from being installed.
        let env = lookup(&[("LOG_FORMAT", "pretty"), ("BIND_ADDR", "nowhere")]);
        assert_eq!(ApiConfig::log_format_from_lookup(&env), Ok(LogFormat::Pretty));
        assert!(ApiConfig::from_lookup(&env).is_err());

        assert_eq!(ApiConfig::log_format_from_lookup(lookup(&[])), Ok(LogFormat::Json));
        let err = ApiConfig::log_format_from_lookup(lookup(&[("LOG_FORMAT", "xml")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "LOG_FORMAT", .. }));
    }
}
