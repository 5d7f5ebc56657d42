use log::info;
use std::env;
use std::fmt;
use std::str::FromStr;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_JWT_TTL_HOURS: i64 = 24 * 7;
const MAX_JWT_TTL_HOURS: i64 = 24 * 365;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_address: String,
    pub jwt_ttl_hours: i64,
    pub database_max_connections: u32,
    pub workers: usize,
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, reason } => write!(f, "Invalid {}: {}", key, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::Invalid {
                key: "JWT_SECRET",
                reason: "cannot be empty".to_string(),
            });
        }

        let bind_address = lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let jwt_ttl_hours = parse_or(&lookup, "JWT_TTL_HOURS", DEFAULT_JWT_TTL_HOURS)?;
        if !(1..=MAX_JWT_TTL_HOURS).contains(&jwt_ttl_hours) {
            return Err(ConfigError::Invalid {
                key: "JWT_TTL_HOURS",
                reason: format!("must be between 1 and {}", MAX_JWT_TTL_HOURS),
            });
        }
        let database_max_connections =
            parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let workers = parse_or(&lookup, "WORKERS", num_cpus::get())?;

        Ok(Self {
            database_url,
            jwt_secret,
            bind_address,
            jwt_ttl_hours,
            database_max_connections,
            workers,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + fmt::Display,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => {
            info!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_optional_vars_missing() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/db"), ("JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.jwt_ttl_hours, 168);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.workers, num_cpus::get());
    }

    #[test]
    fn required_vars_are_enforced() {
        assert_eq!(load(&[("JWT_SECRET", "x")]).unwrap_err(), ConfigError::Missing("DATABASE_URL"));
        assert_eq!(load(&[("DATABASE_URL", "x")]).unwrap_err(), ConfigError::Missing("JWT_SECRET"));
        assert!(matches!(
            load(&[("DATABASE_URL", "x"), ("JWT_SECRET", "")]),
            Err(ConfigError::Invalid { key: "JWT_SECRET", .. })
        ));
    }

    #[test]
    fn malformed_numbers_name_the_variable() {
        let err = load(&[
            ("DATABASE_URL", "x"),
            ("JWT_SECRET", "y"),
            ("DATABASE_MAX_CONNECTIONS", "lots"),
        ])
        .unwrap_err();
        assert!(err.to_string().starts_with("Invalid DATABASE_MAX_CONNECTIONS"));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("DATABASE_URL", "x"),
            ("JWT_SECRET", "y"),
            ("BIND_ADDRESS", "0.0.0.0:5000"),
            ("JWT_TTL_HOURS", "2"),
            ("WORKERS", "3"),
        ])
        .unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:5000");
        assert_eq!(config.jwt_ttl_hours, 2);
        assert_eq!(config.workers, 3);
    }

    #[test]
    fn out_of_range_ttl_is_rejected() {
        for ttl in ["0", "-4", "100000"] {
            assert!(load(&[("DATABASE_URL", "x"), ("JWT_SECRET", "y"), ("JWT_TTL_HOURS", ttl)]).is_err());
        }
    }
}
