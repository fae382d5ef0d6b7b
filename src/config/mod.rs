use serde::Deserialize;
use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value `{value}`")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expires_in_hours: i64,
}

// TTL for cached read pages (movies, shows, profiles)
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source. `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        Ok(Config {
            app: AppConfig {
                host: vars.or("HOST", "0.0.0.0"),
                port: vars.parse_or("PORT", 8000)?,
                environment: vars.or("ENVIRONMENT", "development"),
                rust_log: vars.or("RUST_LOG", "cinema_tickets=debug,tower_http=debug"),
                log_format: vars.parse_or("LOG_FORMAT", LogFormat::Pretty)?,
            },
            database: DatabaseConfig {
                url: vars.required("DATABASE_URL")?,
                pool_size: vars.parse_or("DB_POOL_SIZE", 20)?,
                acquire_timeout_secs: vars.parse_or("DB_ACQUIRE_TIMEOUT_SECONDS", 5)?,
            },
            redis: RedisConfig {
                url: vars.required("REDIS_URL")?,
            },
            jwt: JwtConfig {
                secret: vars.required("JWT_SECRET")?,
                expires_in_hours: vars.parse_or("JWT_EXPIRES_IN_HOURS", 24)?,
            },
            cache: CacheConfig {
                ttl_seconds: vars.parse_or("CACHE_TTL_SECONDS", 1800)?,
            },
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.environment.eq_ignore_ascii_case("production")
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::Missing(key))
    }

    fn parse_or<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(key) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value }),
            None => Ok(default),
        }
    }
}
