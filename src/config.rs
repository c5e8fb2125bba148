use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::{env, str::FromStr};
use tracing::Level;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub frontend_url: String,
    pub token_ttl: usize,
    pub api_prefix: String,

    // Pool
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub run_migrations: bool,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    // Logging
    pub log_dir: String,
    pub log_level: Level,
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn parsed_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_value(key, env::var(key).ok(), default)
}

fn parse_value<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            frontend_url: env::var("FRONTEND_URL").unwrap_or_else(|_| "*".to_string()),
            token_ttl: parsed_or("TOKEN_TTL", 3600)?, // 1 hour
            api_prefix: env::var("API_PREFIX").unwrap_or_default(),

            db_max_connections: parsed_or("DB_MAX_CONNECTIONS", 10)?,
            db_acquire_timeout_secs: parsed_or("DB_ACQUIRE_TIMEOUT_SECS", 5)?,
            run_migrations: parsed_or("RUN_MIGRATIONS", false)?,

            rate_login_per_min: parsed_or("RATE_LOGIN_PER_MIN", 60)?,
            rate_protected_per_min: parsed_or("RATE_PROTECTED_PER_MIN", 1000)?,

            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: parsed_or("LOG_LEVEL", Level::INFO)?,
        })
    }
}
