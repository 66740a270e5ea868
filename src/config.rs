use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    /// Supabase project ref parsed from `SUPABASE_URL`.
    pub supabase_project_ref: String,
    pub supabase_anon_key: String,
    /// HS256 project secret. When absent tokens are verified through JWKS.
    pub supabase_jwt_secret: Option<String>,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub request_timeout: Duration,
    /// New campaigns start in `pending_approval` instead of `active`.
    pub campaign_moderation: bool,
    pub default_platform_fee_percent: f64,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (the process env in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };

        let supabase_url = required("SUPABASE_URL")?;
        let supabase_project_ref = parse_project_ref(&supabase_url)?;

        let default_platform_fee_percent =
            parse_or("DEFAULT_PLATFORM_FEE_PERCENT", lookup("DEFAULT_PLATFORM_FEE_PERCENT"), 20.0)?;
        if !(0.0..=100.0).contains(&default_platform_fee_percent) {
            return Err(ConfigError::InvalidValue(
                "DEFAULT_PLATFORM_FEE_PERCENT".to_string(),
                "must be between 0 and 100".to_string(),
            ));
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port: parse_or("PORT", lookup("PORT"), 8080)?,
            supabase_project_ref,
            supabase_anon_key: required("SUPABASE_ANON_KEY")?,
            supabase_jwt_secret: lookup("SUPABASE_JWT_SECRET").filter(|v| !v.is_empty()),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", lookup("DB_MAX_CONNECTIONS"), 10)?,
            db_acquire_timeout: Duration::from_secs(parse_or(
                "DB_ACQUIRE_TIMEOUT_SECS",
                lookup("DB_ACQUIRE_TIMEOUT_SECS"),
                5,
            )?),
            request_timeout: Duration::from_secs(parse_or(
                "REQUEST_TIMEOUT_SECS",
                lookup("REQUEST_TIMEOUT_SECS"),
                10,
            )?),
            campaign_moderation: parse_or(
                "CAMPAIGN_MODERATION",
                lookup("CAMPAIGN_MODERATION"),
                false,
            )?,
            default_platform_fee_percent,
            run_migrations: parse_or("RUN_MIGRATIONS", lookup("RUN_MIGRATIONS"), false)?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string(), v)),
        _ => Ok(default),
    }
}

/// `https://PROJECT.supabase.co` -> `PROJECT`.
fn parse_project_ref(supabase_url: &str) -> Result<String, ConfigError> {
    supabase_url
        .trim_end_matches('/')
        .strip_prefix("https://")
        .and_then(|s| s.strip_suffix(".supabase.co"))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ConfigError::InvalidValue(
                "SUPABASE_URL".to_string(),
                "expected https://PROJECT.supabase.co".to_string(),
            )
        })
}
