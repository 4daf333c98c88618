use anyhow::Context;
use serde::Deserialize;

/// Upper bound for `TOKEN_TTL_MINUTES`: one year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub app_host: String,
    pub app_port: u16,
    pub base_path: String,
    pub token: TokenConfig,
    pub cors_allowed_origin: String,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't touch the process env.
    pub fn from_source<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL is not set")?;
        let token = TokenConfig {
            secret: lookup("TOKEN_SECRET_KEY").context("TOKEN_SECRET_KEY is not set")?,
            ttl_minutes: parse_or(&lookup, "TOKEN_TTL_MINUTES", 60)?,
        };
        anyhow::ensure!(
            (1..=MAX_TOKEN_TTL_MINUTES).contains(&token.ttl_minutes),
            "TOKEN_TTL_MINUTES must be between 1 and {}, got {}",
            MAX_TOKEN_TTL_MINUTES,
            token.ttl_minutes
        );

        Ok(Self {
            database_url,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            app_host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            app_port: parse_or(&lookup, "APP_PORT", 8080)?,
            base_path: normalize_base_path(
                &lookup("BASE_PATH").unwrap_or_else(|| "/api/v1".into()),
            ),
            token,
            cors_allowed_origin: lookup("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|| "http://localhost:4200".into()),
            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 10)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}

// "" and "/" mean no prefix; anything else gets a leading slash and no trailing one.
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
