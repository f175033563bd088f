use anyhow::Context;
use time::{macros::format_description, UtcOffset};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    /// Zone used when rendering registration timestamps.
    pub utc_offset: UtcOffset,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = get("DATABASE_URL")
            .or_else(|| get("DB_PATH"))
            .filter(|v| !v.trim().is_empty())
            .context("DATABASE_URL (or DB_PATH) must be set")?;

        let max_connections = get("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let host = get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match get("APP_PORT") {
            Some(v) => v.parse::<u16>().with_context(|| format!("invalid APP_PORT {v:?}"))?,
            None => 8080,
        };
        let utc_offset = match get("APP_UTC_OFFSET") {
            Some(v) => parse_offset(&v)?,
            None => UtcOffset::from_hms(2, 0, 0)?,
        };

        Ok(Self {
            database_url,
            max_connections,
            host,
            port,
            utc_offset,
        })
    }
}

fn parse_offset(raw: &str) -> anyhow::Result<UtcOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Ok(UtcOffset::UTC);
    }
    UtcOffset::parse(
        raw,
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .with_context(|| format!("invalid APP_UTC_OFFSET {raw:?}, expected e.g. +02:00"))
}
