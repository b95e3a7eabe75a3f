use anyhow::{Context, Result};
use std::{env, str::FromStr};

use super::config_model::{BackendServer, Database, DotEnvyConfig};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BODY_LIMIT_MB: u64 = 1;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_POOL_SIZE: u32 = 10;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = BackendServer {
        port: env_or("SERVER_PORT", DEFAULT_PORT)?,
        body_limit: env_or("SERVER_BODY_LIMIT", DEFAULT_BODY_LIMIT_MB)?,
        timeout: env_or("SERVER_TIMEOUT", DEFAULT_TIMEOUT_SECS)?,
    };

    let database = Database {
        url: env::var("DATABASE_URL").context("DATABASE_URL is required")?,
        pool_size: env_or("DATABASE_POOL_SIZE", DEFAULT_POOL_SIZE)?,
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
    })
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} is invalid: `{raw}`")),
        _ => Ok(default),
    }
}
