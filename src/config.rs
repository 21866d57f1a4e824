use std::{env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr};

use anyhow::Result;
use tracing::{info, warn};

use crate::database::DEFAULT_KEY;

pub struct Config {
    pub port: u16,
    pub redis_url: String,
    pub restaurants_key: String,
    pub restaurants_file: Option<PathBuf>,
    pub image_search_url: Option<String>,
    /// Largest accepted image upload, in bytes.
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        let redis_url = match read_secret("REDIS_URL") {
            Some(url) => url,
            None => try_load("REDIS_URL", "redis://127.0.0.1:6379")?,
        };

        Ok(Self {
            port: try_load("RUST_PORT", "5000")?,
            redis_url,
            restaurants_key: try_load("RESTAURANTS_KEY", DEFAULT_KEY)?,
            restaurants_file: var("RESTAURANTS_FILE").map(PathBuf::from),
            image_search_url: var("IMAGE_SEARCH_URL"),
            max_upload_bytes: try_load("MAX_UPLOAD_BYTES", "10485760")?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            restaurants_key: DEFAULT_KEY.to_string(),
            restaurants_file: None,
            image_search_url: None,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let value = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        anyhow::anyhow!("Invalid {key} value {value:?}: {e}")
    })
}

/// Docker secret, if one is mounted.
fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
