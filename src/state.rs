use std::sync::Arc;

use anyhow::Result;
use reqwest::Client;
use tracing::info;

use super::{config::Config, database::Store};

pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub http_client: Client,
}

impl AppState {
    pub async fn new() -> Result<Arc<Self>> {
        let config = Config::load()?;

        let store = match &config.restaurants_file {
            Some(path) => {
                info!("Serving restaurants from {}", path.display());
                Store::from_file(path).await?
            }
            None => {
                info!("Connecting to Redis, list {}", config.restaurants_key);
                Store::connect(&config.redis_url, &config.restaurants_key).await?
            }
        };

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Store) -> Arc<Self> {
        Arc::new(Self {
            config,
            store,
            http_client: Client::new(),
        })
    }
}
