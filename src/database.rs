//! # Redis
//!
//! Document store for restaurant chains.
//!
//! ## Layout
//!
//! - One Redis list, default key `restaurants:chains`
//! - Each element is one chain document serialized as JSON
//! - List order is storage order, every query preserves it
//!
//! ## Connection
//!
//! A single [`ConnectionManager`] is opened at startup and cloned into each
//! query. Clones share one multiplexed connection and reconnect on their own,
//! so handlers never open connections of their own.
//!
//! ## Files
//!
//! `RESTAURANTS_FILE` deployments serve a JSON export instead. The file is
//! checked once at startup and read again on every query, so a replaced
//! export is picked up without a restart. Tests hold chains in memory.
use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use redis::{
    AsyncCommands, Client, RedisError,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Chain;

pub const DEFAULT_KEY: &str = "restaurants:chains";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),

    #[error("Corrupt chain document: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Failed to read restaurants file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
pub enum Store {
    Redis {
        connection: ConnectionManager,
        key: String,
    },
    File(PathBuf),
    Memory(Arc<Vec<Chain>>),
}

impl Store {
    pub async fn connect(redis_url: &str, key: &str) -> Result<Self, StoreError> {
        Ok(Self::Redis {
            connection: init_redis(redis_url).await?,
            key: key.to_string(),
        })
    }

    pub fn from_chains(chains: Vec<Chain>) -> Self {
        Self::Memory(Arc::new(chains))
    }

    /// Fails early when the export is missing or unreadable.
    pub async fn from_file(path: &Path) -> Result<Self, StoreError> {
        let chains = read_export(path).await?;
        debug!("{} holds {} chain documents", path.display(), chains.len());

        Ok(Self::File(path.to_path_buf()))
    }

    /// Every chain document in storage order.
    pub async fn chains(&self) -> Result<Arc<Vec<Chain>>, StoreError> {
        match self {
            Store::Memory(chains) => Ok(chains.clone()),
            Store::File(path) => Ok(Arc::new(read_export(path).await?)),
            Store::Redis { connection, key } => {
                let mut connection = connection.clone();
                let raw: Vec<String> = connection.lrange(key, 0, -1).await?;

                debug!("Fetched {} chain documents from {key}", raw.len());

                let chains: Vec<Chain> = raw
                    .iter()
                    .enumerate()
                    .filter_map(|(index, document)| match serde_json::from_str(document) {
                        Ok(chain) => Some(chain),
                        Err(e) => {
                            warn!("Skipping corrupt chain document {index} in {key}: {e}");
                            None
                        }
                    })
                    .collect();

                Ok(Arc::new(chains))
            }
        }
    }
}

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, StoreError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(500));

    let client = Client::open(redis_url)?;
    let connection_manager = client.get_connection_manager_with_config(config).await?;

    Ok(connection_manager)
}

async fn read_export(path: &Path) -> Result<Vec<Chain>, StoreError> {
    let bytes = tokio::fs::read(path).await?;

    Ok(serde_json::from_slice(&bytes)?)
}

/// Writes every chain in one MULTI/EXEC, so readers see either the old list
/// or the complete new one. `replace` drops the existing list first.
pub async fn load_chains(
    connection: &mut ConnectionManager,
    key: &str,
    chains: &[Chain],
    replace: bool,
) -> Result<(), StoreError> {
    let documents = chains
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<String>, _>>()?;

    let mut pipe = redis::pipe();
    pipe.atomic();

    if replace {
        pipe.del(key).ignore();
    }
    if !documents.is_empty() {
        pipe.rpush(key, documents).ignore();
    }

    pipe.query_async::<()>(connection).await?;

    Ok(())
}
