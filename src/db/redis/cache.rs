use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use redis::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Display;
use tokio::sync::{mpsc, oneshot};

use crate::error::AppError;
use crate::error::AppResult;
use crate::models::MovieId;

/// Writes queued beyond this are dropped rather than buffered
const WRITE_QUEUE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    MovieDetails(MovieId),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::MovieDetails(movie_id) => write!(f, "details:{}", movie_id),
        }
    }
}

/// Creates a Redis client for the metadata cache
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Key, serialized value and TTL in seconds
type PendingWrite = (String, String, u64);

/// Redis-backed cache for metadata lookups
///
/// Reads go straight to Redis. Writes go through a bounded queue to a single
/// background task, so a slow or absent Redis never delays a response.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::Sender<PendingWrite>,
}

/// Stops the cache writer after it flushes what is already queued
pub struct CacheWriterHandle {
    shutdown_tx: oneshot::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl CacheWriterHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cache writer task panicked");
        }
    }
}

impl Cache {
    /// Must be called from within a tokio runtime.
    pub fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::channel(WRITE_QUEUE_CAPACITY);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(Self::writer(redis_client.clone(), write_rx, shutdown_rx));

        let cache = Self {
            redis_client,
            write_tx,
        };

        (cache, CacheWriterHandle { shutdown_tx, task })
    }

    async fn writer(
        client: Client,
        mut write_rx: mpsc::Receiver<PendingWrite>,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) {
        let mut conn: Option<MultiplexedConnection> = None;

        loop {
            tokio::select! {
                Some(write) = write_rx.recv() => {
                    Self::write(&client, &mut conn, write).await;
                }
                _ = &mut shutdown_rx => break,
            }
        }

        // Cache clones still hold senders, so only take what is already queued
        while let Ok(write) = write_rx.try_recv() {
            Self::write(&client, &mut conn, write).await;
        }
        tracing::info!("Cache writer stopped");
    }

    async fn write(client: &Client, conn: &mut Option<MultiplexedConnection>, write: PendingWrite) {
        let (key, value, ttl) = write;
        if let Err(e) = Self::try_write(client, conn, &key, value, ttl).await {
            tracing::warn!(error = %e, key = %key, "Cache write failed");
        }
    }

    /// Reuses the writer's connection, opening one if needed. A failed write
    /// leaves `conn` empty so the next write reconnects.
    async fn try_write(
        client: &Client,
        conn: &mut Option<MultiplexedConnection>,
        key: &str,
        value: String,
        ttl: u64,
    ) -> AppResult<()> {
        let mut c = match conn.take() {
            Some(c) => c,
            None => client.get_multiplexed_async_connection().await?,
        };
        let _: () = c.set_ex(key, value, ttl).await?;
        *conn = Some(c);
        Ok(())
    }

    /// Retrieves and deserializes a cached value, `None` on a miss
    pub async fn get_from_cache<T: DeserializeOwned>(&self, key: &CacheKey) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        cached
            .map(|json| {
                serde_json::from_str(&json)
                    .map_err(|e| AppError::Internal(format!("Cache deserialization error: {}", e)))
            })
            .transpose()
    }

    /// Queues a value for writing without waiting for Redis
    pub fn set_in_background<T: Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        if let Err(e) = self.write_tx.try_send((key.to_string(), json, ttl)) {
            tracing::warn!(error = %e, key = %key, "Cache write dropped");
        }
    }
}
