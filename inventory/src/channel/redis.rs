//! Redis-list backed bounded queue used by the distributed services.

use std::marker::PhantomData;
use std::time::Duration;

use fred::prelude::{
    Client, ClientLike, EventInterface, ListInterface, Pool, ReconnectPolicy, Server, ServerConfig,
    TcpConfig,
};
use fred::types::Builder;
use fred::types::config::{Options, UnresponsiveConfig};
use futures::future::join_all;
use inventory_config::shared::RedisConfig;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error};

use crate::channel::BoundedQueue;
use crate::error::{ErrorKind, InvResult};
use crate::inv_error;

const POOL_SIZE: usize = 5;

/// Client-side deadline for non-blocking commands.
///
/// Applied per command instead of through the pool's default timeout: a
/// default would also cancel parked `BRPOP`s, and a client abandoning a
/// blocking pop can strand an element the server already handed over.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

fn options_with_timeout(timeout: Option<Duration>) -> Options {
    Options {
        timeout,
        ..Options::default()
    }
}

/// Connects a pooled client suitable for backing [`RedisQueue`]s.
///
/// The pool reconnects with exponential backoff and logs connection errors
/// and unresponsive servers from background tasks.
pub async fn connect_pool(config: &RedisConfig) -> InvResult<Pool> {
    let pool = Builder::default_centralized()
        .with_config(|redis_config| {
            redis_config.password = config.password.clone();
            redis_config.username = config.username.clone();
            redis_config.server = ServerConfig::Centralized {
                server: Server::new(config.host.clone(), config.port),
            };
        })
        .with_connection_config(|config| {
            config.internal_command_timeout = Duration::from_secs(5);
            config.reconnect_on_auth_error = true;
            config.tcp = TcpConfig {
                #[cfg(target_os = "linux")]
                user_timeout: Some(Duration::from_secs(5)),
                ..Default::default()
            };
            config.unresponsive = UnresponsiveConfig {
                max_timeout: Some(Duration::from_secs(10)),
                interval: Duration::from_secs(3),
            };
        })
        .set_policy(ReconnectPolicy::new_exponential(0, 1, 2000, 5))
        .build_pool(POOL_SIZE)
        .map_err(|err| {
            inv_error!(ErrorKind::ConfigError, "invalid redis configuration", source: err)
        })?;

    for client in pool.clients() {
        spawn_event_loggers(client);
    }

    let connect_handles = pool.connect_pool();
    pool.wait_for_connect().await.map_err(|err| {
        inv_error!(ErrorKind::QueueError, "failed to connect to redis", source: err)
    })?;

    tokio::spawn(async move {
        let _results = join_all(connect_handles).await;
    });

    Ok(pool)
}

// Tasks that surface connection close and reconnect events in the logs.
fn spawn_event_loggers(client: &Client) {
    let mut error_rx = client.error_rx();
    let mut reconnect_rx = client.reconnect_rx();
    let mut unresponsive_rx = client.unresponsive_rx();

    tokio::spawn(async move {
        loop {
            match error_rx.recv().await {
                Ok((error, Some(server))) => {
                    error!("redis client ({server:?}) error: {error:?}");
                }
                Ok((error, None)) => {
                    error!("redis client error: {error:?}");
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    tokio::spawn(async move {
        loop {
            match unresponsive_rx.recv().await {
                Ok(server) => {
                    error!("redis client ({server:?}) unresponsive");
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    tokio::spawn(async move {
        loop {
            match reconnect_rx.recv().await {
                Ok(server) => {
                    debug!("redis client connected to {server:?}");
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });
}

/// A bounded queue backed by a Redis list.
///
/// Items are JSON documents pushed with `LPUSH` and consumed with `BRPOP`, so
/// insertion order is preserved and Redis hands each element to exactly one
/// consumer. The capacity bound is a soft limit: producers check `LLEN`
/// before pushing, and concurrent producers may transiently overshoot by a
/// few items. That is acceptable for backpressure purposes and avoids a
/// server-side script.
pub struct RedisQueue<T> {
    pool: Pool,
    key: String,
    capacity: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> RedisQueue<T> {
    pub fn new(pool: Pool, key: impl Into<String>, capacity: usize) -> Self {
        Self {
            pool,
            key: key.into(),
            capacity,
            _marker: PhantomData,
        }
    }

    /// The Redis key holding the list.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<T> Clone for RedisQueue<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            key: self.key.clone(),
            capacity: self.capacity,
            _marker: PhantomData,
        }
    }
}

impl<T> BoundedQueue<T> for RedisQueue<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn push(&self, item: T, _timeout: Duration) -> InvResult<bool> {
        let options = options_with_timeout(Some(COMMAND_TIMEOUT));
        let queued: i64 = self
            .pool
            .with_options(&options)
            .llen(self.key.as_str())
            .await
            .map_err(|err| {
                inv_error!(ErrorKind::QueueError, "failed to read queue length", source: err)
            })?;
        if queued >= self.capacity as i64 {
            return Ok(false);
        }

        let encoded = serde_json::to_string(&item).map_err(|err| {
            inv_error!(ErrorKind::SerializationError, "failed to encode queue item", source: err)
        })?;
        let _: i64 = self
            .pool
            .with_options(&options)
            .lpush(self.key.as_str(), encoded)
            .await
            .map_err(|err| {
                inv_error!(ErrorKind::QueueError, "failed to push queue item", source: err)
            })?;

        Ok(true)
    }

    async fn pop(&self, timeout: Option<Duration>) -> InvResult<Option<T>> {
        // BRPOP treats a zero timeout as "wait forever".
        let timeout_secs = timeout.map(|timeout| timeout.as_secs_f64()).unwrap_or(0.0);

        // The server owns the blocking timeout. Bounded pops get a grace
        // period on top of it before the client gives up; unbounded pops
        // must never be cancelled from the client side.
        let options = options_with_timeout(timeout.map(|timeout| timeout + COMMAND_TIMEOUT));
        let popped: Option<(String, String)> = self
            .pool
            .with_options(&options)
            .brpop(self.key.as_str(), timeout_secs)
            .await
            .map_err(|err| {
                inv_error!(ErrorKind::QueueError, "failed to pop queue item", source: err)
            })?;

        let Some((_key, raw)) = popped else {
            return Ok(None);
        };

        let item = serde_json::from_str(&raw).map_err(|err| {
            inv_error!(
                ErrorKind::MalformedItem,
                "malformed queue item",
                detail = raw,
                source: err
            )
        })?;

        Ok(Some(item))
    }

    async fn len(&self) -> InvResult<usize> {
        let options = options_with_timeout(Some(COMMAND_TIMEOUT));
        let queued: i64 = self
            .pool
            .with_options(&options)
            .llen(self.key.as_str())
            .await
            .map_err(|err| {
                inv_error!(ErrorKind::QueueError, "failed to read queue length", source: err)
            })?;

        Ok(queued.max(0) as usize)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
