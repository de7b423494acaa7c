//! Gateway application server wrapper.

use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use inventory::channel::{BoundedQueue, RedisQueue};
use inventory::channel::redis::connect_pool;
use inventory::dispatcher::Dispatcher;
use inventory::types::TaskItem;
use inventory_config::shared::GatewayConfig;
use tracing_actix_web::TracingLogger;

use crate::routes::{GatewayState, configure_routes};

/// Manages the HTTP server lifecycle.
pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Builds the gateway against the Redis-backed task queue.
    pub async fn build(config: GatewayConfig) -> anyhow::Result<Self> {
        let pool = connect_pool(&config.redis).await?;
        let task_queue = RedisQueue::<TaskItem>::new(
            pool,
            config.redis.task_queue_key.clone(),
            config.queue.tasks_maxsize,
        );

        Self::build_with_queue(&config, task_queue)
    }

    /// Builds the gateway against an arbitrary queue backing.
    pub fn build_with_queue<Q>(config: &GatewayConfig, task_queue: Q) -> anyhow::Result<Self>
    where
        Q: BoundedQueue<TaskItem> + Clone + Send + Sync + 'static,
    {
        let listener = TcpListener::bind(config.service.address())?;
        let port = listener.local_addr()?.port();

        let put_timeout = config.queue.put_timeout();
        let server = HttpServer::new(move || {
            let state = GatewayState {
                dispatcher: Dispatcher::new(task_queue.clone(), put_timeout),
            };

            App::new()
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(state))
                .configure(configure_routes::<Q>)
        })
        .listen(listener)?
        .run();

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Runs the server until it receives a shutdown signal.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}
