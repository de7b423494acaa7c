use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{App, HttpResponse, HttpServer, web};
use inventory::channel::RedisQueue;
use inventory::channel::redis::connect_pool;
use inventory::types::ResultItem;
use inventory::workers::run_result_sink;
use inventory_config::shared::WriterConfig;
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_actix_web::TracingLogger;

pub async fn run(config: WriterConfig) -> anyhow::Result<()> {
    let pool = connect_pool(&config.redis).await?;
    let result_queue = RedisQueue::<ResultItem>::new(
        pool,
        config.redis.result_queue_key.clone(),
        config.queue.results_maxsize,
    );

    let server = build_health_server(&config)?;
    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    let sink = run_result_sink(
        result_queue,
        config.payload_path.clone(),
        config.pool.inventory_workers,
    );
    info!("writer service started");

    tokio::select! {
        summary = sink => {
            info!(
                persisted = summary.persisted,
                discarded = summary.discarded,
                stopped_workers = summary.stopped_workers,
                "writer service finished"
            );
        }
        _ = shutdown_signal() => {
            warn!("termination signal received before all workers stopped");
        }
    }

    server_handle.stop(true).await;
    if let Some(message) = server_exit_error(server_task.await) {
        error!("{message}");
    }

    Ok(())
}

// The server can die with an I/O error of its own; surface both layers.
fn server_exit_error(
    exit: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Option<String> {
    match exit {
        Ok(Ok(())) => None,
        Ok(Err(err)) => Some(format!("health server failed: {err}")),
        Err(err) => Some(format!("health server task failed: {err}")),
    }
}

#[derive(Debug, Serialize)]
struct HealthCheckResponse {
    ok: bool,
    service: &'static str,
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthCheckResponse {
        ok: true,
        service: "inventory-writer",
    })
}

fn build_health_server(config: &WriterConfig) -> anyhow::Result<Server> {
    let listener = TcpListener::bind(config.service.address())?;
    let server = HttpServer::new(|| {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
    })
    .listen(listener)?
    .run();

    Ok(server)
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(err) => {
            error!("failed to install SIGTERM handler: {err}");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
