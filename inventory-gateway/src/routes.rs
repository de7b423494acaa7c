//! HTTP routes of the gateway.

use std::path::PathBuf;

use actix_web::{HttpResponse, web};
use inventory::channel::BoundedQueue;
use inventory::dispatcher::Dispatcher;
use inventory::error::ErrorKind;
use inventory::types::TaskItem;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Shared state handed to the route handlers.
pub struct GatewayState<Q> {
    pub dispatcher: Dispatcher<Q>,
}

#[derive(Debug, Serialize)]
struct HealthCheckResponse {
    ok: bool,
    service: &'static str,
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthCheckResponse {
        ok: true,
        service: "inventory-gateway",
    })
}

#[derive(Debug, Deserialize)]
pub struct DispatchRunRequest {
    /// Commands file readable by the gateway process.
    pub commands_file: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct DispatchRunResponse {
    pub ok: bool,
    pub accepted: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Dispatches the referenced commands file into the task queue.
///
/// A missing or unreadable commands file is a routine caller mistake and
/// reported in the response body; anything else is a server-side failure.
pub async fn dispatch_run<Q>(
    state: web::Data<GatewayState<Q>>,
    request: web::Json<DispatchRunRequest>,
) -> HttpResponse
where
    Q: BoundedQueue<TaskItem> + Clone + Send + Sync + 'static,
{
    match state.dispatcher.dispatch_file(&request.commands_file).await {
        Ok(accepted) => HttpResponse::Ok().json(DispatchRunResponse {
            ok: true,
            accepted,
            error: None,
        }),
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::CommandSourceMissing | ErrorKind::CommandSourceUnreadable
            ) =>
        {
            HttpResponse::Ok().json(DispatchRunResponse {
                ok: false,
                accepted: 0,
                error: Some(err.to_string()),
            })
        }
        Err(err) => {
            error!("dispatch request failed: {err}");
            HttpResponse::InternalServerError().json(DispatchRunResponse {
                ok: false,
                accepted: 0,
                error: Some("internal error".to_string()),
            })
        }
    }
}

/// Registers the gateway routes for the queue backing `Q`.
pub fn configure_routes<Q>(cfg: &mut web::ServiceConfig)
where
    Q: BoundedQueue<TaskItem> + Clone + Send + Sync + 'static,
{
    cfg.route("/health_check", web::get().to(health_check))
        .route("/v1/runs", web::post().to(dispatch_run::<Q>));
}
