//! Gateway route behavior over an in-memory queue.

use actix_web::{App, test, web};
use inventory::channel::{BoundedQueue, MemoryQueue};
use inventory::dispatcher::Dispatcher;
use inventory::types::TaskItem;
use inventory_gateway::routes::{GatewayState, configure_routes};
use serde_json::{Value, json};
use tempfile::TempDir;

const PUT_TIMEOUT: std::time::Duration = std::time::Duration::from_millis(100);

fn state(queue: MemoryQueue<TaskItem>) -> web::Data<GatewayState<MemoryQueue<TaskItem>>> {
    web::Data::new(GatewayState {
        dispatcher: Dispatcher::new(queue, PUT_TIMEOUT),
    })
}

#[actix_web::test]
async fn health_check_reports_the_service() {
    let app = test::init_service(
        App::new()
            .app_data(state(MemoryQueue::new(5)))
            .configure(configure_routes::<MemoryQueue<TaskItem>>),
    )
    .await;

    let response = test::call_service(&app, test::TestRequest::get().uri("/health_check").to_request()).await;
    assert!(response.status().is_success());

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["service"], "inventory-gateway");
}

#[actix_web::test]
async fn dispatch_run_enqueues_supported_commands() {
    let dir = TempDir::new().unwrap();
    let commands_file = dir.path().join("commands.txt");
    std::fs::write(&commands_file, "inventory\nreboot\nINVENTORY\n").unwrap();

    let queue = MemoryQueue::new(5);
    let app = test::init_service(
        App::new()
            .app_data(state(queue.clone()))
            .configure(configure_routes::<MemoryQueue<TaskItem>>),
    )
    .await;

    let request = test::TestRequest::post()
        .uri("/v1/runs")
        .set_json(json!({ "commands_file": commands_file }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert!(response.status().is_success());

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["accepted"], 2);

    assert_eq!(queue.len().await.unwrap(), 2);
}

#[actix_web::test]
async fn missing_commands_file_is_reported_in_the_body() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.txt");

    let queue = MemoryQueue::new(5);
    let app = test::init_service(
        App::new()
            .app_data(state(queue.clone()))
            .configure(configure_routes::<MemoryQueue<TaskItem>>),
    )
    .await;

    let request = test::TestRequest::post()
        .uri("/v1/runs")
        .set_json(json!({ "commands_file": missing }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert!(response.status().is_success());

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["accepted"], 0);
    assert!(body["error"].as_str().unwrap().contains("commands file"));

    assert_eq!(queue.len().await.unwrap(), 0);
}

#[actix_web::test]
async fn malformed_request_body_is_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(state(MemoryQueue::new(5)))
            .configure(configure_routes::<MemoryQueue<TaskItem>>),
    )
    .await;

    let request = test::TestRequest::post()
        .uri("/v1/runs")
        .set_json(json!({ "wrong_field": "value" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert!(response.status().is_client_error());
}
