mod errors;
mod metrics;
mod model;
mod rest;
mod store;
mod validate;

use axum::{routing::get, Router};
use std::env;
use store::LatestReading;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let api_key = env::var("API_KEY").unwrap_or_else(|_| "SECRET_ESP32_KEY".to_string());
    let http_addr = env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());

    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting telemetry relay");
    info!("HTTP server: {}", http_addr);

    // Initialize metrics
    metrics::init_metrics();

    // The one shared reading, handed to every handler
    let latest = LatestReading::new();

    // Build HTTP app with REST API and metrics endpoint
    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .merge(rest::create_router(latest, api_key));

    // Start HTTP server
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .unwrap_or_else(|e| {
            error!("Failed to bind to {}: {}", http_addr, e);
            std::process::exit(1);
        });

    info!("HTTP server listening on {}", http_addr);

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap_or_else(|e| {
            error!("HTTP server error: {}", e);
        });
    });

    tokio::select! {
        _ = server_handle => {
            error!("HTTP server terminated");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("Shutting down");
}

async fn metrics_handler() -> String {
    metrics::gather_metrics()
}
