//! Health-check listener
//!
//! Hosting platforms probe an open HTTP port to decide whether the process is
//! alive. The bot itself talks to Telegram by polling, so this listener only
//! answers liveness probes.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::HealthConfig;
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

pub const RUNNING_TEXT: &str = "RG Service bot is running";

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    active_conversations: usize,
    issues: Vec<String>,
}

/// Build the health-check router
pub fn router(services: Arc<ServiceFactory>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .with_state(services)
}

/// Serve the health-check router on an already bound listener
pub async fn serve(listener: TcpListener, services: Arc<ServiceFactory>) -> Result<()> {
    info!(addr = ?listener.local_addr().ok(), "Health-check listener started");
    axum::serve(listener, router(services)).await?;
    Ok(())
}

/// Bind the configured address
pub async fn bind(config: &HealthConfig) -> Result<TcpListener> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    Ok(listener)
}

async fn index() -> &'static str {
    RUNNING_TEXT
}

async fn health(State(services): State<Arc<ServiceFactory>>) -> Json<HealthResponse> {
    let status = services.health_check().await;
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
        active_conversations: status.active_conversations,
        issues: status.get_issues(),
    })
}
