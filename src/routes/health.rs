//! Health check endpoint for container orchestration.
//!
//! A liveness probe: answers 200 whenever the process can serve HTTP. It does
//! not call the backend, so a backend outage never restarts the frontend.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: String,
    pub mounted_pages: u64,
}

/// Health check handler.
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        version: state.config.ui.version.clone(),
        mounted_pages: state.pages.mounted_count(),
    })
}
