use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

use crate::api::dtos::responses::{
    ApiInfoResponse, HealthResponse, IntegrityReport, IntegrityResponse, StatusResponse,
};
use crate::error::AppError;
use crate::state::AppState;

pub async fn api_info() -> impl IntoResponse {
    let endpoints = BTreeMap::from([
        ("GET /api/events", "List events with their attendees"),
        ("GET /api/events/{id}", "Get a single event"),
        ("POST /api/events", "Create an event"),
        ("PUT /api/events/{id}", "Update an event"),
        ("DELETE /api/events/{id}", "Delete an event and its attendees"),
        ("POST /api/events/{id}/attendees", "Join an event"),
        ("DELETE /api/events/{id}/attendees/{phoneOrName}", "Leave an event"),
        ("POST /api/auth/login", "Log in"),
        ("POST /api/auth/change-password", "Change a password"),
        ("GET /api/health", "Health check"),
        ("GET /api/status", "Store status"),
        ("GET /api/db-integrity", "Store integrity report"),
    ]);

    Json(ApiInfoResponse {
        name: "Event Tracker API",
        version: env!("CARGO_PKG_VERSION"),
        status: "Running",
        timestamp: Utc::now(),
        endpoints,
    })
}

pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse { status: "OK", timestamp: Utc::now() })
}

pub async fn status(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let total_events = state.event_repo.count().await?;
    let total_attendees = state.attendee_repo.count().await?;

    Ok(Json(StatusResponse {
        status: "OK",
        total_events,
        total_attendees,
        timestamp: Utc::now(),
    }))
}

pub async fn db_integrity(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let total_events = state.event_repo.count().await?;
    let total_attendees = state.attendee_repo.count().await?;
    let orphaned_ids = state.attendee_repo.find_orphans().await?;

    if !orphaned_ids.is_empty() {
        warn!(count = orphaned_ids.len(), "Found attendees without an event");
    }

    Ok(Json(IntegrityResponse {
        status: "OK",
        integrity: IntegrityReport {
            total_events,
            total_attendees,
            orphaned_attendees: orphaned_ids.len(),
            orphaned_ids,
        },
        timestamp: Utc::now(),
    }))
}
