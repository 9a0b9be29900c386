use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::dtos::{requests::EventRequest, responses::MessageResponse};
use crate::api::extractors::json::ApiJson;
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_service.list_events().await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_service.get_event(id).await?;
    Ok(Json(event))
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<EventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_service.create_event(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<EventRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.attendees.is_some() {
        warn!(event_id = id, "Ignoring attendees in event update; use the attendee endpoints");
    }

    let event = state.event_service.update_event(id, payload.into()).await?;
    info!("Event {} now has {} attendees", event.event.id, event.attendee_count);
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.event_service.delete_event(id).await?;
    Ok(Json(MessageResponse { message: "Event deleted successfully" }))
}
