use axum::{extract::{State, Path}, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::dtos::requests::AttendeeRequest;
use crate::api::extractors::json::ApiJson;
use crate::error::AppError;
use crate::state::AppState;

pub async fn add_attendee(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
    ApiJson(payload): ApiJson<AttendeeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_service.add_attendee(event_id, payload.into()).await?;
    Ok(Json(event))
}

/// `key` is the attendee's phone, or their name when no phone matches.
pub async fn remove_attendee(
    State(state): State<Arc<AppState>>,
    Path((event_id, key)): Path<(i64, String)>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_service.remove_attendee(event_id, &key).await?;
    Ok(Json(event))
}
