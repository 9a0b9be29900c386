use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::dtos::{
    requests::{ChangePasswordRequest, LoginRequest},
    responses::{LoginResponse, SuccessResponse},
};
use crate::api::extractors::json::ApiJson;
use crate::error::AppError;
use crate::state::AppState;

pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth_service.authenticate(&payload.username, &payload.password).await?;
    Ok(Json(LoginResponse { success: true, user }))
}

pub async fn change_password(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.change_password(payload.user_id, &payload.new_password).await?;
    Ok(Json(SuccessResponse { success: true, message: "Password changed successfully" }))
}
