use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::models::user::UserProfile;

#[derive(Serialize)]
pub struct ApiInfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: &'static str,
    pub total_events: i64,
    pub total_attendees: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    pub total_events: i64,
    pub total_attendees: i64,
    pub orphaned_attendees: usize,
    pub orphaned_ids: Vec<i64>,
}

#[derive(Serialize)]
pub struct IntegrityResponse {
    pub status: &'static str,
    pub integrity: IntegrityReport,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserProfile,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
