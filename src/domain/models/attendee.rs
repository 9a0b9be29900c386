use serde::Serialize;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const DEFAULT_ATTENDEE_ROLE: &str = "guest";

#[derive(Debug, Serialize, FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub team: String,
    pub phone: String,
    pub role: String,
    pub joined_at: DateTime<Utc>,
    pub join_order: i32,
}

/// A join request as submitted, before any admission rule has run.
#[derive(Debug, Clone, Default)]
pub struct Candidate {
    pub name: String,
    pub team: String,
    pub phone: String,
    pub role: Option<String>,
}

/// An admitted attendee that has not been written yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendee {
    pub event_id: i64,
    pub name: String,
    pub team: String,
    pub phone: String,
    pub role: String,
    pub joined_at: DateTime<Utc>,
    pub join_order: i32,
}
