use serde::Serialize;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use crate::domain::models::attendee::Attendee;
use crate::domain::services::status::EventStatus;

pub const DEFAULT_MAX_ATTENDEES: i32 = 20;
pub const DEFAULT_EVENT_STATUS: &str = "planned";
pub const MIN_MAX_ATTENDEES: i64 = 1;
pub const MAX_MAX_ATTENDEES: i64 = 1000;
pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_LOCATION_LEN: usize = 255;
pub const MAX_STATUS_LEN: usize = 50;

/// Stored event row. `status` is the free-form stored label, not the
/// time-derived [`EventStatus`].
#[derive(Debug, Serialize, FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub max_attendees: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new event row.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub max_attendees: i32,
    pub status: String,
}

/// Raw, unvalidated event fields as supplied by a caller. Every field is
/// optional so that missing values can be reported together.
#[derive(Debug, Clone, Default)]
pub struct EventFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub max_attendees: Option<i64>,
    pub status: Option<String>,
}

/// Combined event + roster view returned by every read and write.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    #[serde(flatten)]
    pub event: Event,
    pub attendees: Vec<Attendee>,
    pub attendee_count: usize,
    pub effective_capacity: i32,
    pub computed_status: EventStatus,
}
