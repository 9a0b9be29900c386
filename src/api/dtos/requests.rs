use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::domain::models::{attendee::Candidate, event::EventFields};

/// Body of `POST /api/events` and `PUT /api/events/{id}`. Everything is
/// optional here; the service decides what is required for each operation.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub max_attendees: Option<i64>,
    pub status: Option<String>,
    /// Accepted so older clients can send whole events back, never applied.
    pub attendees: Option<IgnoredAny>,
}

impl From<EventRequest> for EventFields {
    fn from(req: EventRequest) -> Self {
        EventFields {
            title: req.title,
            description: req.description,
            date: req.date,
            time: req.time,
            location: req.location,
            max_attendees: req.max_attendees,
            status: req.status,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct AttendeeRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub phone: String,
    pub role: Option<String>,
}

impl From<AttendeeRequest> for Candidate {
    fn from(req: AttendeeRequest) -> Self {
        Candidate { name: req.name, team: req.team, phone: req.phone, role: req.role }
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub user_id: i64,
    pub new_password: String,
}
