use std::collections::HashMap;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::domain::models::{
    attendee::{Attendee, Candidate},
    event::{
        Event, EventFields, EventView, NewEvent, DEFAULT_EVENT_STATUS, DEFAULT_MAX_ATTENDEES,
        MAX_LOCATION_LEN, MAX_MAX_ATTENDEES, MAX_STATUS_LEN, MAX_TITLE_LEN, MIN_MAX_ATTENDEES,
    },
};
use crate::domain::ports::{AttendeeRepository, EventRepository};
use crate::domain::services::{admission::effective_capacity, status::{event_status, parse_event_date, parse_event_time}};
use crate::error::AppError;

/// Event CRUD plus attendee admission and removal. Every operation returns
/// the event together with its current roster.
pub struct EventService {
    events: Arc<dyn EventRepository>,
    attendees: Arc<dyn AttendeeRepository>,
    timezone: Tz,
}

impl EventService {
    pub fn new(events: Arc<dyn EventRepository>, attendees: Arc<dyn AttendeeRepository>, timezone: Tz) -> Self {
        Self { events, attendees, timezone }
    }

    pub async fn create_event(&self, fields: EventFields) -> Result<EventView, AppError> {
        let new_event = validate_new_event(fields)?;
        let created = self.events.create(&new_event).await?;
        info!("Created event: {} (ID: {})", created.title, created.id);
        Ok(self.view(created, Vec::new()))
    }

    pub async fn get_event(&self, id: i64) -> Result<EventView, AppError> {
        let event = self.find_event(id).await?;
        let attendees = self.attendees.list_by_event(id).await?;
        Ok(self.view(event, attendees))
    }

    pub async fn list_events(&self) -> Result<Vec<EventView>, AppError> {
        let events = self.events.list().await?;

        let mut rosters: HashMap<i64, Vec<Attendee>> = HashMap::new();
        for attendee in self.attendees.list_all().await? {
            rosters.entry(attendee.event_id).or_default().push(attendee);
        }

        let now = Utc::now();
        Ok(events.into_iter()
            .map(|event| {
                let roster = rosters.remove(&event.id).unwrap_or_default();
                self.view_at(event, roster, now)
            })
            .collect())
    }

    /// Changes event columns only; the roster is never touched here.
    pub async fn update_event(&self, id: i64, fields: EventFields) -> Result<EventView, AppError> {
        let updated = self.events.update(id, &fields).await?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))?;
        info!("Updated event: {} (ID: {})", updated.title, updated.id);

        let attendees = self.attendees.list_by_event(id).await?;
        Ok(self.view(updated, attendees))
    }

    pub async fn delete_event(&self, id: i64) -> Result<(), AppError> {
        if !self.events.delete(id).await? {
            return Err(AppError::NotFound("Event not found".into()));
        }
        info!("Deleted event {} and its attendees", id);
        Ok(())
    }

    pub async fn add_attendee(&self, event_id: i64, candidate: Candidate) -> Result<EventView, AppError> {
        match self.attendees.admit(event_id, &candidate, Utc::now()).await {
            Ok(attendee) => {
                info!(
                    event_id,
                    join_order = attendee.join_order,
                    "Admitted {} to event", attendee.name
                );
            }
            Err(e) => {
                if !matches!(e, AppError::Database(_) | AppError::Internal | AppError::InternalWithMsg(_)) {
                    warn!(event_id, reason = e.code(), "Admission rejected");
                }
                return Err(e);
            }
        }
        self.get_event(event_id).await
    }

    pub async fn remove_attendee(&self, event_id: i64, key: &str) -> Result<EventView, AppError> {
        let removed = self.attendees.remove(event_id, key).await?
            .ok_or_else(|| AppError::NotFound("Attendee not found".into()))?;
        info!(event_id, join_order = removed.join_order, "Removed {} from event", removed.name);
        self.get_event(event_id).await
    }

    async fn find_event(&self, id: i64) -> Result<Event, AppError> {
        self.events.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))
    }

    fn view(&self, event: Event, attendees: Vec<Attendee>) -> EventView {
        self.view_at(event, attendees, Utc::now())
    }

    pub fn view_at(&self, event: Event, attendees: Vec<Attendee>, now: DateTime<Utc>) -> EventView {
        EventView {
            attendee_count: attendees.len(),
            effective_capacity: effective_capacity(event.max_attendees),
            computed_status: event_status(&event, self.timezone, now),
            event,
            attendees,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn check_max_attendees(value: i64, errors: &mut Vec<String>) -> Option<i32> {
    if (MIN_MAX_ATTENDEES..=MAX_MAX_ATTENDEES).contains(&value) {
        Some(value as i32)
    } else {
        errors.push("Max attendees must be between 1 and 1000".into());
        None
    }
}

fn check_date(raw: &str, errors: &mut Vec<String>) -> Option<chrono::NaiveDate> {
    let parsed = parse_event_date(raw);
    if parsed.is_none() {
        errors.push("Event date must be a valid YYYY-MM-DD date".into());
    }
    parsed
}

/// Stored times are always zero-padded `HH:MM` so they sort chronologically.
fn check_time(raw: &str, errors: &mut Vec<String>) -> Option<String> {
    match parse_event_time(raw) {
        Some(time) => Some(time.format("%H:%M").to_string()),
        None => {
            errors.push("Event time must be HH:MM".into());
            None
        }
    }
}

fn check_len(value: String, label: &str, max: usize, errors: &mut Vec<String>) -> Option<String> {
    if value.chars().count() > max {
        errors.push(format!("{} must be at most {} characters", label, max));
        None
    } else {
        Some(value)
    }
}

/// Validates create input, reporting every problem at once.
pub fn validate_new_event(fields: EventFields) -> Result<NewEvent, AppError> {
    let mut errors = Vec::new();

    let title = match non_blank(fields.title) {
        Some(title) => check_len(title, "Event title", MAX_TITLE_LEN, &mut errors),
        None => {
            errors.push("Event title is required".to_string());
            None
        }
    };

    let date = match non_blank(fields.date) {
        Some(raw) => check_date(&raw, &mut errors),
        None => {
            errors.push("Event date is required".to_string());
            None
        }
    };

    let time = match non_blank(fields.time) {
        Some(raw) => check_time(&raw, &mut errors),
        None => {
            errors.push("Event time is required".to_string());
            None
        }
    };

    let location = match non_blank(fields.location) {
        Some(location) => check_len(location, "Event location", MAX_LOCATION_LEN, &mut errors),
        None => {
            errors.push("Event location is required".to_string());
            None
        }
    };

    let status = match non_blank(fields.status) {
        Some(status) => check_len(status, "Event status", MAX_STATUS_LEN, &mut errors),
        None => Some(DEFAULT_EVENT_STATUS.to_string()),
    };

    let max_attendees = match fields.max_attendees {
        Some(value) => check_max_attendees(value, &mut errors),
        None => Some(DEFAULT_MAX_ATTENDEES),
    };

    match (title, date, time, location, max_attendees, status) {
        (Some(title), Some(date), Some(time), Some(location), Some(max_attendees), Some(status)) if errors.is_empty() => {
            Ok(NewEvent {
                title,
                description: fields.description.unwrap_or_default(),
                date,
                time,
                location,
                max_attendees,
                status,
            })
        }
        _ => Err(AppError::Validation(errors)),
    }
}

/// Merges supplied fields into `event`. Required fields may be changed but
/// not blanked.
pub fn apply_changes(event: &mut Event, fields: EventFields) -> Result<(), AppError> {
    let mut errors = Vec::new();

    if let Some(raw) = fields.title {
        match non_blank(Some(raw)) {
            Some(title) => {
                if let Some(title) = check_len(title, "Event title", MAX_TITLE_LEN, &mut errors) {
                    event.title = title;
                }
            }
            None => errors.push("Event title is required".to_string()),
        }
    }
    if let Some(description) = fields.description {
        event.description = description;
    }
    if let Some(raw) = fields.date {
        match non_blank(Some(raw)) {
            Some(raw) => {
                if let Some(date) = check_date(&raw, &mut errors) {
                    event.date = date;
                }
            }
            None => errors.push("Event date is required".to_string()),
        }
    }
    if let Some(raw) = fields.time {
        match non_blank(Some(raw)) {
            Some(raw) => {
                if let Some(time) = check_time(&raw, &mut errors) {
                    event.time = time;
                }
            }
            None => errors.push("Event time is required".to_string()),
        }
    }
    if let Some(raw) = fields.location {
        match non_blank(Some(raw)) {
            Some(location) => {
                if let Some(location) = check_len(location, "Event location", MAX_LOCATION_LEN, &mut errors) {
                    event.location = location;
                }
            }
            None => errors.push("Event location is required".to_string()),
        }
    }
    if let Some(value) = fields.max_attendees
        && let Some(max_attendees) = check_max_attendees(value, &mut errors) {
        event.max_attendees = max_attendees;
    }
    if let Some(status) = non_blank(fields.status)
        && let Some(status) = check_len(status, "Event status", MAX_STATUS_LEN, &mut errors) {
        event.status = status;
    }

    if errors.is_empty() { Ok(()) } else { Err(AppError::Validation(errors)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fields() -> EventFields {
        EventFields {
            title: Some("Pickup game".into()),
            description: Some("Bring water".into()),
            date: Some("2025-06-01".into()),
            time: Some("10:00".into()),
            location: Some("Field 3".into()),
            max_attendees: None,
            status: None,
        }
    }

    #[test]
    fn test_defaults_applied() {
        let new_event = validate_new_event(fields()).unwrap();
        assert_eq!(new_event.max_attendees, 20);
        assert_eq!(new_event.status, "planned");
        assert_eq!(new_event.date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }

    #[test]
    fn test_all_missing_fields_listed() {
        let err = validate_new_event(EventFields { max_attendees: Some(0), ..Default::default() }).unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert_eq!(errors, vec![
                    "Event title is required",
                    "Event date is required",
                    "Event time is required",
                    "Event location is required",
                    "Max attendees must be between 1 and 1000",
                ]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut f = fields();
        f.title = Some("   ".into());
        assert!(matches!(validate_new_event(f), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_time_is_normalized_for_sorting() {
        let mut f = fields();
        f.time = Some("9:05".into());
        assert_eq!(validate_new_event(f).unwrap().time, "09:05");
    }

    #[test]
    fn test_unparseable_time_rejected() {
        for bad in ["banana", "25:00", "10:60", "10"] {
            let mut f = fields();
            f.time = Some(bad.into());
            match validate_new_event(f).unwrap_err() {
                AppError::Validation(errors) => assert_eq!(errors, vec!["Event time must be HH:MM"]),
                other => panic!("unexpected error: {:?}", other),
            }
        }
    }

    #[test]
    fn test_overlong_fields_rejected() {
        let mut f = fields();
        f.title = Some("t".repeat(256));
        f.location = Some("l".repeat(256));
        f.status = Some("s".repeat(51));
        match validate_new_event(f).unwrap_err() {
            AppError::Validation(errors) => assert_eq!(errors, vec![
                "Event title must be at most 255 characters",
                "Event location must be at most 255 characters",
                "Event status must be at most 50 characters",
            ]),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_datetime_date_accepted() {
        let mut f = fields();
        f.date = Some("2025-06-01T00:00:00.000Z".into());
        assert_eq!(validate_new_event(f).unwrap().date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }

    #[test]
    fn test_apply_changes_partial() {
        let mut event = Event {
            id: 1,
            title: "Old".into(),
            description: "d".into(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            time: "10:00".into(),
            location: "Here".into(),
            max_attendees: 20,
            status: "planned".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        apply_changes(&mut event, EventFields { title: Some("New".into()), ..Default::default() }).unwrap();
        assert_eq!(event.title, "New");
        assert_eq!(event.location, "Here");

        apply_changes(&mut event, EventFields { time: Some("7:30".into()), ..Default::default() }).unwrap();
        assert_eq!(event.time, "07:30");

        let err = apply_changes(&mut event, EventFields { time: Some("banana".into()), ..Default::default() }).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref e) if e == &vec!["Event time must be HH:MM".to_string()]));
        assert_eq!(event.time, "07:30");

        let err = apply_changes(&mut event, EventFields {
            location: Some("".into()),
            max_attendees: Some(1001),
            ..Default::default()
        }).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref e) if e.len() == 2));
    }
}
