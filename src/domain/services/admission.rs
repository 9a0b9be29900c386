//! Rules deciding whether a join request may be admitted to an event.
//!
//! Everything here is pure: callers load the event and its roster (inside a
//! transaction holding the event's write lock) and persist the result.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

use crate::domain::models::{
    attendee::{Attendee, Candidate, NewAttendee, DEFAULT_ATTENDEE_ROLE},
    event::Event,
};
use crate::error::AppError;

/// Hard ceiling on attendees per event regardless of the stored `max_attendees`.
pub const CAPACITY_CEILING: i32 = 20;

// Column widths of the attendee table.
pub const MAX_NAME_LEN: usize = 255;
pub const MAX_TEAM_LEN: usize = 100;
pub const MAX_PHONE_LEN: usize = 32;
pub const MAX_ROLE_LEN: usize = 50;

pub fn effective_capacity(max_attendees: i32) -> i32 {
    max_attendees.clamp(0, CAPACITY_CEILING)
}

/// Optional leading `+`, then at least ten digits, spaces, hyphens or
/// parentheses, no longer than the stored column.
pub fn is_valid_phone(phone: &str) -> bool {
    if phone.chars().count() > MAX_PHONE_LEN {
        return false;
    }
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PHONE_REGEX
        .get_or_init(|| Regex::new(r"^\+?[\d\s\-()]{10,}$").expect("Failed to compile phone regex"));
    regex.is_match(phone)
}

/// Highest join order ever handed out is `high_water`; live rows can only be
/// at or below it, but are consulted in case the counter lags.
pub fn next_join_order(roster: &[Attendee], high_water: i32) -> i32 {
    let max_live = roster.iter().map(|a| a.join_order).max().unwrap_or(0);
    max_live.max(high_water) + 1
}

/// Runs the admission checks in order (fields, phone shape, duplicate,
/// capacity) and builds the row to insert. Event existence is the caller's
/// concern since it already holds `event`.
pub fn admit(
    event: &Event,
    roster: &[Attendee],
    high_water: i32,
    candidate: &Candidate,
    now: DateTime<Utc>,
) -> Result<NewAttendee, AppError> {
    let name = candidate.name.trim();
    let team = candidate.team.trim();
    let phone = candidate.phone.trim();

    let missing: Vec<String> = [("Name", name), ("Team", team), ("Phone", phone)]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Validation(missing));
    }

    let role = candidate.role.as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_ATTENDEE_ROLE);

    let too_long: Vec<String> = [("Name", name, MAX_NAME_LEN), ("Team", team, MAX_TEAM_LEN), ("Role", role, MAX_ROLE_LEN)]
        .into_iter()
        .filter(|(_, value, max)| value.chars().count() > *max)
        .map(|(field, _, max)| format!("{} must be at most {} characters", field, max))
        .collect();
    if !too_long.is_empty() {
        return Err(AppError::Validation(too_long));
    }

    if !is_valid_phone(phone) {
        return Err(AppError::InvalidPhone);
    }

    if roster.iter().any(|a| a.phone == phone) {
        return Err(AppError::DuplicateAttendee);
    }

    if roster.len() >= effective_capacity(event.max_attendees) as usize {
        return Err(AppError::EventFull);
    }

    Ok(NewAttendee {
        event_id: event.id,
        name: name.to_string(),
        team: team.to_string(),
        phone: phone.to_string(),
        role: role.to_string(),
        joined_at: now,
        join_order: next_join_order(roster, high_water),
    })
}

/// Picks the attendee a removal refers to: phone match first, then name
/// for identities that have no phone on file.
pub fn find_removal_target<'a>(roster: &'a [Attendee], key: &str) -> Option<&'a Attendee> {
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    roster.iter()
        .find(|a| a.phone == key)
        .or_else(|| roster.iter().find(|a| a.name == key))
}
