use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::domain::models::event::Event;

/// Length of the window during which a started event counts as happening.
pub const EVENT_WINDOW_HOURS: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Scheduled,
    Happening,
    Finished,
}

/// Accepts `YYYY-MM-DD` on its own or as the leading part of a date-time
/// value (`2025-06-01T00:00:00.000Z`, `2025-06-01 10:00`).
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    static DATE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = DATE_REGEX.get_or_init(|| {
        Regex::new(r"^(\d{4})-(\d{2})-(\d{2})(?:$|[T ])").expect("Failed to compile date regex")
    });

    let caps = regex.captures(raw.trim())?;
    let year = caps[1].parse::<i32>().ok()?;
    let month = caps[2].parse::<u32>().ok()?;
    let day = caps[3].parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// 24-hour `H:MM`, `HH:MM` or `HH:MM:SS`. Seconds are validated then dropped.
pub fn parse_event_time(raw: &str) -> Option<NaiveTime> {
    let parts: Vec<&str> = raw.trim().split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    let mut values = [0u32; 3];
    for (slot, part) in values.iter_mut().zip(&parts) {
        if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }

    let [hour, minute, second] = values;
    if hour > 23 || minute > 59 || second > 59 {
        return None;
    }
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// The instant at which `date` + `time` occurs on a wall clock in `tz`.
/// Ambiguous local times resolve to the earlier instant; times skipped by a
/// DST jump have no instant.
pub fn local_start(date: NaiveDate, time: NaiveTime, tz: Tz) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

pub fn compute_status(date: &str, time: &str, tz: Tz, now: DateTime<Utc>) -> EventStatus {
    let start = parse_event_date(date)
        .zip(parse_event_time(time))
        .and_then(|(d, t)| local_start(d, t, tz));

    let Some(start) = start else {
        tracing::debug!(date, time, "Unparseable event schedule, treating as scheduled");
        return EventStatus::Scheduled;
    };

    status_at(start, now)
}

pub fn event_status(event: &Event, tz: Tz, now: DateTime<Utc>) -> EventStatus {
    let start = parse_event_time(&event.time)
        .and_then(|t| local_start(event.date, t, tz));

    match start {
        Some(start) => status_at(start, now),
        None => EventStatus::Scheduled,
    }
}

fn status_at(start: DateTime<Utc>, now: DateTime<Utc>) -> EventStatus {
    let end = start + Duration::hours(EVENT_WINDOW_HOURS);
    if now < start {
        EventStatus::Scheduled
    } else if now <= end {
        EventStatus::Happening
    } else {
        EventStatus::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_status_transitions() {
        let tz = chrono_tz::UTC;
        assert_eq!(compute_status("2025-06-01", "10:00", tz, utc("2025-06-01T09:00:00Z")), EventStatus::Scheduled);
        assert_eq!(compute_status("2025-06-01", "10:00", tz, utc("2025-06-01T10:30:00Z")), EventStatus::Happening);
        assert_eq!(compute_status("2025-06-01", "10:00", tz, utc("2025-06-01T13:01:00Z")), EventStatus::Finished);
    }

    #[test]
    fn test_window_edges_are_inclusive() {
        let tz = chrono_tz::UTC;
        assert_eq!(compute_status("2025-06-01", "10:00", tz, utc("2025-06-01T10:00:00Z")), EventStatus::Happening);
        assert_eq!(compute_status("2025-06-01", "10:00", tz, utc("2025-06-01T12:00:00Z")), EventStatus::Happening);
        assert_eq!(compute_status("2025-06-01", "10:00", tz, utc("2025-06-01T12:00:01Z")), EventStatus::Finished);
    }

    #[test]
    fn test_malformed_input_falls_back_to_scheduled() {
        let tz = chrono_tz::UTC;
        let now = utc("2030-01-01T00:00:00Z");
        assert_eq!(compute_status("2025-06-01", "25:99", tz, now), EventStatus::Scheduled);
        assert_eq!(compute_status("2025-06-01", "10:60", tz, now), EventStatus::Scheduled);
        assert_eq!(compute_status("2025-06-01", "ten:00", tz, now), EventStatus::Scheduled);
        assert_eq!(compute_status("2025-06-01", "", tz, now), EventStatus::Scheduled);
        assert_eq!(compute_status("06/01/2025", "10:00", tz, now), EventStatus::Scheduled);
        assert_eq!(compute_status("2025-02-30", "10:00", tz, now), EventStatus::Scheduled);
    }

    #[test]
    fn test_accepts_date_portion_of_datetime() {
        assert_eq!(parse_event_date("2025-06-01T00:00:00.000Z"), NaiveDate::from_ymd_opt(2025, 6, 1));
        assert_eq!(parse_event_date(" 2025-06-01 "), NaiveDate::from_ymd_opt(2025, 6, 1));
        assert_eq!(parse_event_date("2025-06-011"), None);
    }

    #[test]
    fn test_time_forms() {
        assert_eq!(parse_event_time("9:05"), NaiveTime::from_hms_opt(9, 5, 0));
        assert_eq!(parse_event_time("23:59:30"), NaiveTime::from_hms_opt(23, 59, 0));
        assert_eq!(parse_event_time("24:00"), None);
        assert_eq!(parse_event_time("10"), None);
        assert_eq!(parse_event_time("10:00:00:00"), None);
        assert_eq!(parse_event_time("-1:30"), None);
    }

    #[test]
    fn test_local_time_respects_zone() {
        // 10:00 in Berlin (CEST, UTC+2) is 08:00 UTC.
        let tz = chrono_tz::Europe::Berlin;
        assert_eq!(compute_status("2025-06-01", "10:00", tz, utc("2025-06-01T07:59:00Z")), EventStatus::Scheduled);
        assert_eq!(compute_status("2025-06-01", "10:00", tz, utc("2025-06-01T08:30:00Z")), EventStatus::Happening);
        assert_eq!(compute_status("2025-06-01", "10:00", tz, utc("2025-06-01T10:30:00Z")), EventStatus::Finished);
    }

    #[test]
    fn test_skipped_local_time_is_scheduled() {
        // 02:30 does not exist in Berlin on the spring-forward night.
        let tz = chrono_tz::Europe::Berlin;
        let now = utc("2025-03-30T12:00:00Z");
        assert_eq!(compute_status("2025-03-30", "02:30", tz, now), EventStatus::Scheduled);
    }

    #[test]
    fn test_repeatable_for_fixed_now() {
        let now = utc("2025-06-01T10:30:00Z");
        let first = compute_status("2025-06-01", "10:00", chrono_tz::UTC, now);
        for _ in 0..10 {
            assert_eq!(compute_status("2025-06-01", "10:00", chrono_tz::UTC, now), first);
        }
    }
}
