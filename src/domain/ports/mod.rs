use crate::domain::models::{
    attendee::{Attendee, Candidate},
    event::{Event, EventFields, NewEvent},
    user::{NewUser, User},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &NewEvent) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AppError>;
    /// Soonest first: date, then time.
    async fn list(&self) -> Result<Vec<Event>, AppError>;
    /// Merges `fields` into the stored event under its write lock, so
    /// concurrent edits of different fields both land. Event columns only.
    /// `None` when the event does not exist. Fails with a validation error
    /// for bad fields or a capacity below the current attendee count.
    async fn update(&self, id: i64, fields: &EventFields) -> Result<Option<Event>, AppError>;
    /// Deletes the event and its attendees atomically. `false` when the
    /// event did not exist.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait AttendeeRepository: Send + Sync {
    /// Ordered by join order.
    async fn list_by_event(&self, event_id: i64) -> Result<Vec<Attendee>, AppError>;
    /// Every attendee, ordered by event then join order.
    async fn list_all(&self) -> Result<Vec<Attendee>, AppError>;
    /// Checks and inserts under the event's write lock. Errors with
    /// `NotFound` when the event is missing, otherwise with the first
    /// admission rule the candidate breaks.
    async fn admit(&self, event_id: i64, candidate: &Candidate, now: DateTime<Utc>) -> Result<Attendee, AppError>;
    /// Removes the attendee matching `key` (phone, else name). `NotFound`
    /// for a missing event, `Ok(None)` for a missing attendee.
    async fn remove(&self, event_id: i64, key: &str) -> Result<Option<Attendee>, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
    /// Ids of attendees whose event no longer exists.
    async fn find_orphans(&self) -> Result<Vec<i64>, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &NewUser) -> Result<User, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
    async fn count_by_role(&self, role: &str) -> Result<i64, AppError>;
    /// Overwrites the hash, clears the rotation flag and bumps `updated_at`.
    /// `false` when the user does not exist.
    async fn update_password(&self, id: i64, password_hash: &str, now: DateTime<Utc>) -> Result<bool, AppError>;
}
