use serde::Serialize;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, FromRow, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub name: Option<String>,
    pub team: Option<String>,
    pub phone: Option<String>,
    pub must_change_password: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub name: Option<String>,
    pub must_change_password: bool,
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub name: Option<String>,
    pub team: Option<String>,
    pub phone: Option<String>,
    pub must_change_password: bool,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            name: user.name,
            team: user.team,
            phone: user.phone,
            must_change_password: user.must_change_password,
        }
    }
}
