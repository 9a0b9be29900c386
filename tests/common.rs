#![allow(dead_code)]

use event_tracker_backend::{
    api::router::create_router,
    config::{Config, DEFAULT_ADMIN_PASSWORD},
    infra::factory::sqlite_state,
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = DEFAULT_ADMIN_PASSWORD;

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub state: Arc<AppState>,
    _dir: TempDir,
}

pub fn test_config(database_url: &str) -> Config {
    Config {
        database_url: database_url.to_string(),
        port: 0,
        enforce_https: false,
        timezone: chrono_tz::UTC,
        default_admin_username: ADMIN_USERNAME.to_string(),
        default_admin_password: ADMIN_PASSWORD.to_string(),
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(customize: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", dir.path().join("test.db").display());

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        let mut config = test_config(&db_url);
        customize(&mut config);

        let state = Arc::new(sqlite_state(pool.clone(), &config).await.expect("Failed to bootstrap test state"));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            state,
            _dir: dir,
        }
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Creates an event and returns its id.
    pub async fn create_event(&self, title: &str, max_attendees: i64) -> i64 {
        let response = self.request("POST", "/api/events", Some(serde_json::json!({
            "title": title,
            "description": "Weekly session",
            "date": "2030-06-01",
            "time": "18:00",
            "location": "Court 2",
            "maxAttendees": max_attendees
        }))).await;
        assert_eq!(response.status(), 201, "event creation failed");
        parse_body(response).await["id"].as_i64().unwrap()
    }

    pub async fn join(&self, event_id: i64, name: &str, phone: &str) -> Response {
        self.request("POST", &format!("/api/events/{}/attendees", event_id), Some(serde_json::json!({
            "name": name,
            "team": "Blue",
            "phone": phone
        }))).await
    }
}

pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
