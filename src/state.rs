use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{AttendeeRepository, EventRepository, UserRepository};
use crate::domain::services::{auth_service::AuthService, event_service::EventService};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub event_repo: Arc<dyn EventRepository>,
    pub attendee_repo: Arc<dyn AttendeeRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub event_service: Arc<EventService>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    pub fn new(
        config: Config,
        event_repo: Arc<dyn EventRepository>,
        attendee_repo: Arc<dyn AttendeeRepository>,
        user_repo: Arc<dyn UserRepository>,
    ) -> Self {
        let event_service = Arc::new(EventService::new(event_repo.clone(), attendee_repo.clone(), config.timezone));
        let auth_service = Arc::new(AuthService::new(user_repo.clone()));
        Self { config, event_repo, attendee_repo, user_repo, event_service, auth_service }
    }
}
