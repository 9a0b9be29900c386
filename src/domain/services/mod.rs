pub mod admission;
pub mod auth_service;
pub mod event_service;
pub mod status;
