use axum::{
    body::Body,
    extract::Request,
    middleware,
    routing::{get, post, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, event, attendee, auth};
use crate::api::middleware::secure_transport;
use tower_http::{
    classify::ServerErrorsFailureClass,
    cors::CorsLayer,
    trace::TraceLayer,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health::api_info))
        .route("/api/health", get(health::health_check))
        .route("/api/status", get(health::status))
        .route("/api/db-integrity", get(health::db_integrity))

        // Auth
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/change-password", post(auth::change_password))

        // Events
        .route("/api/events", get(event::list_events).post(event::create_event))
        .route("/api/events/{id}", get(event::get_event).put(event::update_event).delete(event::delete_event))

        // Attendees
        .route("/api/events/{id}/attendees", post(attendee::add_attendee))
        .route("/api/events/{id}/attendees/{key}", delete(attendee::remove_attendee))

        .layer(middleware::from_fn_with_state(state.clone(), secure_transport))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
