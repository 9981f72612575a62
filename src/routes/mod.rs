use axum::routing::{get, post};
use axum::Router;

use crate::config::{apply_security_headers, create_cors_layer};
use crate::handlers::{
    health_check, list_events, lookup_ticket, register_participant, scan_ticket,
};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/api/events", get(list_events))
        .route("/api/participants", post(register_participant))
        .route("/api/scanner", post(scan_ticket))
        .route("/api/tickets/:code", get(lookup_ticket))
        .with_state(state)
        .layer(create_cors_layer());

    apply_security_headers(router)
}
