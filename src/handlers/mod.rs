use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::checkin::CheckInOutcome;
use crate::models::{NewTicket, TicketRecord, TicketStatus};
use crate::registry::RegisterOutcome;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "gatepass-api",
    };

    success(payload, "Health check successful").into_response()
}

/// Identity fields shown on confirmation screens.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TicketBody {
    id: Uuid,
    full_name: String,
    email: String,
    ticket_code: String,
    event_name: String,
    status: TicketStatus,
    scan_date: Option<DateTime<Utc>>,
}

impl From<TicketRecord> for TicketBody {
    fn from(record: TicketRecord) -> Self {
        Self {
            id: record.id,
            full_name: record.full_name,
            email: record.email,
            ticket_code: record.ticket_code,
            event_name: record.event_name,
            status: record.status,
            scan_date: record.scan_date,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanBody {
    #[serde(flatten)]
    ticket: TicketBody,
    checked_in: bool,
    /// True only when this very scan made the transition.
    just_checked_in: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    /// Raw scanner output: either the bare code or the QR's JSON payload.
    #[serde(default)]
    ticket_code: String,
}

pub async fn scan_ticket(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Result<Response, AppError> {
    match state.coordinator.check_in(&request.ticket_code).await? {
        CheckInOutcome::CheckedIn(record) => {
            let body = ScanBody {
                ticket: record.into(),
                checked_in: true,
                just_checked_in: true,
            };
            Ok(success(body, "Ticket checked in").into_response())
        }
        CheckInOutcome::AlreadyCheckedIn(record) => {
            let body = ScanBody {
                ticket: record.into(),
                checked_in: true,
                just_checked_in: false,
            };
            Ok(success(body, "Ticket was already checked in").into_response())
        }
        CheckInOutcome::TicketNotFound => {
            Err(AppError::NotFound("No ticket matches that code".to_string()))
        }
        CheckInOutcome::InvalidInput => {
            Err(AppError::ValidationError("A ticket code is required".to_string()))
        }
    }
}

pub async fn lookup_ticket(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response, AppError> {
    match state.coordinator.lookup_ticket(&code).await? {
        Some(record) => {
            Ok(success(TicketBody::from(record), "Ticket found").into_response())
        }
        None => Err(AppError::NotFound("No ticket matches that code".to_string())),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    full_name: String,
    email: String,
    event_id: Uuid,
}

pub async fn register_participant(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    let full_name = request.full_name.trim().to_string();
    let email = request.email.trim().to_string();
    if full_name.is_empty() || email.is_empty() {
        return Err(AppError::ValidationError(
            "Full name and email are required".to_string(),
        ));
    }

    let new = NewTicket {
        full_name,
        email,
        event_id: request.event_id,
    };
    match state.registry.register(new).await? {
        RegisterOutcome::Registered(record) => {
            tracing::info!(event = %record.event_name, "participant registered");
            Ok(success(TicketBody::from(record), "Registration complete").into_response())
        }
        RegisterOutcome::UnknownEvent => {
            Err(AppError::NotFound("Event not found".to_string()))
        }
        // The existing record stays server-side; echoing it would hand the
        // ticket code to anyone who re-submits the email.
        RegisterOutcome::AlreadyRegistered(_) => Err(AppError::ValidationError(
            "This email is already registered for this event".to_string(),
        )),
    }
}

pub async fn list_events(State(state): State<AppState>) -> Result<Response, AppError> {
    let events = state.registry.list_events().await?;
    Ok(success(events, "Events fetched").into_response())
}
