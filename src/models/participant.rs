use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle of a ticket. `Registered` is the sole initial state and
/// `Attended` is terminal; the only transition is the check-in claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ticket_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Registered,
    Attended,
}

/// A participant row joined with its event's name: what the registry hands
/// back for scanner and lookup screens.
///
/// Invariant: `scan_date.is_some()` exactly when `status == Attended`, and
/// both fields are frozen once the ticket is attended.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TicketRecord {
    pub id: Uuid,
    pub ticket_code: String,
    pub full_name: String,
    pub email: String,
    pub event_id: Uuid,
    pub event_name: String,
    pub status: TicketStatus,
    pub scan_date: Option<DateTime<Utc>>,
    pub registered_at: DateTime<Utc>,
}

/// Registration input. The ticket code is generated by the registry, never
/// supplied by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTicket {
    pub full_name: String,
    pub email: String,
    pub event_id: Uuid,
}
