use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Event, NewTicket, TicketRecord};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryRegistry;
pub use postgres::PgTicketRegistry;

/// Infrastructure failure in the backing store. Indeterminate by contract:
/// callers must not read it as any business outcome, and retrying the whole
/// operation is safe because a claim never fires twice for one ticket.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("storage failure")]
    Storage(#[from] sqlx::Error),

    #[error("registry unavailable: {0}")]
    Unavailable(String),
}

/// Result of the atomic claim primitive.
#[derive(Debug, Clone)]
pub enum ClaimResult {
    /// No ticket carries this code.
    NotFound,
    /// The ticket was already attended; `scan_date` is the winner's, untouched.
    AlreadyClaimed(TicketRecord),
    /// This call made the REGISTERED -> ATTENDED transition.
    Claimed(TicketRecord),
}

/// Result of registering a participant.
#[derive(Debug, Clone)]
pub enum RegisterOutcome {
    Registered(TicketRecord),
    UnknownEvent,
    /// This email already holds a ticket for the event; carries the existing
    /// record so callers can decide what to reveal.
    AlreadyRegistered(TicketRecord),
}

/// Persistence contract the check-in coordinator is built on.
///
/// `claim_if_unclaimed` carries the whole concurrency burden of the system:
/// it must be a single indivisible conditional write, so that of any number
/// of overlapping calls for one code exactly one observes `Claimed` and the
/// rest observe `AlreadyClaimed` with the winner's `scan_date`.
#[async_trait]
pub trait TicketRegistry: Send + Sync {
    /// Exact-match lookup on the ticket code. Never mutates.
    async fn find_by_code(&self, code: &str) -> Result<Option<TicketRecord>, RegistryError>;

    /// Atomically transition the ticket to attended if, and only if, it is
    /// still registered, stamping `scan_date = now` on the transition.
    async fn claim_if_unclaimed(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<ClaimResult, RegistryError>;

    /// Create a ticket for the event, enforcing one registration per
    /// (event, email) and generating a fresh UUID ticket code.
    async fn register(&self, new: NewTicket) -> Result<RegisterOutcome, RegistryError>;

    /// Events open for registration, soonest first.
    async fn list_events(&self) -> Result<Vec<Event>, RegistryError>;
}
