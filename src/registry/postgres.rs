use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{ClaimResult, RegisterOutcome, RegistryError, TicketRegistry};
use crate::models::{Event, NewTicket, TicketRecord, TicketStatus};

const SELECT_BY_CODE: &str = "\
    SELECT p.id, p.ticket_code, p.full_name, p.email, p.event_id, \
           e.name AS event_name, p.status, p.scan_date, p.registered_at \
    FROM participants p \
    JOIN events e ON e.id = p.event_id \
    WHERE p.ticket_code = $1";

// The guard on status makes the claim a compare-and-swap: concurrent callers
// race on one row and Postgres lets exactly one of them through.
const CLAIM_IF_REGISTERED: &str = "\
    UPDATE participants p \
    SET status = 'ATTENDED', scan_date = $2 \
    FROM events e \
    WHERE p.ticket_code = $1 \
      AND p.status = 'REGISTERED' \
      AND e.id = p.event_id \
    RETURNING p.id, p.ticket_code, p.full_name, p.email, p.event_id, \
              e.name AS event_name, p.status, p.scan_date, p.registered_at";

const INSERT_PARTICIPANT: &str = "\
    INSERT INTO participants (ticket_code, full_name, email, event_id) \
    VALUES ($1, $2, $3, $4) \
    RETURNING id, ticket_code, full_name, email, event_id, status, scan_date, registered_at";

const SELECT_BY_EVENT_EMAIL: &str = "\
    SELECT p.id, p.ticket_code, p.full_name, p.email, p.event_id, \
           e.name AS event_name, p.status, p.scan_date, p.registered_at \
    FROM participants p \
    JOIN events e ON e.id = p.event_id \
    WHERE p.event_id = $1 AND p.email = $2";

/// `TicketRegistry` backed by the participants/events tables.
pub struct PgTicketRegistry {
    pool: PgPool,
}

impl PgTicketRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Participant row without the event join, for statements that cannot
/// RETURNING across tables.
#[derive(FromRow)]
struct ParticipantRow {
    id: Uuid,
    ticket_code: String,
    full_name: String,
    email: String,
    event_id: Uuid,
    status: TicketStatus,
    scan_date: Option<DateTime<Utc>>,
    registered_at: DateTime<Utc>,
}

impl ParticipantRow {
    fn into_record(self, event_name: String) -> TicketRecord {
        TicketRecord {
            id: self.id,
            ticket_code: self.ticket_code,
            full_name: self.full_name,
            email: self.email,
            event_id: self.event_id,
            event_name,
            status: self.status,
            scan_date: self.scan_date,
            registered_at: self.registered_at,
        }
    }
}

#[async_trait]
impl TicketRegistry for PgTicketRegistry {
    async fn find_by_code(&self, code: &str) -> Result<Option<TicketRecord>, RegistryError> {
        let record = sqlx::query_as::<_, TicketRecord>(SELECT_BY_CODE)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn claim_if_unclaimed(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<ClaimResult, RegistryError> {
        loop {
            let claimed = sqlx::query_as::<_, TicketRecord>(CLAIM_IF_REGISTERED)
                .bind(code)
                .bind(now)
                .fetch_optional(&self.pool)
                .await?;

            if let Some(record) = claimed {
                return Ok(ClaimResult::Claimed(record));
            }

            // The guarded update hit nothing: either the code is unknown or
            // another scan won. A ticket observed as still REGISTERED here was
            // inserted between the two statements, so claim again.
            match self.find_by_code(code).await? {
                None => return Ok(ClaimResult::NotFound),
                Some(record) if record.status == TicketStatus::Attended => {
                    return Ok(ClaimResult::AlreadyClaimed(record));
                }
                Some(_) => continue,
            }
        }
    }

    async fn register(&self, new: NewTicket) -> Result<RegisterOutcome, RegistryError> {
        let event_name = sqlx::query_scalar::<_, String>("SELECT name FROM events WHERE id = $1")
            .bind(new.event_id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(event_name) = event_name else {
            return Ok(RegisterOutcome::UnknownEvent);
        };

        let ticket_code = Uuid::new_v4().to_string();
        let inserted = sqlx::query_as::<_, ParticipantRow>(INSERT_PARTICIPANT)
            .bind(&ticket_code)
            .bind(&new.full_name)
            .bind(&new.email)
            .bind(new.event_id)
            .fetch_one(&self.pool)
            .await;

        match inserted {
            Ok(row) => Ok(RegisterOutcome::Registered(row.into_record(event_name))),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                let existing = sqlx::query_as::<_, TicketRecord>(SELECT_BY_EVENT_EMAIL)
                    .bind(new.event_id)
                    .bind(&new.email)
                    .fetch_optional(&self.pool)
                    .await?;
                match existing {
                    Some(record) => Ok(RegisterOutcome::AlreadyRegistered(record)),
                    None => Err(RegistryError::Unavailable(
                        "registration raced with a concurrent delete".to_string(),
                    )),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_events(&self) -> Result<Vec<Event>, RegistryError> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT id, name, description, location, start_time, created_at \
             FROM events ORDER BY start_time",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }
}
