use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{ClaimResult, RegisterOutcome, RegistryError, TicketRegistry};
use crate::models::{Event, NewTicket, TicketRecord, TicketStatus};

/// Mutex-guarded registry holding everything in process memory.
///
/// Implements the same claim contract as the Postgres registry (the mutex
/// plays the role of the conditional UPDATE) and is what tests and local
/// experiments inject into the coordinator.
#[derive(Default)]
pub struct InMemoryRegistry {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    events: HashMap<Uuid, Event>,
    tickets: HashMap<String, TicketRecord>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event to register tickets against; returns its id.
    pub fn add_event(&self, name: &str) -> Uuid {
        let event = Event {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            location: None,
            start_time: Utc::now(),
            created_at: Utc::now(),
        };
        let id = event.id;
        if let Ok(mut inner) = self.inner.lock() {
            inner.events.insert(id, event);
        }
        id
    }

    fn locked(&self) -> Result<MutexGuard<'_, Inner>, RegistryError> {
        self.inner
            .lock()
            .map_err(|_| RegistryError::Unavailable("registry mutex poisoned".to_string()))
    }
}

#[async_trait]
impl TicketRegistry for InMemoryRegistry {
    async fn find_by_code(&self, code: &str) -> Result<Option<TicketRecord>, RegistryError> {
        Ok(self.locked()?.tickets.get(code).cloned())
    }

    async fn claim_if_unclaimed(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<ClaimResult, RegistryError> {
        let mut inner = self.locked()?;
        let Some(ticket) = inner.tickets.get_mut(code) else {
            return Ok(ClaimResult::NotFound);
        };
        if ticket.status == TicketStatus::Attended {
            return Ok(ClaimResult::AlreadyClaimed(ticket.clone()));
        }
        ticket.status = TicketStatus::Attended;
        ticket.scan_date = Some(now);
        Ok(ClaimResult::Claimed(ticket.clone()))
    }

    async fn register(&self, new: NewTicket) -> Result<RegisterOutcome, RegistryError> {
        let mut inner = self.locked()?;
        let Some(event) = inner.events.get(&new.event_id) else {
            return Ok(RegisterOutcome::UnknownEvent);
        };
        let event_name = event.name.clone();

        if let Some(existing) = inner
            .tickets
            .values()
            .find(|t| t.event_id == new.event_id && t.email == new.email)
        {
            return Ok(RegisterOutcome::AlreadyRegistered(existing.clone()));
        }

        let record = TicketRecord {
            id: Uuid::new_v4(),
            ticket_code: Uuid::new_v4().to_string(),
            full_name: new.full_name,
            email: new.email,
            event_id: new.event_id,
            event_name,
            status: TicketStatus::Registered,
            scan_date: None,
            registered_at: Utc::now(),
        };
        inner
            .tickets
            .insert(record.ticket_code.clone(), record.clone());
        Ok(RegisterOutcome::Registered(record))
    }

    async fn list_events(&self) -> Result<Vec<Event>, RegistryError> {
        let inner = self.locked()?;
        let mut events: Vec<Event> = inner.events.values().cloned().collect();
        events.sort_by_key(|e| e.start_time);
        Ok(events)
    }
}
