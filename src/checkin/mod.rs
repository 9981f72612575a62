use std::sync::Arc;

use chrono::Utc;

use crate::models::TicketRecord;
use crate::registry::{ClaimResult, RegistryError, TicketRegistry};

mod payload;

pub use payload::ScanPayload;

/// What a single check-in attempt produced.
///
/// All four variants are ordinary outcomes for the caller to display;
/// `CheckedIn` vs `AlreadyCheckedIn` is the one distinction the door staff
/// actually care about. Infrastructure faults travel separately as
/// `RegistryError` and mean "unknown, retry", never success or failure.
#[derive(Debug, Clone)]
pub enum CheckInOutcome {
    /// This scan made the transition; `scan_date` is freshly stamped.
    CheckedIn(TicketRecord),
    /// The ticket was used before; `scan_date` is the original one.
    AlreadyCheckedIn(TicketRecord),
    TicketNotFound,
    /// Input normalized to an empty code; re-prompt the operator.
    InvalidInput,
}

/// Stateless coordinator between scanning clients and the ticket registry.
///
/// Holds nothing but the registry handle, so any number of gate devices can
/// share one instance without coordination; the exactly-once guarantee lives
/// entirely in [`TicketRegistry::claim_if_unclaimed`].
pub struct CheckinCoordinator {
    registry: Arc<dyn TicketRegistry>,
}

impl CheckinCoordinator {
    pub fn new(registry: Arc<dyn TicketRegistry>) -> Self {
        Self { registry }
    }

    /// Validate one scan and claim the ticket if it is still unused.
    pub async fn check_in(&self, raw_input: &str) -> Result<CheckInOutcome, RegistryError> {
        let code = ScanPayload::parse(raw_input).into_code();
        if code.is_empty() {
            return Ok(CheckInOutcome::InvalidInput);
        }

        match self.registry.claim_if_unclaimed(&code, Utc::now()).await? {
            ClaimResult::NotFound => Ok(CheckInOutcome::TicketNotFound),
            ClaimResult::AlreadyClaimed(record) => {
                tracing::debug!(ticket = %record.ticket_code, "repeat scan of attended ticket");
                Ok(CheckInOutcome::AlreadyCheckedIn(record))
            }
            ClaimResult::Claimed(record) => {
                tracing::info!(
                    ticket = %record.ticket_code,
                    event = %record.event_name,
                    "ticket checked in"
                );
                Ok(CheckInOutcome::CheckedIn(record))
            }
        }
    }

    /// Read-only lookup for confirmation screens; never touches
    /// status or scan date.
    pub async fn lookup_ticket(&self, code: &str) -> Result<Option<TicketRecord>, RegistryError> {
        self.registry.find_by_code(code.trim()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, NewTicket, TicketStatus};
    use crate::registry::{InMemoryRegistry, RegisterOutcome};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    async fn coordinator_with_ticket() -> (CheckinCoordinator, String) {
        let registry = Arc::new(InMemoryRegistry::new());
        let event_id = registry.add_event("RustConf Jakarta");
        let outcome = registry
            .register(NewTicket {
                full_name: "Ayu Lestari".to_string(),
                email: "ayu@example.com".to_string(),
                event_id,
            })
            .await
            .unwrap();
        let code = match outcome {
            RegisterOutcome::Registered(record) => record.ticket_code,
            other => panic!("seed registration failed: {other:?}"),
        };
        (CheckinCoordinator::new(registry), code)
    }

    #[tokio::test]
    async fn empty_and_blank_input_are_invalid() {
        let (coordinator, _) = coordinator_with_ticket().await;
        for input in ["", "   ", "\n\t"] {
            let outcome = coordinator.check_in(input).await.unwrap();
            assert!(
                matches!(outcome, CheckInOutcome::InvalidInput),
                "{input:?} should be invalid"
            );
        }
    }

    #[tokio::test]
    async fn unknown_code_is_not_found_and_mutates_nothing() {
        let (coordinator, code) = coordinator_with_ticket().await;
        let outcome = coordinator.check_in("nonexistent-code").await.unwrap();
        assert!(matches!(outcome, CheckInOutcome::TicketNotFound));

        let ticket = coordinator.lookup_ticket(&code).await.unwrap().unwrap();
        assert_eq!(ticket.status, TicketStatus::Registered);
        assert!(ticket.scan_date.is_none());
    }

    #[tokio::test]
    async fn repeat_scans_report_already_checked_in_with_original_scan_date() {
        let (coordinator, code) = coordinator_with_ticket().await;

        let first = coordinator.check_in(&code).await.unwrap();
        let first_scan = match first {
            CheckInOutcome::CheckedIn(record) => {
                assert_eq!(record.status, TicketStatus::Attended);
                record.scan_date.expect("fresh claim must carry scan_date")
            }
            other => panic!("expected CheckedIn, got {other:?}"),
        };

        let mut repeats = 0;
        for _ in 0..3 {
            match coordinator.check_in(&code).await.unwrap() {
                CheckInOutcome::AlreadyCheckedIn(record) => {
                    assert_eq!(record.scan_date, Some(first_scan));
                    repeats += 1;
                }
                other => panic!("expected AlreadyCheckedIn, got {other:?}"),
            }
        }
        assert_eq!(repeats, 3);
    }

    #[tokio::test]
    async fn structured_payload_behaves_like_bare_code() {
        let (coordinator, code) = coordinator_with_ticket().await;

        let payload = format!(r#"{{"ticketCode":"{code}"}}"#);
        let outcome = coordinator.check_in(&payload).await.unwrap();
        assert!(matches!(outcome, CheckInOutcome::CheckedIn(_)));

        // The bare code now observes the same attended ticket.
        let outcome = coordinator.check_in(&code).await.unwrap();
        assert!(matches!(outcome, CheckInOutcome::AlreadyCheckedIn(_)));
    }

    #[tokio::test]
    async fn lookup_never_claims() {
        let (coordinator, code) = coordinator_with_ticket().await;
        for _ in 0..2 {
            let ticket = coordinator.lookup_ticket(&code).await.unwrap().unwrap();
            assert_eq!(ticket.status, TicketStatus::Registered);
        }
    }

    struct FailingRegistry;

    #[async_trait]
    impl TicketRegistry for FailingRegistry {
        async fn find_by_code(
            &self,
            _code: &str,
        ) -> Result<Option<TicketRecord>, RegistryError> {
            Err(RegistryError::Unavailable("store is down".to_string()))
        }

        async fn claim_if_unclaimed(
            &self,
            _code: &str,
            _now: DateTime<Utc>,
        ) -> Result<ClaimResult, RegistryError> {
            Err(RegistryError::Unavailable("store is down".to_string()))
        }

        async fn register(
            &self,
            _new: NewTicket,
        ) -> Result<RegisterOutcome, RegistryError> {
            Err(RegistryError::Unavailable("store is down".to_string()))
        }

        async fn list_events(&self) -> Result<Vec<Event>, RegistryError> {
            Err(RegistryError::Unavailable("store is down".to_string()))
        }
    }

    #[tokio::test]
    async fn storage_failure_is_an_error_not_an_outcome() {
        let coordinator = CheckinCoordinator::new(Arc::new(FailingRegistry));
        let result = coordinator.check_in("ABC123").await;
        assert!(matches!(result, Err(RegistryError::Unavailable(_))));
    }
}
