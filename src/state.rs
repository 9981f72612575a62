use std::sync::Arc;

use crate::checkin::CheckinCoordinator;
use crate::registry::TicketRegistry;

/// Shared handles for request handlers. The coordinator is stateless, so
/// cloning the state just clones the `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<CheckinCoordinator>,
    pub registry: Arc<dyn TicketRegistry>,
}

impl AppState {
    pub fn new(registry: Arc<dyn TicketRegistry>) -> Self {
        let coordinator = Arc::new(CheckinCoordinator::new(Arc::clone(&registry)));
        Self {
            coordinator,
            registry,
        }
    }
}
