use async_trait::async_trait;
use caresuite_application::{AuditEvent, AuditRepository};
use caresuite_core::AppResult;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory append-only audit repository.
#[derive(Debug, Default)]
pub struct InMemoryAuditRepository {
    events: RwLock<Vec<AuditEvent>>,
}

impl InMemoryAuditRepository {
    /// Creates an empty audit repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }

    /// Returns a snapshot of recorded events, oldest first.
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        debug!(
            action = event.action.as_str(),
            resource_id = event.resource_id.as_str(),
            "audit event recorded"
        );
        self.events.write().await.push(event);
        Ok(())
    }
}
