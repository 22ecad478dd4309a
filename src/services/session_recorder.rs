//! Persists finished runs through the document store.

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::domain::errors::DomainResult;
use crate::domain::models::SessionRecord;
use crate::domain::ports::DocumentStore;

/// Writes session records; never interprets them.
pub struct SessionRecorder {
    store: Arc<dyn DocumentStore>,
}

impl SessionRecorder {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    #[instrument(skip_all, fields(session_id = %record.session_id, state = %record.state))]
    pub async fn record(&self, record: &SessionRecord) -> DomainResult<()> {
        self.store.write_session(record).await?;
        debug!(trace_len = record.trace.len(), "session recorded");
        Ok(())
    }
}
