pub mod jira;

use async_trait::async_trait;

use crate::error::TrackerError;
use crate::model::ticket::{FieldIds, FieldUpdate, Receipt, Ticket, Transition};

/// Remote ticketing session. One value is created per invocation and shared by
/// every ticket in the batch.
///
/// Mutating calls return `Ok(None)` when the service accepted the request but
/// sent back no confirmation payload.
#[async_trait]
pub trait TicketTracker: Send + Sync {
    fn name(&self) -> &str;
    async fn find_ticket(&self, key: &str) -> Result<Ticket, TrackerError>;
    async fn list_transitions(&self, ticket: &Ticket) -> Result<Vec<Transition>, TrackerError>;
    async fn apply_transition(
        &self,
        ticket: &Ticket,
        transition_id: &str,
    ) -> Result<Option<Receipt>, TrackerError>;
    async fn update_fields(
        &self,
        ticket: &Ticket,
        update: &FieldUpdate,
    ) -> Result<Option<Receipt>, TrackerError>;
    async fn add_comment(&self, ticket: &Ticket, body: &str)
        -> Result<Option<Receipt>, TrackerError>;
    /// Field name to id mapping. Trackers without named fields return an empty map.
    async fn field_ids(&self) -> Result<FieldIds, TrackerError> {
        Ok(FieldIds::default())
    }
}
