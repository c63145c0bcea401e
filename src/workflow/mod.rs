//! Ticket assignment workflow: find, transition, reassign, annotate.
//!
//! Tickets are processed strictly one after another over a single tracker
//! session. In batch mode a failing ticket is logged and skipped; in single
//! mode the failure ends the invocation.

pub mod guard;
pub mod resolver;
pub mod ticket;

use tracing::Instrument;

use crate::config::Connection;
use crate::error::{TrackerError, WorkflowError};
use crate::model::ticket::FieldIds;
use crate::providers::TicketTracker;
use crate::report::Reporter;

use self::ticket::process_ticket;

/// Returned when an invocation completes, however many tickets were skipped.
pub const SUCCESS: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Single,
    Batch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomField {
    pub name: String,
    pub text: String,
}

impl CustomField {
    /// Both parts must be non-empty for the field write to happen.
    pub fn from_parts(name: Option<String>, text: Option<String>) -> Option<Self> {
        match (name, text) {
            (Some(name), Some(text)) if !name.is_empty() && !text.is_empty() => {
                Some(Self { name, text })
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssignRequest {
    pub connection: Connection,
    /// Deduplicated, in first-occurrence order.
    pub ticket_ids: Vec<String>,
    /// Target transition id.
    pub status: String,
    pub assignee: String,
    pub comment: Option<String>,
    pub custom_field: Option<CustomField>,
    pub fail_on_error: bool,
}

/// Run the workflow over every ticket id in `request`.
///
/// `connect` opens the tracker session; it and the field map preload sit
/// outside the per-ticket boundary. Returns `Ok(Some(SUCCESS))` on completion,
/// `Ok(None)` for a logged failure when `fail_on_error` is off, and `Err`
/// for a fatal one.
pub async fn run<T, F>(
    request: &AssignRequest,
    mode: Mode,
    connect: F,
    reporter: &dyn Reporter,
) -> Result<Option<u8>, WorkflowError>
where
    T: TicketTracker + 'static,
    F: FnOnce(&Connection) -> Result<T, TrackerError>,
{
    let result = drive(request, mode, connect, reporter).await;
    settle(result, request.fail_on_error, reporter)
}

async fn drive<T, F>(
    request: &AssignRequest,
    mode: Mode,
    connect: F,
    reporter: &dyn Reporter,
) -> Result<(), WorkflowError>
where
    T: TicketTracker + 'static,
    F: FnOnce(&Connection) -> Result<T, TrackerError>,
{
    let tracker = connect(&request.connection)?;
    let fields = if request.custom_field.is_some() {
        tracker.field_ids().await?
    } else {
        FieldIds::default()
    };
    tracing::debug!(tracker = tracker.name(), fields = fields.len(), "session ready");

    for key in &request.ticket_ids {
        let span = tracing::info_span!("ticket", id = %key);
        let result = process_ticket(&tracker, &fields, key, request, mode, reporter)
            .instrument(span)
            .await;

        match result {
            Ok(outcome) => tracing::debug!(ticket = %key, ?outcome, "ticket processed"),
            Err(err) if mode == Mode::Batch => {
                reporter.error(&format!("Skipping Jira ticket {key}: {err}"));
            }
            Err(err) => return Err(err),
        }
    }

    Ok(())
}

/// Print every transition available from the ticket's current status.
pub async fn list_transitions<T, F>(
    connection: &Connection,
    ticket_id: &str,
    fail_on_error: bool,
    connect: F,
    reporter: &dyn Reporter,
) -> Result<Option<u8>, WorkflowError>
where
    T: TicketTracker + 'static,
    F: FnOnce(&Connection) -> Result<T, TrackerError>,
{
    let result = async {
        let tracker = connect(connection)?;
        let ticket = tracker.find_ticket(ticket_id).await?;
        for transition in tracker.list_transitions(&ticket).await? {
            reporter.success(&format!("{} (id {})", transition.name, transition.id));
        }
        Ok::<_, WorkflowError>(())
    }
    .await;
    settle(result, fail_on_error, reporter)
}

fn settle(
    result: Result<(), WorkflowError>,
    fail_on_error: bool,
    reporter: &dyn Reporter,
) -> Result<Option<u8>, WorkflowError> {
    match result {
        Ok(()) => Ok(Some(SUCCESS)),
        Err(err) if fail_on_error => Err(err),
        Err(err) => {
            reporter.error(&format!("Received exception: {err}"));
            Ok(None)
        }
    }
}
