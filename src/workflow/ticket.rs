use crate::error::{Step, WorkflowError};
use crate::model::ticket::{FieldIds, FieldUpdate, Receipt};
use crate::providers::TicketTracker;
use crate::report::Reporter;

use super::guard::is_untouchable;
use super::resolver::resolve_transition;
use super::{AssignRequest, Mode};

/// How a single ticket left the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketOutcome {
    /// Status is protected; nothing past the custom field was touched.
    Untouchable,
    AlreadyInStatus,
    Moved,
}

fn confirm(receipt: Option<Receipt>, step: Step) -> Result<Receipt, WorkflowError> {
    receipt.ok_or(WorkflowError::Verification(step))
}

/// Run the fixed step sequence for one ticket id. The custom field is written
/// before the protected-status check, so protected tickets still receive it.
pub async fn process_ticket(
    tracker: &dyn TicketTracker,
    fields: &FieldIds,
    key: &str,
    request: &AssignRequest,
    mode: Mode,
    reporter: &dyn Reporter,
) -> Result<TicketOutcome, WorkflowError> {
    let ticket = tracker.find_ticket(key).await?;
    let transitions = tracker.list_transitions(&ticket).await?;
    let current_transition = resolve_transition(&ticket.status.name, &transitions);

    if let Some(field) = &request.custom_field {
        let update = FieldUpdate::Custom {
            field_id: fields.resolve(&field.name).to_string(),
            value: field.text.clone(),
        };
        confirm(tracker.update_fields(&ticket, &update).await?, Step::CustomField)?;
        reporter.success("Successfully added a build links to Jira ticket");
    }

    if is_untouchable(&ticket.status.name) {
        reporter.message(&format!(
            "Jira ticket {key} is in protected status '{}', leaving it as is",
            ticket.status.name
        ));
        return Ok(TicketOutcome::Untouchable);
    }

    let outcome = if current_transition == Some(request.status.as_str()) {
        reporter.success("Jira ticket already in desired status");
        if mode == Mode::Batch {
            return Ok(TicketOutcome::AlreadyInStatus);
        }
        TicketOutcome::AlreadyInStatus
    } else {
        confirm(
            tracker.apply_transition(&ticket, &request.status).await?,
            Step::Status,
        )?;
        reporter.success("Successfully moved status Jira ticket");

        let assignee = FieldUpdate::Assignee {
            account_id: request.assignee.clone(),
        };
        confirm(tracker.update_fields(&ticket, &assignee).await?, Step::Assignee)?;
        reporter.success("Successfully moved assignee Jira ticket");
        TicketOutcome::Moved
    };

    if let Some(comment) = &request.comment {
        confirm(tracker.add_comment(&ticket, comment).await?, Step::Comment)?;
        reporter.success("Successfully added a comment on Jira ticket");
    }

    Ok(outcome)
}
