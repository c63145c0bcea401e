use crate::model::ticket::Transition;

/// Id of the transition named after the ticket's current status.
///
/// Names compare exactly. When several transitions share the name the last
/// one wins; `None` when nothing matches.
pub fn resolve_transition<'a>(current_status: &str, transitions: &'a [Transition]) -> Option<&'a str> {
    transitions
        .iter()
        .rev()
        .find(|t| t.name == current_status)
        .map(|t| t.id.as_str())
}
