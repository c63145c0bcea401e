use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::{self, non_empty, parse_ticket_ids, require, Connection, JiraConfig};
use crate::error::ConfigError;
use crate::providers::jira::JiraProvider;
use crate::report::Reporter;
use crate::workflow::{self, AssignRequest, CustomField, Mode};

#[derive(Debug, Parser)]
#[command(
    name = "jira-assign",
    version,
    about = "Move Jira tickets to a status, reassign them and leave a comment"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Transition and reassign one ticket.
    Assign {
        #[command(flatten)]
        connection: ConnectionArgs,
        /// Ticket ID for Jira, i.e. IOS-123
        #[arg(long, env = "FL_JIRA_TICKET_ID")]
        ticket_id: Option<String>,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Transition and reassign a comma-separated list of tickets, skipping failures.
    AssignMany {
        #[command(flatten)]
        connection: ConnectionArgs,
        /// Comma-separated ticket IDs, i.e. IOS-123,IOS-124
        #[arg(long, env = "FL_JIRA_TICKET_IDS")]
        ticket_ids: Option<String>,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// List the transitions available from a ticket's current status.
    Transitions {
        #[command(flatten)]
        connection: ConnectionArgs,
        #[arg(long, env = "FL_JIRA_TICKET_ID")]
        ticket_id: Option<String>,
        #[arg(long, env = "FL_JIRA_FAIL_ON_ERROR", default_value_t = true, action = ArgAction::Set)]
        fail_on_error: bool,
    },
}

#[derive(Debug, Args)]
pub struct ConnectionArgs {
    /// URL for Jira instance
    #[arg(long, env = "FL_JIRA_SITE")]
    pub url: Option<String>,
    /// Appends to the url (ex: "/jira")
    #[arg(long, env = "FL_JIRA_CONTEXT_PATH")]
    pub context_path: Option<String>,
    #[arg(long, env = "FL_JIRA_USERNAME")]
    pub username: Option<String>,
    /// Password or API token for Jira
    #[arg(long, env = "FL_JIRA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Id of the transition leading to the desired status
    #[arg(long, env = "FL_JIRA_STATUS_ID")]
    pub status: Option<String>,
    /// Id of the user to assign
    #[arg(long, env = "FL_JIRA_ASSIGNEE_NAME")]
    pub assignee: Option<String>,
    /// Text to add to the ticket as a comment
    #[arg(long, env = "FL_JIRA_COMMENT_TEXT")]
    pub comment_text: Option<String>,
    #[arg(long, env = "FL_JIRA_CUSTOM_FIELD_NAME")]
    pub custom_field_name: Option<String>,
    #[arg(long, env = "FL_JIRA_CUSTOM_FIELD_TEXT")]
    pub custom_field_text: Option<String>,
    /// Should an error cause a failure exit?
    #[arg(long, env = "FL_JIRA_FAIL_ON_ERROR", default_value_t = true, action = ArgAction::Set)]
    pub fail_on_error: bool,
}

impl ConnectionArgs {
    /// Merge flags over config-file defaults and validate the result.
    pub fn resolve(self, file: Option<&JiraConfig>) -> Result<Connection, ConfigError> {
        Ok(Connection {
            url: require(
                or_file(self.url, file, |f| f.url.clone()),
                "No url for Jira given, pass using `url: 'url'`",
            )?,
            context_path: or_file(self.context_path, file, |f| f.context_path.clone())
                .unwrap_or_default(),
            username: require(or_file(self.username, file, |f| f.username.clone()), "No username")?,
            password: require(or_file(self.password, file, |f| f.password.clone()), "No password")?,
        })
    }
}

fn or_file(
    value: Option<String>,
    file: Option<&JiraConfig>,
    pick: impl FnOnce(&JiraConfig) -> Option<String>,
) -> Option<String> {
    non_empty(value).or_else(|| file.and_then(pick))
}

/// Build a validated request for the given ticket ids.
pub fn build_request(
    connection: Connection,
    ticket_ids: Vec<String>,
    target: TargetArgs,
) -> Result<AssignRequest, ConfigError> {
    if ticket_ids.is_empty() {
        return Err(ConfigError::Missing("No Ticket specified"));
    }
    Ok(AssignRequest {
        connection,
        ticket_ids,
        status: require(target.status, "No status specified")?,
        assignee: require(target.assignee, "No assignee user specified")?,
        comment: non_empty(target.comment_text),
        custom_field: CustomField::from_parts(target.custom_field_name, target.custom_field_text),
        fail_on_error: target.fail_on_error,
    })
}

fn ticket_ids(raw: Option<String>) -> Vec<String> {
    raw.as_deref().map(parse_ticket_ids).unwrap_or_default()
}

/// Run a parsed command against Jira. Returns the workflow sentinel.
pub async fn dispatch(command: Command, reporter: &dyn Reporter) -> Result<Option<u8>> {
    let app_config = config::load_config()?;
    let file = app_config.jira.as_ref();

    let outcome = match command {
        Command::Assign {
            connection,
            ticket_id,
            target,
        } => {
            let connection = connection.resolve(file)?;
            let id = require(ticket_id, "No Ticket specified")?;
            let request = build_request(connection, vec![id], target)?;
            workflow::run(&request, Mode::Single, JiraProvider::connect, reporter).await
        }
        Command::AssignMany {
            connection,
            ticket_ids: raw,
            target,
        } => {
            let connection = connection.resolve(file)?;
            let request = build_request(connection, ticket_ids(raw), target)?;
            tracing::info!(tickets = request.ticket_ids.len(), "processing Jira tickets");
            workflow::run(&request, Mode::Batch, JiraProvider::connect, reporter).await
        }
        Command::Transitions {
            connection,
            ticket_id,
            fail_on_error,
        } => {
            let connection = connection.resolve(file)?;
            let id = require(ticket_id, "No Ticket specified")?;
            workflow::list_transitions(&connection, &id, fail_on_error, JiraProvider::connect, reporter)
                .await
        }
    };

    outcome.map_err(|err| anyhow::anyhow!("Received exception: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(args).unwrap().command
    }

    fn target(status: Option<&str>, assignee: Option<&str>) -> TargetArgs {
        TargetArgs {
            status: status.map(String::from),
            assignee: assignee.map(String::from),
            comment_text: Some(String::new()),
            custom_field_name: Some("Build Links".into()),
            custom_field_text: None,
            fail_on_error: true,
        }
    }

    fn connection_args(url: Option<&str>) -> ConnectionArgs {
        ConnectionArgs {
            url: url.map(String::from),
            context_path: None,
            username: Some("ci".into()),
            password: Some("token".into()),
        }
    }

    #[test]
    fn parses_assign_many_flags() {
        let cmd = parse(&[
            "jira-assign",
            "assign-many",
            "--url",
            "https://jira.example.com",
            "--ticket-ids",
            "IOS-1,IOS-2",
            "--status",
            "31",
            "--assignee",
            "qa",
            "--fail-on-error",
            "false",
        ]);
        match cmd {
            Command::AssignMany {
                connection,
                ticket_ids,
                target,
            } => {
                assert_eq!(connection.url.as_deref(), Some("https://jira.example.com"));
                assert_eq!(ticket_ids.as_deref(), Some("IOS-1,IOS-2"));
                assert_eq!(target.status.as_deref(), Some("31"));
                assert!(!target.fail_on_error);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn fail_on_error_defaults_to_true() {
        match parse(&["jira-assign", "transitions", "--ticket-id", "IOS-1"]) {
            Command::Transitions { fail_on_error, .. } => assert!(fail_on_error),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["jira-assign", "unknown"]).is_err());
    }

    #[test]
    fn resolve_falls_back_to_config_file() {
        let file = JiraConfig {
            url: Some("https://file.example.com".into()),
            context_path: Some("/jira".into()),
            username: Some("file-user".into()),
            password: None,
        };
        let connection = connection_args(None).resolve(Some(&file)).unwrap();
        assert_eq!(connection.url, "https://file.example.com");
        assert_eq!(connection.context_path, "/jira");
        assert_eq!(connection.username, "ci");
    }

    #[test]
    fn resolve_reports_missing_url() {
        let err = connection_args(None).resolve(None).unwrap_err();
        assert_eq!(err.to_string(), "No url for Jira given, pass using `url: 'url'`");
    }

    #[test]
    fn build_request_validates_required_values() {
        let conn = connection_args(Some("https://jira.example.com")).resolve(None).unwrap();
        let err = build_request(conn.clone(), vec![], target(Some("31"), Some("qa"))).unwrap_err();
        assert_eq!(err, ConfigError::Missing("No Ticket specified"));

        let err = build_request(conn.clone(), vec!["A-1".into()], target(None, Some("qa"))).unwrap_err();
        assert_eq!(err, ConfigError::Missing("No status specified"));

        let err = build_request(conn, vec!["A-1".into()], target(Some("31"), Some(""))).unwrap_err();
        assert_eq!(err, ConfigError::Missing("No assignee user specified"));
    }

    #[test]
    fn build_request_drops_empty_optionals() {
        let conn = connection_args(Some("https://jira.example.com")).resolve(None).unwrap();
        let request = build_request(conn, vec!["A-1".into()], target(Some("31"), Some("qa"))).unwrap();
        assert_eq!(request.comment, None);
        assert_eq!(request.custom_field, None);
        assert!(request.fail_on_error);
    }

    #[test]
    fn ticket_id_list_is_deduplicated() {
        assert_eq!(ticket_ids(Some("A-1,A-1,A-2".into())), vec!["A-1", "A-2"]);
        assert!(ticket_ids(None).is_empty());
    }
}
