use std::collections::BTreeMap;

use async_trait::async_trait;
use base64::Engine;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::TicketTracker;
use crate::config::Connection;
use crate::error::TrackerError;
use crate::model::ticket::{FieldIds, FieldUpdate, Receipt, Status, Ticket, Transition};

pub struct JiraProvider {
    base_url: String,
    auth_header: String,
    client: reqwest::Client,
}

impl JiraProvider {
    /// Open a session against `connection`. Fails on an unusable base url.
    pub fn connect(connection: &Connection) -> Result<Self, TrackerError> {
        let base_url = connection.base_url();
        reqwest::Url::parse(&base_url).map_err(|e| TrackerError::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let creds = format!("{}:{}", connection.username, connection.password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(creds);
        let client = reqwest::Client::builder()
            .user_agent(concat!("jira-assign/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url,
            auth_header: format!("Basic {encoded}"),
            client,
        })
    }

    fn issue_url(&self, key: &str, suffix: &str) -> String {
        format!(
            "{}/rest/api/2/issue/{}{suffix}",
            self.base_url,
            urlencoding::encode(key)
        )
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, TrackerError> {
        let resp = request
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(api_error(resp).await)
        }
    }

    async fn send_for_receipt(&self, request: RequestBuilder) -> Result<Option<Receipt>, TrackerError> {
        let resp = self.send(request).await?;
        Ok(Some(Receipt {
            http_status: resp.status().as_u16(),
            id: None,
        }))
    }
}

#[derive(Deserialize)]
struct JiraIssue {
    key: String,
    fields: IssueFields,
}

#[derive(Deserialize)]
struct IssueFields {
    summary: Option<String>,
    status: StatusField,
    assignee: Option<UserField>,
}

#[derive(Deserialize)]
struct StatusField {
    id: String,
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserField {
    account_id: Option<String>,
    name: Option<String>,
}

#[derive(Deserialize)]
struct TransitionsResponse {
    transitions: Vec<JiraTransition>,
}

#[derive(Deserialize)]
struct JiraTransition {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct JiraField {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct CommentResponse {
    id: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    error_messages: Vec<String>,
    #[serde(default)]
    errors: BTreeMap<String, String>,
}

#[derive(Serialize)]
struct TransitionRequest<'a> {
    transition: TransitionRef<'a>,
}

#[derive(Serialize)]
struct TransitionRef<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct CommentRequest<'a> {
    body: &'a str,
}

/// Body for `PUT /issue/{key}`.
fn fields_payload(update: &FieldUpdate) -> Value {
    match update {
        FieldUpdate::Assignee { account_id } => {
            json!({ "fields": { "assignee": { "id": account_id } } })
        }
        FieldUpdate::Custom { field_id, value } => {
            let mut fields = Map::new();
            fields.insert(field_id.clone(), Value::String(value.clone()));
            json!({ "fields": fields })
        }
    }
}

async fn api_error(resp: Response) -> TrackerError {
    let status = resp.status().as_u16();
    let text = resp.text().await.unwrap_or_default();
    TrackerError::Api {
        status,
        message: error_message(&text),
    }
}

/// Flatten Jira's `errorMessages` and `errors` into one line, falling back to the raw body.
fn error_message(body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let mut parts = parsed.error_messages;
    parts.extend(parsed.errors.into_iter().map(|(field, msg)| format!("{field}: {msg}")));
    if parts.is_empty() {
        body.trim().to_string()
    } else {
        parts.join("; ")
    }
}

#[async_trait]
impl TicketTracker for JiraProvider {
    fn name(&self) -> &str {
        "Jira"
    }

    async fn find_ticket(&self, key: &str) -> Result<Ticket, TrackerError> {
        let url = self.issue_url(key, "");
        let request = self
            .client
            .get(&url)
            .query(&[("fields", "summary,status,assignee")]);

        let resp = match self.send(request).await {
            Err(TrackerError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                return Err(TrackerError::NotFound(key.to_string()));
            }
            other => other?,
        };

        let issue: JiraIssue = resp.json().await?;
        Ok(Ticket {
            key: issue.key,
            summary: issue.fields.summary,
            status: Status {
                id: issue.fields.status.id,
                name: issue.fields.status.name,
            },
            assignee: issue.fields.assignee.and_then(|u| u.account_id.or(u.name)),
        })
    }

    async fn list_transitions(&self, ticket: &Ticket) -> Result<Vec<Transition>, TrackerError> {
        let url = self.issue_url(&ticket.key, "/transitions");
        let resp = self.send(self.client.get(&url)).await?;
        let body: TransitionsResponse = resp.json().await?;
        Ok(body
            .transitions
            .into_iter()
            .map(|t| Transition::new(t.id, t.name))
            .collect())
    }

    async fn apply_transition(
        &self,
        ticket: &Ticket,
        transition_id: &str,
    ) -> Result<Option<Receipt>, TrackerError> {
        let url = self.issue_url(&ticket.key, "/transitions");
        let body = TransitionRequest {
            transition: TransitionRef { id: transition_id },
        };
        self.send_for_receipt(self.client.post(&url).json(&body)).await
    }

    async fn update_fields(
        &self,
        ticket: &Ticket,
        update: &FieldUpdate,
    ) -> Result<Option<Receipt>, TrackerError> {
        let url = self.issue_url(&ticket.key, "");
        self.send_for_receipt(self.client.put(&url).json(&fields_payload(update)))
            .await
    }

    async fn add_comment(
        &self,
        ticket: &Ticket,
        body: &str,
    ) -> Result<Option<Receipt>, TrackerError> {
        let url = self.issue_url(&ticket.key, "/comment");
        let resp = self
            .send(self.client.post(&url).json(&CommentRequest { body }))
            .await?;
        let http_status = resp.status().as_u16();
        let bytes = resp.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let created: CommentResponse = serde_json::from_slice(&bytes)?;
        Ok(created.id.map(|id| Receipt {
            http_status,
            id: Some(id),
        }))
    }

    async fn field_ids(&self) -> Result<FieldIds, TrackerError> {
        let url = format!("{}/rest/api/2/field", self.base_url);
        let resp = self.send(self.client.get(&url)).await?;
        let fields: Vec<JiraField> = resp.json().await?;
        Ok(fields.into_iter().map(|f| (f.name, f.id)).collect())
    }
}
