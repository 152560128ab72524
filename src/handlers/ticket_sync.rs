use crate::api::jira::JiraClient;
use crate::config::{FailurePolicy, JiraSettings};
use crate::errors::{HookError, Result};
use crate::extract::{self, TicketPattern};
use crate::models::adf::{append_pull_request_link, PullRequestLink};
use crate::models::event::{PullRequestEvent, PullRequestEventKind};
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Updated { ticket_id: String },
    Skipped { event: PullRequestEventKind },
    ReadFailed { ticket_id: String, status: u16 },
    WriteFailed { ticket_id: String, status: u16 },
}

/// Records newly created pull requests on the Jira ticket named in their title.
pub struct TicketSync {
    client: JiraClient,
    pattern: TicketPattern,
    field: String,
    policy: FailurePolicy,
}

impl TicketSync {
    pub fn new(
        client: JiraClient,
        pattern: TicketPattern,
        field: String,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            client,
            pattern,
            field,
            policy,
        }
    }

    pub fn from_settings(settings: &JiraSettings) -> Result<Self> {
        Ok(Self::new(
            JiraClient::from_settings(settings),
            TicketPattern::new(&settings.jira_project_key)?,
            settings.jira_custom_field.clone(),
            settings.jira_failure_policy,
        ))
    }

    pub async fn handle(&self, event: &PullRequestEvent) -> Result<SyncOutcome> {
        let detail = &event.detail;
        debug!(?event, "Received pull request event");

        if detail.event != PullRequestEventKind::Created {
            info!(event = %detail.event, detail_type = ?event.detail_type, "Ignoring pull request event");
            return Ok(SyncOutcome::Skipped {
                event: detail.event.clone(),
            });
        }

        let link = PullRequestLink {
            url: extract::console_url_without_period(detail.notification_body()?)?,
            id: detail.pull_request_id()?.to_string(),
            repo: detail.repository()?.to_string(),
        };
        let ticket_id = self.pattern.ticket_id(detail.title()?)?;

        self.record_link(&ticket_id, &link).await
    }

    /// Read-modify-write of the tracking field. There is no conflict detection:
    /// a concurrent update to the same ticket between the GET and the PUT is lost.
    pub async fn record_link(&self, ticket_id: &str, link: &PullRequestLink) -> Result<SyncOutcome> {
        let issue = match self.client.get_issue(ticket_id).await {
            Ok(issue) => issue,
            Err(HookError::JiraApi { status, body, .. }) => {
                error!(
                    ticket_id,
                    status,
                    body = %body,
                    "Failed to retrieve data for Jira ticket"
                );
                return self.fail(
                    HookError::JiraApi {
                        ticket_id: ticket_id.to_string(),
                        status,
                        body,
                    },
                    SyncOutcome::ReadFailed {
                        ticket_id: ticket_id.to_string(),
                        status,
                    },
                );
            }
            Err(err) => return Err(err),
        };

        let doc = issue
            .document_field(&self.field)
            .and_then(|current| append_pull_request_link(current, link))
            .map_err(|source| {
                error!(ticket_id, field = %self.field, error = %source, "Refusing to overwrite Jira field");
                HookError::MalformedField {
                    ticket_id: ticket_id.to_string(),
                    field: self.field.clone(),
                    source,
                }
            })?;
        debug!(ticket_id, links = doc.link_count(), "Merged pull request link");

        match self
            .client
            .update_document_field(ticket_id, &self.field, &doc)
            .await
        {
            Ok(()) => {
                info!(ticket_id, repo = %link.repo, pull_request = %link.id, "Successfully updated Jira ticket");
                Ok(SyncOutcome::Updated {
                    ticket_id: ticket_id.to_string(),
                })
            }
            Err(HookError::JiraApi { status, body, .. }) => {
                error!(ticket_id, status, body = %body, "Failed to update Jira ticket");
                self.fail(
                    HookError::JiraApi {
                        ticket_id: ticket_id.to_string(),
                        status,
                        body,
                    },
                    SyncOutcome::WriteFailed {
                        ticket_id: ticket_id.to_string(),
                        status,
                    },
                )
            }
            Err(err) => Err(err),
        }
    }

    fn fail(&self, err: HookError, logged: SyncOutcome) -> Result<SyncOutcome> {
        match self.policy {
            FailurePolicy::Propagate => Err(err),
            FailurePolicy::Log => Ok(logged),
        }
    }
}
