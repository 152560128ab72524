use crate::api::teams::TeamsClient;
use crate::config::{FailurePolicy, TeamsSettings};
use crate::errors::{HookError, Result};
use crate::extract;
use crate::models::event::{PullRequestDetail, PullRequestEvent, PullRequestEventKind};
use crate::models::message::{MessageKind, PullRequestSummary, TeamsMessage};
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent { kind: MessageKind },
    Skipped { event: PullRequestEventKind },
    /// Webhook rejected the message and the policy is `Log`.
    Failed { status: u16 },
}

pub struct Notifier {
    client: TeamsClient,
    policy: FailurePolicy,
}

impl Notifier {
    pub fn new(client: TeamsClient, policy: FailurePolicy) -> Self {
        Self { client, policy }
    }

    pub fn from_settings(settings: &TeamsSettings) -> Self {
        Self::new(
            TeamsClient::new(settings.teams_webhook_url.clone()),
            settings.teams_failure_policy,
        )
    }

    pub async fn handle(&self, event: &PullRequestEvent) -> Result<NotifyOutcome> {
        let detail = &event.detail;

        let Some((kind, message)) = build_message(detail)? else {
            info!(event = %detail.event, detail_type = ?event.detail_type, "Ignoring pull request event");
            return Ok(NotifyOutcome::Skipped {
                event: detail.event.clone(),
            });
        };

        match self.client.post_message(&message).await {
            Ok(()) => {
                info!(?kind, pull_request = ?detail.pull_request_id, "Posted pull request notification");
                Ok(NotifyOutcome::Sent { kind })
            }
            Err(err) => {
                error!(error = %err, "Failed to post pull request notification");
                match (self.policy, err) {
                    (FailurePolicy::Log, HookError::WebhookRejected { status, .. }) => {
                        Ok(NotifyOutcome::Failed { status })
                    }
                    (_, err) => Err(err),
                }
            }
        }
    }
}

/// Renders the message for a recognized event, or `None` for any other event kind.
pub fn build_message(detail: &PullRequestDetail) -> Result<Option<(MessageKind, TeamsMessage)>> {
    let kind = match detail.event {
        PullRequestEventKind::Created => MessageKind::Created,
        PullRequestEventKind::MergeStatusUpdated => MessageKind::Merged,
        PullRequestEventKind::Other(_) => return Ok(None),
    };

    let summary = PullRequestSummary {
        author: extract::identity(detail.author()?)?,
        merger: extract::identity(detail.caller_user_arn()?)?,
        title: detail.title()?.to_string(),
        repo: detail.repository()?.to_string(),
        destination: detail.destination_reference()?.to_string(),
        id: detail.pull_request_id()?.to_string(),
        url: extract::console_url(detail.notification_body()?)?,
    };

    Ok(Some((kind, TeamsMessage::render(kind, &summary))))
}
