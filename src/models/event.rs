use crate::errors::{HookError, Result};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// EventBridge envelope around a CodeCommit pull request notification.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    #[serde(rename = "detail-type", default)]
    pub detail_type: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    pub detail: PullRequestDetail,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestDetail {
    pub event: PullRequestEventKind,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub caller_user_arn: Option<String>,
    #[serde(default)]
    pub notification_body: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub repository_names: Vec<String>,
    #[serde(default)]
    pub destination_reference: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub pull_request_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PullRequestEventKind {
    Created,
    MergeStatusUpdated,
    Other(String),
}

impl From<String> for PullRequestEventKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pullRequestCreated" => PullRequestEventKind::Created,
            "pullRequestMergeStatusUpdated" => PullRequestEventKind::MergeStatusUpdated,
            _ => PullRequestEventKind::Other(value),
        }
    }
}

impl fmt::Display for PullRequestEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PullRequestEventKind::Created => write!(f, "pullRequestCreated"),
            PullRequestEventKind::MergeStatusUpdated => write!(f, "pullRequestMergeStatusUpdated"),
            PullRequestEventKind::Other(name) => write!(f, "{}", name),
        }
    }
}

impl PullRequestEvent {
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(HookError::MalformedEvent)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(HookError::MalformedEvent)
    }
}

impl PullRequestDetail {
    pub fn author(&self) -> Result<&str> {
        required(&self.author, "detail.author")
    }

    pub fn caller_user_arn(&self) -> Result<&str> {
        required(&self.caller_user_arn, "detail.callerUserArn")
    }

    pub fn notification_body(&self) -> Result<&str> {
        required(&self.notification_body, "detail.notificationBody")
    }

    pub fn title(&self) -> Result<&str> {
        required(&self.title, "detail.title")
    }

    pub fn destination_reference(&self) -> Result<&str> {
        required(&self.destination_reference, "detail.destinationReference")
    }

    pub fn pull_request_id(&self) -> Result<&str> {
        required(&self.pull_request_id, "detail.pullRequestId")
    }

    /// First repository name; CodeCommit lists the target repository first.
    pub fn repository(&self) -> Result<&str> {
        self.repository_names
            .first()
            .map(String::as_str)
            .ok_or(HookError::MissingField("detail.repositoryNames"))
    }
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str> {
    value.as_deref().ok_or(HookError::MissingField(field))
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_created_event() {
        let event = PullRequestEvent::from_value(fixtures::event_json("pullRequestCreated")).unwrap();

        assert_eq!(event.detail.event, PullRequestEventKind::Created);
        assert_eq!(event.source.as_deref(), Some("aws.codecommit"));
        assert_eq!(event.detail.repository().unwrap(), "billing-service");
        assert_eq!(event.detail.pull_request_id().unwrap(), "42");
        assert_eq!(event.detail.destination_reference().unwrap(), "refs/heads/main");
    }

    #[test]
    fn test_unknown_event_kind_is_kept() {
        let event =
            PullRequestEvent::from_value(fixtures::event_json("pullRequestStatusChanged")).unwrap();

        assert_eq!(
            event.detail.event,
            PullRequestEventKind::Other("pullRequestStatusChanged".to_string())
        );
        assert_eq!(event.detail.event.to_string(), "pullRequestStatusChanged");
    }

    #[test]
    fn test_numeric_pull_request_id() {
        let event = PullRequestEvent::from_value(json!({
            "detail": { "event": "pullRequestCreated", "pullRequestId": 17 }
        }))
        .unwrap();

        assert_eq!(event.detail.pull_request_id().unwrap(), "17");
    }

    #[test]
    fn test_missing_fields_surface_on_access() {
        let event = PullRequestEvent::from_value(json!({
            "detail": { "event": "pullRequestCreated" }
        }))
        .unwrap();

        assert!(matches!(
            event.detail.author(),
            Err(HookError::MissingField("detail.author"))
        ));
        assert!(matches!(
            event.detail.repository(),
            Err(HookError::MissingField("detail.repositoryNames"))
        ));
    }

    #[test]
    fn test_missing_detail_is_malformed() {
        let result = PullRequestEvent::from_json(r#"{"source": "aws.codecommit"}"#);
        assert!(matches!(result, Err(HookError::MalformedEvent(_))));
    }
}
