use thiserror::Error;

#[derive(Debug, Error)]
pub enum HookError {
    // Configuration errors
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Required configuration value '{0}' is empty")]
    ConfigMissing(&'static str),

    // Event payload errors
    #[error("Malformed event payload: {0}")]
    MalformedEvent(#[source] serde_json::Error),

    #[error("Event payload is missing field '{0}'")]
    MissingField(&'static str),

    #[error("Could not extract {what} from '{input}'")]
    ExtractionFailed { what: &'static str, input: String },

    #[error("Pull request title '{0}' does not start with a ticket id")]
    MissingTicketId(String),

    // Teams errors
    #[error("Teams webhook rejected the message ({status}): {body}")]
    WebhookRejected { status: u16, body: String },

    // Jira errors
    #[error("Jira API error for {ticket_id} ({status}): {body}")]
    JiraApi {
        ticket_id: String,
        status: u16,
        body: String,
    },

    #[error("Jira field {field} on {ticket_id} holds unexpected content: {source}")]
    MalformedField {
        ticket_id: String,
        field: String,
        #[source]
        source: crate::models::adf::AdfError,
    },

    // Network errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HookError>;
