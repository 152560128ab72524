//! Pattern-based extraction of identities, console URLs and ticket ids
//! from CodeCommit pull request notifications.

use crate::errors::{HookError, Result};
use regex::Regex;
use std::sync::LazyLock;

static FINAL_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^/]+$").expect("Failed to compile identity regex"));

// `.` does not cross newlines, so both patterns stop at the end of the marker's line.
// The marker must start a word: `AWSCodeCommit console` is not a match.
static CONSOLE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)CodeCommit console (.+)").expect("Failed to compile console url regex")
});

// Greedy, so the match ends at the last period on the line (the sentence end),
// not at the first period inside the hostname.
static CONSOLE_SENTENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)CodeCommit console (.+)\.").expect("Failed to compile console sentence regex")
});

/// Final path segment of an ARN or path-like identity.
pub fn identity(value: &str) -> Result<String> {
    FINAL_SEGMENT
        .find(value)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| HookError::ExtractionFailed {
            what: "identity",
            input: value.to_string(),
        })
}

/// Everything after the console marker, up to the end of that line.
pub fn console_url(body: &str) -> Result<String> {
    capture(&CONSOLE_LINE, body, "console url")
}

/// Console link with the closing sentence period removed.
pub fn console_url_without_period(body: &str) -> Result<String> {
    capture(&CONSOLE_SENTENCE, body, "console url")
}

fn capture(pattern: &Regex, body: &str, what: &'static str) -> Result<String> {
    pattern
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| HookError::ExtractionFailed {
            what,
            input: body.to_string(),
        })
}

/// Matches `<KEY>-<at least four digits>` at the very start of a pull request title.
#[derive(Debug, Clone)]
pub struct TicketPattern {
    regex: Regex,
}

impl TicketPattern {
    pub fn new(project_key: &str) -> Result<Self> {
        let regex = Regex::new(&format!(r"^{}-\d{{4,}}", regex::escape(project_key))).map_err(
            |_| HookError::ExtractionFailed {
                what: "ticket pattern",
                input: project_key.to_string(),
            },
        )?;

        Ok(Self { regex })
    }

    pub fn ticket_id(&self, title: &str) -> Result<String> {
        self.regex
            .find(title)
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| HookError::MissingTicketId(title.to_string()))
    }
}
