use serde::{Deserialize, Serialize};

/// Body of a Teams incoming-webhook call. Teams renders `<br>` as a line break.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TeamsMessage {
    pub text: String,
}

/// Which template a recognized event renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Created,
    Merged,
}

/// Fields pulled out of a pull request event for rendering.
#[derive(Debug, Clone)]
pub struct PullRequestSummary {
    pub author: String,
    pub merger: String,
    pub title: String,
    pub repo: String,
    pub destination: String,
    pub id: String,
    pub url: String,
}

const LINE_BREAK: &str = " <br>\n";

impl TeamsMessage {
    pub fn render(kind: MessageKind, pr: &PullRequestSummary) -> Self {
        let mut lines = Vec::with_capacity(8);

        match kind {
            MessageKind::Created => {
                lines.push("A pull request has been created.".to_string());
                lines.push(format!("PR Author: {}", pr.author));
            }
            MessageKind::Merged => {
                lines.push("The pull request has been merged.".to_string());
                lines.push(format!("PR Author: {}", pr.author));
                lines.push(format!("PR Merger: {}", pr.merger));
            }
        }

        lines.push(format!("PR Title: {}", pr.title));
        lines.push(format!("PR Repo: {}", pr.repo));
        lines.push(format!("Destination Branch: {}", pr.destination));
        lines.push(format!("PR ID: {}", pr.id));
        lines.push(format!("PR URL: {}", pr.url));

        Self {
            text: lines.join(LINE_BREAK),
        }
    }
}
