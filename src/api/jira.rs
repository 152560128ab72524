use crate::config::JiraSettings;
use crate::errors::{HookError, Result};
use crate::models::adf::AdfDocument;
use crate::models::issue::{IssueUpdate, JiraIssue};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};

pub struct JiraClient {
    client: Client,
    base_url: String,
    email: String,
    api_token: String,
}

impl JiraClient {
    pub fn new(base_url: String, email: String, api_token: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            email,
            api_token,
        }
    }

    pub fn from_settings(settings: &JiraSettings) -> Self {
        Self::new(
            settings.jira_url.clone(),
            settings.jira_email.clone(),
            settings.jira_api_token.clone(),
        )
    }

    fn issue_url(&self, ticket_id: &str) -> String {
        format!(
            "{}/rest/api/3/issue/{}",
            self.base_url,
            urlencoding::encode(ticket_id)
        )
    }

    /// Fetches the issue. Anything other than `200 OK` is a `HookError::JiraApi`.
    pub async fn get_issue(&self, ticket_id: &str) -> Result<JiraIssue> {
        let response = self
            .client
            .get(self.issue_url(ticket_id))
            .basic_auth(&self.email, Some(&self.api_token))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(HookError::JiraApi {
                ticket_id: ticket_id.to_string(),
                status,
                body,
            });
        }

        Ok(response.json::<JiraIssue>().await?)
    }

    /// Replaces one document field. Jira answers a successful edit with
    /// `204 No Content`; every other status is a `HookError::JiraApi`.
    pub async fn update_document_field(
        &self,
        ticket_id: &str,
        field: &str,
        doc: &AdfDocument,
    ) -> Result<()> {
        let body = IssueUpdate::document_field(field, doc)?;

        let response = self
            .client
            .put(self.issue_url(ticket_id))
            .basic_auth(&self.email, Some(&self.api_token))
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        if response.status() != StatusCode::NO_CONTENT {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(HookError::JiraApi {
                ticket_id: ticket_id.to_string(),
                status,
                body: text,
            });
        }

        Ok(())
    }
}
