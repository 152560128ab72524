use crate::models::adf::{AdfDocument, AdfError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The parts of a Jira issue response this crate reads. Fields stay untyped
/// because the tracking field id is configurable.
#[derive(Debug, Deserialize, Serialize)]
pub struct JiraIssue {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// `PUT /rest/api/3/issue/{id}` body that replaces a single field.
#[derive(Debug, Serialize)]
pub struct IssueUpdate {
    pub fields: Map<String, Value>,
}

impl JiraIssue {
    pub fn document_field(&self, field: &str) -> Result<Option<AdfDocument>, AdfError> {
        AdfDocument::from_field(self.fields.get(field))
    }
}

impl IssueUpdate {
    pub fn document_field(field: &str, doc: &AdfDocument) -> serde_json::Result<Self> {
        let mut fields = Map::new();
        fields.insert(field.to_string(), serde_json::to_value(doc)?);
        Ok(Self { fields })
    }
}
