//! # Atlassian Document Format
//!
//! The pull request tracking field on a Jira ticket, plus the merge that
//! appends a pull request link to the document's ordered list.
//!
//! Top-level blocks are kept as raw JSON. Only the ordered list that
//! receives the new entry is inspected, so every other block is written
//! back exactly as it was read, whatever nodes it contains.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

pub const ADF_VERSION: u32 = 1;

const DOC: &str = "doc";
const ORDERED_LIST: &str = "orderedList";

#[derive(Debug, Error)]
pub enum AdfError {
    #[error("value is not an ADF document: {0}")]
    NotADocument(#[source] serde_json::Error),

    #[error("orderedList content is not an array")]
    ListContentNotArray,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AdfDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(rename = "type", default = "default_doc_type")]
    pub kind: String,
    pub content: Vec<Value>,
}

fn default_version() -> u32 {
    ADF_VERSION
}

fn default_doc_type() -> String {
    DOC.to_string()
}

/// A pull request entry in the ticket's tracking list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestLink {
    pub repo: String,
    pub id: String,
    pub url: String,
}

impl PullRequestLink {
    pub fn label(&self) -> String {
        format!("{} | {}", self.repo, self.id)
    }

    /// `listItem > paragraph > text` with a single link mark pointing at the pull request.
    pub fn to_list_item(&self) -> Value {
        json!({
            "type": "listItem",
            "content": [{
                "type": "paragraph",
                "content": [{
                    "type": "text",
                    "text": self.label(),
                    "marks": [{ "type": "link", "attrs": { "href": self.url } }]
                }]
            }]
        })
    }
}

fn is_ordered_list(block: &Value) -> bool {
    block.get("type").and_then(Value::as_str) == Some(ORDERED_LIST)
}

impl Default for AdfDocument {
    fn default() -> Self {
        Self {
            version: ADF_VERSION,
            kind: DOC.to_string(),
            content: Vec::new(),
        }
    }
}

impl AdfDocument {
    /// Reads the field value as returned by Jira. `null` and `{}` mean the
    /// field is empty; any other value that is not a document is an error.
    pub fn from_field(value: Option<&Value>) -> Result<Option<Self>, AdfError> {
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) if map.is_empty() => Ok(None),
            Some(other) => serde_json::from_value(other.clone())
                .map(Some)
                .map_err(AdfError::NotADocument),
        }
    }

    /// The first top-level ordered list, if the document has one.
    pub fn ordered_list(&self) -> Option<&Value> {
        self.content.iter().find(|block| is_ordered_list(block))
    }

    /// Number of items in the tracked ordered list.
    pub fn link_count(&self) -> usize {
        self.ordered_list()
            .and_then(|list| list.get("content"))
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }
}

/// Appends `link` to the first top-level ordered list of `current`, or adds a
/// new ordered list after the existing blocks when there is none.
///
/// Every other block is kept as-is. The result is always a version 1 `doc`.
/// Appending the same link twice produces two entries.
pub fn append_pull_request_link(
    current: Option<AdfDocument>,
    link: &PullRequestLink,
) -> Result<AdfDocument, AdfError> {
    let mut doc = AdfDocument {
        content: current.map(|doc| doc.content).unwrap_or_default(),
        ..AdfDocument::default()
    };

    let item = link.to_list_item();

    match doc.content.iter_mut().find(|block| is_ordered_list(block)) {
        Some(list) => {
            let entries = list
                .as_object_mut()
                .map(|node| node.entry("content").or_insert_with(|| Value::Array(Vec::new())))
                .and_then(Value::as_array_mut)
                .ok_or(AdfError::ListContentNotArray)?;
            entries.push(item);
        }
        None => doc
            .content
            .push(json!({ "type": ORDERED_LIST, "content": [item] })),
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(id: &str) -> PullRequestLink {
        PullRequestLink {
            repo: "billing-service".to_string(),
            id: id.to_string(),
            url: format!("https://console.aws.amazon.com/pr/{}", id),
        }
    }

    fn items(doc: &AdfDocument) -> &Vec<Value> {
        doc.ordered_list().unwrap()["content"].as_array().unwrap()
    }

    #[test]
    fn test_list_item_shape() {
        assert_eq!(
            link("42").to_list_item(),
            json!({
                "type": "listItem",
                "content": [{
                    "type": "paragraph",
                    "content": [{
                        "type": "text",
                        "text": "billing-service | 42",
                        "marks": [{
                            "type": "link",
                            "attrs": { "href": "https://console.aws.amazon.com/pr/42" }
                        }]
                    }]
                }]
            })
        );
    }

    #[test]
    fn test_merge_into_empty_document() {
        let doc = append_pull_request_link(None, &link("1")).unwrap();

        assert_eq!(doc.version, 1);
        assert_eq!(doc.kind, "doc");
        assert_eq!(doc.content.len(), 1);
        assert!(is_ordered_list(&doc.content[0]));
        assert_eq!(doc.link_count(), 1);
    }

    #[test]
    fn test_merge_twice_keeps_order() {
        let first = append_pull_request_link(None, &link("1")).unwrap();
        let first_item = items(&first)[0].clone();

        let second = append_pull_request_link(Some(first), &link("2")).unwrap();

        assert_eq!(second.content.iter().filter(|b| is_ordered_list(b)).count(), 1);
        assert_eq!(items(&second).len(), 2);
        assert_eq!(items(&second)[0], first_item);
        assert_eq!(
            items(&second)[1]["content"][0]["content"][0]["text"],
            "billing-service | 2"
        );
    }

    #[test]
    fn test_merge_same_link_twice_duplicates_entry() {
        let once = append_pull_request_link(None, &link("7")).unwrap();
        let twice = append_pull_request_link(Some(once), &link("7")).unwrap();

        assert_eq!(items(&twice).len(), 2);
        assert_eq!(items(&twice)[0], items(&twice)[1]);
    }

    #[test]
    fn test_merge_preserves_other_blocks() {
        let existing: AdfDocument = serde_json::from_value(json!({
            "version": 1,
            "type": "doc",
            "content": [
                {
                    "type": "paragraph",
                    "content": [{ "type": "text", "text": "Related PRs" }]
                },
                {
                    "type": "panel",
                    "attrs": { "panelType": "info" },
                    "localId": "abc-123",
                    "content": [{ "type": "paragraph", "content": [] }]
                }
            ]
        }))
        .unwrap();
        let before = existing.content.clone();

        let merged = append_pull_request_link(Some(existing), &link("3")).unwrap();

        assert_eq!(merged.content[0], before[0]);
        assert_eq!(merged.content[1], before[1]);
        assert_eq!(merged.content[2]["type"], "orderedList");
        assert_eq!(merged.link_count(), 1);
    }

    #[test]
    fn test_merge_keeps_nodes_outside_the_model() {
        let existing = AdfDocument::from_field(Some(&json!({
            "version": 1,
            "type": "doc",
            "content": [
                { "type": "paragraph", "content": [{ "type": "text", "text": "keep me" }] },
                { "type": "mediaSingle", "content": [{ "attrs": { "id": "x" } }] },
                "stray"
            ]
        })))
        .unwrap();
        let before = existing.clone().unwrap().content;

        let merged = append_pull_request_link(existing, &link("1")).unwrap();

        assert_eq!(merged.content.len(), 4);
        assert_eq!(merged.content[..3], before[..]);
        assert_eq!(merged.content[0]["content"][0]["text"], "keep me");
    }

    #[test]
    fn test_merge_appends_to_existing_list_in_place() {
        let existing: AdfDocument = serde_json::from_value(json!({
            "version": 1,
            "type": "doc",
            "content": [
                { "type": "paragraph", "content": [{ "type": "text", "text": "before" }] },
                {
                    "type": "orderedList",
                    "attrs": { "order": 1 },
                    "content": [link("1").to_list_item()]
                },
                { "type": "paragraph", "content": [{ "type": "text", "text": "after" }] }
            ]
        }))
        .unwrap();

        let merged = append_pull_request_link(Some(existing), &link("2")).unwrap();

        assert_eq!(merged.content.len(), 3);
        assert!(is_ordered_list(&merged.content[1]));
        assert_eq!(merged.content[1]["attrs"], json!({ "order": 1 }));
        assert_eq!(merged.link_count(), 2);
    }

    #[test]
    fn test_only_first_ordered_list_is_touched() {
        let existing = AdfDocument {
            content: vec![
                json!({ "type": "orderedList", "content": [] }),
                json!({ "type": "orderedList", "content": [] }),
            ],
            ..AdfDocument::default()
        };

        let merged = append_pull_request_link(Some(existing), &link("5")).unwrap();

        assert_eq!(merged.content[0]["content"].as_array().unwrap().len(), 1);
        assert_eq!(merged.content[1]["content"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_list_without_content_gets_one() {
        let existing = AdfDocument {
            content: vec![json!({ "type": "orderedList" })],
            ..AdfDocument::default()
        };

        let merged = append_pull_request_link(Some(existing), &link("5")).unwrap();
        assert_eq!(merged.link_count(), 1);
    }

    #[test]
    fn test_list_with_non_array_content_is_rejected() {
        let existing = AdfDocument {
            content: vec![json!({ "type": "orderedList", "content": "oops" })],
            ..AdfDocument::default()
        };

        let result = append_pull_request_link(Some(existing), &link("5"));
        assert!(matches!(result, Err(AdfError::ListContentNotArray)));
    }

    #[test]
    fn test_from_field_treats_empty_values_as_absent() {
        assert!(AdfDocument::from_field(None).unwrap().is_none());
        assert!(AdfDocument::from_field(Some(&Value::Null)).unwrap().is_none());
        assert!(AdfDocument::from_field(Some(&json!({}))).unwrap().is_none());

        let doc = AdfDocument::from_field(Some(&json!({
            "version": 1,
            "type": "doc",
            "content": []
        })))
        .unwrap()
        .unwrap();
        assert!(doc.content.is_empty());
    }

    #[test]
    fn test_from_field_rejects_non_documents() {
        assert!(matches!(
            AdfDocument::from_field(Some(&json!("plain text"))),
            Err(AdfError::NotADocument(_))
        ));
        assert!(matches!(
            AdfDocument::from_field(Some(&json!({ "type": "doc" }))),
            Err(AdfError::NotADocument(_))
        ));
        assert!(matches!(
            AdfDocument::from_field(Some(&json!({ "content": "text" }))),
            Err(AdfError::NotADocument(_))
        ));
    }
}
