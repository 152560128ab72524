pub mod jira;
pub mod teams;
