//! Lambda handlers that react to CodeCommit pull request events.
//!
//! * [`handlers::Notifier`] posts a created/merged summary to a Microsoft Teams webhook.
//! * [`handlers::TicketSync`] appends the pull request link to the Jira ticket named
//!   in the pull request title.

pub mod api;
pub mod config;
pub mod errors;
pub mod extract;
pub mod handlers;
pub mod logging;
pub mod models;

pub use errors::{HookError, Result};
