pub mod settings;

pub use settings::{FailurePolicy, JiraSettings, TeamsSettings};
