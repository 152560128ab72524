use crate::errors::{HookError, Result};
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Environment variable naming an optional TOML file layered under the environment.
pub const CONFIG_FILE_VAR: &str = "HOOKS_CONFIG";

pub const DEFAULT_CUSTOM_FIELD: &str = "customfield_10051";
pub const DEFAULT_PROJECT_KEY: &str = "MEA";

/// What a handler does when the remote system answers with a failure status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and return it to the caller as an error.
    Propagate,
    /// Log the failure and finish the invocation normally.
    Log,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TeamsSettings {
    #[serde(alias = "teams_real")]
    pub teams_webhook_url: String,
    #[serde(default = "propagate")]
    pub teams_failure_policy: FailurePolicy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JiraSettings {
    pub jira_url: String,
    pub jira_email: String,
    pub jira_api_token: String,
    #[serde(default = "default_custom_field")]
    pub jira_custom_field: String,
    #[serde(default = "default_project_key")]
    pub jira_project_key: String,
    #[serde(default = "log_only")]
    pub jira_failure_policy: FailurePolicy,
}

fn propagate() -> FailurePolicy {
    FailurePolicy::Propagate
}

fn log_only() -> FailurePolicy {
    FailurePolicy::Log
}

fn default_custom_field() -> String {
    DEFAULT_CUSTOM_FIELD.to_string()
}

fn default_project_key() -> String {
    DEFAULT_PROJECT_KEY.to_string()
}

impl TeamsSettings {
    pub fn load() -> Result<Self> {
        Self::load_from(Environment::default())
    }

    pub fn load_from(env: Environment) -> Result<Self> {
        let settings: TeamsSettings = build(env)?.try_deserialize()?;
        require("teams_webhook_url", &settings.teams_webhook_url)?;
        Ok(settings)
    }
}

impl JiraSettings {
    pub fn load() -> Result<Self> {
        Self::load_from(Environment::default())
    }

    pub fn load_from(env: Environment) -> Result<Self> {
        let mut settings: JiraSettings = build(env)?.try_deserialize()?;

        require("jira_url", &settings.jira_url)?;
        require("jira_email", &settings.jira_email)?;
        require("jira_api_token", &settings.jira_api_token)?;
        require("jira_custom_field", &settings.jira_custom_field)?;
        require("jira_project_key", &settings.jira_project_key)?;

        settings.jira_url = settings.jira_url.trim_end_matches('/').to_string();
        Ok(settings)
    }
}

fn build(env: Environment) -> Result<Config> {
    let mut builder = Config::builder();

    if let Ok(path) = std::env::var(CONFIG_FILE_VAR) {
        builder = builder.add_source(File::with_name(&path).required(false));
    }

    Ok(builder.add_source(env).build()?)
}

fn require(name: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(HookError::ConfigMissing(name));
    }
    Ok(())
}
