use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use codecommit_hooks::config::{JiraSettings, TeamsSettings};
use codecommit_hooks::handlers::{Notifier, NotifyOutcome, SyncOutcome, TicketSync};
use codecommit_hooks::logging;
use codecommit_hooks::models::event::PullRequestEvent;
use colored::*;
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::info;

/// Handler selection when the binary starts with no arguments (Lambda `bootstrap`).
const HANDLER_VAR: &str = "HOOK_HANDLER";

#[derive(Parser)]
#[command(name = "codecommit-hooks")]
#[command(version)]
#[command(about = "Forward CodeCommit pull request events to Teams and Jira", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a handler inside the Lambda runtime loop
    Serve {
        #[arg(long, env = HANDLER_VAR)]
        handler: HandlerKind,
    },

    /// Run a handler once against a saved EventBridge event
    Replay {
        #[arg(long)]
        handler: HandlerKind,

        /// Path to the event JSON
        event: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HandlerKind {
    /// Post pull request summaries to Microsoft Teams
    Teams,
    /// Record created pull requests on their Jira ticket
    Jira,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init();

    let result = match cli.command {
        Some(Commands::Serve { handler }) => serve(handler).await,
        Some(Commands::Replay { handler, event }) => replay(handler, &event).await,
        None => match handler_from_env() {
            Ok(handler) => serve(handler).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("\n{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn handler_from_env() -> anyhow::Result<HandlerKind> {
    let value = std::env::var(HANDLER_VAR)
        .with_context(|| format!("{} must be set to 'teams' or 'jira'", HANDLER_VAR))?;

    HandlerKind::from_str(&value, true)
        .map_err(|_| anyhow::anyhow!("Unknown handler '{}' in {}", value, HANDLER_VAR))
}

async fn serve(handler: HandlerKind) -> anyhow::Result<()> {
    info!(?handler, "Starting Lambda runtime");

    let result = match handler {
        HandlerKind::Teams => {
            let notifier = Notifier::from_settings(&TeamsSettings::load()?);
            let notifier = &notifier;

            lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
                let event = PullRequestEvent::from_value(event.payload)?;
                let outcome = notifier.handle(&event).await?;
                info!(?outcome, "Teams notification handled");
                Ok::<Value, lambda_runtime::Error>(json!({}))
            }))
            .await
        }
        HandlerKind::Jira => {
            let sync = TicketSync::from_settings(&JiraSettings::load()?)?;
            let sync = &sync;

            lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
                let event = PullRequestEvent::from_value(event.payload)?;
                let outcome = sync.handle(&event).await?;
                info!(?outcome, "Jira sync handled");
                Ok::<Value, lambda_runtime::Error>(json!({}))
            }))
            .await
        }
    };

    result.map_err(|e| anyhow::anyhow!("Lambda runtime failed: {}", e))
}

async fn replay(handler: HandlerKind, path: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event file {}", path.display()))?;
    let event = PullRequestEvent::from_json(&raw)
        .with_context(|| format!("Failed to parse event file {}", path.display()))?;

    println!(
        "{}",
        format!("Replaying {} event...", event.detail.event).cyan().bold()
    );
    println!();

    match handler {
        HandlerKind::Teams => {
            let notifier = Notifier::from_settings(&TeamsSettings::load()?);
            match notifier.handle(&event).await? {
                NotifyOutcome::Sent { kind } => {
                    println!("{}", format!("✓ Posted {:?} message to Teams", kind).green());
                }
                NotifyOutcome::Skipped { event } => {
                    println!("{}", format!("  Skipped '{}' (no message for this event)", event).yellow());
                }
                NotifyOutcome::Failed { status } => {
                    println!("{}", format!("✗ Teams rejected the message ({})", status).red());
                }
            }
        }
        HandlerKind::Jira => {
            let sync = TicketSync::from_settings(&JiraSettings::load()?)?;
            match sync.handle(&event).await? {
                SyncOutcome::Updated { ticket_id } => {
                    println!("{}", format!("✓ Updated Jira ticket {}", ticket_id).green());
                }
                SyncOutcome::Skipped { event } => {
                    println!("{}", format!("  Skipped '{}' (only created pull requests are recorded)", event).yellow());
                }
                SyncOutcome::ReadFailed { ticket_id, status } => {
                    println!("{}", format!("✗ Could not read {} ({})", ticket_id, status).red());
                }
                SyncOutcome::WriteFailed { ticket_id, status } => {
                    println!("{}", format!("✗ Could not update {} ({})", ticket_id, status).red());
                }
            }
        }
    }

    Ok(())
}
