//! portal: command-line front end for the portal-it operations portal.
//!
//! Lists bookmarks, switches and tasks with an optional free-text filter and
//! performs writes against the local backend. When the backend is missing
//! or broken, listings come from the built-in seed catalog and say so.

mod logging;
mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use portal_core::{BookmarkDraft, CollectionKey, Draft, SwitchDraft, TaskDraft};
use portal_gateway::{Notice, Portal, PortalConfig};

#[derive(Parser)]
#[command(name = "portal")]
#[command(author, version, about = "Offline-capable operations portal")]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (default: <config dir>/portal-it/portal.toml, then PORTAL_* env)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Skip the backend and serve the seed catalog
    #[arg(long, global = true)]
    offline: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging regardless of RUST_LOG
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// Case-insensitive text to match
    #[arg(short, long, default_value = "")]
    filter: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List bookmarks grouped by section
    Bookmarks(FilterArgs),

    /// List switches
    Switches(FilterArgs),

    /// List tasks
    Tasks(FilterArgs),

    /// Fetch every collection and report where each came from
    Status,

    /// Task writes
    #[command(subcommand)]
    Task(TaskCommand),

    /// Bookmark writes
    #[command(subcommand)]
    Bookmark(BookmarkCommand),

    /// Switch writes
    #[command(subcommand)]
    Switch(SwitchCommand),

    /// Ask the backend to write a database backup
    Export,

    /// Ask the backend to restore a database backup
    Import,
}

#[derive(Subcommand)]
enum TaskCommand {
    /// Create a task
    Add {
        /// Task title
        title: String,
    },

    /// Mark a task as completed
    Done { id: i64 },

    /// Mark a task as pending again
    Reopen { id: i64 },

    /// Delete a task
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum BookmarkCommand {
    /// Create a bookmark
    Add {
        label: String,
        url: String,

        /// Section id the bookmark belongs to
        #[arg(short, long)]
        section: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Tag (can specify multiple)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// Delete a bookmark
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum SwitchCommand {
    /// Create a switch, or update it when --id is given
    Save {
        name: String,
        ip: String,

        /// Existing switch to update
        #[arg(long)]
        id: Option<i64>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Delete a switch
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose);

    let config = PortalConfig::resolve(cli.config.as_deref(), cli.offline)?;

    let portal = Portal::start(&config)
        .inspect_err(|e| error!(error = %e, "Portal failed to start"))?;
    let code = run(&portal, cli.command, cli.json).await?;
    portal.shutdown().await;
    Ok(code)
}

async fn run(portal: &Portal, command: Commands, json: bool) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Bookmarks(args) => {
            let listing = portal.bookmarks(&args.filter).await;
            if json {
                output::print_json(&listing)?;
            } else {
                output::print_bookmarks(&listing);
            }
        }
        Commands::Switches(args) => {
            let listing = portal.switches(&args.filter).await;
            if json {
                output::print_json(&listing)?;
            } else {
                output::print_switches(&listing);
            }
        }
        Commands::Tasks(args) => {
            let listing = portal.tasks(&args.filter).await;
            if json {
                output::print_json(&listing)?;
            } else {
                output::print_tasks(&listing);
            }
        }
        Commands::Status => {
            let report = portal.warm().await;
            let stats = portal.cache().stats().await;
            if json {
                output::print_json(&serde_json::json!({
                    "transport": portal.transport_name(),
                    "collections": report,
                    "cache": stats,
                }))?;
            } else {
                output::print_status(portal.transport_name(), &report, &stats);
            }
        }
        Commands::Task(command) => return write(task_command(portal, command).await, json),
        Commands::Bookmark(command) => {
            return write(bookmark_command(portal, command).await, json)
        }
        Commands::Switch(command) => return write(switch_command(portal, command).await, json),
        Commands::Export => {
            let result = portal.mutations().export().await;
            return write(Notice::from_result(&result, "Database backup exported"), json);
        }
        Commands::Import => {
            let result = portal.mutations().import().await;
            return write(Notice::from_result(&result, "Database backup imported"), json);
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn task_command(portal: &Portal, command: TaskCommand) -> Notice {
    let mutations = portal.mutations();
    match command {
        TaskCommand::Add { title } => {
            let result = mutations
                .create(CollectionKey::Tasks, Draft::Task(TaskDraft { title }))
                .await;
            Notice::from_result(&result, "Task created")
        }
        TaskCommand::Done { id } => {
            let result = mutations.toggle(CollectionKey::Tasks, id, true).await;
            Notice::from_result(&result, format!("Task #{} completed", id))
        }
        TaskCommand::Reopen { id } => {
            let result = mutations.toggle(CollectionKey::Tasks, id, false).await;
            Notice::from_result(&result, format!("Task #{} reopened", id))
        }
        TaskCommand::Delete { id } => {
            let result = mutations.delete(CollectionKey::Tasks, id).await;
            Notice::from_result(&result, format!("Task #{} deleted", id))
        }
    }
}

async fn bookmark_command(portal: &Portal, command: BookmarkCommand) -> Notice {
    let mutations = portal.mutations();
    match command {
        BookmarkCommand::Add {
            label,
            url,
            section,
            description,
            tags,
        } => {
            let draft = Draft::Bookmark(BookmarkDraft {
                label,
                url,
                section,
                description,
                tags: (!tags.is_empty()).then_some(tags),
            });
            let result = mutations.create(CollectionKey::Bookmarks, draft).await;
            let message = match &result {
                Ok(Some(id)) => format!("Bookmark #{} created", id),
                _ => "Bookmark created".to_string(),
            };
            Notice::from_result(&result, message)
        }
        BookmarkCommand::Delete { id } => {
            let result = mutations.delete(CollectionKey::Bookmarks, id).await;
            Notice::from_result(&result, format!("Bookmark #{} deleted", id))
        }
    }
}

async fn switch_command(portal: &Portal, command: SwitchCommand) -> Notice {
    let mutations = portal.mutations();
    match command {
        SwitchCommand::Save {
            name,
            ip,
            id,
            location,
            notes,
        } => {
            let draft = Draft::Switch(SwitchDraft {
                id,
                name,
                ip,
                location,
                notes,
            });
            let result = mutations.create(CollectionKey::Switches, draft).await;
            let message = match &result {
                Ok(Some(saved)) => format!("Switch #{} saved", saved),
                _ => "Switch saved".to_string(),
            };
            Notice::from_result(&result, message)
        }
        SwitchCommand::Delete { id } => {
            let result = mutations.delete(CollectionKey::Switches, id).await;
            Notice::from_result(&result, format!("Switch #{} deleted", id))
        }
    }
}

fn write(notice: Notice, json: bool) -> anyhow::Result<ExitCode> {
    if json {
        output::print_json(&notice)?;
    } else {
        output::print_notice(&notice);
    }

    if notice.is_error() {
        Ok(ExitCode::FAILURE)
    } else {
        info!(message = %notice.message, "Write complete");
        Ok(ExitCode::SUCCESS)
    }
}
