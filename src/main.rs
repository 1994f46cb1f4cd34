//! Cadence Scheduling Service Entry Point

use std::sync::Arc;

use cadence::{api, Config, Scheduler};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

/// Cadence: Natural Language Scheduling Service
#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a scheduling sentence without storing anything
    Parse {
        /// The sentence to parse
        text: String,
        /// Reference instant for relative dates (RFC 3339)
        #[arg(short, long)]
        reference: Option<String>,
    },
    /// Parse, conflict-check and store an event
    Schedule {
        /// The scheduling sentence
        text: String,
        /// Reference instant for relative dates (RFC 3339)
        #[arg(short, long)]
        reference: Option<String>,
    },
    /// Conflict-check a sentence without storing anything
    Check {
        /// The scheduling sentence
        text: String,
        /// Reference instant for relative dates (RFC 3339)
        #[arg(short, long)]
        reference: Option<String>,
    },
    /// Manage stored events
    Events {
        #[command(subcommand)]
        action: EventsCommand,
    },
    /// Generate a weekly plan for a goal
    Plan {
        /// What to plan for
        goal: String,
        /// Chronotype: morning, evening or neutral
        #[arg(long, default_value = "neutral")]
        chronotype: String,
    },
    /// Run the HTTP API server (default behavior)
    Serve {
        /// Bind address. If not specified, uses the config file value.
        #[arg(long)]
        host: Option<String>,
        /// HTTP port. If not specified, uses the config file value.
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Event store subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum EventsCommand {
    /// List stored events
    List,
    /// Add an event directly
    Add {
        /// Event summary
        summary: String,
        /// Start instant (RFC 3339)
        #[arg(long)]
        start: String,
        /// End instant (RFC 3339)
        #[arg(long)]
        end: String,
        /// Event location
        #[arg(long)]
        location: Option<String>,
    },
    /// Delete an event by id
    Delete {
        /// Event id
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let is_serve = matches!(args.command, Some(Command::Serve { .. }) | None);

    if !is_serve {
        // Minimal logging for CLI commands
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = if let Some(path) = &args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    match args.command {
        Some(Command::Parse { text, reference }) => {
            cli::run_parse(config, text, reference, args.json).await
        }
        Some(Command::Schedule { text, reference }) => {
            cli::run_schedule(config, text, reference, args.json).await
        }
        Some(Command::Check { text, reference }) => {
            cli::run_check(config, text, reference, args.json).await
        }
        Some(Command::Events { action }) => cli::run_events(config, action, args.json).await,
        Some(Command::Plan { goal, chronotype }) => {
            cli::run_plan(config, goal, chronotype, args.json).await
        }
        Some(Command::Serve { host, port }) => run_api_server(config, host, port).await,
        None => run_api_server(config, None, None).await,
    }
}

/// Run the HTTP API server.
async fn run_api_server(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    // Initialize tracing for server mode
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Cadence v{}", env!("CARGO_PKG_VERSION"));

    // Override bind address from CLI args only if explicitly provided
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!(
        data_file = %config.data_file().display(),
        planner_command = config.planner.command.is_some(),
        "Configuration loaded"
    );

    let scheduler = Arc::new(Scheduler::new(config)?);
    api::serve(scheduler).await?;

    Ok(())
}
