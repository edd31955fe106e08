//! arealink CLI - Command-line interface
//!
//! Watches and publishes relay events, measures polygons and renders the
//! live scoreboard using the arealink library.

mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::area::AreaArgs;
use commands::common::GlobalOptions;
use commands::config::ConfigCommands;
use commands::publish::PublishArgs;
use commands::scoreboard::ScoreboardArgs;
use commands::watch::WatchArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "arealink")]
#[command(about = "Relay client and polygon tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Relay WebSocket URL (overrides the config file)
    #[arg(long, global = true, value_name = "URL")]
    relay_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Subscribe to relay events and print them
    Watch {
        /// Channel to subscribe to (repeatable)
        #[arg(short, long = "channel", default_value = "game")]
        channels: Vec<String>,

        /// Event to subscribe to (repeatable)
        #[arg(short, long = "event", required = true)]
        events: Vec<String>,

        /// Print payloads on one line
        #[arg(long)]
        compact: bool,
    },

    /// Publish one message to the relay and exit
    Publish {
        /// Channel name
        channel: String,

        /// Event name
        event: String,

        /// JSON payload (defaults to null)
        data: Option<String>,
    },

    /// Measure a polygon given as lat,lng points
    Area {
        /// Vertices as lat,lng (at least three)
        #[arg(required = true, allow_hyphen_values = true, value_name = "LAT,LNG")]
        points: Vec<String>,

        /// Send the finalized polygon to the export socket
        #[arg(long)]
        export: bool,

        /// Export socket URL (overrides the config file)
        #[arg(long, value_name = "URL", requires = "export")]
        export_url: Option<String>,
    },

    /// Render the live scoreboard from game state updates
    Scoreboard {
        /// Print plain text instead of redrawing the terminal
        #[arg(long)]
        plain: bool,
    },

    /// View or create the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let _log_guard = match arealink::logging::init_logging(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: {}", e);
            None
        }
    };

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let options = GlobalOptions {
        config: cli.config,
        relay_url: cli.relay_url,
    };

    match cli.command {
        Commands::Watch {
            channels,
            events,
            compact,
        } => commands::watch::run(
            &options,
            WatchArgs {
                channels,
                events,
                compact,
            },
        ),

        Commands::Publish {
            channel,
            event,
            data,
        } => commands::publish::run(
            &options,
            PublishArgs {
                channel,
                event,
                data,
            },
        ),

        Commands::Area {
            points,
            export,
            export_url,
        } => commands::area::run(
            &options,
            AreaArgs {
                points,
                export,
                export_url,
            },
        ),

        Commands::Scoreboard { plain } => {
            commands::scoreboard::run(&options, ScoreboardArgs { plain })
        }

        Commands::Config { command } => commands::config::run(&options, command),
    }
}
