//! CLI module.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// yt-transcript-api - YouTube transcripts over HTTP
///
/// Serves `GET /transcript?video_id=<id>` and returns the video's captions as plain text.
#[derive(Parser, Debug)]
#[command(name = "yt-transcript-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host from config)
        #[arg(long, env = "TRANSCRIPT_API_HOST")]
        host: Option<String>,

        /// Port to bind to (defaults to server.port from config)
        #[arg(short, long, env = "TRANSCRIPT_API_PORT")]
        port: Option<u16>,
    },

    /// Fetch a single transcript and print it
    Fetch {
        /// YouTube video ID
        video_id: String,

        /// Print the JSON response envelope instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the default configuration file if none exists (at --config when given)
    Init,

    /// Show configuration file path (--config when given)
    Path,
}
