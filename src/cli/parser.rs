//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use crate::config::DEFAULT_SERVER_URL;
use crate::core::SourceView;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// maillog: browse, inspect and classify mail server traffic.
///
/// Talks to a mail log server over HTTP and its notification websocket.
#[derive(Parser, Debug)]
#[command(name = "maillog")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base URL of the mail log server.
    #[arg(short, long, env = "MAILLOG_SERVER", default_value = DEFAULT_SERVER_URL, global = true)]
    pub server: String,

    /// Enable verbose output.
    ///
    /// Logs go to stderr, except for `console`, which writes them to
    /// `maillog-console/console.log` in the user cache directory.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the server answers.
    Ping,

    /// Show the console configuration published by the server.
    Config,

    /// List the newest messages.
    #[command(alias = "ls")]
    List {
        /// Space separated search words; all must match.
        #[arg(short, long, default_value = "")]
        query: String,

        /// Page number, starting at 1.
        #[arg(short, long)]
        page: Option<u32>,
    },

    /// Show one message.
    Show {
        /// Message UUID or a link ending in `#uuid=...`.
        message: String,
    },

    /// Print one rendering of a message.
    View {
        /// Message UUID or link.
        message: String,

        /// View to print (text, html, source, log).
        #[arg(long = "as", default_value = "text")]
        view: SourceView,
    },

    /// Save the raw message source as an .eml file.
    Download {
        /// Message UUID or link.
        message: String,

        /// Destination file (default: `<uuid>.eml`).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report a message as ham.
    LearnHam {
        /// Message UUID or link.
        message: String,

        /// Skip confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Report a message as spam.
    LearnSpam {
        /// Message UUID or link.
        message: String,

        /// Skip confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Open the interactive console.
    Console {
        /// Initial search words.
        #[arg(short, long, default_value = "")]
        query: String,

        /// Message UUID or link to open on start.
        #[arg(long)]
        select: Option<String>,

        /// Do not connect to the notification websocket.
        #[arg(long)]
        no_live: bool,

        /// View preferences file.
        ///
        /// Defaults to `maillog-console/console.json` in the user config
        /// directory.
        #[arg(long)]
        prefs: Option<PathBuf>,
    },
}
