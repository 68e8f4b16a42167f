//! Binary entry point for maillog.
//!
//! maillog: terminal console for a mail log server.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::Parser;
use maillog_console::cli::output::{OutputFormat, format_error};
use maillog_console::cli::{Cli, Commands, execute};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);
    let format = OutputFormat::parse(&cli.format);

    match execute(&cli).await {
        Ok(output) => {
            if !output.is_empty() {
                // Handle broken pipe gracefully (e.g., when piped to `head` or `jq`)
                if let Err(e) = write!(io::stdout(), "{output}")
                    && e.kind() != io::ErrorKind::BrokenPipe
                {
                    eprintln!("Error writing to stdout: {e}");
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            let error_output = format_error(&e, format);
            match format {
                OutputFormat::Json => {
                    // JSON errors go to stdout for programmatic parsing
                    println!("{error_output}");
                }
                OutputFormat::Text => {
                    eprintln!("Error: {error_output}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so they never mix with command output. The console
/// owns the terminal, so its logs go to [`console_log_file`] instead.
/// `RUST_LOG` wins over `--verbose`.
fn init_tracing(cli: &Cli) {
    let default = if cli.verbose {
        "maillog_console=debug,maillog=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if !matches!(cli.command, Commands::Console { .. }) {
        subscriber.with_writer(io::stderr).init();
        return;
    }
    match console_log_file() {
        Some(file) => subscriber
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        None => subscriber.with_writer(io::sink).init(),
    }
}

/// `maillog-console/console.log` in the user cache directory, opened for
/// appending.
fn console_log_file() -> Option<File> {
    let dir = dirs::cache_dir()?.join("maillog-console");
    fs::create_dir_all(&dir).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("console.log"))
        .ok()
}
