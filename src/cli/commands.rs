//! CLI command implementations.
//!
//! Contains the business logic for each CLI command. Commands talk to the
//! server through [`MailLogApi`] so they can run against any backend.

use crate::api::{Classification, HttpApi, MailLogApi, MessageQuery, save_message};
use crate::cli::output::{
    OutputFormat, format_config, format_download, format_message, format_message_list,
    format_ping, format_report, format_source,
};
use crate::cli::parser::{Cli, Commands};
use crate::config::ClientConfig;
use crate::console::{self, ConsoleOptions, ViewPrefs};
use crate::core::{SourceView, resolve_message_ref};
use crate::error::{CommandError, IoError, Result};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub async fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);
    let config = ClientConfig::new(&cli.server)?;
    debug!(server = %config.server, command = ?cli.command, "executing command");
    let api = HttpApi::new(config.clone())?;

    match &cli.command {
        Commands::Ping => cmd_ping(&api, &config, format).await,
        Commands::Config => cmd_config(&api, format).await,
        Commands::List { query, page } => cmd_list(&api, query, *page, format).await,
        Commands::Show { message } => cmd_show(&api, &config, message, format).await,
        Commands::View { message, view } => cmd_view(&api, message, *view, format).await,
        Commands::Download { message, output } => {
            cmd_download(&api, message, output.as_deref(), format).await
        }
        Commands::LearnHam { message, yes } => {
            cmd_learn(&api, message, Classification::Ham, *yes, format).await
        }
        Commands::LearnSpam { message, yes } => {
            cmd_learn(&api, message, Classification::Spam, *yes, format).await
        }
        Commands::Console {
            query,
            select,
            no_live,
            prefs,
        } => {
            let options = ConsoleOptions {
                query: query.clone(),
                select: select.as_deref().map(message_ref).transpose()?,
                live: !no_live,
                prefs_path: prefs.clone().or_else(ViewPrefs::default_path),
            };
            console::run(Arc::new(api), &config, options).await?;
            Ok(String::new())
        }
    }
}

/// Turns a UUID or deep link into a UUID.
fn message_ref(input: &str) -> Result<String> {
    resolve_message_ref(input).ok_or_else(|| {
        CommandError::InvalidArgument(format!("not a message UUID or link: {input}")).into()
    })
}

async fn cmd_ping(
    api: &dyn MailLogApi,
    config: &ClientConfig,
    format: OutputFormat,
) -> Result<String> {
    api.ping().await?;
    Ok(format_ping(config.server.as_str(), format))
}

async fn cmd_config(api: &dyn MailLogApi, format: OutputFormat) -> Result<String> {
    let config = api.config().await?;
    Ok(format_config(&config, format))
}

async fn cmd_list(
    api: &dyn MailLogApi,
    query: &str,
    page: Option<u32>,
    format: OutputFormat,
) -> Result<String> {
    if page == Some(0) {
        return Err(CommandError::InvalidArgument("pages start at 1".to_string()).into());
    }
    let query = MessageQuery {
        text: query.trim().to_string(),
        page,
    };
    let messages = api.message_log(&query).await?;
    Ok(format_message_list(&messages, format))
}

async fn cmd_show(
    api: &dyn MailLogApi,
    config: &ClientConfig,
    message: &str,
    format: OutputFormat,
) -> Result<String> {
    let uuid = message_ref(message)?;
    let entry = api.message(&uuid).await?;
    Ok(format_message(&entry, &config.message_link(&uuid), format))
}

async fn cmd_view(
    api: &dyn MailLogApi,
    message: &str,
    view: SourceView,
    format: OutputFormat,
) -> Result<String> {
    let uuid = message_ref(message)?;
    if view == SourceView::Log && api.config().await?.disable_logs {
        return Err(CommandError::Disabled("the log view".to_string()).into());
    }
    let content = api.message_source(&uuid, view).await?;
    Ok(format_source(&uuid, view, &content, format))
}

async fn cmd_download(
    api: &dyn MailLogApi,
    message: &str,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<String> {
    let uuid = message_ref(message)?;
    let path = output.map_or_else(|| PathBuf::from(format!("{uuid}.eml")), Path::to_path_buf);
    let bytes = save_message(api, &uuid, &path).await?;
    Ok(format_download(&uuid, &path, bytes, format))
}

async fn cmd_learn(
    api: &dyn MailLogApi,
    message: &str,
    classification: Classification,
    yes: bool,
    format: OutputFormat,
) -> Result<String> {
    let uuid = message_ref(message)?;
    if api.config().await?.disable_spam_reporting {
        return Err(CommandError::Disabled("spam reporting".to_string()).into());
    }
    if !yes && !confirm(format!("Report {uuid} as {classification}?")).await? {
        return Err(CommandError::Cancelled.into());
    }
    let report = api.learn(&uuid, classification).await?;
    Ok(format_report(&uuid, classification, &report, format))
}

/// Asks a yes/no question on the terminal.
async fn confirm(question: String) -> Result<bool> {
    if !io::stdin().is_terminal() {
        return Err(CommandError::InvalidArgument(
            "use --yes to confirm when stdin is not a terminal".to_string(),
        )
        .into());
    }
    tokio::task::spawn_blocking(move || ask(&question))
        .await
        .map_err(|err| IoError::Generic(err.to_string()))?
}

fn ask(question: &str) -> Result<bool> {
    let stdin = io::stdin();
    let mut stderr = io::stderr();
    write!(stderr, "{question} [y/N] ")?;
    stderr.flush()?;

    let mut answer = String::new();
    stdin.lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
