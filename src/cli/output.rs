//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::api::{Classification, ServerConfig, SpamReport};
use crate::core::{MessageEntry, SourceView, truncate};
use crate::error::{ApiError, Error};
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats a ping response.
#[must_use]
pub fn format_ping(server: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("Server at {server} is up.\n"),
        OutputFormat::Json => format_json(&serde_json::json!({
            "server": server,
            "status": "ok",
        })),
    }
}

/// Formats the server configuration.
#[must_use]
pub fn format_config(config: &ServerConfig, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_config_text(config),
        OutputFormat::Json => format_json(config),
    }
}

fn format_config_text(config: &ServerConfig) -> String {
    let enabled = |disabled: bool| if disabled { "disabled" } else { "enabled" };
    let brand = if config.custom_brand.is_empty() {
        "(default)"
    } else {
        config.custom_brand.as_str()
    };

    let mut output = String::new();
    output.push_str("Server configuration\n");
    output.push_str("====================\n\n");
    let _ = writeln!(output, "  Brand:           {brand}");
    let _ = writeln!(
        output,
        "  Spam reporting:  {}",
        enabled(config.disable_spam_reporting)
    );
    let _ = writeln!(output, "  Logs:            {}", enabled(config.disable_logs));
    let _ = writeln!(output, "  Messages:        {}", config.message_count);
    output
}

/// Formats a message list.
#[must_use]
pub fn format_message_list(messages: &[MessageEntry], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_message_list_text(messages),
        OutputFormat::Json => format_json(&messages),
    }
}

fn format_message_list_text(messages: &[MessageEntry]) -> String {
    if messages.is_empty() {
        return "No messages found.\n".to_string();
    }

    let mut output = String::new();
    let _ = writeln!(
        output,
        "{:<36} {:<19} {:<24} {:<30} {:<10} Size",
        "UUID", "Received", "From", "Subject", "Status"
    );
    output.push_str(&"-".repeat(130));
    output.push('\n');

    for message in messages {
        let _ = writeln!(
            output,
            "{:<36} {:<19} {:<24} {:<30} {:<10} {}",
            truncate(&message.uuid, 36),
            message.formatted_received(),
            truncate(&message.from, 24),
            truncate(&message.subject, 30),
            truncate(&message.status, 10),
            message.human_size()
        );
    }

    output
}

/// Formats a single message with its deep link.
#[must_use]
pub fn format_message(message: &MessageEntry, link: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_message_text(message, link),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct MessageWithLink<'a> {
                #[serde(flatten)]
                message: &'a MessageEntry,
                link: &'a str,
            }
            format_json(&MessageWithLink { message, link })
        }
    }
}

fn format_message_text(message: &MessageEntry, link: &str) -> String {
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };

    let mut output = String::new();
    let _ = writeln!(output, "Message {}", message.uuid);
    output.push_str(&"=".repeat(8 + message.uuid.len()));
    output.push_str("\n\n");
    let _ = writeln!(output, "  Message-ID:   {}", message.message_id);
    let _ = writeln!(output, "  From:         {}", message.from);
    let _ = writeln!(output, "  To:           {}", message.to);
    let _ = writeln!(output, "  Subject:      {}", message.subject);
    let _ = writeln!(output, "  Received:     {}", message.formatted_received());
    let _ = writeln!(output, "  Size:         {}", message.human_size());
    let _ = writeln!(output, "  Spam score:   {}", message.spam_score);
    if !message.source_ip.is_empty() {
        let _ = writeln!(output, "  Source IP:    {}", message.source_ip);
    }
    if !message.status.is_empty() {
        let _ = writeln!(output, "  Status:       {}", message.status);
    }
    let _ = writeln!(
        output,
        "  Bodies:       text {}, html {}, attachments {}",
        yes_no(message.plain_text),
        yes_no(message.html),
        yes_no(message.attachments)
    );
    let _ = writeln!(output, "  Link:         {link}");
    output
}

/// Formats one source view of a message.
#[must_use]
pub fn format_source(uuid: &str, view: SourceView, content: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = content.to_string();
            if !output.is_empty() && !output.ends_with('\n') {
                output.push('\n');
            }
            output
        }
        OutputFormat::Json => format_json(&serde_json::json!({
            "uuid": uuid,
            "view": view,
            "content": content,
        })),
    }
}

/// Formats the result of a download.
#[must_use]
pub fn format_download(uuid: &str, path: &Path, bytes: usize, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("Saved {uuid} to {} ({bytes} bytes)\n", path.display()),
        OutputFormat::Json => format_json(&serde_json::json!({
            "uuid": uuid,
            "path": path,
            "bytes": bytes,
        })),
    }
}

/// Formats the outcome of a ham/spam report.
#[must_use]
pub fn format_report(
    uuid: &str,
    classification: Classification,
    report: &SpamReport,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => format_report_text(uuid, classification, report),
        OutputFormat::Json => format_json(&serde_json::json!({
            "uuid": uuid,
            "classification": classification,
            "requests": report.requests,
        })),
    }
}

fn format_report_text(uuid: &str, classification: Classification, report: &SpamReport) -> String {
    let mut output = format!("Successfully reported {uuid} as {classification}.\n");
    push_attempts(&mut output, report);
    output
}

/// One line per upstream attempt.
fn push_attempts(output: &mut String, report: &SpamReport) {
    for attempt in &report.requests {
        if attempt.succeeded() {
            let _ = writeln!(output, "  ok      {}", attempt.url);
        } else {
            let reason = attempt
                .error
                .as_deref()
                .filter(|reason| !reason.is_empty())
                .unwrap_or("no reason given");
            let _ = writeln!(output, "  failed  {}: {reason}", attempt.url);
        }
    }
}

/// Formats an error for output.
///
/// A rejected ham/spam report also lists what each upstream answered.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    let rejected = match error {
        Error::Api(ApiError::ReportRejected { report, .. }) => Some(report),
        _ => None,
    };
    match format {
        OutputFormat::Text => {
            let mut output = error.to_string();
            if let Some(report) = rejected {
                output.push('\n');
                push_attempts(&mut output, report);
                output.truncate(output.trim_end().len());
            }
            output
        }
        OutputFormat::Json => {
            let kind = match error {
                Error::Api(_) => "api",
                Error::Io(_) => "io",
                Error::Command(_) => "command",
                Error::Config { .. } => "config",
            };
            let mut value = serde_json::json!({
                "error": kind,
                "message": error.reason(),
            });
            if let Some(report) = rejected {
                value["requests"] = serde_json::json!(report.requests);
            }
            format_json(&value)
        }
    }
}

/// Formats a value as pretty-printed JSON.
fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}
