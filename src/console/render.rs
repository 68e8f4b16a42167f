//! Text frame rendering.
//!
//! A frame is plain text sized to the terminal: title, message table,
//! details of the selected message, view tabs, contents and the notice
//! line. Config switches hide the status column, the log tab and the
//! ham/spam actions.

use super::input::HELP;
use super::layout::{CHROME_ROWS, FROM_WIDTH, RECEIVED_WIDTH, STATUS_WIDTH, TO_WIDTH};
use super::state::{ChannelStatus, Console, Contents};
use crate::core::format::fit;
use crate::core::{MessageEntry, SourceView, truncate};
use std::fmt::Write;

const ACTIVE_MARKER: &str = "> ";
const IDLE_MARKER: &str = "  ";

/// Renders the whole screen.
#[must_use]
pub fn render(console: &Console) -> String {
    let width = usize::from(console.layout().width());
    let mut lines = Vec::with_capacity(usize::from(CHROME_ROWS) + 32);

    lines.push(title_line(console));
    lines.push(header_line(console));
    list_lines(console, &mut lines);
    lines.push(divider(width));
    detail_lines(console.selected(), &mut lines);
    lines.push(tab_line(console));
    lines.push(divider(width));
    contents_lines(console, &mut lines);
    lines.push(
        console
            .notice()
            .map(|notice| format!("{} {}", notice.level.marker(), notice.text))
            .unwrap_or_default(),
    );

    let mut frame = String::new();
    for line in lines {
        let _ = writeln!(frame, "{}", truncate(&line, width));
    }
    frame
}

fn title_line(console: &Console) -> String {
    let settings = console.settings();
    let mut line = settings.brand.clone();
    if let Some(count) = settings.message_count {
        let _ = write!(line, " | {count} messages");
    }
    let channel = match console.channel_status() {
        ChannelStatus::Disabled => "live updates off",
        ChannelStatus::Connecting => "connecting",
        ChannelStatus::Connected => "live",
        ChannelStatus::Disconnected => "offline",
    };
    let _ = write!(line, " | {channel}");
    if !console.query().is_empty() {
        let _ = write!(line, " | search: {}", console.query());
    }
    if console.is_loading() {
        line.push_str(" | loading...");
    }
    line
}

fn header_line(console: &Console) -> String {
    let show_status = console.settings().logs;
    let subject_width = console.layout().subject_width(show_status);
    let mut line = format!(
        "{IDLE_MARKER}{} {} {} {}",
        fit("Received", RECEIVED_WIDTH),
        fit("From", FROM_WIDTH),
        fit("To", TO_WIDTH),
        fit("Subject", subject_width),
    );
    if show_status {
        let _ = write!(line, " {}", fit("Status", STATUS_WIDTH));
    }
    line
}

fn row_line(entry: &MessageEntry, active: bool, subject_width: usize, show_status: bool) -> String {
    let marker = if active { ACTIVE_MARKER } else { IDLE_MARKER };
    let mut line = format!(
        "{marker}{} {} {} {}",
        fit(&entry.formatted_received(), RECEIVED_WIDTH),
        fit(&entry.from, FROM_WIDTH),
        fit(&entry.to, TO_WIDTH),
        fit(&entry.subject, subject_width),
    );
    if show_status {
        let _ = write!(line, " {}", fit(&entry.status, STATUS_WIDTH));
    }
    line.trim_end().to_string()
}

fn list_lines(console: &Console, lines: &mut Vec<String>) {
    let list = console.list();
    let rows = usize::from(console.layout().list_height());
    let show_status = console.settings().logs;
    let subject_width = console.layout().subject_width(show_status);

    let mut drawn = 0;
    if list.is_empty() {
        let text = if console.is_loading() {
            "Loading..."
        } else {
            "No messages found."
        };
        lines.push(format!("{IDLE_MARKER}{text}"));
        drawn += 1;
    } else {
        for index in console.layout().visible_rows(list.len()) {
            if let Some(entry) = list.get(index) {
                let active = list.active() == Some(index);
                lines.push(row_line(entry, active, subject_width, show_status));
                drawn += 1;
            }
        }
    }
    lines.extend(std::iter::repeat_n(String::new(), rows.saturating_sub(drawn)));
}

fn detail_lines(selected: Option<&MessageEntry>, lines: &mut Vec<String>) {
    let Some(entry) = selected else {
        lines.push("No message selected. Use j/k or a row number to pick one.".to_string());
        lines.extend(std::iter::repeat_n(String::new(), 3));
        return;
    };
    lines.push(format!("From:     {}", entry.from));
    lines.push(format!("To:       {}", entry.to));
    lines.push(format!("Subject:  {}", entry.subject));
    let mut facts = format!(
        "Received: {} | Size: {} | Spam score: {}",
        entry.formatted_received(),
        entry.human_size(),
        entry.spam_score,
    );
    if !entry.source_ip.is_empty() {
        let _ = write!(facts, " | Source IP: {}", entry.source_ip);
    }
    if entry.attachments {
        facts.push_str(" | attachments");
    }
    lines.push(facts);
}

fn tab_line(console: &Console) -> String {
    let Some(entry) = console.selected() else {
        return String::new();
    };
    let logs = console.settings().logs;
    let mut tabs: Vec<String> = SourceView::ALL
        .into_iter()
        .filter(|view| view.is_available(entry, logs))
        .map(|view| {
            if view == console.view() {
                format!("[{view}]")
            } else {
                view.to_string()
            }
        })
        .collect();

    let mut actions = vec!["download"];
    if console.settings().spam_reporting {
        actions.push("ham");
        actions.push("spam");
    }
    tabs.push("|".to_string());
    tabs.extend(actions.into_iter().map(str::to_string));
    tabs.join(" ")
}

fn contents_lines(console: &Console, lines: &mut Vec<String>) {
    let height = usize::from(console.layout().contents_height());
    let start = lines.len();

    if console.help_visible() {
        lines.extend(HELP.lines().take(height).map(str::to_string));
    } else {
        match console.contents() {
            Contents::Empty => {}
            Contents::Loading => lines.push("Loading...".to_string()),
            Contents::Failed => lines.push("(this view could not be loaded)".to_string()),
            Contents::Text(text) => lines.extend(
                text.lines()
                    .skip(console.contents_scroll())
                    .take(height)
                    .map(|line| line.replace('\t', "    ")),
            ),
        }
    }

    let drawn = lines.len() - start;
    lines.extend(std::iter::repeat_n(String::new(), height.saturating_sub(drawn)));
}

fn divider(width: usize) -> String {
    "-".repeat(width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ServerConfig;
    use crate::console::input::UserCommand;
    use crate::console::layout::Layout;
    use crate::console::state::Action;
    use crate::core::message::fixtures::entry;
    use std::time::{Duration, Instant};

    const WIDTH: u16 = 140;
    const HEIGHT: u16 = 30;

    fn console_with(rows: Vec<MessageEntry>) -> (Console, Instant) {
        let now = Instant::now();
        let mut console = Console::new(Layout::new(WIDTH, HEIGHT, 5), Duration::from_secs(5));
        console.start("", None, true);
        console.handle(Action::ListLoaded(Ok(rows)), now);
        (console, now)
    }

    #[test]
    fn test_frame_fills_the_screen() {
        let (console, _) = console_with(vec![entry("a", "Quarterly report")]);
        let frame = render(&console);
        assert_eq!(frame.lines().count(), usize::from(HEIGHT));
        assert!(
            frame
                .lines()
                .all(|line| line.chars().count() <= usize::from(WIDTH))
        );
    }

    #[test]
    fn test_selected_row_is_marked_and_detailed() {
        let (mut console, now) = console_with(vec![entry("a", "Hello"), entry("b", "Invoice")]);
        console.handle(Action::Input(UserCommand::SelectRow(1)), now);
        let frame = render(&console);

        let marked: Vec<_> = frame.lines().filter(|l| l.starts_with(ACTIVE_MARKER)).collect();
        assert_eq!(marked.len(), 1);
        assert!(marked[0].contains("Invoice"));
        assert!(frame.contains("Subject:  Invoice"));
        assert!(frame.contains("Size: 1.5 KB"));
        assert!(frame.contains("[text]"));
    }

    #[test]
    fn test_config_hides_log_and_reporting() {
        let (mut console, now) = console_with(vec![entry("a", "Hello")]);
        console.handle(Action::Input(UserCommand::SelectRow(0)), now);
        let frame = render(&console);
        assert!(frame.contains("Status"));
        assert!(frame.contains(" log"));
        assert!(frame.contains("ham spam"));

        let config = ServerConfig {
            custom_brand: "Acme Relay".to_string(),
            disable_spam_reporting: true,
            disable_logs: true,
            message_count: 7,
        };
        console.handle(Action::ConfigLoaded(Ok(config)), now);
        let frame = render(&console);
        assert!(frame.starts_with("Acme Relay | 7 messages"));
        assert!(!frame.contains("Status"));
        assert!(!frame.contains(" log"));
        assert!(!frame.contains("ham"));
    }

    #[test]
    fn test_empty_list_and_help() {
        let (mut console, now) = console_with(Vec::new());
        assert!(render(&console).contains("No messages found."));

        console.handle(Action::Input(UserCommand::Help), now);
        assert!(render(&console).contains("Commands:"));
    }

    #[test]
    fn test_contents_follow_scroll() {
        let (mut console, now) = console_with(vec![entry("a", "Long")]);
        console.handle(Action::Input(UserCommand::SelectRow(0)), now);
        let text = (1..=60).map(|i| format!("body line {i}\n")).collect::<String>();
        console.handle(
            Action::SourceLoaded {
                uuid: "a".to_string(),
                view: SourceView::PlainText,
                result: Ok(text),
            },
            now,
        );
        let frame = render(&console);
        assert!(frame.contains("body line 1\n"));

        console.handle(Action::Input(UserCommand::ScrollContents(5)), now);
        let frame = render(&console);
        assert!(!frame.contains("body line 1\n"));
        assert!(frame.contains("body line 60"));
    }
}
