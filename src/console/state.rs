//! Console state and its reducer.
//!
//! [`Console`] owns everything the screen shows. The runtime feeds it
//! [`Action`]s (input, channel updates, timer ticks, finished requests) and
//! carries out the [`Request`]s it hands back. Nothing in here touches the
//! network or the terminal, which keeps the whole interaction testable.

use super::input::UserCommand;
use super::layout::Layout;
use super::list::{MessageList, Step};
use super::loader::LoadGuard;
use super::notice::{Notice, NoticeBoard, NoticeLevel};
use super::prefs::ViewPrefs;
use crate::api::{Classification, MessageQuery, ServerConfig, SpamReport};
use crate::channel::{ChannelEvent, ChannelUpdate};
use crate::core::{MessageEntry, SourceView};
use crate::error::{ApiError, ChannelError, Error, Result};
use std::fmt::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::debug;

/// Brand shown until the server config says otherwise.
pub const DEFAULT_BRAND: &str = "Mail Archive";

/// Something that happened.
#[derive(Debug)]
pub enum Action {
    /// A parsed input line.
    Input(UserCommand),
    /// An input line that did not parse.
    InvalidInput(String),
    /// News from the notification channel.
    Channel(ChannelUpdate),
    /// The periodic stale-list check.
    RefreshTick,
    /// The once-a-minute forced refresh.
    ForcedRefreshTick,
    /// Housekeeping (notice expiry).
    Tick,
    /// The terminal changed size.
    Resized {
        /// Columns.
        width: u16,
        /// Rows.
        height: u16,
    },
    /// `GET /api/config` finished.
    ConfigLoaded(Result<ServerConfig>),
    /// `GET /api/message_log` finished.
    ListLoaded(Result<Vec<MessageEntry>>),
    /// `GET /api/message/{uuid}` finished.
    MessageLoaded(Result<MessageEntry>),
    /// A source view fetch finished.
    SourceLoaded {
        /// Message the view belongs to.
        uuid: String,
        /// Which view was fetched.
        view: SourceView,
        /// Text of the view.
        result: Result<String>,
    },
    /// A ham/spam report finished.
    Learned {
        /// What the message was reported as.
        classification: Classification,
        /// Per-upstream outcome.
        result: Result<SpamReport>,
    },
    /// A download finished with the written path and byte count.
    Downloaded(Result<(PathBuf, usize)>),
}

/// Work the runtime must carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Fetch the server config.
    LoadConfig,
    /// Fetch the message list.
    LoadList(MessageQuery),
    /// Fetch one message entry.
    LoadMessage(String),
    /// Fetch a source view.
    LoadSource {
        /// Message UUID.
        uuid: String,
        /// View to fetch.
        view: SourceView,
    },
    /// Report a message.
    Learn {
        /// Message UUID.
        uuid: String,
        /// Ham or spam.
        classification: Classification,
    },
    /// Save the raw message to `path`.
    Download {
        /// Message UUID.
        uuid: String,
        /// Destination file.
        path: PathBuf,
    },
    /// Persist the view preferences.
    SavePrefs(ViewPrefs),
    /// Leave the console.
    Quit,
}

/// Server-driven display switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySettings {
    /// Title shown at the top.
    pub brand: String,
    /// Whether the ham/spam actions are offered.
    pub spam_reporting: bool,
    /// Whether the log view and status column are shown.
    pub logs: bool,
    /// Total messages stored on the server, once known.
    pub message_count: Option<u64>,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            brand: DEFAULT_BRAND.to_string(),
            spam_reporting: true,
            logs: true,
            message_count: None,
        }
    }
}

impl DisplaySettings {
    fn apply(&mut self, config: ServerConfig) {
        if !config.custom_brand.trim().is_empty() {
            self.brand = config.custom_brand;
        }
        self.spam_reporting = !config.disable_spam_reporting;
        self.logs = !config.disable_logs;
        self.message_count = Some(config.message_count);
    }
}

/// State of the notification channel as shown in the title bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    /// Live updates were switched off.
    Disabled,
    /// Connecting or waiting to reconnect.
    Connecting,
    /// Receiving events.
    Connected,
    /// Connection lost, a reconnect is scheduled.
    Disconnected,
}

/// What the contents pane holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contents {
    /// No message selected.
    Empty,
    /// A view fetch is in flight.
    Loading,
    /// The fetched view.
    Text(String),
    /// The fetch failed; the notice says why.
    Failed,
}

impl Contents {
    fn line_count(&self) -> usize {
        match self {
            Self::Text(text) => text.lines().count(),
            Self::Empty | Self::Loading | Self::Failed => 0,
        }
    }
}

/// The console state machine.
#[derive(Debug)]
pub struct Console {
    settings: DisplaySettings,
    query: String,
    list: MessageList,
    selected: Option<MessageEntry>,
    view: SourceView,
    contents: Contents,
    contents_scroll: usize,
    guard: LoadGuard,
    notices: NoticeBoard,
    layout: Layout,
    pending_report: Option<Classification>,
    channel: ChannelStatus,
    help_visible: bool,
    dirty: bool,
}

impl Console {
    /// Creates a console with `layout` whose notices last `notice_timeout`.
    #[must_use]
    pub fn new(layout: Layout, notice_timeout: Duration) -> Self {
        Self {
            settings: DisplaySettings::default(),
            query: String::new(),
            list: MessageList::new(),
            selected: None,
            view: SourceView::default(),
            contents: Contents::Empty,
            contents_scroll: 0,
            guard: LoadGuard::new(),
            notices: NoticeBoard::new(notice_timeout),
            layout,
            pending_report: None,
            channel: ChannelStatus::Connecting,
            help_visible: false,
            dirty: true,
        }
    }

    /// First requests: config, the list for `query`, and the message named
    /// by `select` if any.
    pub fn start(&mut self, query: &str, select: Option<String>, live: bool) -> Vec<Request> {
        self.query = query.to_string();
        if !live {
            self.channel = ChannelStatus::Disabled;
            self.notices.sticky(
                NoticeLevel::Info,
                "Live updates are off, the list refreshes once every minute.",
            );
        }
        let mut requests = vec![Request::LoadConfig];
        requests.extend(self.begin_list());
        requests.extend(select.map(Request::LoadMessage));
        self.dirty = true;
        requests
    }

    /// Applies `action` at time `now` and returns the work it triggers.
    ///
    /// While a report waits for confirmation its question stays on the
    /// notice line, whatever else happened.
    pub fn handle(&mut self, action: Action, now: Instant) -> Vec<Request> {
        let requests = self.dispatch(action, now);
        self.keep_prompt_visible();
        requests
    }

    fn dispatch(&mut self, action: Action, now: Instant) -> Vec<Request> {
        match action {
            Action::Input(command) => self.handle_input(command, now),
            Action::InvalidInput(message) => {
                self.notices.transient(NoticeLevel::Error, message, now);
                self.dirty = true;
                Vec::new()
            }
            Action::Channel(update) => {
                self.handle_channel(update, now);
                Vec::new()
            }
            Action::RefreshTick => {
                let requests: Vec<_> = self.begin_due_list().into_iter().collect();
                self.dirty |= !requests.is_empty();
                requests
            }
            Action::ForcedRefreshTick => {
                self.guard.mark_stale();
                Vec::new()
            }
            Action::Tick => {
                self.dirty |= self.notices.expire(now);
                Vec::new()
            }
            Action::Resized { width, height } => {
                if self.layout.resize(width, height) {
                    self.keep_active_visible();
                    self.dirty = true;
                }
                Vec::new()
            }
            Action::ConfigLoaded(result) => self.config_loaded(result, now),
            Action::ListLoaded(result) => self.list_loaded(result, now),
            Action::MessageLoaded(result) => self.message_loaded(result, now),
            Action::SourceLoaded { uuid, view, result } => {
                self.source_loaded(&uuid, view, result, now);
                Vec::new()
            }
            Action::Learned {
                classification,
                result,
            } => {
                self.learned(classification, result, now);
                Vec::new()
            }
            Action::Downloaded(result) => {
                match result {
                    Ok((path, bytes)) => self.notices.transient(
                        NoticeLevel::Success,
                        format!("Saved {bytes} bytes to {}.", path.display()),
                        now,
                    ),
                    Err(err) => self.notices.transient(
                        NoticeLevel::Error,
                        format!("Unable to download message: {}", err.reason()),
                        now,
                    ),
                }
                self.dirty = true;
                Vec::new()
            }
        }
    }

    /// Returns whether the screen needs redrawing and clears the flag.
    pub const fn take_dirty(&mut self) -> bool {
        let dirty = self.dirty;
        self.dirty = false;
        dirty
    }

    /// Server-driven display switches.
    #[must_use]
    pub const fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    /// Current search text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The message list.
    #[must_use]
    pub const fn list(&self) -> &MessageList {
        &self.list
    }

    /// The selected message.
    #[must_use]
    pub const fn selected(&self) -> Option<&MessageEntry> {
        self.selected.as_ref()
    }

    /// The active source view.
    #[must_use]
    pub const fn view(&self) -> SourceView {
        self.view
    }

    /// Contents pane.
    #[must_use]
    pub const fn contents(&self) -> &Contents {
        &self.contents
    }

    /// First visible line of the contents pane.
    #[must_use]
    pub const fn contents_scroll(&self) -> usize {
        self.contents_scroll
    }

    /// The visible notice.
    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notices.current()
    }

    /// Screen geometry.
    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Report waiting for confirmation.
    #[must_use]
    pub const fn pending_report(&self) -> Option<Classification> {
        self.pending_report
    }

    /// Notification channel state.
    #[must_use]
    pub const fn channel_status(&self) -> ChannelStatus {
        self.channel
    }

    /// Whether the help text replaces the contents pane.
    #[must_use]
    pub const fn help_visible(&self) -> bool {
        self.help_visible
    }

    /// Whether a list fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.guard.is_loading()
    }

    fn handle_input(&mut self, command: UserCommand, now: Instant) -> Vec<Request> {
        if matches!(command, UserCommand::Nothing) {
            return Vec::new();
        }
        self.dirty = true;

        if self.pending_report.is_some() && !matches!(command, UserCommand::Confirm(_)) {
            self.pending_report = None;
            self.notices
                .transient(NoticeLevel::Info, "Report cancelled.", now);
        }

        match command {
            UserCommand::Step(step) => self.step(step),
            UserCommand::SelectRow(index) => self.select_row(index, now),
            UserCommand::Search(text) => {
                self.query = text;
                self.request_list()
            }
            UserCommand::Refresh => self.request_list(),
            UserCommand::Open(uuid) => {
                if self.selected_uuid() == Some(uuid.as_str()) {
                    return Vec::new();
                }
                vec![Request::LoadMessage(uuid)]
            }
            UserCommand::View(view) => self.switch_view(view, now),
            UserCommand::ScrollContents(pages) => {
                self.scroll_contents(pages);
                Vec::new()
            }
            UserCommand::Learn(classification) => {
                self.ask_to_report(classification, now);
                Vec::new()
            }
            UserCommand::Confirm(yes) => self.confirm(yes, now),
            UserCommand::Download(path) => {
                let Some(uuid) = self.selected_uuid().map(str::to_string) else {
                    self.select_first_notice(now);
                    return Vec::new();
                };
                let path = path.unwrap_or_else(|| PathBuf::from(format!("{uuid}.eml")));
                vec![Request::Download { uuid, path }]
            }
            UserCommand::ResizeList(delta) => {
                let height = self.layout.resize_list(delta);
                self.keep_active_visible();
                vec![Request::SavePrefs(ViewPrefs {
                    list_height: Some(height),
                })]
            }
            UserCommand::Help => {
                self.help_visible = !self.help_visible;
                Vec::new()
            }
            UserCommand::Quit => vec![Request::Quit],
            UserCommand::Nothing => Vec::new(),
        }
    }

    fn handle_channel(&mut self, update: ChannelUpdate, now: Instant) {
        match update {
            ChannelUpdate::Connecting => {
                self.channel = ChannelStatus::Connecting;
                self.notices
                    .sticky(NoticeLevel::Info, "Connecting to websockets daemon");
                self.dirty = true;
            }
            ChannelUpdate::Connected => {
                self.channel = ChannelStatus::Connected;
                self.notices
                    .transient(NoticeLevel::Success, "Connected to websockets daemon", now);
                self.dirty = true;
            }
            ChannelUpdate::Event(event) => {
                if event.requires_refresh() {
                    self.guard.mark_stale();
                }
                match event {
                    ChannelEvent::UpdateMessageCount(count) => {
                        self.settings.message_count = Some(count);
                        self.dirty = true;
                    }
                    ChannelEvent::Other { kind, .. } => {
                        debug!(kind = %kind, "ignoring channel event");
                    }
                    ChannelEvent::MessageStatusesUpdated | ChannelEvent::ReceivedNewMessage(_) => {}
                }
            }
            ChannelUpdate::Failed(err) => {
                let text = match err {
                    ChannelError::Malformed { payload } => {
                        format!("Received weird response: {payload}")
                    }
                    ChannelError::Connect(reason) => {
                        format!("Unable to connect to websockets daemon: {reason}")
                    }
                    ChannelError::Transport(reason) => {
                        format!("Websockets connection failed: {reason}")
                    }
                };
                self.notices.transient(NoticeLevel::Error, text, now);
                self.dirty = true;
            }
            ChannelUpdate::Closed => {
                self.channel = ChannelStatus::Disconnected;
                self.notices
                    .sticky(NoticeLevel::Error, "Websockets connection closed");
                self.dirty = true;
            }
        }
    }

    fn begin_list(&mut self) -> Option<Request> {
        self.guard
            .try_begin()
            .then(|| Request::LoadList(MessageQuery::search(self.query.clone())))
    }

    fn begin_due_list(&mut self) -> Option<Request> {
        self.guard
            .begin_if_due()
            .then(|| Request::LoadList(MessageQuery::search(self.query.clone())))
    }

    fn request_list(&mut self) -> Vec<Request> {
        if self.guard.request_search() {
            vec![Request::LoadList(MessageQuery::search(self.query.clone()))]
        } else {
            debug!(query = %self.query, "list fetch in flight, search deferred");
            Vec::new()
        }
    }

    fn config_loaded(&mut self, result: Result<ServerConfig>, now: Instant) -> Vec<Request> {
        self.dirty = true;
        match result {
            Ok(config) => {
                self.settings.apply(config);
                if !self.settings.spam_reporting {
                    self.pending_report = None;
                }
                match &self.selected {
                    Some(entry) if !self.view.is_available(entry, self.settings.logs) => {
                        self.load_selected_view().into_iter().collect()
                    }
                    _ => Vec::new(),
                }
            }
            Err(err) => {
                self.notices.transient(
                    NoticeLevel::Error,
                    format!("Unable to load configuration: {}", err.reason()),
                    now,
                );
                Vec::new()
            }
        }
    }

    fn list_loaded(&mut self, result: Result<Vec<MessageEntry>>, now: Instant) -> Vec<Request> {
        self.dirty = true;
        match result {
            Ok(rows) => {
                let selected = self.selected.as_ref().map(|entry| entry.uuid.as_str());
                self.list.replace(rows, selected);
                self.keep_active_visible();
            }
            Err(err) => self.notices.transient(
                NoticeLevel::Error,
                format!("Unable to pull messages: {}", err.reason()),
                now,
            ),
        }
        if self.guard.finish() {
            return self.begin_list().into_iter().collect();
        }
        Vec::new()
    }

    fn message_loaded(&mut self, result: Result<MessageEntry>, now: Instant) -> Vec<Request> {
        self.dirty = true;
        match result {
            Ok(entry) => {
                self.list.activate(&entry.uuid);
                self.keep_active_visible();
                self.select(entry)
            }
            Err(err) => {
                self.notices.transient(
                    NoticeLevel::Error,
                    format!("Unable to pull message: {}", err.reason()),
                    now,
                );
                Vec::new()
            }
        }
    }

    fn source_loaded(&mut self, uuid: &str, view: SourceView, result: Result<String>, now: Instant) {
        if self.selected_uuid() != Some(uuid) || view != self.view {
            debug!(uuid, %view, "discarding stale message source");
            return;
        }
        self.dirty = true;
        match result {
            Ok(text) => self.contents = Contents::Text(text),
            Err(err) => {
                self.contents = Contents::Failed;
                self.notices.transient(
                    NoticeLevel::Error,
                    format!("Unable to pull message: {}", err.reason()),
                    now,
                );
            }
        }
    }

    fn learned(&mut self, classification: Classification, result: Result<SpamReport>, now: Instant) {
        self.dirty = true;
        match result {
            Ok(report) => {
                let accepted = report.requests.iter().filter(|r| r.succeeded()).count();
                let mut text = format!("Successfully reported as {classification}.");
                if !report.requests.is_empty() {
                    let _ = write!(
                        text,
                        " {accepted} of {} upstreams accepted.",
                        report.requests.len()
                    );
                }
                self.notices.transient(NoticeLevel::Success, text, now);
            }
            Err(err) => {
                let mut text = format!("Unable to report {classification}: {}", err.reason());
                if let Error::Api(ApiError::ReportRejected { report, .. }) = &err {
                    let failures: Vec<String> = report
                        .requests
                        .iter()
                        .filter(|attempt| !attempt.succeeded())
                        .map(|attempt| {
                            format!(
                                "{}: {}",
                                attempt.url,
                                attempt.error.as_deref().unwrap_or("no reason given")
                            )
                        })
                        .collect();
                    let _ = write!(text, " ({})", failures.join("; "));
                }
                self.notices.transient(NoticeLevel::Error, text, now);
            }
        }
    }

    fn step(&mut self, step: Step) -> Vec<Request> {
        match self.list.step_target(step) {
            Some(index) => self.activate_row(index),
            None => Vec::new(),
        }
    }

    fn select_row(&mut self, index: usize, now: Instant) -> Vec<Request> {
        if index >= self.list.len() {
            self.notices.transient(
                NoticeLevel::Error,
                format!("There is no row {}.", index + 1),
                now,
            );
            return Vec::new();
        }
        self.activate_row(index)
    }

    fn activate_row(&mut self, index: usize) -> Vec<Request> {
        let Some(entry) = self.list.get(index).cloned() else {
            return Vec::new();
        };
        self.list.activate(&entry.uuid);
        self.keep_active_visible();
        if self.selected_uuid() == Some(entry.uuid.as_str()) {
            return Vec::new();
        }
        self.select(entry)
    }

    fn select(&mut self, entry: MessageEntry) -> Vec<Request> {
        self.selected = Some(entry);
        self.load_selected_view().into_iter().collect()
    }

    fn load_selected_view(&mut self) -> Option<Request> {
        let entry = self.selected.as_ref()?;
        self.view = self.view.resolve(entry, self.settings.logs);
        self.contents = Contents::Loading;
        self.contents_scroll = 0;
        Some(Request::LoadSource {
            uuid: entry.uuid.clone(),
            view: self.view,
        })
    }

    fn switch_view(&mut self, view: SourceView, now: Instant) -> Vec<Request> {
        let Some(entry) = &self.selected else {
            self.select_first_notice(now);
            return Vec::new();
        };
        if !view.is_available(entry, self.settings.logs) {
            self.notices.transient(
                NoticeLevel::Info,
                format!("The {view} view is not available for this message."),
                now,
            );
            return Vec::new();
        }
        if view == self.view && !matches!(self.contents, Contents::Failed) {
            return Vec::new();
        }
        self.view = view;
        self.load_selected_view().into_iter().collect()
    }

    fn scroll_contents(&mut self, pages: i32) {
        let page = usize::from(self.layout.contents_height());
        let pages_abs = usize::try_from(pages.unsigned_abs()).unwrap_or(usize::MAX);
        let distance = page.saturating_mul(pages_abs);
        let last = self.contents.line_count().saturating_sub(page);
        self.contents_scroll = if pages < 0 {
            self.contents_scroll.saturating_sub(distance)
        } else {
            self.contents_scroll.saturating_add(distance).min(last)
        };
    }

    fn ask_to_report(&mut self, classification: Classification, now: Instant) {
        if !self.settings.spam_reporting {
            self.notices.transient(
                NoticeLevel::Info,
                "Spam reporting is disabled on this server.",
                now,
            );
            return;
        }
        if self.selected.is_none() {
            self.select_first_notice(now);
            return;
        }
        self.pending_report = Some(classification);
        self.notices
            .sticky(NoticeLevel::Info, report_prompt(classification));
    }

    fn keep_prompt_visible(&mut self) {
        let Some(classification) = self.pending_report else {
            return;
        };
        let prompt = report_prompt(classification);
        if self.notices.current().is_none_or(|notice| notice.text != prompt) {
            self.notices.sticky(NoticeLevel::Info, prompt);
            self.dirty = true;
        }
    }

    fn confirm(&mut self, yes: bool, now: Instant) -> Vec<Request> {
        let Some(classification) = self.pending_report.take() else {
            self.notices
                .transient(NoticeLevel::Info, "Nothing to confirm.", now);
            return Vec::new();
        };
        let uuid = match self.selected_uuid() {
            Some(uuid) if yes => uuid.to_string(),
            _ => {
                self.notices
                    .transient(NoticeLevel::Info, "Report cancelled.", now);
                return Vec::new();
            }
        };
        self.notices.sticky(
            NoticeLevel::Info,
            format!("Reporting as {classification}..."),
        );
        vec![Request::Learn {
            uuid,
            classification,
        }]
    }

    fn select_first_notice(&mut self, now: Instant) {
        self.notices
            .transient(NoticeLevel::Info, "Select a message first.", now);
    }

    fn keep_active_visible(&mut self) {
        if let Some(index) = self.list.active() {
            self.layout.ensure_visible(index, self.list.len());
        } else {
            let total = self.list.len();
            let first = self.layout.scroll().min(total.saturating_sub(1));
            self.layout.ensure_visible(first, total);
        }
    }

    fn selected_uuid(&self) -> Option<&str> {
        self.selected.as_ref().map(|entry| entry.uuid.as_str())
    }
}

fn report_prompt(classification: Classification) -> String {
    format!("Are you sure you want to report as {classification}? [y/n]")
}
