//! The console event loop.
//!
//! One task owns the [`Console`] and multiplexes stdin lines, channel
//! updates, finished API requests and timers with `tokio::select!`. API
//! requests run on spawned tasks and report back as [`Action`]s.

use super::input::{UserCommand, parse_command};
use super::layout::{DEFAULT_LIST_HEIGHT, FALLBACK_SIZE, Layout};
use super::prefs::ViewPrefs;
use super::render::render;
use super::state::{Action, Console, Request};
use crate::api::{MailLogApi, save_message};
use crate::channel::ChannelClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crossterm::cursor::MoveTo;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{QueueableCommand, style::Print};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval, interval_at};
use tracing::{debug, info, warn};

const HOUSEKEEPING_INTERVAL: Duration = Duration::from_millis(250);
const PROMPT: &str = "> ";

/// Startup options of an interactive session.
#[derive(Debug, Clone, Default)]
pub struct ConsoleOptions {
    /// Initial search text.
    pub query: String,
    /// Message to open on start.
    pub select: Option<String>,
    /// Whether to connect the notification channel.
    pub live: bool,
    /// Where view preferences are kept; `None` disables persistence.
    pub prefs_path: Option<PathBuf>,
}

/// Runs the console until the operator quits or stdin closes.
///
/// # Errors
///
/// Returns an error if the channel URL cannot be built or the terminal
/// cannot be read or written.
pub async fn run(
    api: Arc<dyn MailLogApi>,
    config: &ClientConfig,
    options: ConsoleOptions,
) -> Result<()> {
    let interactive = std::io::stdout().is_terminal();
    let prefs = match options.prefs_path.as_deref() {
        Some(path) => ViewPrefs::load(path).await.unwrap_or_else(|err| {
            warn!(error = %err, "ignoring unreadable view preferences");
            ViewPrefs::default()
        }),
        None => ViewPrefs::default(),
    };

    let (width, height) = if interactive {
        terminal::size().unwrap_or(FALLBACK_SIZE)
    } else {
        FALLBACK_SIZE
    };
    let layout = Layout::new(
        width,
        height,
        prefs.list_height.unwrap_or(DEFAULT_LIST_HEIGHT),
    );
    let mut console = Console::new(layout, config.notice_timeout);

    let (results_tx, mut results) = mpsc::channel::<Action>(64);
    let (updates_tx, mut updates) = mpsc::channel(32);
    let channel_task = if options.live {
        let client = ChannelClient::new(config.channel_url()?, config.reconnect_delay);
        Some(client.spawn(updates_tx))
    } else {
        drop(updates_tx);
        None
    };
    let mut channel_open = channel_task.is_some();

    let mut refresh = interval_at(
        tokio::time::Instant::now() + config.refresh_check_interval,
        config.refresh_check_interval,
    );
    let mut forced = interval_at(
        tokio::time::Instant::now() + config.forced_refresh_interval,
        config.forced_refresh_interval,
    );
    let mut housekeeping = interval(HOUSEKEEPING_INTERVAL);
    for timer in [&mut refresh, &mut forced, &mut housekeeping] {
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();
    info!(server = %config.server, live = options.live, "console started");

    let mut requests = console.start(&options.query, options.select.clone(), options.live);
    loop {
        if !perform(
            requests,
            &api,
            &results_tx,
            options.prefs_path.as_deref(),
        )
        .await
        {
            break;
        }
        if console.take_dirty() {
            draw(&mut stdout, &console, interactive)?;
        }

        let action = tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => input_action(&line),
                None => Action::Input(UserCommand::Quit),
            },
            update = updates.recv(), if channel_open => match update {
                Some(update) => Action::Channel(update),
                None => {
                    channel_open = false;
                    requests = Vec::new();
                    continue;
                }
            },
            Some(action) = results.recv() => action,
            _ = refresh.tick() => Action::RefreshTick,
            _ = forced.tick() => Action::ForcedRefreshTick,
            _ = housekeeping.tick() => Action::Tick,
        };

        let housekeeping_tick = matches!(action, Action::Tick);
        requests = console.handle(action, Instant::now());
        if housekeeping_tick
            && interactive
            && let Ok((width, height)) = terminal::size()
        {
            requests.extend(console.handle(Action::Resized { width, height }, Instant::now()));
        }
    }

    if let Some(task) = channel_task {
        task.abort();
    }
    info!("console stopped");
    Ok(())
}

/// Starts the work for `requests`. Returns `false` when the console must
/// stop.
async fn perform(
    requests: Vec<Request>,
    api: &Arc<dyn MailLogApi>,
    results: &mpsc::Sender<Action>,
    prefs_path: Option<&std::path::Path>,
) -> bool {
    for request in requests {
        match request {
            Request::Quit => return false,
            Request::SavePrefs(prefs) => {
                if let Some(path) = prefs_path
                    && let Err(err) = prefs.save(path).await
                {
                    warn!(error = %err, "could not save view preferences");
                }
            }
            other => spawn_request(Arc::clone(api), other, results.clone()),
        }
    }
    true
}

/// Runs one API request on its own task and reports the outcome.
fn spawn_request(api: Arc<dyn MailLogApi>, request: Request, results: mpsc::Sender<Action>) {
    debug!(?request, "dispatching request");
    tokio::spawn(async move {
        let action = match request {
            Request::LoadConfig => Action::ConfigLoaded(api.config().await),
            Request::LoadList(query) => Action::ListLoaded(api.message_log(&query).await),
            Request::LoadMessage(uuid) => Action::MessageLoaded(api.message(&uuid).await),
            Request::LoadSource { uuid, view } => {
                let result = api.message_source(&uuid, view).await;
                Action::SourceLoaded { uuid, view, result }
            }
            Request::Learn {
                uuid,
                classification,
            } => Action::Learned {
                classification,
                result: api.learn(&uuid, classification).await,
            },
            Request::Download { uuid, path } => {
                let result = save_message(api.as_ref(), &uuid, &path).await;
                Action::Downloaded(result.map(|bytes| (path, bytes)))
            }
            Request::SavePrefs(_) | Request::Quit => return,
        };
        if results.send(action).await.is_err() {
            debug!("console gone, dropping request result");
        }
    });
}

fn input_action(line: &str) -> Action {
    match parse_command(line) {
        Ok(command) => Action::Input(command),
        Err(err) => Action::InvalidInput(err.to_string()),
    }
}

fn draw(out: &mut impl Write, console: &Console, interactive: bool) -> Result<()> {
    let frame = render(console);
    if interactive {
        out.queue(Clear(ClearType::All))?;
        out.queue(MoveTo(0, 0))?;
        out.queue(Print(frame))?;
        out.queue(Print(PROMPT))?;
    } else {
        out.write_all(frame.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}
