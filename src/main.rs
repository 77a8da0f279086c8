use anyhow::{bail, Result};
use cadence::app::cli::Args;
use cadence::app::config::AppConfig;
use cadence::app::events::AppEvent;
use cadence::app::{inputs, logging, App, ConnectionStatus};
use cadence::lyrics::{fetch_for_track, LyricsFetcher};
use cadence::player::Ticker;
use cadence::remote::{queue_socket_url, spawn_connection};
use cadence::session::{LyricsRequest, Session};
use cadence::{theme, ui};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

type Term = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    human_panic::setup_panic!();
    let args = Args::parse();

    if args.generate_config {
        print!("{}", AppConfig::generate_default()?);
        return Ok(());
    }

    let _log_guard = logging::init(&AppConfig::get_log_dir())?;

    let config = AppConfig::merge_args(AppConfig::load(), &args);
    let Some(queue_id) = config.queue_id.clone() else {
        bail!(
            "no queue to follow: pass a QUEUE_ID or set queue_id in {}",
            AppConfig::get_config_path().display()
        );
    };
    let url = queue_socket_url(&config.server_url, &queue_id);
    tracing::info!(%url, latency_buffer_ms = config.latency_buffer_ms, "starting");

    print!("\x1b]2;Cadence\x07");

    let (tx, mut rx) = mpsc::channel(256);
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let ticker = Ticker::new(config.tick_interval(), tx.clone());
    let session = Session::new(config.session(), ticker, command_tx);
    let mut app = App::new(&config, &queue_id, theme::load_current_theme(), session);

    // One HTTP client for every lyrics lookup
    let client = reqwest::Client::builder()
        .user_agent(concat!("cadence/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default();
    let fetcher = Arc::new(LyricsFetcher::new(
        client,
        config.lyrics_endpoint.clone(),
        config.lyrics_sources.clone(),
    ));

    let connection = spawn_connection(url, tx.clone(), command_rx);

    // 1. Input Event Task
    let tx_input = tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        while let Some(Ok(event)) = reader.next().await {
            if tx_input.send(AppEvent::Input(event)).await.is_err() {
                break;
            }
        }
    });

    // 2. Animation Tick Task ⚡
    let tx_tick = tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(33));
        loop {
            interval.tick().await;
            if tx_tick.send(AppEvent::Tick).await.is_err() {
                break;
            }
        }
    });

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run(&mut terminal, &mut app, &mut rx, &tx, &fetcher).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    connection.abort();
    tracing::info!("bye");
    result
}

async fn run(
    terminal: &mut Term,
    app: &mut App,
    rx: &mut mpsc::Receiver<AppEvent>,
    tx: &mpsc::Sender<AppEvent>,
    fetcher: &Arc<LyricsFetcher>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::ui(f, app))?;

        let Some(event) = rx.recv().await else {
            break;
        };
        match event {
            AppEvent::Input(input) => inputs::handle_input(input, app),
            AppEvent::Remote(server_event) => {
                if let Some(request) = app.handle_server_event(server_event) {
                    spawn_lyrics_fetch(fetcher.clone(), request, tx.clone());
                }
            }
            AppEvent::Connected => app.connection = ConnectionStatus::Connected,
            AppEvent::Disconnected(reason) => app.handle_disconnect(reason),
            AppEvent::LyricsFetched(ticket, result) => app.handle_lyrics(ticket, result),
            AppEvent::ClockTick { lease, delta_ms } => {
                app.session.on_clock_tick(lease, delta_ms);
            }
            AppEvent::Tick => app.on_tick(),
        }

        if !app.is_running {
            break;
        }
    }
    Ok(())
}

/// Fetch in the background; the ticket decides whether the result still
/// matters when it lands.
fn spawn_lyrics_fetch(fetcher: Arc<LyricsFetcher>, request: LyricsRequest, tx: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let LyricsRequest { ticket, track } = request;
        tracing::debug!(track_id = %track.id, generation = ticket.generation, "fetching lyrics");
        let result = fetch_for_track(fetcher.as_ref(), &track).await;
        let _ = tx.send(AppEvent::LyricsFetched(ticket, result)).await;
    });
}
