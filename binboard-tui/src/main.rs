//! Terminal dashboard for municipal waste operations: bins, routes, pickups,
//! complaints, and maintenance tickets served by a PostgREST backend.

mod app;
mod chart;
mod input;
mod tasks;
mod ui;

use std::{
    env,
    fs::File,
    io,
    sync::{Arc, Mutex},
    time::Duration as StdDuration,
};

use anyhow::Result;
use binboard_core::{BackendConfig, RestPort, service::BinboardService};
use binboard_postgrest::PostgrestClient;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::{App, Message, Tab};
use crate::input::Action;

/// Names the file log lines are appended to; logging is off when unset.
const LOG_FILE_VAR: &str = "BINBOARD_LOG";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging()?;

    // Backend + service setup
    let config = BackendConfig::from_env();
    let config_problem = config.ensure_configured().err();
    if let Some(problem) = &config_problem {
        warn!(%problem, "backend is not configured");
    }

    let client = Client::builder().user_agent("binboard/0.1").build()?;
    let port: Arc<dyn RestPort> = Arc::new(PostgrestClient::new(client, config));
    let service = Arc::new(BinboardService::new(port));

    // App state
    let mut app = App::new();
    if let Some(problem) = config_problem {
        app.status_message = Some(problem.to_string());
    }

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app, &service).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn init_logging() -> Result<()> {
    let Ok(path) = env::var(LOG_FILE_VAR) else {
        return Ok(());
    };
    let file = File::options().create(true).append(true).open(&path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    info!(%path, "logging started");
    Ok(())
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    service: &Arc<BinboardService>,
) -> Result<()> {
    let (sender, mut receiver): (UnboundedSender<Message>, UnboundedReceiver<Message>) =
        mpsc::unbounded_channel();

    tasks::dispatch(app.activate(Tab::Dashboard), service, &sender);

    loop {
        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Fold in finished background work
        while let Ok(message) = receiver.try_recv() {
            let jobs = app.apply(message);
            tasks::dispatch(jobs, service, &sender);
        }

        // Poll for input (non-blocking, small timeout to keep CPU low)
        let ready = task::block_in_place(|| event::poll(StdDuration::from_millis(100)))?;
        if ready
            && let CEvent::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match input::handle_key_event(key, &mut app) {
                Action::Quit => break,
                Action::None => {}
                Action::Run(jobs) => tasks::dispatch(jobs, service, &sender),
            }
        }
    }

    info!("ui loop finished");
    Ok(())
}
