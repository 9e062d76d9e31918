//! adminboard TUI entry point.

use adminboard_tui::api_client::RestClient;
use adminboard_tui::config::AdminConfig;
use adminboard_tui::error::TuiError;
use adminboard_tui::events::TuiEvent;
use adminboard_tui::logging;
use adminboard_tui::persistence::FileStore;
use adminboard_tui::source::{build_sources, HierarchySource};
use adminboard_tui::state::App;
use adminboard_tui::tasks;
use adminboard_tui::views::render_view;
use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = AdminConfig::load()?;
    logging::init(&config.log_path)?;
    tracing::info!(
        api_base_url = %config.api_base_url,
        role = %config.user_role,
        resources = config.resources.len(),
        "Starting adminboard"
    );

    let client = RestClient::new(&config)?;
    let sources = build_sources(&config, &client)?;
    let hierarchy = HierarchySource::from_config(&config.hierarchy, &client);
    let store = FileStore::open_or_empty(&config.state_path);
    let tick_rate = Duration::from_millis(config.tick_rate_ms);

    let mut app = App::new(config, sources, Box::new(store));

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    spawn_input_reader(event_tx.clone());

    let initial = app.initial_effects();
    tasks::spawn_all(&app, initial, &hierarchy, &event_tx);

    let mut ticker = tokio::time::interval(tick_rate);

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => {
                let _ = event_tx.try_send(TuiEvent::Tick);
            }
            Some(event) = event_rx.recv() => {
                let effects = app.apply_event(event);
                tasks::spawn_all(&app, effects, &hierarchy, &event_tx);
            }
        }

        if app.should_quit {
            break;
        }
    }

    app.persist_active_target();
    tracing::info!("Shutting down adminboard");
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            match event::read() {
                Ok(CrosstermEvent::Key(key)) => {
                    if sender.blocking_send(TuiEvent::Input(key)).is_err() {
                        return;
                    }
                }
                Ok(CrosstermEvent::Resize(width, height)) => {
                    if sender
                        .blocking_send(TuiEvent::Resize { width, height })
                        .is_err()
                    {
                        return;
                    }
                }
                _ => {}
            }
        }
    });
}
