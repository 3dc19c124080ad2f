//! tabdeck-tui — Terminal front end for the tabdeck widget.
//! Uses Ratatui + Crossterm for rendering.

mod app;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tracing::{info, warn};

use tabdeck_core::config::Config;
use tabdeck_core::profile::ProfileStore;
use tabdeck_core::storage::FileStore;
use tabdeck_core::view::Panel;
use tabdeck_core::weather::OpenMeteo;

use app::App;

const LOG_FILE: &str = "tabdeck-tui.log";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log to a file, not stdout, since we own the terminal
    if let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_FILE)
    {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .try_init();
    }

    let project_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = Config::load_from_dir(&project_root).unwrap_or_else(|e| {
        warn!("Falling back to default config: {:#}", e);
        Config::from_env()
    });

    let store = FileStore::open(&config.storage_path())
        .with_context(|| format!("Failed to open storage in {}", config.data_dir.display()))?;
    let profiles = ProfileStore::new(Arc::new(store));
    let backend = OpenMeteo::new(&config).context("Failed to build HTTP client")?;

    let (mut app, mut event_rx) = App::new(&config, profiles, Arc::new(backend));
    app.bootstrap();

    info!("Starting TUI (data dir {})", config.data_dir.display());

    // Setup terminal
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &mut event_rx).await;

    // Cleanup
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_rx: &mut tokio::sync::mpsc::UnboundedReceiver<tabdeck_core::events::DeskEvent>,
) -> anyhow::Result<()> {
    loop {
        // Draw
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Deferred results (non-blocking)
        while let Ok(event) = event_rx.try_recv() {
            app.handle_event(event);
        }

        // Terminal events
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if app.confirm_clear {
                    let yes = matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'));
                    app.confirm_clear_all(yes);
                    continue;
                }

                match (key.code, key.modifiers) {
                    // Quit
                    (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                        app.should_quit = true;
                    }
                    (KeyCode::Char('q'), KeyModifiers::CONTROL) => {
                        app.should_quit = true;
                    }
                    // Panel switching
                    (KeyCode::Right, KeyModifiers::ALT) => app.view.next(),
                    (KeyCode::Left, KeyModifiers::ALT) => app.view.prev(),
                    (KeyCode::F(n @ 1..=4), _) => {
                        app.view.switch_to(Panel::ALL[usize::from(n) - 1].id());
                    }
                    // Profile actions
                    (KeyCode::Char('t'), KeyModifiers::CONTROL) => app.toggle_theme(),
                    (KeyCode::Char('x'), KeyModifiers::CONTROL) => app.request_clear_all(),
                    (KeyCode::Tab, _) if app.view.is_active(Panel::Profile) => {
                        app.toggle_profile_field();
                    }
                    // Assistant
                    (KeyCode::Char('l'), KeyModifiers::CONTROL) => app.clear_chat(),
                    // Input handling
                    (KeyCode::Enter, _) => app.submit(),
                    (KeyCode::Backspace, _) => app.backspace(),
                    (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => {
                        app.type_char(c);
                    }
                    _ => {}
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
