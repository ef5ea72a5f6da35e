use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use termfolio_core::{AppConfig, Page, Session};
use termfolio_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::{handle_key_event, handle_mouse_event, Action},
    load_theme, widgets,
};

pub async fn run(config: Arc<AppConfig>, page: Page) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle(&config.ui.title))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &config, page).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &AppConfig,
    page: Page,
) -> Result<()> {
    let theme = load_theme(&config.ui.colors);
    let session = Session::new(page, config, Instant::now());
    let mut app = App::new(session, theme, config.ui.title.clone());

    let size = terminal.size()?;
    app.resize(Rect::new(0, 0, size.width, size.height));

    // Terminal input is read on a blocking thread and forwarded here
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();
    let reader = spawn_event_reader(config.ui.tick_rate_ms, event_tx);

    let idle = Duration::from_millis(config.ui.tick_rate_ms.max(1));
    info!("TUI started");

    loop {
        app.tick(Instant::now());
        terminal.draw(|frame| widgets::draw(frame, &app))?;

        // Sleep until the next animation step unless input arrives first
        let deadline = app
            .next_deadline()
            .unwrap_or_else(|| Instant::now() + idle);
        tokio::select! {
            event = event_rx.recv() => match event {
                Some(event) => handle_event(&mut app, event),
                None => break,
            },
            _ = tokio::time::sleep_until(deadline.into()) => {}
        }

        // Process any other pending input (non-blocking)
        while let Ok(event) = event_rx.try_recv() {
            handle_event(&mut app, event);
        }

        if app.should_quit {
            break;
        }
    }

    // Closing the channel stops the reader within one poll
    drop(event_rx);
    if let Err(e) = reader.await {
        warn!("Event reader ended abnormally: {}", e);
    }
    info!("TUI stopped");

    Ok(())
}

/// Forward terminal events until the receiver goes away
fn spawn_event_reader(tick_rate_ms: u64, tx: mpsc::UnboundedSender<AppEvent>) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let handler = EventHandler::new(tick_rate_ms);
        while !tx.is_closed() {
            match handler.next() {
                Ok(Some(AppEvent::Tick)) | Ok(None) => {}
                Ok(Some(event)) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read terminal event: {}", e);
                    break;
                }
            }
        }
    })
}

fn handle_event(app: &mut App, event: AppEvent) {
    let now = Instant::now();
    match event {
        AppEvent::Key(key) => handle_action(app, handle_key_event(key), now),
        AppEvent::Mouse(mouse) => handle_action(app, handle_mouse_event(mouse), now),
        AppEvent::Resize(width, height) => app.resize(Rect::new(0, 0, width, height)),
        AppEvent::Tick => {}
    }
}

fn handle_action(app: &mut App, action: Action, now: Instant) {
    match action {
        Action::Quit => app.should_quit = true,
        Action::ScrollUp => app.scroll_by(-1),
        Action::ScrollDown => app.scroll_by(1),
        Action::ScrollBy(delta) => app.scroll_by(delta),
        Action::ScrollPageUp => app.scroll_page_up(),
        Action::ScrollPageDown => app.scroll_page_down(),
        Action::JumpToTop => app.jump_to_top(),
        Action::JumpToBottom => app.jump_to_bottom(),
        Action::NextCommand => app.select_next(),
        Action::PrevCommand => app.select_prev(),
        Action::Toggle => {
            if app.selected.is_none() {
                app.set_status("Select a command with Tab first");
            } else {
                app.toggle_selected(now);
            }
        }
        Action::ToggleNth(index) => {
            if index < app.command_count() {
                app.toggle(index, now);
            } else {
                app.set_status(format!("No command {}", index + 1));
            }
        }
        Action::Click { column, row } => app.click(column, row, now),
        Action::None => {}
    }
}
