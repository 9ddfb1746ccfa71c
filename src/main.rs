//! Teachers Admin - terminal console for managing teacher records
//!
//! Connects to the backend, loads teachers and subjects, and runs the
//! interactive Teachers page until the user quits.

use std::io;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info};

use teachers_admin::application::{App, Completion, ThreadExecutor};
use teachers_admin::infrastructure::{init_logging, HttpApi};
use teachers_admin::presentation::{render_ui, InputHandler};

mod cli;

use cli::Cli;

/// How long to wait for a key before checking for finished backend calls.
const TICK: Duration = Duration::from_millis(50);

/// Entry point for the Teachers console.
///
/// # Errors
///
/// Returns an error if logging, the HTTP client or the terminal cannot be
/// set up.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_config())?;

    let api = Arc::new(HttpApi::new(&cli.api_url)?);
    info!(api_url = api.base_url(), "starting teachers console");

    let (executor, completions) = ThreadExecutor::new();
    let mut app = App::new(api, Rc::new(executor));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &completions);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "terminal loop failed");
        println!("{err:?}");
    }

    Ok(())
}

/// Main event loop.
///
/// Draws a frame, waits briefly for a key press, then applies every backend
/// call that has finished in the meantime.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    completions: &Receiver<Completion>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && InputHandler::handle_key_event(app, key.code, key.modifiers)
                {
                    info!("quitting");
                    return Ok(());
                }
            }
        }

        while let Ok(completion) = completions.try_recv() {
            app.handle_completion(completion);
        }
    }
}
