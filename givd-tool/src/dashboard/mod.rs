mod app;
mod input;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

pub use app::DashboardApp;

use crate::error::GivdError;
use crate::store::AnyStore;
use givd_core::StockSyncController;

pub async fn run(controller: StockSyncController<AnyStore>) -> Result<(), GivdError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = DashboardApp::new(controller);

    // Run event loop
    let result = run_loop(&mut terminal, &mut app).await;

    // Return the change-feed channel to the store before tearing the
    // terminal down.
    app.shutdown().await;

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
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut DashboardApp,
) -> Result<(), GivdError> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Poll for input with a timeout so in-flight store calls and the
        // change feed keep getting serviced.
        if event::poll(Duration::from_millis(50))? {
            let event = event::read()?;
            input::handle_event(app, event);
        }

        app.poll();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
