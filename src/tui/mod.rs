pub mod app;
pub mod event;
pub mod input;
pub mod ui;
pub mod widgets;

use std::sync::Arc;

use crate::characters::Character;
use crate::picker::Picker;
use crate::ports::characters::CharacterSource;
use color_eyre::Result;

/// Main entry point for the TUI
///
/// Returns the confirmed selection, or `None` when the user aborted.
pub async fn run(
    source: Arc<dyn CharacterSource>,
    picker: Picker,
) -> Result<Option<Vec<Character>>> {
    use crossterm::{
        event::{DisableMouseCapture, EnableMouseCapture},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    };
    use ratatui::prelude::*;
    use std::io;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = app::App::new(picker, event::EventHandler::new(source));
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result.map(|()| app.into_selection())
}
