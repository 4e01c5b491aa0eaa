use std::time::Instant;

use color_eyre::Result;
use crossterm::event::{KeyEvent, MouseEvent};

use crate::tui::app::{App, FocusArea};

/// Rows skipped by PageUp / PageDown.
const PAGE_ROWS: usize = 10;

pub fn handle_key_event(app: &mut App, key: crossterm::event::KeyEvent) -> Result<()> {
    use crossterm::event::{KeyCode, KeyModifiers};

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.quit();
            Ok(())
        }
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.retry();
            Ok(())
        }
        KeyCode::Tab => {
            app.focus_next_area();
            Ok(())
        }
        KeyCode::BackTab => {
            app.focus_prev_area();
            Ok(())
        }
        _ => match app.focus_area {
            FocusArea::Chips => handle_chips_input(app, key),
            FocusArea::Search => handle_search_input(app, key),
            FocusArea::List => handle_list_input(app, key),
            FocusArea::Retry => handle_retry_input(app, key),
        },
    }
}

pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> Result<()> {
    use crossterm::event::MouseEventKind;

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            app.set_focus_area(FocusArea::List);
            app.picker.focus_next();
        }
        MouseEventKind::ScrollUp => {
            app.set_focus_area(FocusArea::List);
            app.picker.focus_prev();
        }
        _ => {}
    }
    Ok(())
}

fn handle_search_input(app: &mut App, key: KeyEvent) -> Result<()> {
    use crossterm::event::{KeyCode, KeyModifiers};

    match key.code {
        KeyCode::Esc => {
            app.confirm();
        }
        KeyCode::Down | KeyCode::Enter => {
            app.set_focus_area(FocusArea::List);
        }
        KeyCode::Left if app.picker.search().is_empty() && !app.picker.selection().is_empty() => {
            app.set_focus_area(FocusArea::Chips);
        }
        KeyCode::Backspace => {
            app.picker.backspace(Instant::now());
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.picker.push_char(c, Instant::now());
        }
        _ => {}
    }
    Ok(())
}

fn handle_list_input(app: &mut App, key: KeyEvent) -> Result<()> {
    use crossterm::event::KeyCode;

    match key.code {
        KeyCode::Esc => {
            app.set_focus_area(FocusArea::Search);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if app.picker.focused_index() == Some(0) {
                app.set_focus_area(FocusArea::Search);
            } else {
                app.picker.focus_prev();
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.picker.focus_next();
        }
        KeyCode::PageUp => {
            for _ in 0..PAGE_ROWS {
                if !app.picker.focus_prev() {
                    break;
                }
            }
        }
        KeyCode::PageDown => {
            for _ in 0..PAGE_ROWS {
                if !app.picker.focus_next() {
                    break;
                }
            }
        }
        KeyCode::Home => {
            app.picker.focus_first();
        }
        KeyCode::End => while app.picker.focus_next() {},
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.picker.toggle_focused();
        }
        _ => {}
    }
    Ok(())
}

fn handle_chips_input(app: &mut App, key: KeyEvent) -> Result<()> {
    use crossterm::event::KeyCode;

    match key.code {
        KeyCode::Left => {
            app.chip_cursor = app.chip_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            if app.chip_cursor + 1 < app.picker.selection().len() {
                app.chip_cursor += 1;
            } else {
                app.set_focus_area(FocusArea::Search);
            }
        }
        KeyCode::Enter | KeyCode::Delete | KeyCode::Backspace => {
            app.remove_chip_at_cursor();
        }
        KeyCode::Esc | KeyCode::Down => {
            app.set_focus_area(FocusArea::Search);
        }
        _ => {}
    }
    Ok(())
}

fn handle_retry_input(app: &mut App, key: KeyEvent) -> Result<()> {
    use crossterm::event::KeyCode;

    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.retry();
        }
        KeyCode::Esc | KeyCode::Up => {
            app.set_focus_area(FocusArea::List);
        }
        _ => {}
    }
    Ok(())
}
