use ratatui::{
    layout::Flex,
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::picker::pager::PagerState;
use crate::tui::app::{App, FocusArea};
use crate::tui::widgets::{self, ROW_HEIGHT, SENTINEL_HEIGHT};

/// Most lines the chips may take before the search box.
const MAX_CHIP_ROWS: u16 = 4;

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let chip_rows = widgets::chip_rows(app.picker.selection(), area.width.saturating_sub(2))
        .min(MAX_CHIP_ROWS);
    let indicator_height = if app.picker.error().is_some() { 6 } else { 1 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(chip_rows + 3),    // Chips + search
            Constraint::Min(3),                   // Character list
            Constraint::Length(indicator_height), // Loading / error
            Constraint::Length(1),                // Focused image
            Constraint::Length(1),                // Help text
        ])
        .split(area);

    render_search_box(frame, app, chunks[0], chip_rows);
    render_list(frame, app, chunks[1]);
    render_indicator(frame, app, chunks[2]);

    let image = app
        .picker
        .focused()
        .map(|character| format!("Image: {}", character.image))
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(image).style(Style::default().fg(Color::DarkGray)),
        chunks[3],
    );

    let help = Paragraph::new(help_text(app.focus_area)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[4]);
}

fn help_text(focus_area: FocusArea) -> &'static str {
    match focus_area {
        FocusArea::Chips => "[←→: Move] [Enter/Del: Remove] [Tab: Next] [Esc: Back]",
        FocusArea::Search => {
            "[Type: Search] [↓: List] [Backspace: Edit/Unselect] [Tab: Next] [Esc: Done] [Ctrl-C: Abort]"
        }
        FocusArea::List => "[↑↓: Navigate] [Enter/Space: Toggle] [Tab: Next] [Esc: Search]",
        FocusArea::Retry => "[Enter: Try Again] [Ctrl-R: Retry] [Tab: Next]",
    }
}

fn render_search_box(frame: &mut Frame, app: &App, area: Rect, chip_rows: u16) {
    let focused = matches!(app.focus_area, FocusArea::Chips | FocusArea::Search);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Selected ({})", app.picker.selection().len()))
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(chip_rows), Constraint::Length(1)])
        .split(inner);

    let chip_cursor = (app.focus_area == FocusArea::Chips).then_some(app.chip_cursor);
    let chips = Paragraph::new(widgets::chip_line(app.picker.selection(), chip_cursor))
        .wrap(Wrap { trim: false });
    frame.render_widget(chips, parts[0]);

    let search = app.picker.search();
    let input = if search.is_empty() {
        Paragraph::new("Search characters").style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(search.to_string()).style(if app.focus_area == FocusArea::Search {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        })
    };
    frame.render_widget(input, parts[1]);

    if app.focus_area == FocusArea::Search {
        let column = (search.chars().count() as u16).min(parts[1].width.saturating_sub(1));
        frame.set_cursor_position((parts[1].x + column, parts[1].y));
    }
}

fn render_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let App {
        picker,
        rows,
        list_state,
        focus_area,
        sentinel_visible,
        ..
    } = app;

    let items = picker.items();
    let title = match picker.total_count() {
        Some(total) => format!("Characters ({} of {})", items.len(), total),
        None => format!("Characters ({})", items.len()),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .border_style(if *focus_area == FocusArea::List {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    let inner_height = block.inner(area).height as usize;

    if items.is_empty() && picker.state() == PagerState::LoadedComplete {
        let empty = Paragraph::new("No characters found")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        *sentinel_visible = false;
        return;
    }

    rows.retain(items);
    let list_focused = *focus_area == FocusArea::List;
    let search = picker.search();
    let focused_id = picker.focused().map(|character| character.id);
    let mut list_items: Vec<_> = items
        .iter()
        .map(|character| {
            rows.row(
                character,
                picker.is_selected(character),
                list_focused && focused_id == Some(character.id),
                search,
            )
        })
        .collect();

    // The marker is a blank line after the last row, so the list scrolls it into view.
    let sentinel_present = picker.sentinel_present();
    if sentinel_present {
        list_items.push(ListItem::new(Line::default()));
    }

    let focused_index = picker.focused_index();
    list_state.select(focused_index);
    if sentinel_present && !items.is_empty() && focused_index == Some(items.len() - 1) {
        let offset = list_state.offset().max(tail_offset(items.len(), inner_height));
        *list_state.offset_mut() = offset;
    }

    let list = List::new(list_items).block(block);
    frame.render_stateful_widget(list, area, list_state);

    let rows_below_offset = items.len().saturating_sub(list_state.offset());
    *sentinel_visible =
        sentinel_present && rows_below_offset * ROW_HEIGHT + SENTINEL_HEIGHT <= inner_height;
}

/// Smallest offset at which the last rows and the marker after them fit in `height` lines.
fn tail_offset(row_count: usize, height: usize) -> usize {
    let rows_that_fit = height.saturating_sub(SENTINEL_HEIGHT) / ROW_HEIGHT;
    if rows_that_fit == 0 {
        return row_count.saturating_sub(1);
    }
    row_count.saturating_sub(rows_that_fit)
}

fn render_indicator(frame: &mut Frame, app: &App, area: Rect) {
    match app.picker.state() {
        PagerState::Loading => {
            let loading = Paragraph::new("Loading characters…")
                .alignment(Alignment::Center)
                .style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::ITALIC),
                );
            frame.render_widget(loading, area);
        }
        PagerState::Error => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Length(3)])
                .split(area);

            let error_text = app.picker.error().unwrap_or("Unknown error");
            let error_para = Paragraph::new(error_text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Error")
                        .border_style(Style::default().fg(Color::Red)),
                )
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true });
            frame.render_widget(error_para, chunks[0]);

            let button_area = Layout::horizontal([Constraint::Length(17)])
                .flex(Flex::Center)
                .split(chunks[1])[0];
            widgets::render_retry_button(frame, button_area, app.focus_area == FocusArea::Retry);
        }
        PagerState::LoadedComplete if !app.picker.items().is_empty() => {
            let done = Paragraph::new("All characters loaded")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(done, area);
        }
        _ => {}
    }
}
