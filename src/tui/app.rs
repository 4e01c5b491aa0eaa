use std::time::Instant;

use color_eyre::Result;
use ratatui::widgets::ListState;

use crate::characters::Character;
use crate::picker::{PageRequest, Picker};
use crate::tui::event::{
    AppEvent, BackgroundEvent, BackgroundRequest, Event, EventHandler, PageEvent,
};
use crate::tui::input::{handle_key_event, handle_mouse_event};
use crate::tui::widgets::RowCache;

/// Part of the screen receiving key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusArea {
    Chips,
    Search,
    List,
    Retry,
}

pub struct App {
    pub picker: Picker,
    pub focus_area: FocusArea,
    /// Chip under the cursor while the chips have focus.
    pub chip_cursor: usize,
    pub list_state: ListState,
    pub rows: RowCache,
    /// Whether the end-of-list marker fit in the list viewport on the last render.
    pub sentinel_visible: bool,

    pub running: bool,
    /// Set when the user accepted the selection rather than aborting.
    pub confirmed: bool,
    /// Event handler.
    pub events: EventHandler,
}

impl App {
    pub fn new(picker: Picker, events: EventHandler) -> Self {
        Self {
            picker,
            focus_area: FocusArea::Search,
            chip_cursor: 0,
            list_state: ListState::default(),
            rows: RowCache::new(),
            sentinel_visible: false,
            running: true,
            confirmed: false,
            events,
        }
    }

    pub async fn run(
        &mut self,
        terminal: &mut ratatui::prelude::Terminal<
            ratatui::prelude::CrosstermBackend<std::io::Stdout>,
        >,
    ) -> Result<()> {
        while self.running {
            // Render
            terminal.draw(|f| crate::tui::ui::render(f, self))?;
            if let Some(request) = self.picker.observe_sentinel(self.sentinel_visible) {
                self.fetch(request);
            }
            self.handle_events()?;
        }

        Ok(())
    }

    /// The selection if it was confirmed, `None` if the user aborted.
    pub fn into_selection(self) -> Option<Vec<Character>> {
        self.confirmed.then(|| self.picker.into_selection())
    }

    pub(crate) fn handle_events(&mut self) -> Result<()> {
        let timeout = self
            .picker
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()));

        if let Some(event) = self.events.next_timeout(timeout)? {
            self.handle_event(event)?;
        }

        if self.picker.tick(Instant::now()) {
            self.on_search_reset();
        }
        self.normalize_focus_area();
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Crossterm(event) => match event {
                crossterm::event::Event::Key(key_event)
                    if key_event.kind == crossterm::event::KeyEventKind::Press =>
                {
                    handle_key_event(self, key_event)?
                }
                crossterm::event::Event::Mouse(mouse_event) => {
                    handle_mouse_event(self, mouse_event)?
                }
                _ => {}
            },
            Event::App(app_event) => match app_event {
                AppEvent::Retry => {
                    if let Some(request) = self.picker.retry() {
                        self.fetch(request);
                    }
                }
            },
            Event::Background(background_event) => match background_event {
                BackgroundEvent::Page(page_event) => match page_event {
                    PageEvent::Loaded { generation, page } => {
                        self.picker.page_loaded(generation, Ok(page));
                    }
                    PageEvent::Failed { generation, error } => {
                        if self.picker.page_loaded(generation, Err(error)) {
                            self.focus_area = FocusArea::Retry;
                        }
                    }
                },
            },
        }
        Ok(())
    }

    fn fetch(&mut self, request: PageRequest) {
        self.events
            .send_background_request(BackgroundRequest::FetchPage(request));
    }

    fn on_search_reset(&mut self) {
        self.list_state = ListState::default();
        self.rows.clear();
        self.sentinel_visible = false;
    }

    /// Keep focus on an area that is actually on screen.
    fn normalize_focus_area(&mut self) {
        let selected = self.picker.selection().len();
        match self.focus_area {
            FocusArea::Chips if selected == 0 => self.focus_area = FocusArea::Search,
            FocusArea::Retry if self.picker.error().is_none() => {
                self.focus_area = FocusArea::Search
            }
            _ => {}
        }
        self.chip_cursor = self.chip_cursor.min(selected.saturating_sub(1));
    }

    /// Areas currently on screen, in Tab order.
    fn focus_areas(&self) -> Vec<FocusArea> {
        let mut areas = Vec::with_capacity(4);
        if !self.picker.selection().is_empty() {
            areas.push(FocusArea::Chips);
        }
        areas.push(FocusArea::Search);
        areas.push(FocusArea::List);
        if self.picker.error().is_some() {
            areas.push(FocusArea::Retry);
        }
        areas
    }

    pub fn focus_next_area(&mut self) {
        let areas = self.focus_areas();
        let index = areas
            .iter()
            .position(|area| *area == self.focus_area)
            .unwrap_or(0);
        self.set_focus_area(areas[(index + 1) % areas.len()]);
    }

    pub fn focus_prev_area(&mut self) {
        let areas = self.focus_areas();
        let index = areas
            .iter()
            .position(|area| *area == self.focus_area)
            .unwrap_or(0);
        self.set_focus_area(areas[(index + areas.len() - 1) % areas.len()]);
    }

    pub fn set_focus_area(&mut self, area: FocusArea) {
        if area == FocusArea::List && self.picker.focused().is_none() {
            self.picker.focus_first();
        }
        if area == FocusArea::Chips && self.focus_area != FocusArea::Chips {
            self.chip_cursor = self.picker.selection().len().saturating_sub(1);
        }
        self.focus_area = area;
    }

    /// Unselect the chip under the cursor.
    pub fn remove_chip_at_cursor(&mut self) {
        if let Some(id) = self.picker.selection().get(self.chip_cursor).map(|c| c.id) {
            self.picker.remove(id);
        }
        self.normalize_focus_area();
    }

    pub fn retry(&mut self) {
        self.events.send(AppEvent::Retry);
    }

    /// Stop and keep the selection.
    pub fn confirm(&mut self) {
        self.confirmed = true;
        self.running = false;
    }

    /// Stop and discard the selection.
    pub fn quit(&mut self) {
        self.running = false;
    }
}
