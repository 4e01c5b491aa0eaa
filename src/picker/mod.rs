//! Headless state of the character picker.
//!
//! [`Picker`] ties the search box, its debounce, the pager, the end-of-list sentinel, row
//! focus and the selection together. It never performs I/O: loads come out as
//! [`PageRequest`]s and their outcomes are fed back through [`Picker::page_loaded`].

pub mod debounce;
pub mod focus;
pub mod highlight;
pub mod pager;
pub mod selection;
pub mod sentinel;

use std::time::{Duration, Instant};

use url::Url;

use crate::characters::{Character, CharacterId, CharacterPage};
use debounce::Debounced;
use focus::RowFocus;
use pager::{Pager, PagerState};
use selection::Selection;
use sentinel::Sentinel;

pub use pager::PageRequest;

#[derive(Debug, Clone)]
pub struct PickerConfig {
    /// URL of the first page, used again on every reset.
    pub first_page: Url,
    /// Query parameter carrying the search text.
    pub search_param: String,
    /// How long the search text must be stable before the list reloads.
    pub debounce: Duration,
}

#[derive(Debug)]
pub struct Picker {
    search: String,
    debounced: Debounced<String>,
    pager: Pager,
    selection: Selection,
    focus: RowFocus,
    sentinel: Sentinel,
}

impl Picker {
    pub fn new(config: PickerConfig) -> Self {
        Self {
            search: String::new(),
            debounced: Debounced::new(String::new(), config.debounce),
            pager: Pager::new(config.first_page, config.search_param),
            selection: Selection::new(),
            focus: RowFocus::new(),
            sentinel: Sentinel::new(),
        }
    }

    /* ---------- Search box ---------- */

    /// The text currently typed in the search box.
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, text: impl Into<String>, now: Instant) {
        self.search = text.into();
        self.debounced.set(self.search.clone(), now);
    }

    pub fn push_char(&mut self, c: char, now: Instant) {
        let mut text = std::mem::take(&mut self.search);
        text.push(c);
        self.set_search(text, now);
    }

    /// Backspace in the search box.
    ///
    /// Deletes the last character, or unselects the most recently selected character when
    /// the search box is already empty.
    pub fn backspace(&mut self, now: Instant) {
        if self.search.is_empty() {
            if let Some(removed) = self.selection.pop_last() {
                log::debug!("Unselected {} ({})", removed.name, removed.id);
            }
            return;
        }
        let mut text = std::mem::take(&mut self.search);
        text.pop();
        self.set_search(text, now);
    }

    /// When the pending search text settles, if it has not already.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounced.deadline()
    }

    /// Advance time. Returns `true` when the settled search text changed and the list was
    /// reset for it.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debounced.poll(now) {
            Some(term) => {
                log::info!("Searching characters for {:?}", term);
                self.pager.reset(term);
                self.sentinel.detach();
                true
            }
            None => false,
        }
    }

    /* ---------- Loading ---------- */

    /// Report whether the end-of-list marker is fully visible after a render.
    ///
    /// Returns the page to fetch when the marker just came into view.
    pub fn observe_sentinel(&mut self, visible: bool) -> Option<PageRequest> {
        if self.sentinel.observe(self.pager.sentinel_active(), visible) {
            self.pager.begin_load()
        } else {
            None
        }
    }

    /// Whether the end-of-list marker is part of the list right now.
    pub fn sentinel_present(&self) -> bool {
        self.pager.sentinel_active()
    }

    /// The manual "try again" after a failed load.
    pub fn retry(&mut self) -> Option<PageRequest> {
        if self.pager.state() != PagerState::Error {
            return None;
        }
        log::info!("Retrying failed page load");
        self.pager.begin_load()
    }

    /// Feed back the outcome of a [`PageRequest`]. Returns whether it was applied.
    pub fn page_loaded(&mut self, generation: u64, outcome: Result<CharacterPage, String>) -> bool {
        let applied = self.pager.complete(generation, outcome);
        if applied {
            // The marker is put back after a load, observe it afresh.
            self.sentinel.detach();
        }
        applied
    }

    pub fn state(&self) -> PagerState {
        self.pager.state()
    }

    pub fn error(&self) -> Option<&str> {
        self.pager.error()
    }

    pub fn items(&self) -> &[Character] {
        self.pager.items()
    }

    pub fn total_count(&self) -> Option<u32> {
        self.pager.total_count()
    }

    /* ---------- Selection ---------- */

    pub fn toggle(&mut self, character: &Character) {
        self.selection.toggle(character);
    }

    /// Toggle the focused row. Returns `false` when no row has focus.
    pub fn toggle_focused(&mut self) -> bool {
        match self.focused().cloned() {
            Some(character) => {
                self.toggle(&character);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: CharacterId) {
        self.selection.remove(id);
    }

    pub fn is_selected(&self, character: &Character) -> bool {
        self.selection.is_selected(character)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn into_selection(self) -> Vec<Character> {
        self.selection.into_vec()
    }

    /* ---------- Row focus ---------- */

    pub fn focus_next(&mut self) -> bool {
        self.focus.next(self.pager.items())
    }

    pub fn focus_prev(&mut self) -> bool {
        self.focus.prev(self.pager.items())
    }

    pub fn focus_first(&mut self) -> bool {
        self.focus.first(self.pager.items())
    }

    pub fn focused(&self) -> Option<&Character> {
        self.focus.focused_in(self.pager.items())
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focus.index_in(self.pager.items())
    }
}
