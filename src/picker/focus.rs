use crate::characters::{Character, CharacterId};

/// Keyboard focus over the picker's own rows.
///
/// Focus is remembered by character id, so it stays on the same character when rows are
/// appended and is dropped back to the first row when that character leaves the list.
#[derive(Debug, Clone, Default)]
pub struct RowFocus {
    focused: Option<CharacterId>,
}

impl RowFocus {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn focused(&self) -> Option<CharacterId> {
        self.focused
    }

    /// Position of the focused row in `rows`.
    pub fn index_in(&self, rows: &[Character]) -> Option<usize> {
        let id = self.focused?;
        rows.iter().position(|row| row.id == id)
    }

    /// The focused character, if it is still one of `rows`.
    pub fn focused_in<'a>(&self, rows: &'a [Character]) -> Option<&'a Character> {
        self.index_in(rows).map(|index| &rows[index])
    }

    /// Move to the next row. Stays on the last row. Returns whether focus changed.
    pub fn next(&mut self, rows: &[Character]) -> bool {
        match self.index_in(rows) {
            Some(index) if index + 1 < rows.len() => self.set(rows[index + 1].id),
            Some(_) => false,
            None => self.first(rows),
        }
    }

    /// Move to the previous row. Stays on the first row. Returns whether focus changed.
    pub fn prev(&mut self, rows: &[Character]) -> bool {
        match self.index_in(rows) {
            Some(index) if index > 0 => self.set(rows[index - 1].id),
            Some(_) => false,
            None => self.first(rows),
        }
    }

    pub fn first(&mut self, rows: &[Character]) -> bool {
        match rows.first() {
            Some(row) => self.set(row.id),
            None => {
                self.focused = None;
                false
            }
        }
    }

    fn set(&mut self, id: CharacterId) -> bool {
        let changed = self.focused != Some(id);
        self.focused = Some(id);
        changed
    }
}
