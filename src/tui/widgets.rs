use std::collections::HashMap;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, ListItem, Paragraph},
};

use crate::characters::{Character, CharacterId};
use crate::picker::highlight::highlight;
use crate::picker::selection::Selection;

/// Lines taken by one character row.
pub const ROW_HEIGHT: usize = 2;
/// Lines taken by the end-of-list marker.
pub const SENTINEL_HEIGHT: usize = 1;

const AVATAR_COLORS: &[Color] = &[
    Color::Green,
    Color::Cyan,
    Color::Magenta,
    Color::Blue,
    Color::Yellow,
    Color::Red,
];

/// Two-letter badge standing in for the avatar image
pub fn avatar_initials(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().find(|c| c.is_alphanumeric()))
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if initials.is_empty() {
        "?".to_string()
    } else {
        initials
    }
}

fn avatar_color(id: CharacterId) -> Color {
    AVATAR_COLORS[(id as usize) % AVATAR_COLORS.len()]
}

/// Render one character row: checkbox, avatar, highlighted name and episode count.
pub fn render_character_row(
    character: &Character,
    is_selected: bool,
    is_focused: bool,
    search: &str,
) -> ListItem<'static> {
    let prefix = if is_focused { "> " } else { "  " };
    let checkbox = if is_selected { "[x] " } else { "[ ] " };
    let base = if is_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let matched = base.add_modifier(Modifier::BOLD).fg(Color::LightYellow);

    let mut name_line = vec![
        Span::styled(prefix, base.add_modifier(Modifier::BOLD)),
        Span::styled(
            checkbox,
            if is_selected {
                base.fg(Color::Green)
            } else {
                base
            },
        ),
        Span::styled(
            format!(" {:<2} ", avatar_initials(&character.name)),
            Style::default()
                .fg(Color::Black)
                .bg(avatar_color(character.id)),
        ),
        Span::raw(" "),
    ];
    name_line.extend(highlight(&character.name, search).into_iter().map(|fragment| {
        Span::styled(
            fragment.text.to_string(),
            if fragment.emphasized { matched } else { base },
        )
    }));

    let episodes = Line::from(Span::styled(
        format!("            {} Episodes", character.episode_count()),
        Style::default().fg(Color::DarkGray),
    ));

    ListItem::new(vec![Line::from(name_line), episodes])
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RowProps {
    character: Character,
    is_selected: bool,
    is_focused: bool,
    search: String,
}

/// Rendered rows keyed by character id, rebuilt only when a row's own props change.
#[derive(Debug, Default)]
pub struct RowCache {
    rows: HashMap<CharacterId, (RowProps, ListItem<'static>)>,
    #[cfg(test)]
    builds: usize,
}

impl RowCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(
        &mut self,
        character: &Character,
        is_selected: bool,
        is_focused: bool,
        search: &str,
    ) -> ListItem<'static> {
        if let Some((props, item)) = self.rows.get(&character.id) {
            if props.character == *character
                && props.is_selected == is_selected
                && props.is_focused == is_focused
                && props.search == search
            {
                return item.clone();
            }
        }

        #[cfg(test)]
        {
            self.builds += 1;
        }
        let item = render_character_row(character, is_selected, is_focused, search);
        let props = RowProps {
            character: character.clone(),
            is_selected,
            is_focused,
            search: search.to_string(),
        };
        self.rows.insert(character.id, (props, item.clone()));
        item
    }

    /// Forget rows for characters no longer in the list.
    pub fn retain(&mut self, rows: &[Character]) {
        self.rows
            .retain(|id, _| rows.iter().any(|character| character.id == *id));
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Chips for the selected characters, the chip under the cursor highlighted.
pub fn chip_line(selection: &Selection, cursor: Option<usize>) -> Line<'static> {
    let mut spans = Vec::new();
    for (index, character) in selection.iter().enumerate() {
        let style = if cursor == Some(index) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ✕ ", character.name), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

/// How many lines the chips wrap to at `width`.
pub fn chip_rows(selection: &Selection, width: u16) -> u16 {
    if selection.is_empty() || width == 0 {
        return 0;
    }
    let mut rows = 1u16;
    let mut used = 0usize;
    for character in selection.iter() {
        // " name ✕ " plus the gap
        let chip = character.name.chars().count() + 5;
        if used > 0 && used + chip > width as usize {
            rows += 1;
            used = 0;
        }
        used += chip;
    }
    rows
}

/// Render the retry button shown under a failed load
pub fn render_retry_button(frame: &mut Frame, area: Rect, is_focused: bool) {
    let style = if is_focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let button = Paragraph::new(Span::styled(" Try Again ", style))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(style));
    frame.render_widget(button, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character(id: CharacterId, name: &str) -> Character {
        Character {
            id,
            name: name.to_string(),
            image: String::new(),
            episode: vec!["e1".to_string(); 51],
        }
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_avatar_initials() {
        assert_eq!(avatar_initials("Rick Sanchez"), "RS");
        assert_eq!(avatar_initials("Mr. Poopybutthole"), "MP");
        assert_eq!(avatar_initials("Abradolf Lincler Jr"), "AL");
        assert_eq!(avatar_initials("   "), "?");
    }

    #[test]
    fn test_row_cache_rebuilds_only_on_prop_change() {
        let rick = character(1, "Rick Sanchez");
        let mut cache = RowCache::new();

        cache.row(&rick, false, false, "ri");
        cache.row(&rick, false, false, "ri");
        assert_eq!(cache.builds, 1);

        cache.row(&rick, true, false, "ri");
        assert_eq!(cache.builds, 2);
        cache.row(&rick, true, true, "ri");
        assert_eq!(cache.builds, 3);
        cache.row(&rick, true, true, "ric");
        assert_eq!(cache.builds, 4);

        let mut renamed = rick.clone();
        renamed.name = "Rick C-137".to_string();
        cache.row(&renamed, true, true, "ric");
        assert_eq!(cache.builds, 5);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_row_cache_retain_drops_missing_rows() {
        let mut cache = RowCache::new();
        let rick = character(1, "Rick");
        let morty = character(2, "Morty");
        cache.row(&rick, false, false, "");
        cache.row(&morty, false, false, "");

        cache.retain(std::slice::from_ref(&morty));

        assert_eq!(cache.len(), 1);
        cache.row(&morty, false, false, "");
        assert_eq!(cache.builds, 2);
    }

    #[test]
    fn test_chip_line_lists_selection_in_order() {
        let mut selection = Selection::new();
        selection.toggle(&character(1, "Rick"));
        selection.toggle(&character(2, "Morty"));

        let text = line_text(&chip_line(&selection, Some(1)));
        assert_eq!(text, " Rick ✕   Morty ✕  ");
    }

    #[test]
    fn test_chip_rows_wraps() {
        let mut selection = Selection::new();
        assert_eq!(chip_rows(&selection, 20), 0);

        selection.toggle(&character(1, "Rick"));
        selection.toggle(&character(2, "Morty"));
        assert_eq!(chip_rows(&selection, 40), 1);
        assert_eq!(chip_rows(&selection, 12), 2);
    }

    #[test]
    fn test_render_row_renders_into_buffer() {
        let backend = ratatui::backend::TestBackend::new(40, 2);
        let mut terminal = Terminal::new(backend).unwrap();
        let rick = character(1, "Rick Sanchez");

        terminal
            .draw(|frame| {
                let list = ratatui::widgets::List::new(vec![render_character_row(
                    &rick, true, true, "rick",
                )]);
                frame.render_widget(list, frame.area());
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let first_line: String = (0..40u16)
            .map(|x| buffer[(x, 0u16)].symbol().to_string())
            .collect();
        let second_line: String = (0..40u16)
            .map(|x| buffer[(x, 1u16)].symbol().to_string())
            .collect();
        assert!(first_line.starts_with("> [x]  RS  Rick Sanchez"));
        assert!(second_line.contains("51 Episodes"));
        assert!(
            buffer[(12u16, 0u16)]
                .modifier
                .contains(Modifier::BOLD)
        );
    }
}
