use crate::characters::{Character, CharacterId};

/// Characters the user picked, in the order they were picked. Unique by id.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    items: Vec<Character>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes the character if it is selected, appends it otherwise.
    pub fn toggle(&mut self, character: &Character) {
        if self.contains(character.id) {
            self.remove(character.id);
        } else {
            self.items.push(character.clone());
        }
    }

    pub fn remove(&mut self, id: CharacterId) {
        self.items.retain(|selected| selected.id != id);
    }

    pub fn is_selected(&self, character: &Character) -> bool {
        self.contains(character.id)
    }

    pub fn contains(&self, id: CharacterId) -> bool {
        self.items.iter().any(|selected| selected.id == id)
    }

    /// Removes the most recently picked character.
    pub fn pop_last(&mut self) -> Option<Character> {
        self.items.pop()
    }

    pub fn get(&self, index: usize) -> Option<&Character> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Character> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character(id: CharacterId, name: &str) -> Character {
        Character {
            id,
            name: name.to_string(),
            image: format!("https://example.com/{id}.jpeg"),
            episode: vec![],
        }
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let rick = character(1, "Rick Sanchez");
        let mut selection = Selection::new();

        selection.toggle(&rick);
        assert!(selection.is_selected(&rick));

        selection.toggle(&rick);
        assert!(!selection.is_selected(&rick));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_no_duplicate_ids_regardless_of_order() {
        let ids = [1, 2, 1, 3, 2, 2, 3, 1, 4];
        let mut selection = Selection::new();

        for id in ids {
            selection.toggle(&character(id, "x"));
            let mut seen: Vec<_> = selection.iter().map(|c| c.id).collect();
            let before = seen.len();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), before);
        }

        // 1 toggled three times, 2 three times, 3 twice, 4 once.
        let remaining: Vec<_> = selection.iter().map(|c| c.id).collect();
        assert_eq!(remaining, vec![2, 1, 4]);
    }

    #[test]
    fn test_identity_is_by_id_not_by_value() {
        let mut selection = Selection::new();
        selection.toggle(&character(5, "Morty"));
        assert!(selection.is_selected(&character(5, "Morty Smith")));

        selection.toggle(&character(5, "Morty Smith"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_remove_and_pop_last() {
        let mut selection = Selection::new();
        selection.toggle(&character(1, "A"));
        selection.toggle(&character(2, "B"));
        selection.toggle(&character(3, "C"));

        selection.remove(2);
        assert_eq!(selection.len(), 2);
        assert!(!selection.contains(2));

        assert_eq!(selection.pop_last().map(|c| c.id), Some(3));
        assert_eq!(selection.get(0).map(|c| c.id), Some(1));
        assert_eq!(selection.len(), 1);
    }
}
