use serde::{Deserialize, Serialize};
use url::Url;

pub mod client;

pub type CharacterId = u64;

/// A character as returned by `/api/character`.
///
/// Notes
/// - Only the fields the picker displays are kept, everything else the API sends is ignored.
/// - `episode` holds episode URLs; only its length is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub episode: Vec<String>,
}

impl Character {
    pub fn episode_count(&self) -> usize {
        self.episode.len()
    }
}

/// Paging envelope of the character endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub count: Option<u32>,
    /// Next page reference, `null` on the last page.
    #[serde(default)]
    pub next: Option<Url>,
}

/// One page of characters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacterPage {
    #[serde(default)]
    pub info: PageInfo,
    #[serde(default = "Vec::new")]
    pub results: Vec<Character>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_page() {
        let json = r#"{
            "info": {
                "count": 826,
                "pages": 42,
                "next": "https://rickandmortyapi.com/api/character/?page=2",
                "prev": null
            },
            "results": [
                {
                    "id": 1,
                    "name": "Rick Sanchez",
                    "status": "Alive",
                    "species": "Human",
                    "image": "https://rickandmortyapi.com/api/character/avatar/1.jpeg",
                    "episode": [
                        "https://rickandmortyapi.com/api/episode/1",
                        "https://rickandmortyapi.com/api/episode/2"
                    ]
                }
            ]
        }"#;

        let page: CharacterPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.info.count, Some(826));
        assert_eq!(
            page.info.next.as_ref().map(Url::as_str),
            Some("https://rickandmortyapi.com/api/character/?page=2")
        );
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].name, "Rick Sanchez");
        assert_eq!(page.results[0].episode_count(), 2);
    }

    #[test]
    fn test_deserialize_last_page_without_next() {
        let json = r#"{"info": {"count": 1, "pages": 1, "next": null, "prev": null}, "results": []}"#;
        let page: CharacterPage = serde_json::from_str(json).unwrap();
        assert!(page.info.next.is_none());
        assert!(page.results.is_empty());
    }
}
