use url::Url;

use crate::characters::client::page_url;
use crate::characters::{Character, CharacterPage};

/// Message shown to the user whenever a page fails to load.
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching characters";

/// Where the pager is in its load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    /// Nothing loaded yet for the current search, first page not requested.
    Idle,
    /// A page request is in flight.
    Loading,
    /// Some pages loaded, more available.
    LoadedPartial,
    /// Every page for the current search is loaded.
    LoadedComplete,
    /// The last request failed. Only a manual retry loads again.
    Error,
}

/// A page fetch to run, tagged with the generation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    pub url: Url,
}

/// Accumulates pages of characters for one search at a time.
#[derive(Debug, Clone)]
pub struct Pager {
    first_page: Url,
    search_param: String,
    search: String,
    items: Vec<Character>,
    cursor: Option<Url>,
    pending: bool,
    error: Option<String>,
    generation: u64,
    pages_loaded: usize,
    total_count: Option<u32>,
}

impl Pager {
    pub fn new(first_page: Url, search_param: impl Into<String>) -> Self {
        Self {
            cursor: Some(first_page.clone()),
            first_page,
            search_param: search_param.into(),
            search: String::new(),
            items: Vec::new(),
            pending: false,
            error: None,
            generation: 0,
            pages_loaded: 0,
            total_count: None,
        }
    }

    /// Start over for a new search term.
    ///
    /// Clears the list, points the cursor back at the first page and bumps the generation,
    /// so that a response still in flight for the previous term is discarded when it lands.
    pub fn reset(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.items.clear();
        self.cursor = Some(self.first_page.clone());
        self.pending = false;
        self.error = None;
        self.generation += 1;
        self.pages_loaded = 0;
        self.total_count = None;
        log::debug!(
            "Reset pager for search {:?} (generation {})",
            self.search,
            self.generation
        );
    }

    /// Request the next page.
    ///
    /// Returns `None` without touching any state if a request is already in flight or the
    /// last page was reached.
    pub fn begin_load(&mut self) -> Option<PageRequest> {
        if self.pending {
            return None;
        }
        let cursor = self.cursor.as_ref()?;
        let url = page_url(cursor, &self.search_param, &self.search);

        self.error = None;
        self.pending = true;
        log::debug!("Loading page {} (generation {})", url, self.generation);

        Some(PageRequest {
            generation: self.generation,
            url,
        })
    }

    /// Apply the outcome of a request issued by [`Pager::begin_load`].
    ///
    /// Outcomes from an older generation are dropped. Returns whether the outcome was applied.
    pub fn complete(&mut self, generation: u64, outcome: Result<CharacterPage, String>) -> bool {
        if generation != self.generation {
            log::debug!(
                "Discarding page from generation {} (current {})",
                generation,
                self.generation
            );
            return false;
        }

        self.pending = false;
        match outcome {
            Ok(page) => {
                log::debug!(
                    "Loaded {} characters, next page: {:?}",
                    page.results.len(),
                    page.info.next.as_ref().map(Url::as_str)
                );
                self.items.extend(page.results);
                self.cursor = page.info.next;
                self.total_count = page.info.count.or(self.total_count);
                self.pages_loaded += 1;
            }
            Err(error) => {
                log::error!("{}: {}", FETCH_ERROR_MESSAGE, error);
                self.error = Some(FETCH_ERROR_MESSAGE.to_string());
            }
        }
        true
    }

    pub fn state(&self) -> PagerState {
        if self.pending {
            PagerState::Loading
        } else if self.error.is_some() {
            PagerState::Error
        } else if self.pages_loaded == 0 {
            PagerState::Idle
        } else if self.cursor.is_some() {
            PagerState::LoadedPartial
        } else {
            PagerState::LoadedComplete
        }
    }

    /// Whether the end-of-list marker should be in place to trigger the next load.
    pub fn sentinel_active(&self) -> bool {
        !self.pending && self.error.is_none() && self.cursor.is_some()
    }

    pub fn items(&self) -> &[Character] {
        &self.items
    }

    #[cfg(test)]
    pub fn cursor(&self) -> Option<&Url> {
        self.cursor.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Total matches reported by the API for the current search, once a page has loaded.
    pub fn total_count(&self) -> Option<u32> {
        self.total_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::PageInfo;

    fn first_page() -> Url {
        Url::parse("https://rickandmortyapi.com/api/character/?page=1").unwrap()
    }

    fn character(id: u64) -> Character {
        Character {
            id,
            name: format!("Character {id}"),
            image: format!("https://example.com/{id}.jpeg"),
            episode: vec!["e1".to_string()],
        }
    }

    fn page(ids: &[u64], next: Option<&str>) -> CharacterPage {
        CharacterPage {
            info: PageInfo {
                count: Some(ids.len() as u32),
                next: next.map(|n| Url::parse(n).unwrap()),
            },
            results: ids.iter().copied().map(character).collect(),
        }
    }

    #[test]
    fn test_new_pager_is_idle_with_first_page_cursor() {
        let pager = Pager::new(first_page(), "name");
        assert_eq!(pager.state(), PagerState::Idle);
        assert_eq!(pager.cursor(), Some(&first_page()));
        assert!(pager.sentinel_active());
    }

    #[test]
    fn test_load_appends_and_advances_cursor() {
        let mut pager = Pager::new(first_page(), "name");

        let request = pager.begin_load().unwrap();
        assert_eq!(request.url, first_page());
        assert_eq!(pager.state(), PagerState::Loading);
        assert!(!pager.sentinel_active());

        let next = "https://rickandmortyapi.com/api/character/?page=2";
        assert!(pager.complete(request.generation, Ok(page(&[1, 2], Some(next)))));
        assert_eq!(pager.items().len(), 2);
        assert_eq!(pager.cursor().map(Url::as_str), Some(next));
        assert_eq!(pager.state(), PagerState::LoadedPartial);

        let request = pager.begin_load().unwrap();
        assert_eq!(request.url.as_str(), next);
        pager.complete(request.generation, Ok(page(&[3], None)));
        let ids: Vec<_> = pager.items().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(pager.state(), PagerState::LoadedComplete);
        assert!(!pager.sentinel_active());
    }

    #[test]
    fn test_load_is_noop_while_pending() {
        let mut pager = Pager::new(first_page(), "name");
        let _request = pager.begin_load().unwrap();
        assert_eq!(pager.begin_load(), None);
    }

    #[test]
    fn test_load_is_noop_without_cursor() {
        let mut pager = Pager::new(first_page(), "name");
        let request = pager.begin_load().unwrap();
        pager.complete(request.generation, Ok(page(&[1], None)));

        let items_before = pager.items().to_vec();
        assert_eq!(pager.begin_load(), None);
        assert_eq!(pager.items(), items_before.as_slice());
        assert_eq!(pager.cursor(), None);
        assert!(!pager.is_pending());
    }

    #[test]
    fn test_failure_keeps_list_and_cursor() {
        let mut pager = Pager::new(first_page(), "name");
        let next = "https://rickandmortyapi.com/api/character/?page=2";
        let request = pager.begin_load().unwrap();
        pager.complete(request.generation, Ok(page(&[1, 2], Some(next))));

        let failed = pager.begin_load().unwrap();
        pager.complete(failed.generation, Err("connection reset".to_string()));

        assert_eq!(pager.state(), PagerState::Error);
        assert_eq!(pager.error(), Some(FETCH_ERROR_MESSAGE));
        assert_eq!(pager.items().len(), 2);
        assert_eq!(pager.cursor().map(Url::as_str), Some(next));
        assert!(!pager.is_pending());
        assert!(!pager.sentinel_active());

        // Loading again re-issues the same request and clears the error.
        let retried = pager.begin_load().unwrap();
        assert_eq!(retried, failed);
        assert_eq!(pager.error(), None);
        assert_eq!(pager.state(), PagerState::Loading);
    }

    #[test]
    fn test_reset_clears_list_and_injects_search() {
        let mut pager = Pager::new(first_page(), "name");
        let request = pager.begin_load().unwrap();
        pager.complete(
            request.generation,
            Ok(page(
                &[1, 2],
                Some("https://rickandmortyapi.com/api/character/?page=2"),
            )),
        );

        pager.reset("Rick");

        assert!(pager.items().is_empty());
        assert_eq!(pager.cursor(), Some(&first_page()));
        assert_eq!(pager.state(), PagerState::Idle);

        let request = pager.begin_load().unwrap();
        assert_eq!(
            request.url.as_str(),
            "https://rickandmortyapi.com/api/character/?page=1&name=Rick"
        );
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut pager = Pager::new(first_page(), "name");
        let stale = pager.begin_load().unwrap();

        pager.reset("Morty");
        let current = pager.begin_load().unwrap();
        assert_ne!(stale.generation, current.generation);

        assert!(!pager.complete(stale.generation, Ok(page(&[1, 2, 3], None))));
        assert!(pager.items().is_empty());
        assert!(pager.is_pending());

        assert!(pager.complete(current.generation, Ok(page(&[4], None))));
        let ids: Vec<_> = pager.items().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![4]);
    }

    #[test]
    fn test_stale_failure_does_not_set_error() {
        let mut pager = Pager::new(first_page(), "name");
        let stale = pager.begin_load().unwrap();
        pager.reset("Summer");

        pager.complete(stale.generation, Err("timeout".to_string()));

        assert_eq!(pager.error(), None);
        assert_eq!(pager.state(), PagerState::Idle);
    }
}
