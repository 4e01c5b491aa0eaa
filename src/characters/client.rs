use color_eyre::eyre::{Result, WrapErr};
use reqwest::{Client, StatusCode};
use url::Url;

use crate::characters::CharacterPage;
use crate::ports::characters::CharacterSource;

/// First page of the public character endpoint.
pub const DEFAULT_API_URL: &str = "https://rickandmortyapi.com/api/character/?page=1";

#[derive(Debug, thiserror::Error)]
pub enum FetchCharactersError {
    #[error("Failed to send http request: {0}")]
    FailedToSendRequest(reqwest::Error),
    #[error("Unexpected response status: {status}")]
    UnexpectedStatus { status: StatusCode },
    #[error("Failed to parse response: {0}")]
    FailedToParseResponse(reqwest::Error),
}

/// Builds the request URL for a page cursor.
///
/// When `search` is non-empty it is set as the `search_param` query parameter,
/// replacing any value the cursor already carries. Other parameters (such as `page`)
/// are kept in order.
pub fn page_url(cursor: &Url, search_param: &str, search: &str) -> Url {
    let mut url = cursor.clone();
    if search.is_empty() {
        return url;
    }

    let pairs: Vec<(String, String)> = cursor
        .query_pairs()
        .filter(|(key, _)| key != search_param)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair(search_param, search);
    url
}

/// Fetch one page of characters.
///
/// Endpoint
/// - `GET /api/character/?page={n}&name={filter}`
///
/// Any non-success status is an error, including the 404 the API answers with when the
/// filter matches nothing.
pub async fn fetch_character_page(
    client: &Client,
    url: &Url,
) -> Result<CharacterPage, FetchCharactersError> {
    log::debug!("Fetching characters from {}", url);

    let response = client
        .get(url.clone())
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(FetchCharactersError::FailedToSendRequest)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchCharactersError::UnexpectedStatus { status });
    }

    response
        .json::<CharacterPage>()
        .await
        .map_err(FetchCharactersError::FailedToParseResponse)
}

pub struct CharacterHttpAdapter {
    client: Client,
}

impl CharacterHttpAdapter {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .wrap_err("Failed to build http client")?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl CharacterSource for CharacterHttpAdapter {
    async fn fetch_page(&self, url: &Url) -> Result<CharacterPage, FetchCharactersError> {
        fetch_character_page(&self.client, url).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::{Json, Router, extract::Query, http::StatusCode as AxumStatus, routing::get};
    use serde_json::json;

    use super::*;

    async fn serve(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/api/character/?page=1")).unwrap()
    }

    fn adapter() -> CharacterHttpAdapter {
        CharacterHttpAdapter::new("character-picker-tests").unwrap()
    }

    #[test]
    fn test_page_url_without_search_keeps_cursor() {
        let cursor = Url::parse(DEFAULT_API_URL).unwrap();
        assert_eq!(page_url(&cursor, "name", "").as_str(), DEFAULT_API_URL);
    }

    #[test]
    fn test_page_url_appends_search() {
        let cursor = Url::parse(DEFAULT_API_URL).unwrap();
        let url = page_url(&cursor, "name", "Rick");
        assert_eq!(
            url.as_str(),
            "https://rickandmortyapi.com/api/character/?page=1&name=Rick"
        );
    }

    #[test]
    fn test_page_url_replaces_existing_search() {
        let cursor =
            Url::parse("https://rickandmortyapi.com/api/character/?page=3&name=rick").unwrap();
        let url = page_url(&cursor, "name", "Morty Smith");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "3".to_string()),
                ("name".to_string(), "Morty Smith".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_page_passes_filter_and_parses_results() {
        let router = Router::new().route(
            "/api/character/",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let name = params.get("name").cloned().unwrap_or_default();
                Json(json!({
                    "info": { "count": 1, "pages": 1, "next": null, "prev": null },
                    "results": [{
                        "id": 7,
                        "name": format!("{name} Prime"),
                        "image": "https://example.com/7.jpeg",
                        "episode": ["e1", "e2", "e3"]
                    }]
                }))
            }),
        );
        let first_page = serve(router).await;

        let page = adapter()
            .fetch_page(&page_url(&first_page, "name", "Rick"))
            .await
            .unwrap();

        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].name, "Rick Prime");
        assert_eq!(page.results[0].episode_count(), 3);
        assert!(page.info.next.is_none());
    }

    #[tokio::test]
    async fn test_fetch_page_not_found_is_an_error() {
        let router = Router::new().route(
            "/api/character/",
            get(|| async {
                (
                    AxumStatus::NOT_FOUND,
                    Json(json!({ "error": "There is nothing here" })),
                )
            }),
        );
        let first_page = serve(router).await;

        let error = adapter().fetch_page(&first_page).await.unwrap_err();

        assert!(matches!(
            error,
            FetchCharactersError::UnexpectedStatus { status } if status == StatusCode::NOT_FOUND
        ));
    }

    #[tokio::test]
    async fn test_fetch_page_server_error() {
        let router = Router::new().route(
            "/api/character/",
            get(|| async { AxumStatus::INTERNAL_SERVER_ERROR }),
        );
        let first_page = serve(router).await;

        let error = adapter().fetch_page(&first_page).await.unwrap_err();

        assert!(matches!(
            error,
            FetchCharactersError::UnexpectedStatus { status } if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
    }

    #[tokio::test]
    async fn test_fetch_page_invalid_body() {
        let router = Router::new().route("/api/character/", get(|| async { "not json" }));
        let first_page = serve(router).await;

        let error = adapter().fetch_page(&first_page).await.unwrap_err();

        assert!(matches!(
            error,
            FetchCharactersError::FailedToParseResponse(_)
        ));
    }
}
