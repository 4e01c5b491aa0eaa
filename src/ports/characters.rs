use url::Url;

use crate::characters::CharacterPage;
use crate::characters::client::FetchCharactersError;

/// Port trait wrapping the character API used by the picker.
///
/// Implementations live in `characters::client` (production) or test mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CharacterSource: Send + Sync {
    /// Fetch the page at `url`, which already carries paging and filter parameters.
    async fn fetch_page(&self, url: &Url) -> Result<CharacterPage, FetchCharactersError>;
}
