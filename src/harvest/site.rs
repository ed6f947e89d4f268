//! Catalog endpoint access
//!
//! Wraps the fetch client with knowledge of the site's URL layout and pairs
//! each endpoint with its extraction:
//! - `{listing-base}/page/{n}/` for ranked listing pages
//! - `{item-base}/{key}/` for item detail pages
//! - `{stats-base}/{key}/stats/` and `.../ratings-summary/` for fragments
//!
//! Failures degrade to empty results here. A page that cannot be fetched or
//! parsed looks like a page with nothing on it, and the run logic decides
//! what that means.

use crate::config::SourceConfig;
use crate::harvest::{extract, FetchClient};

/// One catalog site and the client used to reach it
pub struct Site {
    client: FetchClient,
    source: SourceConfig,
}

impl Site {
    pub fn new(client: FetchClient, source: SourceConfig) -> Self {
        Self { client, source }
    }

    /// Fetches a listing page and returns its item keys in rank order
    ///
    /// An unreachable or non-200 page yields an empty list, which callers
    /// cannot distinguish from a page past the end of the catalog; both stop
    /// the traversal.
    pub async fn listing_keys(&self, page: u32) -> Vec<String> {
        let url = self.listing_url(page);

        match self.client.get(&url).await {
            Ok(response) if response.status == 200 => {
                let keys = extract::listing_slugs(&response.body);
                tracing::debug!("Listing page {} holds {} items", page, keys.len());
                keys
            }
            Ok(response) => {
                tracing::info!("Listing page {} answered {}", page, response.status);
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Listing page {} unavailable: {}", page, e);
                Vec::new()
            }
        }
    }

    /// Fetches an item's detail page and extracts its external identifier
    pub async fn external_id(&self, key: &str) -> Option<String> {
        let body = self.fetch_fragment(&self.detail_url(key)).await?;
        extract::external_id(&body)
    }

    /// Fetches an item's stats fragment and extracts its viewer count
    pub async fn viewer_count(&self, key: &str) -> Option<u64> {
        let body = self.fetch_fragment(&self.stats_url(key)).await?;
        extract::viewer_count(&body)
    }

    /// Fetches an item's ratings-summary fragment and extracts the weighted
    /// average and rating count
    pub async fn rating_summary(&self, key: &str) -> Option<(f64, u64)> {
        let body = self.fetch_fragment(&self.ratings_url(key)).await?;
        extract::rating_summary(&body)
    }

    async fn fetch_fragment(&self, url: &str) -> Option<String> {
        match self.client.get(url).await {
            Ok(response) if response.status == 200 => Some(response.body),
            Ok(response) => {
                tracing::debug!("{} answered {}", url, response.status);
                None
            }
            Err(e) => {
                tracing::warn!("{} unavailable: {}", url, e);
                None
            }
        }
    }

    fn listing_url(&self, page: u32) -> String {
        format!("{}/page/{}/", self.source.listing_base, page)
    }

    fn detail_url(&self, key: &str) -> String {
        format!("{}/{}/", self.source.item_base, key)
    }

    fn stats_url(&self, key: &str) -> String {
        format!("{}/{}/stats/", self.source.stats_base, key)
    }

    fn ratings_url(&self, key: &str) -> String {
        format!("{}/{}/ratings-summary/", self.source.stats_base, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;

    fn create_test_site() -> Site {
        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let source = SourceConfig {
            listing_base: "https://example.com/films/ajax/popular".to_string(),
            item_base: "https://example.com/film".to_string(),
            stats_base: "https://example.com/csi/film".to_string(),
        };
        Site::new(client, source)
    }

    #[test]
    fn test_listing_url_layout() {
        let site = create_test_site();
        assert_eq!(
            site.listing_url(7),
            "https://example.com/films/ajax/popular/page/7/"
        );
    }

    #[test]
    fn test_item_url_layouts() {
        let site = create_test_site();
        assert_eq!(
            site.detail_url("the-godfather"),
            "https://example.com/film/the-godfather/"
        );
        assert_eq!(
            site.stats_url("the-godfather"),
            "https://example.com/csi/film/the-godfather/stats/"
        );
        assert_eq!(
            site.ratings_url("the-godfather"),
            "https://example.com/csi/film/the-godfather/ratings-summary/"
        );
    }

    // Fetch-and-extract paths are covered with wiremock in the integration
    // tests
}
