//! Generic slippy-map tile source.
//!
//! Fetches tiles from any server addressed by a `{z}/{x}/{y}` templated
//! URL, e.g. `https://tile.openstreetmap.org/{z}/{x}/{y}.png`.

use super::http::AsyncHttpClient;
use super::types::{SourceError, TileSource};

/// Default tile server: the public OpenStreetMap raster layer.
pub const OSM_URL_TEMPLATE: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Tile source backed by a `{z}/{x}/{y}` URL template.
pub struct SlippyTileSource<C: AsyncHttpClient> {
    http_client: C,
    url_template: String,
    name: String,
}

impl<C: AsyncHttpClient> SlippyTileSource<C> {
    /// Creates a source for the public OpenStreetMap tile server.
    pub fn openstreetmap(http_client: C) -> Self {
        Self::new(http_client, OSM_URL_TEMPLATE, "openstreetmap")
    }

    /// Creates a source for an arbitrary `{z}/{x}/{y}` template.
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `url_template` - URL containing `{z}`, `{x}` and `{y}` markers
    /// * `name` - Source name for logging
    pub fn new(http_client: C, url_template: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            http_client,
            url_template: url_template.into(),
            name: name.into(),
        }
    }

    /// Builds the tile URL for the given coordinates.
    fn build_url(&self, x: u32, y: u32, zoom: u8) -> String {
        self.url_template
            .replace("{z}", &zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

impl<C: AsyncHttpClient> TileSource for SlippyTileSource<C> {
    async fn fetch(&self, x: u32, y: u32, zoom: u8) -> Result<Vec<u8>, SourceError> {
        let n = 1u64 << zoom;
        if u64::from(x) >= n || u64::from(y) >= n {
            return Err(SourceError::UnsupportedCoordinates { x, y, zoom });
        }

        let url = self.build_url(x, y, zoom);
        self.http_client.get(&url).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockAsyncHttpClient;

    #[test]
    fn test_build_url_substitutes_all_markers() {
        let source = SlippyTileSource::openstreetmap(MockAsyncHttpClient {
            response: Ok(vec![]),
        });

        let url = source.build_url(23432, 15355, 15);
        assert_eq!(url, "https://tile.openstreetmap.org/15/23432/15355.png");
    }

    #[test]
    fn test_custom_template() {
        let source = SlippyTileSource::new(
            MockAsyncHttpClient { response: Ok(vec![]) },
            "https://tiles.example.com/v1/{z}/{x}/{y}@2x.png",
            "example",
        );

        assert_eq!(source.name(), "example");
        assert_eq!(
            source.build_url(1, 2, 3),
            "https://tiles.example.com/v1/3/1/2@2x.png"
        );
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let source = SlippyTileSource::openstreetmap(MockAsyncHttpClient {
            response: Ok(vec![9, 9, 9]),
        });

        let body = source.fetch(10, 20, 6).await.unwrap();
        assert_eq!(body, vec![9, 9, 9]);
    }

    #[tokio::test]
    async fn test_fetch_rejects_out_of_grid_tile() {
        let source = SlippyTileSource::openstreetmap(MockAsyncHttpClient {
            response: Ok(vec![]),
        });

        let result = source.fetch(64, 0, 6).await;
        assert!(matches!(
            result,
            Err(SourceError::UnsupportedCoordinates { x: 64, .. })
        ));
    }
}
