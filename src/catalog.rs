//! Remote music catalog.
//!
//! The controllers never talk HTTP themselves: they are handed a
//! [`Catalog`], which is either the [`WebCatalog`] below or a fake in tests.

use async_trait::async_trait;
use url::Url;

use crate::{
    config::Config,
    error::{Error, Result},
    http::Client as HttpClient,
    protocol::{
        self,
        catalog::{Artist, SearchResponse, TopTracksResponse, Track},
    },
};

/// Source of artists and their top tracks.
///
/// An `Err` from either method is a network or service failure; an empty
/// `Ok` means the call succeeded but found nothing.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Searches artists by name.
    async fn search_artists(&self, query: &str) -> Result<Vec<Artist>>;

    /// Returns the most popular tracks of an artist, most popular first.
    async fn top_tracks(&self, artist_id: &str) -> Result<Vec<Track>>;
}

/// [`Catalog`] backed by the catalog web API.
pub struct WebCatalog {
    http_client: HttpClient,
    api_url: Url,
    market: String,
    search_limit: u8,
}

impl WebCatalog {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built from `config`.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            http_client: HttpClient::new(config)?,
            api_url: config.api_url.clone(),
            market: config.market.clone(),
            search_limit: config.search_limit,
        })
    }

    fn search_url(&self, query: &str) -> Result<Url> {
        let mut url = self.api_url.join("search")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("type", "artist")
            .append_pair("limit", &self.search_limit.to_string());
        Ok(url)
    }

    fn top_tracks_url(&self, artist_id: &str) -> Result<Url> {
        // Ids are base-62; anything else would alter the request path.
        if artist_id.is_empty() || !artist_id.chars().all(|chr| chr.is_ascii_alphanumeric()) {
            return Err(Error::invalid_argument(format!(
                "invalid artist id \"{artist_id}\""
            )));
        }

        let mut url = self.api_url.join(&format!("artists/{artist_id}/top-tracks"))?;
        url.query_pairs_mut().append_pair("market", &self.market);
        Ok(url)
    }

    async fn get<T>(&self, url: Url, origin: &str) -> Result<T>
    where
        T: for<'de> serde::Deserialize<'de> + std::fmt::Debug,
    {
        let request = self.http_client.get(url);
        let response = self.http_client.execute(request).await?;
        let body = response.text().await?;
        protocol::json(&body, origin)
    }
}

#[async_trait]
impl Catalog for WebCatalog {
    async fn search_artists(&self, query: &str) -> Result<Vec<Artist>> {
        let url = self.search_url(query)?;
        let response: SearchResponse = self.get(url, "search").await?;
        Ok(response.artists.items)
    }

    async fn top_tracks(&self, artist_id: &str) -> Result<Vec<Track>> {
        let url = self.top_tracks_url(artist_id)?;
        let response: TopTracksResponse = self.get(url, "top-tracks").await?;
        Ok(response.tracks)
    }
}
