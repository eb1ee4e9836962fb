//! Catalog web API types.
//!
//! Artists, albums and tracks as returned by the catalog, plus the response
//! envelopes of the two endpoints used: artist search and an artist's top
//! tracks.
//!
//! # Wire Format
//!
//! Search response:
//! ```json
//! {
//!     "artists": {
//!         "href": "https://api.spotify.com/v1/search?query=abba&type=artist",
//!         "items": [
//!             {
//!                 "id": "0LcJLqbBmaGUft1e9Mm8HV",
//!                 "name": "ABBA",
//!                 "genres": ["europop", "swedish pop"],
//!                 "images": [{ "url": "https://i.scdn.co/image/...", "width": 640, "height": 640 }],
//!                 "popularity": 83,
//!                 "uri": "spotify:artist:0LcJLqbBmaGUft1e9Mm8HV"
//!             }
//!         ],
//!         "limit": 20,
//!         "offset": 0,
//!         "total": 1,
//!         "next": null
//!     }
//! }
//! ```
//!
//! Top tracks response:
//! ```json
//! {
//!     "tracks": [
//!         {
//!             "id": "2TxCwUlqaOH3TIyJqGgR91",
//!             "name": "Dancing Queen",
//!             "preview_url": "https://p.scdn.co/mp3-preview/...",
//!             "album": { "id": "...", "name": "Arrival", "images": [{ "url": "..." }] },
//!             "artists": [{ "id": "0LcJLqbBmaGUft1e9Mm8HV", "name": "ABBA" }]
//!         }
//!     ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError, DefaultOnNull};
use url::Url;

/// Image reference, ordered widest first by the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Image {
    pub url: Url,

    #[serde(default)]
    pub width: Option<u32>,

    #[serde(default)]
    pub height: Option<u32>,
}

/// Full artist object from a search.
///
/// This is the value persisted across screen recreation and handed to the
/// track-list screen on selection. The fields modelled here round-trip
/// exactly; fields the catalog sends that are not modelled are dropped.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,

    pub name: String,

    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub genres: Vec<String>,

    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub images: Vec<Image>,

    #[serde(default)]
    pub popularity: Option<u32>,

    #[serde(default)]
    pub uri: Option<String>,
}

impl Artist {
    /// The widest image, if the artist has any.
    #[must_use]
    pub fn image(&self) -> Option<&Image> {
        self.images.first()
    }
}

/// Artist reference as embedded in a track.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtistSimple {
    pub id: String,
    pub name: String,
}

/// Album reference as embedded in a track.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub id: Option<String>,

    pub name: String,

    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub images: Vec<Image>,
}

/// A catalog track: the raw input to the track index.
///
/// `album.images` and `artists` may be empty on the wire. The index requires
/// at least one of each; see [`IndexedTrack`](crate::track::IndexedTrack).
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    pub id: String,

    pub name: String,

    /// Link to a 30-second preview clip.
    ///
    /// Missing for tracks that are not licensed for previews in the
    /// requested market. Malformed URLs are treated as missing.
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub preview_url: Option<Url>,

    pub album: Album,

    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub artists: Vec<ArtistSimple>,
}

/// One page of a paginated listing.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,

    #[serde(default)]
    pub limit: u64,

    #[serde(default)]
    pub offset: u64,

    #[serde(default)]
    pub total: u64,

    #[serde(default)]
    pub next: Option<Url>,
}

/// Response of `GET /search?type=artist`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SearchResponse {
    pub artists: Paging<Artist>,
}

/// Response of `GET /artists/{id}/top-tracks`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TopTracksResponse {
    pub tracks: Vec<Track>,
}
