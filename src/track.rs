use std::{fmt, time::Duration};

use thiserror::Error;
use url::Url;

use crate::{error, protocol::catalog};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The track lacks nested data that every indexed track must carry.
    #[error("malformed track descriptor {id}: {reason}")]
    MalformedTrackDescriptor { id: String, reason: &'static str },
}

impl From<Error> for error::Error {
    fn from(e: Error) -> Self {
        Self::invalid_argument(e)
    }
}

/// Playback metadata of one track, normalized from a catalog [`Track`].
///
/// [`Track`]: catalog::Track
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IndexedTrack {
    id: String,
    title: String,
    album: String,
    artist: String,
    album_art: Url,
    source: Option<Url>,
    duration: Duration,
}

impl IndexedTrack {
    /// Length of every catalog preview clip, regardless of the length of
    /// the full track.
    pub const PREVIEW_DURATION: Duration = Duration::from_millis(30_000);

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn album(&self) -> &str {
        &self.album
    }

    /// Name of the first credited artist.
    #[must_use]
    pub fn artist(&self) -> &str {
        &self.artist
    }

    /// The first album image listed by the catalog.
    #[must_use]
    pub fn album_art(&self) -> &Url {
        &self.album_art
    }

    /// Preview clip to play, if the track has one in this market.
    #[must_use]
    pub fn source(&self) -> Option<&Url> {
        self.source.as_ref()
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// Builds the playback metadata for a catalog track.
///
/// A descriptor must credit at least one artist and carry at least one album
/// image; the first of each is used.
///
/// # Errors
///
/// Returns [`Error::MalformedTrackDescriptor`] if either list is empty.
impl TryFrom<&catalog::Track> for IndexedTrack {
    type Error = Error;

    fn try_from(track: &catalog::Track) -> Result<Self, Self::Error> {
        let malformed = |reason| Error::MalformedTrackDescriptor {
            id: track.id.clone(),
            reason,
        };

        let artist = track.artists.first().ok_or_else(|| malformed("no artists"))?;
        let album_art = track
            .album
            .images
            .first()
            .ok_or_else(|| malformed("no album art"))?;

        Ok(Self {
            id: track.id.clone(),
            title: track.name.clone(),
            album: track.album.name.clone(),
            artist: artist.name.clone(),
            album_art: album_art.url.clone(),
            source: track.preview_url.clone(),
            duration: Self::PREVIEW_DURATION,
        })
    }
}

impl fmt::Display for IndexedTrack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: \"{} - {}\"", self.id, self.artist, self.title)
    }
}
