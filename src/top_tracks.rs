//! Track-list screen controller.
//!
//! Receives the artist selected on the search screen, looks up that
//! artist's top tracks and keeps them in a [`TrackIndex`] for playback.

use crate::{
    catalog::Catalog,
    error::Result,
    events::Event,
    index::{RebuildPolicy, TrackIndex},
    protocol::catalog::{Artist, Track},
};

#[derive(Debug)]
pub struct TopTracks {
    artist: Artist,
    index: TrackIndex,
}

impl TopTracks {
    #[must_use]
    pub fn new(artist: Artist, policy: RebuildPolicy) -> Self {
        Self {
            artist,
            index: TrackIndex::with_policy(policy),
        }
    }

    /// Creates the controller from the JSON handed over by
    /// [`ArtistSearch::select`](crate::search::ArtistSearch::select).
    ///
    /// # Errors
    ///
    /// Returns an error if `selection` is not a serialized artist.
    pub fn from_selection(selection: &str, policy: RebuildPolicy) -> Result<Self> {
        let artist: Artist = serde_json::from_str(selection)?;
        Ok(Self::new(artist, policy))
    }

    #[must_use]
    pub fn artist(&self) -> &Artist {
        &self.artist
    }

    #[must_use]
    pub fn index(&self) -> &TrackIndex {
        &self.index
    }

    /// Fetches the artist's top tracks and indexes them.
    ///
    /// # Errors
    ///
    /// Catalog failures are logged and reported as
    /// [`Event::NoTracksFound`]. Only tracks that cannot be indexed are
    /// returned as errors.
    pub async fn load(&mut self, catalog: &dyn Catalog) -> Result<Event> {
        debug!("loading top tracks of {}", self.artist.name);
        let result = catalog.top_tracks(&self.artist.id).await;
        self.apply(result)
    }

    /// Applies the result of a top-tracks lookup.
    ///
    /// An empty or failed lookup leaves the index as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if a track is malformed or listed twice.
    pub fn apply(&mut self, result: Result<Vec<Track>>) -> Result<Event> {
        match result {
            Ok(tracks) if !tracks.is_empty() => {
                self.index.set_track_list(Some(tracks.as_slice()))?;
                Ok(Event::TracksFound)
            }
            Ok(_) => {
                debug!("no top tracks for {}", self.artist.name);
                Ok(Event::NoTracksFound)
            }
            Err(e) => {
                error!(
                    "an error occurred when attempting to retrieve top tracks of {}: {e}",
                    self.artist.name
                );
                Ok(Event::NoTracksFound)
            }
        }
    }
}
