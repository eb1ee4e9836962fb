//! Events emitted when a catalog request settles.
//!
//! Controllers return an [`Event`] for every completed request so the
//! caller knows what to render and whether to show a transient notice.
//!
//! # Example
//!
//! ```rust
//! use spotify_streamer::events::Event;
//!
//! fn render(event: Event) {
//!     if let Some(notice) = event.notice() {
//!         eprintln!("{notice}");
//!     }
//! }
//! ```

use std::fmt;

/// Outcome of a settled catalog request.
///
/// An empty result and a failed request produce the same event: the user
/// is not told the difference.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// A non-empty artist list is shown.
    ArtistsFound,

    /// The search found nothing or failed; the prompt is shown.
    NoArtistsFound,

    /// A non-empty track list was indexed.
    TracksFound,

    /// The top-tracks lookup found nothing or failed.
    NoTracksFound,
}

impl Event {
    /// Text of the transient notice to show for this event, if any.
    #[must_use]
    pub fn notice(self) -> Option<&'static str> {
        match self {
            Self::NoArtistsFound => Some("No artists found. Please refine search."),
            Self::NoTracksFound => Some("No tracks found."),
            Self::ArtistsFound | Self::TracksFound => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArtistsFound => write!(f, "artists found"),
            Self::NoArtistsFound => write!(f, "no artists found"),
            Self::TracksFound => write!(f, "tracks found"),
            Self::NoTracksFound => write!(f, "no tracks found"),
        }
    }
}
