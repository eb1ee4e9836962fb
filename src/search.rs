//! Artist search controller.
//!
//! Drives the search screen: a query is sent to the [`Catalog`] on a
//! background task, and the result is handed back to the caller's task
//! through the task's join handle. Nothing is shared between the two tasks
//! but the result itself.
//!
//! # States
//!
//! * [`View::Prompt`] - no search yet, or the last one found nothing
//! * [`View::Results`] - a non-empty artist list is shown
//!
//! A failed search and an empty one both return to the prompt with
//! [`Event::NoArtistsFound`]. Failures are logged and never propagated.
//!
//! # Overlapping searches
//!
//! Issuing a search while another is outstanding aborts the outstanding
//! one. The last search *issued* is the one whose result is shown,
//! regardless of the order in which the catalog answers.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{
    catalog::Catalog,
    error::{Error, Result},
    events::Event,
    protocol::catalog::Artist,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Prompt,
    Results(Vec<Artist>),
}

pub struct ArtistSearch {
    catalog: Arc<dyn Catalog>,
    view: View,
    pending: Option<JoinHandle<Result<Vec<Artist>>>>,
}

impl ArtistSearch {
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            catalog,
            view: View::default(),
            pending: None,
        }
    }

    /// Recreates the controller from the output of
    /// [`save_state`](Self::save_state), showing the saved artists as they
    /// were without searching again.
    ///
    /// # Errors
    ///
    /// Returns an error if `saved` is not a serialized artist list.
    pub fn restore(catalog: Arc<dyn Catalog>, saved: &str) -> Result<Self> {
        let artists: Option<Vec<Artist>> = serde_json::from_str(saved)?;

        let mut search = Self::new(catalog);
        if let Some(artists) = artists.filter(|artists| !artists.is_empty()) {
            debug!("restored {} artists", artists.len());
            search.view = View::Results(artists);
        }

        Ok(search)
    }

    /// Serializes the shown artist list, or `null` when the prompt is shown.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn save_state(&self) -> Result<String> {
        let artists = match &self.view {
            View::Prompt => None,
            View::Results(artists) => Some(artists),
        };
        serde_json::to_string(&artists).map_err(Into::into)
    }

    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    /// The artists currently shown; empty when the prompt is shown.
    #[must_use]
    pub fn artists(&self) -> &[Artist] {
        match &self.view {
            View::Prompt => &[],
            View::Results(artists) => artists,
        }
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts searching for `query` in the background.
    ///
    /// Blank queries are ignored; others are sent as given, surrounding
    /// whitespace included. Any search still outstanding is aborted.
    /// Must be called from within a Tokio runtime.
    ///
    /// Returns whether a search was started.
    pub fn search(&mut self, query: &str) -> bool {
        if query.trim().is_empty() {
            return false;
        }

        if let Some(superseded) = self.pending.take() {
            debug!("aborting superseded search");
            superseded.abort();
        }

        debug!("searching artists: \"{query}\"");
        let catalog = Arc::clone(&self.catalog);
        let query = query.to_owned();
        self.pending = Some(tokio::spawn(async move {
            catalog.search_artists(&query).await
        }));

        true
    }

    /// Waits for the outstanding search and applies its result.
    ///
    /// Returns `None` when no search is outstanding. Cancel safe: when the
    /// returned future is dropped, the search stays outstanding.
    pub async fn next_event(&mut self) -> Option<Event> {
        let task = self.pending.as_mut()?;
        let joined = task.await;
        self.pending = None;

        let result = joined.map_err(Error::from).and_then(|result| result);
        Some(self.apply(result))
    }

    /// Applies the result of a search.
    pub fn apply(&mut self, result: Result<Vec<Artist>>) -> Event {
        match result {
            Ok(artists) if !artists.is_empty() => {
                debug!("found {} artists", artists.len());
                self.view = View::Results(artists);
                Event::ArtistsFound
            }
            Ok(_) => {
                debug!("no artists found");
                self.view = View::Prompt;
                Event::NoArtistsFound
            }
            Err(e) => {
                error!("an error occurred when attempting to retrieve artists: {e}");
                self.view = View::Prompt;
                Event::NoArtistsFound
            }
        }
    }

    /// Serializes the artist at `position` for the track-list screen.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no artist is shown at `position`.
    pub fn select(&self, position: usize) -> Result<String> {
        let artist = self
            .artists()
            .get(position)
            .ok_or_else(|| Error::not_found(format!("no artist at position {position}")))?;

        debug!("selected artist {}: {}", artist.id, artist.name);
        serde_json::to_string(artist).map_err(Into::into)
    }
}

impl Drop for ArtistSearch {
    fn drop(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{collections::HashMap, sync::Mutex, time::Duration};

    use async_trait::async_trait;

    use super::*;
    use crate::{error::ErrorKind, protocol::catalog::Track};

    pub(crate) fn artist(id: &str, name: &str) -> Artist {
        Artist {
            id: id.to_owned(),
            name: name.to_owned(),
            genres: vec!["pop".to_owned()],
            images: Vec::new(),
            popularity: Some(50),
            uri: Some(format!("spotify:artist:{id}")),
        }
    }

    /// Catalog answering from fixed tables, optionally after a delay.
    #[derive(Default)]
    pub(crate) struct FakeCatalog {
        pub artists: HashMap<String, Vec<Artist>>,
        pub tracks: HashMap<String, Vec<Track>>,
        pub delays: HashMap<String, Duration>,
        pub queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Catalog for FakeCatalog {
        async fn search_artists(&self, query: &str) -> Result<Vec<Artist>> {
            self.queries.lock().unwrap().push(query.to_owned());
            if let Some(delay) = self.delays.get(query) {
                tokio::time::sleep(*delay).await;
            }
            self.artists
                .get(query)
                .cloned()
                .ok_or_else(|| Error::unavailable("catalog unreachable"))
        }

        async fn top_tracks(&self, artist_id: &str) -> Result<Vec<Track>> {
            self.tracks
                .get(artist_id)
                .cloned()
                .ok_or_else(|| Error::unavailable("catalog unreachable"))
        }
    }

    fn controller(catalog: FakeCatalog) -> ArtistSearch {
        ArtistSearch::new(Arc::new(catalog))
    }

    #[tokio::test]
    async fn starts_at_prompt() {
        let mut search = controller(FakeCatalog::default());
        assert_eq!(search.view(), &View::Prompt);
        assert!(search.artists().is_empty());
        assert_eq!(search.next_event().await, None);
    }

    #[tokio::test]
    async fn blank_queries_are_ignored() {
        let catalog = Arc::new(FakeCatalog::default());
        let mut search = ArtistSearch::new(catalog.clone());
        assert!(!search.search(""));
        assert!(!search.search("   "));
        assert!(!search.is_searching());
        assert!(catalog.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn queries_are_sent_untrimmed() {
        let mut catalog = FakeCatalog::default();
        catalog
            .artists
            .insert(" abba ".to_owned(), vec![artist("a1", "ABBA")]);
        let catalog = Arc::new(catalog);
        let mut search = ArtistSearch::new(catalog.clone());

        assert!(search.search(" abba "));
        assert_eq!(search.next_event().await, Some(Event::ArtistsFound));
        assert_eq!(*catalog.queries.lock().unwrap(), vec![" abba ".to_owned()]);
    }

    #[tokio::test]
    async fn shows_non_empty_results() {
        let mut catalog = FakeCatalog::default();
        catalog.artists.insert(
            "abba".to_owned(),
            vec![artist("a1", "ABBA"), artist("a2", "Abba Teens")],
        );
        let mut search = controller(catalog);

        assert!(search.search("abba"));
        assert!(search.is_searching());
        assert_eq!(search.next_event().await, Some(Event::ArtistsFound));
        assert!(!search.is_searching());
        assert_eq!(search.artists().len(), 2);
        assert_eq!(search.artists()[0].name, "ABBA");
    }

    #[tokio::test]
    async fn empty_results_return_to_prompt_with_notice() {
        let mut catalog = FakeCatalog::default();
        catalog.artists.insert("abba".to_owned(), Vec::new());
        let mut search = controller(catalog);

        search.search("abba");
        let event = search.next_event().await.unwrap();
        assert_eq!(event, Event::NoArtistsFound);
        assert_eq!(event.notice(), Some("No artists found. Please refine search."));
        assert_eq!(search.view(), &View::Prompt);
    }

    #[tokio::test]
    async fn failures_are_swallowed() {
        let mut catalog = FakeCatalog::default();
        catalog
            .artists
            .insert("abba".to_owned(), vec![artist("a1", "ABBA")]);
        let mut search = controller(catalog);

        search.search("abba");
        assert_eq!(search.next_event().await, Some(Event::ArtistsFound));

        // Not in the fake's table: the call fails.
        search.search("offline");
        assert_eq!(search.next_event().await, Some(Event::NoArtistsFound));
        assert_eq!(search.view(), &View::Prompt);
    }

    #[tokio::test(start_paused = true)]
    async fn last_issued_search_wins() {
        let mut catalog = FakeCatalog::default();
        catalog
            .artists
            .insert("slow".to_owned(), vec![artist("a1", "Slow")]);
        catalog
            .artists
            .insert("fast".to_owned(), vec![artist("a2", "Fast")]);
        catalog
            .delays
            .insert("slow".to_owned(), Duration::from_secs(10));
        let mut search = controller(catalog);

        search.search("slow");
        search.search("fast");
        assert_eq!(search.next_event().await, Some(Event::ArtistsFound));
        assert_eq!(search.artists()[0].name, "Fast");

        // The superseded search never lands.
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(search.next_event().await, None);
        assert_eq!(search.artists()[0].name, "Fast");
    }

    #[test]
    fn save_and_restore_round_trip() {
        let catalog: Arc<dyn Catalog> = Arc::new(FakeCatalog::default());
        let mut search = ArtistSearch::new(Arc::clone(&catalog));
        assert_eq!(search.save_state().unwrap(), "null");

        search.apply(Ok(vec![artist("a1", "ABBA"), artist("a2", "Abba Teens")]));
        let saved = search.save_state().unwrap();

        let restored = ArtistSearch::restore(Arc::clone(&catalog), &saved).unwrap();
        assert_eq!(restored.view(), search.view());

        let restored = ArtistSearch::restore(catalog, "null").unwrap();
        assert_eq!(restored.view(), &View::Prompt);
    }

    #[test]
    fn restore_rejects_garbage() {
        let catalog: Arc<dyn Catalog> = Arc::new(FakeCatalog::default());
        assert!(ArtistSearch::restore(catalog, "{\"id\":").is_err());
    }

    #[test]
    fn select_serializes_the_artist() {
        let mut search = controller(FakeCatalog::default());
        search.apply(Ok(vec![artist("a1", "ABBA"), artist("a2", "Abba Teens")]));

        let json = search.select(1).unwrap();
        let selected: Artist = serde_json::from_str(&json).unwrap();
        assert_eq!(selected, artist("a2", "Abba Teens"));

        // Selecting does not change what is shown.
        assert_eq!(search.artists().len(), 2);

        let err = search.select(2).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
