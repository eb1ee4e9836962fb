//! Track metadata index.
//!
//! Holds the normalized metadata of the most recently fetched track list in
//! list order, with constant-time lookup by track id, for consumption by a
//! playback queue.
//!
//! # Rebuilding
//!
//! [`TrackIndex::set_track_list`] only rebuilds when the incoming list
//! differs from the one held. What counts as "differs" is the
//! [`RebuildPolicy`]:
//!
//! * [`Positional`](RebuildPolicy::Positional) compares the full ordered
//!   sequence of ids. Reordering, adding or removing tracks rebuilds.
//! * [`FirstId`](RebuildPolicy::FirstId) compares only the id of the first
//!   track of two non-empty lists. Any change behind an unchanged first
//!   track is silently ignored; this exists to keep the historical behavior
//!   available.
//!
//! # Concurrency
//!
//! The index does no locking of its own. Share it behind a lock if more
//! than one thread needs it.

use std::collections::HashMap;

use thiserror::Error;

use crate::{
    error,
    protocol::catalog::Track,
    track::{self, IndexedTrack},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Track(#[from] track::Error),

    #[error("track {0} occurs more than once")]
    DuplicateTrack(String),
}

impl From<Error> for error::Error {
    fn from(e: Error) -> Self {
        Self::invalid_argument(e)
    }
}

/// When an incoming track list is considered equal to the held one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RebuildPolicy {
    /// Equal when both lists are non-empty and their first ids match.
    FirstId,

    /// Equal when both lists have the same ids in the same order.
    #[default]
    Positional,
}

impl RebuildPolicy {
    fn is_same<'a>(
        self,
        held: &[IndexedTrack],
        mut incoming: impl ExactSizeIterator<Item = &'a str>,
    ) -> bool {
        match self {
            Self::FirstId => match (held.first(), incoming.next()) {
                (Some(held), Some(id)) => held.id() == id,
                _ => false,
            },
            Self::Positional => {
                held.len() == incoming.len() && held.iter().map(IndexedTrack::id).eq(incoming)
            }
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum State {
    /// No track list was ever set.
    #[default]
    Empty,

    /// A track list, possibly of zero tracks, is indexed.
    Ready,
}

#[derive(Clone, Debug, Default)]
pub struct TrackIndex {
    tracks: Vec<IndexedTrack>,
    positions: HashMap<String, usize>,
    state: State,
    policy: RebuildPolicy,
}

impl TrackIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_policy(policy: RebuildPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn policy(&self) -> RebuildPolicy {
        self.policy
    }

    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// Indexes `tracks` unless it is judged equal to the list already held.
    ///
    /// `None` leaves the index untouched. Rebuilding is all or nothing: the
    /// new list is normalized in full before it replaces the old one, so on
    /// error the previous contents remain.
    ///
    /// Returns whether the index was rebuilt.
    ///
    /// # Errors
    ///
    /// Returns an error if a track is malformed or if an id occurs twice.
    pub fn set_track_list(&mut self, tracks: Option<&[Track]>) -> Result<bool, Error> {
        let Some(tracks) = tracks else {
            return Ok(false);
        };

        if self.state == State::Ready
            && self
                .policy
                .is_same(&self.tracks, tracks.iter().map(|track| track.id.as_str()))
        {
            trace!("track list unchanged, keeping index");
            return Ok(false);
        }

        let mut indexed = Vec::with_capacity(tracks.len());
        let mut positions = HashMap::with_capacity(tracks.len());
        for (position, track) in tracks.iter().enumerate() {
            let item = IndexedTrack::try_from(track)?;
            trace!("found music track: {item}");

            if positions.insert(item.id().to_owned(), position).is_some() {
                return Err(Error::DuplicateTrack(item.id().to_owned()));
            }
            indexed.push(item);
        }

        debug!("indexed {} tracks", indexed.len());
        self.tracks = indexed;
        self.positions = positions;
        self.state = State::Ready;

        Ok(true)
    }

    /// Returns the track with `id`, or `None` if it is not indexed.
    #[must_use]
    pub fn get_track(&self, id: &str) -> Option<&IndexedTrack> {
        self.positions
            .get(id)
            .and_then(|&position| self.tracks.get(position))
    }

    /// Returns the track at `position` in list order.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&IndexedTrack> {
        self.tracks.get(position)
    }

    /// Returns the list position of the track with `id`.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// All indexed tracks in the order of the last list that was set.
    ///
    /// Empty until a list has been set.
    #[must_use]
    pub fn ordered_tracks(&self) -> &[IndexedTrack] {
        &self.tracks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::tests::descriptor;

    fn tracks(ids: &[&str]) -> Vec<Track> {
        ids.iter().map(|id| descriptor(id)).collect()
    }

    fn ordered_ids(index: &TrackIndex) -> Vec<&str> {
        index.ordered_tracks().iter().map(IndexedTrack::id).collect()
    }

    #[test]
    fn preserves_input_order() {
        let mut index = TrackIndex::new();
        let input = tracks(&["t3", "t1", "t2", "t5", "t4"]);
        assert_eq!(index.set_track_list(Some(&input)), Ok(true));

        assert_eq!(ordered_ids(&index), vec!["t3", "t1", "t2", "t5", "t4"]);
        assert_eq!(index.len(), 5);
        assert_eq!(index.state(), State::Ready);
    }

    #[test]
    fn looks_up_by_id() {
        let mut index = TrackIndex::new();
        index.set_track_list(Some(&tracks(&["t1", "t2"]))).unwrap();

        let ordered = index.ordered_tracks();
        assert_eq!(ordered[0].id(), "t1");
        assert_eq!(ordered[1].id(), "t2");

        let second = index.get_track("t2").unwrap();
        assert_eq!(second, &ordered[1]);
        assert_eq!(second.duration().as_millis(), 30_000);
        assert_eq!(index.position("t2"), Some(1));
        assert_eq!(index.get(1), Some(second));
    }

    #[test]
    fn unknown_ids_are_absent() {
        let mut index = TrackIndex::new();
        assert!(index.get_track("nonexistent").is_none());

        index.set_track_list(Some(&tracks(&["t1"]))).unwrap();
        assert!(index.get_track("nonexistent").is_none());
        assert!(index.position("nonexistent").is_none());
        assert!(index.get(1).is_none());
    }

    #[test]
    fn fresh_index_is_empty() {
        let mut index = TrackIndex::new();
        assert_eq!(index.state(), State::Empty);
        assert!(index.ordered_tracks().is_empty());

        assert_eq!(index.set_track_list(None), Ok(false));
        assert_eq!(index.state(), State::Empty);
        assert!(index.ordered_tracks().is_empty());

        assert_eq!(index.set_track_list(Some(&[])), Ok(true));
        assert_eq!(index.state(), State::Ready);
        assert!(index.ordered_tracks().is_empty());
    }

    #[test]
    fn none_keeps_prior_contents() {
        let mut index = TrackIndex::new();
        index.set_track_list(Some(&tracks(&["t1", "t2"]))).unwrap();
        assert_eq!(index.set_track_list(None), Ok(false));
        assert_eq!(ordered_ids(&index), vec!["t1", "t2"]);
    }

    #[test]
    fn same_list_twice_is_a_no_op() {
        for policy in [RebuildPolicy::FirstId, RebuildPolicy::Positional] {
            let mut index = TrackIndex::with_policy(policy);
            let input = tracks(&["t1", "t2", "t3"]);
            assert_eq!(index.set_track_list(Some(&input)), Ok(true));
            assert_eq!(index.set_track_list(Some(&input)), Ok(false));
            assert_eq!(ordered_ids(&index), vec!["t1", "t2", "t3"]);
        }
    }

    #[test]
    fn first_id_policy_ignores_changes_behind_the_first_track() {
        let mut index = TrackIndex::with_policy(RebuildPolicy::FirstId);
        index.set_track_list(Some(&tracks(&["t1", "t2", "t3"]))).unwrap();

        // Same first track, different tail: the index is not updated.
        assert_eq!(
            index.set_track_list(Some(&tracks(&["t1", "t9"]))),
            Ok(false)
        );
        assert_eq!(ordered_ids(&index), vec!["t1", "t2", "t3"]);
        assert!(index.get_track("t9").is_none());

        // A different first track does rebuild.
        assert_eq!(index.set_track_list(Some(&tracks(&["t9"]))), Ok(true));
        assert_eq!(ordered_ids(&index), vec!["t9"]);
    }

    #[test]
    fn first_id_policy_rebuilds_empty_lists() {
        let mut index = TrackIndex::with_policy(RebuildPolicy::FirstId);
        assert_eq!(index.set_track_list(Some(&[])), Ok(true));
        assert_eq!(index.set_track_list(Some(&[])), Ok(true));
    }

    #[test]
    fn positional_policy_rebuilds_on_reorder() {
        let mut index = TrackIndex::new();
        index.set_track_list(Some(&tracks(&["t1", "t2", "t3"]))).unwrap();

        assert_eq!(
            index.set_track_list(Some(&tracks(&["t1", "t3", "t2"]))),
            Ok(true)
        );
        assert_eq!(ordered_ids(&index), vec!["t1", "t3", "t2"]);
        assert_eq!(index.position("t3"), Some(1));

        assert_eq!(index.set_track_list(Some(&tracks(&["t1", "t3"]))), Ok(true));
        assert_eq!(ordered_ids(&index), vec!["t1", "t3"]);
        assert!(index.get_track("t2").is_none());

        assert_eq!(index.set_track_list(Some(&[])), Ok(true));
        assert!(index.is_empty());
        assert_eq!(index.set_track_list(Some(&[])), Ok(false));
    }

    #[test]
    fn malformed_track_leaves_index_untouched() {
        let mut index = TrackIndex::new();
        index.set_track_list(Some(&tracks(&["t1", "t2"]))).unwrap();

        let mut input = tracks(&["t3", "t4"]);
        input[1].album.images.clear();
        assert_eq!(
            index.set_track_list(Some(&input)),
            Err(Error::Track(track::Error::MalformedTrackDescriptor {
                id: "t4".to_owned(),
                reason: "no album art",
            }))
        );
        assert_eq!(ordered_ids(&index), vec!["t1", "t2"]);
        assert!(index.get_track("t3").is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut index = TrackIndex::new();
        assert_eq!(
            index.set_track_list(Some(&tracks(&["t1", "t2", "t1"]))),
            Err(Error::DuplicateTrack("t1".to_owned()))
        );
        assert_eq!(index.state(), State::Empty);
    }

    #[test]
    fn positions_and_ids_agree() {
        let mut index = TrackIndex::new();
        index
            .set_track_list(Some(&tracks(&["a", "b", "c", "d"])))
            .unwrap();

        for (position, track) in index.ordered_tracks().iter().enumerate() {
            assert_eq!(index.position(track.id()), Some(position));
            assert_eq!(index.get_track(track.id()), Some(track));
        }
        assert_eq!(index.positions.len(), index.tracks.len());
    }
}
