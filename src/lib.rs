//! Artist discovery and preview playback metadata for the Spotify catalog.
//!
//! * [`search`] - search artists and hand a selection to the track list
//! * [`top_tracks`] - fetch an artist's top tracks into a [`TrackIndex`]
//! * [`index`] - ordered, id-addressable metadata for a playback queue
//! * [`catalog`] - the remote catalog, injectable for tests
//!
//! [`TrackIndex`]: index::TrackIndex
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[macro_use]
extern crate log;

pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod index;
pub mod protocol;
pub mod search;
pub mod token;
pub mod top_tracks;
pub mod track;
