//! One crawl invocation: fetch, screen, normalize and store the next batch of
//! locations, then advance the persisted cursor.
//!
//! The orchestrator talks to the geodata service and the store only through
//! [`CandidateSource`] and [`EntrySink`], so tests can drive it with fakes.

mod adapters;
mod orchestrator;
mod state_file;

use std::fmt::Display;

use motodir_core::{DirectoryEntry, Location};
use motodir_scraper::RawCandidate;

pub(crate) use adapters::PgSink;
pub(crate) use orchestrator::{run_once, RunSettings, RunSummary};
pub(crate) use state_file::load_state;

/// Where raw candidates for a location come from.
pub(crate) trait CandidateSource {
    type Error: Display;

    /// Candidates within the search radius of `location`.
    async fn fetch(&self, location: &Location) -> Result<Vec<RawCandidate>, Self::Error>;
}

/// Where accepted directory entries go.
pub(crate) trait EntrySink {
    type Error: Display;

    /// Cheap read issued once at run start.
    async fn keep_alive(&self) -> Result<(), Self::Error>;

    /// Store a batch and return how many rows were newly added.
    async fn insert(&self, entries: &[DirectoryEntry]) -> Result<u64, Self::Error>;
}
