//! Resumable crawl cursor and run counters.
//!
//! The cursor treats the geo-index as a ring: each run covers a fixed-size
//! window starting at `current_city_index`, then advances the cursor by the
//! window size modulo the index length. The crawl never finishes; it keeps
//! revisiting every location.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlState {
    pub current_city_index: usize,
    pub total_runs: u64,
    pub total_shops_added: u64,
    #[serde(rename = "lastRun")]
    pub last_run_at: Option<DateTime<Utc>>,
    /// Names of every location visited at least once, in first-visit order.
    #[serde(default)]
    pub cities_completed: Vec<String>,
}

impl CrawlState {
    /// Pull a cursor that no longer fits the index back into range.
    ///
    /// Happens when the geo-index file shrinks between runs.
    #[must_use]
    pub fn clamped_to(mut self, index_len: usize) -> Self {
        if index_len > 0 {
            self.current_city_index %= index_len;
        }
        self
    }

    /// Record a visited location. Returns `true` on the first visit.
    pub fn record_city(&mut self, name: &str) -> bool {
        if self.cities_completed.iter().any(|c| c == name) {
            return false;
        }
        self.cities_completed.push(name.to_string());
        true
    }

    /// Cursor position after a run of `batch_size` locations.
    #[must_use]
    pub fn next_index(&self, batch_size: usize, index_len: usize) -> usize {
        if index_len == 0 {
            return 0;
        }
        (self.current_city_index + batch_size % index_len) % index_len
    }

    /// Close out a run: advance the cursor and bump the counters.
    pub fn commit_run(
        &mut self,
        batch_size: usize,
        index_len: usize,
        shops_added: u64,
        finished_at: DateTime<Utc>,
    ) {
        self.current_city_index = self.next_index(batch_size, index_len);
        self.total_runs = self.total_runs.saturating_add(1);
        self.total_shops_added = self.total_shops_added.saturating_add(shops_added);
        self.last_run_at = Some(finished_at);
    }
}
