use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use motodir_core::{AppConfig, CrawlState, DirectoryEntry, GeoIndex, Location};
use motodir_scraper::{normalize_candidate, screen_candidates};

use super::state_file::{load_state, save_state, StateError};
use super::{CandidateSource, EntrySink};

/// Per-run knobs.
#[derive(Debug, Clone)]
pub(crate) struct RunSettings {
    pub batch_size: usize,
    pub inter_city_delay: Duration,
}

impl RunSettings {
    pub(crate) fn from_app_config(config: &AppConfig) -> Self {
        Self {
            batch_size: config.cities_per_run,
            inter_city_delay: Duration::from_millis(config.inter_city_delay_ms),
        }
    }
}

/// Totals for one run, plus the state that was persisted at its end.
#[derive(Debug, Default)]
pub(crate) struct RunSummary {
    pub cities: Vec<String>,
    pub candidates: usize,
    pub approved: usize,
    pub rejected: usize,
    pub added: u64,
    pub fetch_failures: usize,
    pub insert_failures: usize,
    pub rejections: BTreeMap<&'static str, usize>,
    pub state: CrawlState,
}

#[derive(Default)]
struct LocationOutcome {
    candidates: usize,
    approved: usize,
    rejected: usize,
    added: u64,
    fetch_failed: bool,
    insert_failed: bool,
    rejections: BTreeMap<&'static str, usize>,
}

/// Crawl the next window of `index` and persist the advanced state.
///
/// Locations are processed one at a time with `inter_city_delay` between
/// them. A failed fetch or insert only costs that location's results. The
/// state file is written once, after the last location; if the run dies
/// before that, the next run retries the same window.
///
/// # Errors
///
/// Returns [`StateError`] if the updated state cannot be written.
pub(crate) async fn run_once<S, K>(
    state_path: &Path,
    index: &GeoIndex,
    source: &S,
    sink: &K,
    settings: &RunSettings,
) -> Result<RunSummary, StateError>
where
    S: CandidateSource,
    K: EntrySink,
{
    let mut state = load_state(state_path, index.len());
    log_status(&state, index);

    if let Err(e) = sink.keep_alive().await {
        tracing::warn!(error = %e, "store keep-alive ping failed; continuing");
    }

    let window: Vec<&Location> = index
        .window(state.current_city_index, settings.batch_size)
        .map(|(_, location)| location)
        .collect();

    let mut summary = RunSummary::default();
    for (pos, location) in window.iter().enumerate() {
        tracing::info!(
            city = %location.name,
            country = %location.country,
            step = pos + 1,
            of = window.len(),
            "crawling location"
        );

        let outcome = crawl_location(location, source, sink).await;
        summary.absorb(outcome);
        summary.cities.push(location.display_city());
        state.record_city(&location.name);

        if pos + 1 < window.len() && !settings.inter_city_delay.is_zero() {
            tokio::time::sleep(settings.inter_city_delay).await;
        }
    }

    state.commit_run(settings.batch_size, index.len(), summary.added, Utc::now());
    save_state(state_path, &state)?;
    summary.state = state;

    tracing::info!(
        cities = summary.cities.len(),
        candidates = summary.candidates,
        approved = summary.approved,
        rejected = summary.rejected,
        added = summary.added,
        fetch_failures = summary.fetch_failures,
        insert_failures = summary.insert_failures,
        next_index = summary.state.current_city_index,
        total_runs = summary.state.total_runs,
        total_shops_added = summary.state.total_shops_added,
        "crawl run complete"
    );
    for (reason, count) in &summary.rejections {
        tracing::info!(reason, count, "rejections");
    }

    Ok(summary)
}

async fn crawl_location<S, K>(location: &Location, source: &S, sink: &K) -> LocationOutcome
where
    S: CandidateSource,
    K: EntrySink,
{
    let mut outcome = LocationOutcome::default();

    let candidates = match source.fetch(location).await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::warn!(city = %location.name, error = %e, "candidate fetch failed; skipping location");
            outcome.fetch_failed = true;
            return outcome;
        }
    };
    outcome.candidates = candidates.len();

    let screened = screen_candidates(candidates, location);
    outcome.approved = screened.approved.len();
    outcome.rejected = screened.rejected.len();
    outcome.rejections = screened.rejection_tally();

    let scraped_at = Utc::now();
    let entries: Vec<DirectoryEntry> = screened
        .approved
        .iter()
        .map(|(candidate, accepted)| normalize_candidate(candidate, accepted, location, scraped_at))
        .collect();

    if !entries.is_empty() {
        match sink.insert(&entries).await {
            Ok(added) => outcome.added = added,
            Err(e) => {
                tracing::warn!(city = %location.name, error = %e, "store insert failed");
                outcome.insert_failed = true;
            }
        }
    }

    tracing::info!(
        city = %location.name,
        candidates = outcome.candidates,
        approved = outcome.approved,
        rejected = outcome.rejected,
        added = outcome.added,
        "location done"
    );
    outcome
}

impl RunSummary {
    fn absorb(&mut self, outcome: LocationOutcome) {
        self.candidates += outcome.candidates;
        self.approved += outcome.approved;
        self.rejected += outcome.rejected;
        self.added = self.added.saturating_add(outcome.added);
        self.fetch_failures += usize::from(outcome.fetch_failed);
        self.insert_failures += usize::from(outcome.insert_failed);
        for (reason, count) in outcome.rejections {
            *self.rejections.entry(reason).or_insert(0) += count;
        }
    }
}

fn log_status(state: &CrawlState, index: &GeoIndex) {
    let last_run = state
        .last_run_at
        .map_or_else(|| "never".to_string(), |t| t.to_rfc3339());
    let next = index
        .get(state.current_city_index)
        .map_or("?", |location| location.name.as_str());
    tracing::info!(
        total_runs = state.total_runs,
        total_shops_added = state.total_shops_added,
        cities_completed = state.cities_completed.len(),
        index_len = index.len(),
        next_index = state.current_city_index,
        next_city = next,
        last_run = %last_run,
        "crawl status"
    );
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
