use motodir_core::{ConflictPolicy, DirectoryEntry, Location, SEARCH_RADIUS_KM};
use motodir_db::DbError;
use motodir_scraper::{OverpassClient, RawCandidate, ScraperError};
use sqlx::PgPool;

use super::{CandidateSource, EntrySink};

impl CandidateSource for OverpassClient {
    type Error = ScraperError;

    async fn fetch(&self, location: &Location) -> Result<Vec<RawCandidate>, ScraperError> {
        self.fetch_candidates(location, SEARCH_RADIUS_KM).await
    }
}

/// The `repair_shops` table as an [`EntrySink`].
pub(crate) struct PgSink {
    pool: PgPool,
    policy: ConflictPolicy,
}

impl PgSink {
    pub(crate) fn new(pool: PgPool, policy: ConflictPolicy) -> Self {
        Self { pool, policy }
    }
}

impl EntrySink for PgSink {
    type Error = DbError;

    async fn keep_alive(&self) -> Result<(), DbError> {
        let has_rows = motodir_db::keep_alive(&self.pool).await?;
        tracing::debug!(has_rows, "store keep-alive ping ok");
        Ok(())
    }

    /// A duplicate-key failure under [`ConflictPolicy::Reject`] means this
    /// window was crawled before; it counts as zero rows added, not an error.
    async fn insert(&self, entries: &[DirectoryEntry]) -> Result<u64, DbError> {
        match motodir_db::insert_repair_shops(&self.pool, entries, self.policy).await {
            Ok(added) => Ok(added),
            Err(DbError::DuplicateKey(detail)) => {
                tracing::info!(
                    batch = entries.len(),
                    detail = %detail,
                    "batch already in the directory; nothing added"
                );
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }
}
