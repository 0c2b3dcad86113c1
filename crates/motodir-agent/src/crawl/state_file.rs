//! Crawl state persistence: one JSON document, read at run start and
//! replaced atomically at run end.

use std::io::Write as _;
use std::path::Path;

use motodir_core::CrawlState;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum StateError {
    #[error("failed to write crawl state {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize crawl state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Read the persisted state, falling back to a fresh zero-valued state when
/// the file is missing or unreadable. The cursor is pulled back into range
/// for an index of `index_len` locations.
pub(crate) fn load_state(path: &Path, index_len: usize) -> CrawlState {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no crawl state yet; starting from the first location");
            return CrawlState::default();
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "crawl state unreadable; starting fresh");
            return CrawlState::default();
        }
    };

    match serde_json::from_str::<CrawlState>(&raw) {
        Ok(state) => state.clamped_to(index_len),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "crawl state corrupt; starting fresh");
            CrawlState::default()
        }
    }
}

/// Write `state` to `path` via a temp file in the same directory and a
/// rename, so readers never see a partial document.
pub(crate) fn save_state(path: &Path, state: &CrawlState) -> Result<(), StateError> {
    let json = serde_json::to_string_pretty(state)?;
    let io_err = |source: std::io::Error| StateError::Io {
        path: path.display().to_string(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(json.as_bytes()).map_err(io_err)?;
    tmp.write_all(b"\n").map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
