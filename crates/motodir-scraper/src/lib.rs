pub mod client;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod query;
mod rate_limit;
pub mod types;

pub use client::OverpassClient;
pub use error::ScraperError;
pub use filter::{
    check_radius, evaluate, screen_candidates, Accepted, FilterVerdict, RejectedCandidate,
    Rejection, Screened,
};
pub use normalize::{build_address, normalize_candidate, place_id_for};
pub use query::build_overpass_query;
pub use types::{OverpassElement, OverpassResponse, RawCandidate};
