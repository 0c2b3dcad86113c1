//! HTTP client for the Overpass interpreter endpoint.

use std::time::Duration;

use motodir_core::Location;
use reqwest::{Client, Url};

use crate::error::ScraperError;
use crate::query::build_overpass_query;
use crate::rate_limit::retry_with_backoff;
use crate::types::{OverpassResponse, RawCandidate};

/// Client for one Overpass interpreter endpoint.
///
/// Every call is a single POST of an Overpass QL query. Transient failures
/// (429, 5xx, timeouts) are retried with exponential backoff up to
/// `max_retries` additional attempts.
pub struct OverpassClient {
    client: Client,
    endpoint: Url,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl OverpassClient {
    /// Creates a client for `endpoint` with the given timeout, `User-Agent`,
    /// and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `endpoint` does not parse, or
    /// [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(
        endpoint: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let endpoint = Url::parse(endpoint).map_err(|e| ScraperError::InvalidUrl {
            url: endpoint.to_owned(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            max_retries,
            backoff_base_secs,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Runs the repair-shop query around `location` and returns the elements
    /// that carry a usable coordinate pair.
    ///
    /// Elements without coordinates are dropped silently. A `remark` in the
    /// response (server-side timeout or memory exhaustion) is logged; whatever
    /// elements arrived alongside it are still returned.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network or TLS failure after all retries.
    /// - [`ScraperError::Deserialize`]: the body is not an Overpass JSON document.
    pub async fn fetch_candidates(
        &self,
        location: &Location,
        radius_km: f64,
    ) -> Result<Vec<RawCandidate>, ScraperError> {
        let query = build_overpass_query(location, radius_km);
        let response = self.run_query(&query).await?;

        if let Some(remark) = &response.remark {
            tracing::warn!(city = %location.name, remark, "geodata service returned a remark");
        }

        let total = response.elements.len();
        let candidates: Vec<RawCandidate> = response
            .elements
            .into_iter()
            .filter_map(crate::types::OverpassElement::into_candidate)
            .collect();
        if candidates.len() < total {
            tracing::debug!(
                city = %location.name,
                dropped = total - candidates.len(),
                "dropped elements without coordinates"
            );
        }
        Ok(candidates)
    }

    async fn run_query(&self, query: &str) -> Result<OverpassResponse, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let response = self
                .client
                .post(self.endpoint.clone())
                .header(reqwest::header::CONTENT_TYPE, "text/plain")
                .header(reqwest::header::ACCEPT, "application/json")
                .body(query.to_owned())
                .send()
                .await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(0);
                return Err(ScraperError::RateLimited { retry_after_secs });
            }

            if !status.is_success() {
                return Err(ScraperError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: self.endpoint.to_string(),
                });
            }

            let body = response.text().await?;
            serde_json::from_str::<OverpassResponse>(&body).map_err(|source| {
                ScraperError::Deserialize {
                    context: "overpass response".to_owned(),
                    source,
                }
            })
        })
        .await
    }
}
