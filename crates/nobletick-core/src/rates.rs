//! USD→INR exchange rate, refreshed opportunistically.
//!
//! The rate rides along with each scrape cycle: refresh before scraping,
//! and on any failure keep serving the previously cached value. Failure
//! here never propagates — the degrade path is the contract, so
//! [`ExchangeRates::current`] is infallible by signature.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::http::{FetchRequest, PageFetcher};
use crate::{ExtractionError, FetchError, ScrapeError, UtcDateTime};

/// Fallback multiplier used until the first successful fetch.
pub const DEFAULT_USD_INR_RATE: f64 = 90.0;

const RATE_ENDPOINT: &str = "https://api.exchangerate-api.com/v4/latest/USD";
const RATE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy)]
struct CachedRate {
    rate: f64,
    fetched_at: Option<UtcDateTime>,
}

/// Cached USD→INR multiplier behind the transport seam.
#[derive(Clone)]
pub struct ExchangeRates {
    fetcher: Arc<dyn PageFetcher>,
    endpoint: String,
    cached: Arc<Mutex<CachedRate>>,
}

#[derive(Debug, Deserialize)]
struct RatesPayload {
    rates: RateTable,
}

#[derive(Debug, Deserialize)]
struct RateTable {
    #[serde(rename = "INR")]
    inr: Option<f64>,
}

impl ExchangeRates {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self::with_endpoint(fetcher, RATE_ENDPOINT)
    }

    pub fn with_endpoint(fetcher: Arc<dyn PageFetcher>, endpoint: impl Into<String>) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.into(),
            cached: Arc::new(Mutex::new(CachedRate {
                rate: DEFAULT_USD_INR_RATE,
                fetched_at: None,
            })),
        }
    }

    /// Cached rate without touching the network.
    pub async fn cached(&self) -> f64 {
        self.cached.lock().await.rate
    }

    /// When the cached rate was last fetched, if ever.
    pub async fn fetched_at(&self) -> Option<UtcDateTime> {
        self.cached.lock().await.fetched_at
    }

    /// Refresh the rate, falling back to the cached value on any failure.
    pub async fn current(&self) -> f64 {
        match self.refresh().await {
            Ok(rate) => rate,
            Err(error) => {
                let cached = self.cached().await;
                warn!(%error, rate = cached, "exchange rate refresh failed, reusing cached rate");
                cached
            }
        }
    }

    async fn refresh(&self) -> Result<f64, ScrapeError> {
        let request = FetchRequest::get(self.endpoint.as_str()).with_timeout(RATE_TIMEOUT);
        let response = self.fetcher.fetch(request).await?;

        if !response.is_success() {
            return Err(FetchError::status(
                response.status,
                format!("exchange rate endpoint returned status {}", response.status),
            )
            .into());
        }

        let payload: RatesPayload = serde_json::from_str(&response.body)
            .map_err(|e| ExtractionError::Json(e.to_string()))?;
        let rate = payload
            .rates
            .inr
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .ok_or(ExtractionError::Shape { path: "rates.INR" })?;

        let mut cached = self.cached.lock().await;
        cached.rate = rate;
        cached.fetched_at = Some(UtcDateTime::now());
        info!(rate, "exchange rate updated");

        Ok(rate)
    }
}
