//! # Nobletick Core
//!
//! Scraping, normalization and caching core for the nobletick spot-price
//! service.
//!
//! ## Overview
//!
//! The crate covers the whole pipeline between the upstream metals page and
//! the HTTP API that `nobletick-web` puts on top:
//!
//! - **Extraction** of the JSON payload embedded in scraped markup
//! - **Normalization** into USD/INR, per-ounce/per-gram price records
//! - **Exchange-rate** lookup with an explicit degrade-on-failure contract
//! - **Snapshot cache** holding the latest records and source health
//! - **Refresh scheduler** driving the fetch→extract→normalize→swap loop
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Latest-snapshot cache with source status |
//! | [`config`] | Environment configuration with defaults |
//! | [`domain`] | Metals, price records, timestamps |
//! | [`error`] | Error taxonomy (`FetchError`, `ExtractionError`, …) |
//! | [`extract`] | Balanced-brace JSON location in markup |
//! | [`http`] | Transport seam (`PageFetcher`) over reqwest |
//! | [`normalize`] | Market-data tree → price records |
//! | [`rates`] | Cached USD→INR multiplier |
//! | [`scheduler`] | Serialized periodic refresh |
//! | [`scraper`] | Kitco scraper behind the `PriceSource` seam |
//!
//! ## Error handling
//!
//! Refresh-cycle errors (`ScrapeError`) are absorbed at the scheduler
//! boundary and become a degraded snapshot — empty records plus a `failed`
//! source status — never a crash. The exchange-rate path degrades further:
//! its failures are swallowed entirely and the cached rate is reused.

pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod extract;
pub mod http;
pub mod normalize;
pub mod rates;
pub mod scheduler;
pub mod scraper;

pub use cache::{Snapshot, SnapshotCache, SourceStatus};
pub use config::Config;
pub use domain::{round2, Metal, MetalPrice, UtcDateTime, GRAMS_PER_TROY_OUNCE};
pub use error::{ExtractionError, FetchError, ScrapeError, ValidationError};
pub use http::{FetchRequest, FetchResponse, PageFetcher, ReqwestFetcher};
pub use rates::{ExchangeRates, DEFAULT_USD_INR_RATE};
pub use scheduler::RefreshScheduler;
pub use scraper::{KitcoScraper, PriceSource, KITCO_SOURCE};
