//! Kitco page scraper behind the [`PriceSource`] seam.
//!
//! Kitco ships its spot prices as a dehydrated query payload embedded in a
//! Next.js script element. One scrape is: fetch the page, pick the script
//! body carrying the data markers, cut the balanced JSON object out of it,
//! walk the wrapper down to the market data, normalize.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::extract::{find_data_bearing_segment, locate_json_object, script_segments};
use crate::http::{FetchRequest, PageFetcher};
use crate::normalize::normalize;
use crate::{ExtractionError, FetchError, MetalPrice, ScrapeError, UtcDateTime};

/// Provider name reported in snapshot source status.
pub const KITCO_SOURCE: &str = "Kitco";

const KITCO_URL: &str = "https://www.kitco.com/price/precious-metals";
const PAGE_TIMEOUT: Duration = Duration::from_secs(15);
// Browser-like agent; the page blocks obvious non-browser clients.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120 Safari/537.36";
const PAYLOAD_MARKER: &str = "{\"props\"";
const DATA_MARKERS: [&str; 2] = ["\"gold\"", "\"bid\""];

/// One scrapeable price provider.
///
/// The scheduler only sees this seam; a second provider (or a test fake)
/// plugs in without touching the refresh loop.
pub trait PriceSource: Send + Sync {
    /// Name used as the key in the snapshot's source status map.
    fn name(&self) -> &'static str;

    /// Run one scrape using the given USD→INR multiplier.
    fn scrape<'a>(
        &'a self,
        rate: f64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MetalPrice>, ScrapeError>> + Send + 'a>>;
}

/// Scraper for Kitco's precious-metals page.
pub struct KitcoScraper {
    fetcher: Arc<dyn PageFetcher>,
    page_url: String,
}

// Next.js dehydrated-query wrapper around the market data. Only the spine
// down to `state.data` is typed; the data node itself stays dynamic.
#[derive(Debug, Deserialize)]
struct EmbeddedPayload {
    props: PayloadProps,
}

#[derive(Debug, Deserialize)]
struct PayloadProps {
    #[serde(rename = "pageProps")]
    page_props: PageProps,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    #[serde(rename = "dehydratedState")]
    dehydrated_state: DehydratedState,
}

#[derive(Debug, Deserialize)]
struct DehydratedState {
    queries: Vec<QueryEntry>,
}

#[derive(Debug, Deserialize)]
struct QueryEntry {
    state: QueryState,
}

#[derive(Debug, Deserialize)]
struct QueryState {
    data: Value,
}

impl KitcoScraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self::with_page_url(fetcher, KITCO_URL)
    }

    pub fn with_page_url(fetcher: Arc<dyn PageFetcher>, page_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            page_url: page_url.into(),
        }
    }

    async fn fetch_markup(&self) -> Result<String, FetchError> {
        let request = FetchRequest::get(self.page_url.as_str())
            .with_header("user-agent", BROWSER_USER_AGENT)
            .with_timeout(PAGE_TIMEOUT);

        let response = self.fetcher.fetch(request).await?;
        if !response.is_success() {
            return Err(FetchError::status(
                response.status,
                format!("metals page returned status {}", response.status),
            ));
        }

        Ok(response.body)
    }

    /// Cut the market-data node out of raw page markup.
    fn market_data(markup: &str) -> Result<Value, ExtractionError> {
        let segments = script_segments(markup);
        let segment = find_data_bearing_segment(segments, &DATA_MARKERS)
            .ok_or(ExtractionError::DataSegmentNotFound)?;

        let payload_json =
            locate_json_object(segment, PAYLOAD_MARKER).ok_or_else(|| {
                ExtractionError::UnbalancedJson {
                    marker: PAYLOAD_MARKER.to_owned(),
                }
            })?;

        let payload: EmbeddedPayload =
            serde_json::from_str(payload_json).map_err(|e| ExtractionError::Json(e.to_string()))?;

        let entry = payload
            .props
            .page_props
            .dehydrated_state
            .queries
            .into_iter()
            .next()
            .ok_or(ExtractionError::Shape {
                path: "props.pageProps.dehydratedState.queries[0]",
            })?;

        Ok(entry.state.data)
    }
}

impl PriceSource for KitcoScraper {
    fn name(&self) -> &'static str {
        KITCO_SOURCE
    }

    fn scrape<'a>(
        &'a self,
        rate: f64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MetalPrice>, ScrapeError>> + Send + 'a>> {
        Box::pin(async move {
            let markup = self.fetch_markup().await?;
            let data = Self::market_data(&markup)?;
            let records = normalize(&data, rate, KITCO_SOURCE, UtcDateTime::now());
            debug!(records = records.len(), "kitco scrape extracted records");
            Ok(records)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_payload(payload: &str) -> String {
        format!(
            "<html><head><script>var boring = true;</script></head><body>\
             <script id=\"__NEXT_DATA__\" type=\"application/json\">{payload}</script>\
             </body></html>"
        )
    }

    fn dehydrated(data: &str) -> String {
        format!(
            "{{\"props\":{{\"pageProps\":{{\"dehydratedState\":\
             {{\"queries\":[{{\"state\":{{\"data\":{data}}}}}]}}}}}}}}"
        )
    }

    #[test]
    fn extracts_market_data_from_page() {
        let page = page_with_payload(&dehydrated(
            r#"{"gold":{"results":[{"bid":2000.0}]}}"#,
        ));
        let data = KitcoScraper::market_data(&page).expect("must extract");
        assert_eq!(data["gold"]["results"][0]["bid"], 2000.0);
    }

    #[test]
    fn page_without_data_markers_fails_extraction() {
        let page = page_with_payload(r#"{"props":{"irrelevant":true}}"#);
        let err = KitcoScraper::market_data(&page).expect_err("must fail");
        assert_eq!(err, ExtractionError::DataSegmentNotFound);
    }

    #[test]
    fn truncated_payload_fails_extraction() {
        // Markers present, braces never balance.
        let page = page_with_payload(r#"{"props":{"gold":1,"bid":2"#);
        let err = KitcoScraper::market_data(&page).expect_err("must fail");
        assert!(matches!(err, ExtractionError::UnbalancedJson { .. }));
    }

    #[test]
    fn unexpected_wrapper_shape_fails_extraction() {
        let page = page_with_payload(r#"{"props":{"gold":1,"bid":2,"pageProps":{}}}"#);
        let err = KitcoScraper::market_data(&page).expect_err("must fail");
        assert!(matches!(err, ExtractionError::Json(_)));
    }

    #[test]
    fn empty_query_list_fails_extraction() {
        let page = page_with_payload(
            r#"{"props":{"pageProps":{"dehydratedState":{"queries":[]}},"gold":1,"bid":2}}"#,
        );
        let err = KitcoScraper::market_data(&page).expect_err("must fail");
        assert!(matches!(err, ExtractionError::Shape { .. }));
    }
}
