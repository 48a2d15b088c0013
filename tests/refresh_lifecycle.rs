//! Refresh-cycle lifecycle: cache replacement, failure degradation,
//! exchange-rate fallback, and cycle serialization.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use nobletick_core::{
    round2, ExchangeRates, FetchError, KitcoScraper, Metal, MetalPrice, PriceSource,
    RefreshScheduler, ScrapeError, SnapshotCache, SourceStatus, UtcDateTime,
    DEFAULT_USD_INR_RATE,
};
use nobletick_tests::{kitco_page, rate_body, ScriptedFetcher};

const RATE_URL: &str = "exchangerate-api.com";
const PAGE_URL: &str = "kitco.com";

fn scheduler_over(fetcher: Arc<ScriptedFetcher>, cache: SnapshotCache) -> RefreshScheduler {
    RefreshScheduler::new(
        Arc::new(KitcoScraper::new(fetcher.clone())),
        ExchangeRates::new(fetcher),
        cache,
        Duration::from_secs(60),
    )
}

// =============================================================================
// Successful cycles
// =============================================================================

#[tokio::test]
async fn when_scrape_succeeds_snapshot_is_replaced_wholesale() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    fetcher.script_ok(RATE_URL, 200, &rate_body(83.0));
    fetcher.script_ok(
        PAGE_URL,
        200,
        &kitco_page(
            r#"{"gold":{"results":[{"bid":2000.0}]},"silver":{"results":[{"bid":24.5}]}}"#,
        ),
    );

    let cache = SnapshotCache::new();
    let ran = scheduler_over(fetcher, cache.clone()).try_run().await;
    assert!(ran);

    let snapshot = cache.read().await;
    assert_eq!(snapshot.records.len(), 2);
    assert_eq!(snapshot.records[0].metal, Metal::Gold);
    // The freshly fetched rate, not the default, priced the records.
    assert_eq!(snapshot.records[0].price_inr, round2(2000.0 * 83.0));
    assert!(snapshot.last_updated.is_some());
    assert_eq!(
        snapshot.source_status.get("Kitco"),
        Some(&SourceStatus::Success)
    );
}

// =============================================================================
// Failed cycles degrade the snapshot, never the process
// =============================================================================

#[tokio::test]
async fn when_page_fetch_dies_records_empty_but_last_updated_survives() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    fetcher.script_ok(RATE_URL, 200, &rate_body(83.0));
    fetcher.script_ok(
        PAGE_URL,
        200,
        &kitco_page(r#"{"gold":{"results":[{"bid":2000.0}]}}"#),
    );

    let cache = SnapshotCache::new();
    let scheduler = scheduler_over(fetcher.clone(), cache.clone());
    scheduler.try_run().await;
    let stamped = cache.read().await.last_updated;
    assert!(stamped.is_some());

    // The upstream goes dark between cycles.
    fetcher.script_err(PAGE_URL, FetchError::transport("request timeout"));
    scheduler.try_run().await;

    let snapshot = cache.read().await;
    assert!(snapshot.records.is_empty());
    assert_eq!(
        snapshot.source_status.get("Kitco"),
        Some(&SourceStatus::Failed)
    );
    assert_eq!(snapshot.last_updated, stamped);
}

#[tokio::test]
async fn when_page_returns_error_status_cycle_is_a_failure() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    fetcher.script_ok(RATE_URL, 200, &rate_body(83.0));
    fetcher.script_ok(PAGE_URL, 503, "upstream unavailable");

    let cache = SnapshotCache::new();
    scheduler_over(fetcher, cache.clone()).try_run().await;

    let snapshot = cache.read().await;
    assert!(snapshot.records.is_empty());
    assert_eq!(
        snapshot.source_status.get("Kitco"),
        Some(&SourceStatus::Failed)
    );
    assert_eq!(snapshot.last_updated, None);
}

#[tokio::test]
async fn when_extraction_yields_zero_records_cycle_counts_as_failure() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    fetcher.script_ok(RATE_URL, 200, &rate_body(83.0));
    // Markers are present but every price field is zero, so no record
    // qualifies.
    fetcher.script_ok(
        PAGE_URL,
        200,
        &kitco_page(r#"{"gold":{"results":[{"bid":0.0,"ask":0.0,"close":0.0}]}}"#),
    );

    let cache = SnapshotCache::new();
    scheduler_over(fetcher, cache.clone()).try_run().await;

    let snapshot = cache.read().await;
    assert!(snapshot.records.is_empty());
    assert_eq!(
        snapshot.source_status.get("Kitco"),
        Some(&SourceStatus::Failed)
    );
}

// =============================================================================
// Exchange-rate degradation
// =============================================================================

#[tokio::test]
async fn when_rate_fetch_never_succeeds_default_rate_is_used() {
    let rates = ExchangeRates::new(Arc::new(ScriptedFetcher::new()));
    assert_eq!(rates.current().await, DEFAULT_USD_INR_RATE);
    assert_eq!(rates.fetched_at().await, None);
}

#[tokio::test]
async fn when_rate_fetch_fails_later_cached_rate_is_reused_silently() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    fetcher.script_ok(RATE_URL, 200, &rate_body(83.25));

    let rates = ExchangeRates::new(fetcher.clone());
    assert_eq!(rates.current().await, 83.25);

    fetcher.script_err(RATE_URL, FetchError::transport("request timeout"));
    assert_eq!(rates.current().await, 83.25);
    assert!(rates.fetched_at().await.is_some());
}

#[tokio::test]
async fn when_rate_payload_has_no_inr_entry_cached_rate_is_kept() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    fetcher.script_ok(RATE_URL, 200, r#"{"base":"USD","rates":{"EUR":0.92}}"#);

    let rates = ExchangeRates::new(fetcher);
    assert_eq!(rates.current().await, DEFAULT_USD_INR_RATE);
}

// =============================================================================
// Cycle serialization
// =============================================================================

struct SlowSource {
    calls: AtomicUsize,
}

impl PriceSource for SlowSource {
    fn name(&self) -> &'static str {
        "Slow"
    }

    fn scrape<'a>(
        &'a self,
        rate: f64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MetalPrice>, ScrapeError>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(100)).await;
            let record =
                MetalPrice::from_ounce_price(Metal::Gold, 2000.0, rate, "Slow", UtcDateTime::now())
                    .expect("record");
            Ok(vec![record])
        })
    }
}

#[tokio::test]
async fn when_a_cycle_is_in_flight_the_next_attempt_is_skipped() {
    let source = Arc::new(SlowSource {
        calls: AtomicUsize::new(0),
    });
    let scheduler = RefreshScheduler::new(
        source.clone(),
        ExchangeRates::new(Arc::new(ScriptedFetcher::new())),
        SnapshotCache::new(),
        Duration::from_secs(60),
    );

    let (first, second) = tokio::join!(scheduler.try_run(), scheduler.try_run());

    assert!(first ^ second, "exactly one attempt must run");
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);

    // Once the guard is released the scheduler runs again.
    assert!(scheduler.try_run().await);
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}
