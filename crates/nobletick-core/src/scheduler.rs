//! Periodic refresh of the snapshot cache.
//!
//! One cycle: refresh the exchange rate (best-effort), scrape the source,
//! and swap the cache. Cycles are strictly serialized — a tick that lands
//! while a cycle is still in flight is skipped, never queued or overlapped.
//! Failures are absorbed here; nothing a source does can take the process
//! down.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{SnapshotCache, SourceStatus};
use crate::rates::ExchangeRates;
use crate::scraper::PriceSource;

pub struct RefreshScheduler {
    source: Arc<dyn PriceSource>,
    rates: ExchangeRates,
    cache: SnapshotCache,
    interval: Duration,
    in_flight: AtomicBool,
}

impl RefreshScheduler {
    pub fn new(
        source: Arc<dyn PriceSource>,
        rates: ExchangeRates,
        cache: SnapshotCache,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            rates,
            cache,
            interval,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Run one refresh attempt unless another is already in flight.
    ///
    /// Returns whether a cycle actually ran; a skipped attempt performs no
    /// cache mutation at all.
    pub async fn try_run(&self) -> bool {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("refresh already in flight, skipping tick");
            return false;
        }

        self.run_cycle().await;
        self.in_flight.store(false, Ordering::SeqCst);
        true
    }

    async fn run_cycle(&self) {
        let source = self.source.name();
        let rate = self.rates.current().await;

        match self.source.scrape(rate).await {
            Ok(records) if !records.is_empty() => {
                info!(source, records = records.len(), "refresh cycle succeeded");
                self.cache
                    .replace(records, one_source(source, SourceStatus::Success))
                    .await;
            }
            Ok(_) => {
                warn!(source, "refresh cycle extracted no records");
                self.cache
                    .mark_failed(one_source(source, SourceStatus::Failed))
                    .await;
            }
            Err(error) => {
                warn!(source, %error, status = error.status_code(), "refresh cycle failed");
                self.cache
                    .mark_failed(one_source(source, SourceStatus::Failed))
                    .await;
            }
        }
    }

    /// Run once immediately, then on every interval tick.
    ///
    /// Each tick spawns an attempt; the in-flight guard turns overlapping
    /// attempts into no-ops, so a slow cycle delays nothing and duplicates
    /// nothing.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            // tokio::time::interval rejects a zero period.
            let period = self.interval.max(Duration::from_secs(1));
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let job = Arc::clone(&self);
                tokio::spawn(async move {
                    job.try_run().await;
                });
            }
        })
    }
}

fn one_source(name: &str, status: SourceStatus) -> BTreeMap<String, SourceStatus> {
    BTreeMap::from([(name.to_owned(), status)])
}
