use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nobletick_core::{
    Config, ExchangeRates, KitcoScraper, RefreshScheduler, ReqwestFetcher, SnapshotCache,
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let config = Config::from_env();
    let fetcher = Arc::new(ReqwestFetcher::new());

    let cache = SnapshotCache::new();
    let rates = ExchangeRates::new(fetcher.clone());
    let scraper = Arc::new(KitcoScraper::new(fetcher));

    let scheduler = Arc::new(RefreshScheduler::new(
        scraper,
        rates,
        cache.clone(),
        config.refresh_interval,
    ));
    scheduler.spawn();

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, interval = ?config.refresh_interval, "nobletick listening");

    axum::serve(listener, nobletick_web::router(cache)).await
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
