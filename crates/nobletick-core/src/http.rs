//! HTTP transport seam for upstream fetches.
//!
//! The scraper and the exchange-rate provider talk to the network through
//! [`PageFetcher`] so tests can swap in deterministic offline transports.
//! The service only ever issues GETs.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::FetchError;

/// Request envelope for one upstream GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub timeout: Duration,
}

impl FetchRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Response envelope returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport contract for upstream GETs.
///
/// Implementations must be `Send + Sync`; the scheduler shares one fetcher
/// across cycles.
pub trait PageFetcher: Send + Sync {
    fn fetch<'a>(
        &'a self,
        request: FetchRequest,
    ) -> Pin<Box<dyn Future<Output = Result<FetchResponse, FetchError>> + Send + 'a>>;
}

/// Production transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Arc<reqwest::Client>,
}

impl ReqwestFetcher {
    pub fn new() -> Self {
        Self {
            client: Arc::new(reqwest::Client::new()),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl Default for ReqwestFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PageFetcher for ReqwestFetcher {
    fn fetch<'a>(
        &'a self,
        request: FetchRequest,
    ) -> Pin<Box<dyn Future<Output = Result<FetchResponse, FetchError>> + Send + 'a>> {
        Box::pin(async move {
            let mut builder = self.client.get(&request.url).timeout(request.timeout);

            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    FetchError::transport(format!("request timeout: {e}"))
                } else if e.is_connect() {
                    FetchError::transport(format!("connection failed: {e}"))
                } else {
                    FetchError::transport(format!("request failed: {e}"))
                }
            })?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| FetchError::transport(format!("failed to read response body: {e}")))?;

            Ok(FetchResponse { status, body })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_names_are_lowercased() {
        let request = FetchRequest::get("https://example.test/page")
            .with_header("User-Agent", "nobletick-test");

        assert_eq!(
            request.headers.get("user-agent").map(String::as_str),
            Some("nobletick-test")
        );
    }

    #[test]
    fn success_covers_2xx_only() {
        let ok = FetchResponse {
            status: 204,
            body: String::new(),
        };
        let redirect = FetchResponse {
            status: 301,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
    }
}
