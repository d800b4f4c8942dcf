//! Statistics API client
//!
//! Endpoint: `<api_url>?start=DD-MM-YYYY&end=DD-MM-YYYY` (window parameters optional)
//! Returns: JSON array of contract records

use super::{ContractSource, DateWindow};
use crate::error::{StatsError, StatsResult};
use crate::normalizer::RawContract;
use async_trait::async_trait;
use std::time::Duration;

/// Contract source backed by the remote statistics API
pub struct HttpContractSource {
    client: reqwest::Client,
    api_url: String,
    proxied: bool,
}

impl HttpContractSource {
    /// Build a client with a per-request timeout and an optional HTTP proxy
    ///
    /// Only plain-HTTP traffic is routed through the proxy, matching a Tor
    /// privoxy-style setup in front of an onion service.
    pub fn new(api_url: impl Into<String>, proxy_url: Option<&str>, timeout: Duration) -> StatsResult<Self> {
        let mut builder = reqwest::Client::builder().timeout(timeout);

        if let Some(proxy) = proxy_url {
            builder = builder.proxy(reqwest::Proxy::http(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
            api_url: api_url.into(),
            proxied: proxy_url.is_some(),
        })
    }
}

#[async_trait]
impl ContractSource for HttpContractSource {
    async fn fetch(&self, window: Option<DateWindow>) -> StatsResult<Vec<RawContract>> {
        let mut request = self.client.get(&self.api_url);
        if let Some(window) = window {
            request = request.query(&[("start", window.start_param()), ("end", window.end_param())]);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(StatsError::Status {
                url: response.url().to_string(),
                status: response.status().as_u16(),
            });
        }

        let records: Vec<RawContract> = response.json().await?;
        Ok(records)
    }

    fn describe(&self) -> String {
        if self.proxied {
            format!("{} (via proxy)", self.api_url)
        } else {
            self.api_url.clone()
        }
    }
}
