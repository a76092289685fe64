use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::AppError;

use super::fetcher::{ApiRequest, HttpTransport, RetryPolicy, RetryingFetcher};
use super::rate_limiter::RateLimiter;
use super::region::Platform;

/// Typed access to the Riot endpoints used by the lookups.
///
/// Summoner and league calls go to the platform host, account and match calls
/// to the regional host derived from it.
#[derive(Debug)]
pub struct RiotClient {
    fetcher: RetryingFetcher,
    platform: Platform,
    platform_url: String,
    region_url: String,
}

impl RiotClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let transport = HttpTransport::new(config.riot_api_key.clone(), config.request_timeout)?;
        let limiter = RateLimiter::new(&config.limiter);
        let policy = RetryPolicy::from(&config.retry);

        Ok(Self::with_transport(
            Arc::new(transport),
            Arc::new(limiter),
            policy,
            config.platform,
        ))
    }

    pub fn with_transport(
        transport: Arc<dyn ApiRequest>,
        limiter: Arc<RateLimiter>,
        policy: RetryPolicy,
        platform: Platform,
    ) -> Self {
        Self {
            fetcher: RetryingFetcher::new(transport, limiter, policy),
            platform,
            platform_url: platform.base_url(),
            region_url: platform.to_region().base_url(),
        }
    }

    /// Points both routing hosts somewhere else, e.g. a mock server.
    pub fn with_base_urls(mut self, platform_url: &str, region_url: &str) -> Self {
        self.platform_url = platform_url.trim_end_matches('/').to_string();
        self.region_url = region_url.trim_end_matches('/').to_string();
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn fetcher(&self) -> &RetryingFetcher {
        &self.fetcher
    }

    pub(crate) fn platform_url(&self, path: &str) -> String {
        format!("{}{}", self.platform_url, path)
    }

    pub(crate) fn region_url(&self, path: &str) -> String {
        format!("{}{}", self.region_url, path)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        self.fetcher.get(url).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use super::*;
    use crate::riot::fetcher::testing::{ScriptedApi, unlimited};

    pub const PLATFORM: &str = "https://na1.api.riotgames.com";
    pub const REGION: &str = "https://americas.api.riotgames.com";

    pub fn client(api: Arc<ScriptedApi>) -> RiotClient {
        RiotClient::with_transport(api, unlimited(), RetryPolicy::default(), Platform::NA1)
    }
}
