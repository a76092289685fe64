use std::{fmt::Debug, str::FromStr, sync::Arc, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{trace, warn};

use crate::config::RetryConfig;
use crate::error::AppError;

use super::rate_limiter::RateLimiter;

/// Raw answer of the Riot API before status handling.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

/// Trait implemented by structures capable of performing raw HTTP requests to the riot API.
#[async_trait]
pub trait ApiRequest: Send + Sync + Debug {
    async fn send(&self, url: &str) -> Result<RawResponse, AppError>;
}

/// reqwest transport carrying the API key and a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    /// Riot API Key
    key: String,
}

impl HttpTransport {
    pub fn new(key: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client, key })
    }
}

#[async_trait]
impl ApiRequest for HttpTransport {
    async fn send(&self, url: &str) -> Result<RawResponse, AppError> {
        let res = self
            .client
            .get(url)
            .header("X-Riot-Token", &self.key)
            .send()
            .await
            .map_err(|e| classify(e, url))?;

        let status = res.status();
        let body = res.bytes().await.map_err(|e| classify(e, url))?;

        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }
}

fn classify(err: reqwest::Error, url: &str) -> AppError {
    if err.is_timeout() {
        AppError::Timeout {
            url: url.to_string(),
        }
    } else {
        AppError::Http(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Fixed,
    Exponential,
}

impl FromStr for Backoff {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "exponential" | "exp" => Ok(Self::Exponential),
            other => Err(AppError::Config(format!("unknown backoff kind {other:?}"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub backoff: Backoff,
    pub retryable: fn(&AppError) -> bool,
}

impl RetryPolicy {
    /// Delay before the retry following the failed attempt `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.base_delay,
            Backoff::Exponential => self
                .base_delay
                .saturating_mul(2u32.saturating_pow(attempt)),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: config.base_delay,
            backoff: config.backoff,
            retryable: AppError::is_rate_limited,
        }
    }
}

/// GET through the rate limiter, retrying what the policy deems retryable.
#[derive(Debug)]
pub struct RetryingFetcher {
    transport: Arc<dyn ApiRequest>,
    limiter: Arc<RateLimiter>,
    policy: RetryPolicy,
}

impl RetryingFetcher {
    pub fn new(
        transport: Arc<dyn ApiRequest>,
        limiter: Arc<RateLimiter>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            limiter,
            policy,
        }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        let body = self.get_bytes(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_bytes(&self, url: &str) -> Result<Bytes, AppError> {
        let mut attempt = 0;

        loop {
            match self.attempt(url).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.policy.max_retries && (self.policy.retryable)(&e) => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        url,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "⏳ Rate limit hit, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn attempt(&self, url: &str) -> Result<Bytes, AppError> {
        trace!(url, "[RIOT::FETCH] GET");

        let res = self.limiter.admit(self.transport.send(url)).await?;

        if StatusCode::from_u16(res.status).is_ok_and(|s| s.is_success()) {
            return Ok(res.body);
        }

        let message = String::from_utf8_lossy(&res.body).into_owned();
        warn!(url, status = res.status, %message, "🛰️ ❌ API request failed");

        Err(AppError::RiotApi {
            status: res.status,
            message,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{
        collections::{HashMap, VecDeque},
        sync::Mutex,
    };

    use super::*;

    /// Scripted transport: answers per URL in order, repeating the last one.
    #[derive(Debug, Default)]
    pub struct ScriptedApi {
        routes: Mutex<HashMap<String, VecDeque<(u16, String)>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedApi {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn respond(&self, url: &str, status: u16, body: impl Into<String>) {
            self.routes
                .lock()
                .unwrap()
                .entry(url.to_string())
                .or_default()
                .push_back((status, body.into()));
        }

        pub fn respond_json(&self, url: &str, body: serde_json::Value) {
            self.respond(url, 200, body.to_string());
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn calls_to(&self, url: &str) -> usize {
            self.calls.lock().unwrap().iter().filter(|c| *c == url).count()
        }
    }

    #[async_trait]
    impl ApiRequest for ScriptedApi {
        async fn send(&self, url: &str) -> Result<RawResponse, AppError> {
            self.calls.lock().unwrap().push(url.to_string());

            let mut routes = self.routes.lock().unwrap();
            let (status, body) = match routes.get_mut(url) {
                Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
                Some(queue) if !queue.is_empty() => queue[0].clone(),
                _ => (404, r#"{"status":{"message":"Data not found","status_code":404}}"#.into()),
            };

            Ok(RawResponse {
                status,
                body: Bytes::from(body),
            })
        }
    }

    pub fn unlimited() -> Arc<RateLimiter> {
        Arc::new(RateLimiter::with_reservoir(
            10_000,
            10_000,
            Duration::from_secs(120),
            20,
        ))
    }

    pub fn fetcher(api: Arc<ScriptedApi>) -> RetryingFetcher {
        RetryingFetcher::new(api, unlimited(), RetryPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::time::Instant;

    use super::testing::*;
    use super::*;

    const URL: &str = "https://na1.api.riotgames.com/test";

    #[test]
    fn exponential_delay_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(1_000));
        assert_eq!(policy.delay_for(1), Duration::from_millis(2_000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(4_000));

        let fixed = RetryPolicy {
            backoff: Backoff::Fixed,
            ..RetryPolicy::default()
        };
        assert_eq!(fixed.delay_for(2), Duration::from_millis(1_000));
    }

    #[test]
    fn backoff_parses() {
        assert_eq!("Fixed".parse::<Backoff>().unwrap(), Backoff::Fixed);
        assert_eq!("exponential".parse::<Backoff>().unwrap(), Backoff::Exponential);
        assert!("linear".parse::<Backoff>().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn success_after_max_retries_rate_limits() {
        let api = ScriptedApi::new();
        for _ in 0..3 {
            api.respond(URL, 429, "Rate limit exceeded");
        }
        api.respond_json(URL, json!({ "ok": true }));

        let fetcher = fetcher(api.clone());
        let start = Instant::now();
        let value: serde_json::Value = fetcher.get(URL).await.unwrap();

        assert_eq!(value, json!({ "ok": true }));
        assert_eq!(api.calls_to(URL), 4);
        // 1s + 2s + 4s of backoff
        assert!(start.elapsed() >= Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_beyond_budget_propagates() {
        let api = ScriptedApi::new();
        for _ in 0..4 {
            api.respond(URL, 429, "Rate limit exceeded");
        }
        api.respond_json(URL, json!({ "ok": true }));

        let fetcher = fetcher(api.clone());
        let res: Result<serde_json::Value, _> = fetcher.get(URL).await;

        assert!(matches!(res, Err(AppError::RiotApi { status: 429, .. })));
        assert_eq!(api.calls_to(URL), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn other_errors_are_not_retried() {
        let api = ScriptedApi::new();
        api.respond(URL, 503, "Service unavailable");
        api.respond_json(URL, json!({ "ok": true }));

        let fetcher = fetcher(api.clone());
        let res: Result<serde_json::Value, _> = fetcher.get(URL).await;

        match res {
            Err(AppError::RiotApi { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "Service unavailable");
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert_eq!(api.calls_to(URL), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn every_attempt_spends_a_permit() {
        let api = ScriptedApi::new();
        api.respond(URL, 429, "");
        api.respond_json(URL, json!([]));

        let limiter = Arc::new(RateLimiter::with_reservoir(10, 10, Duration::from_secs(120), 5));
        let fetcher = RetryingFetcher::new(api, limiter.clone(), RetryPolicy::default());
        let _: Vec<String> = fetcher.get(URL).await.unwrap();

        assert_eq!(limiter.remaining_permits().await, 8);
    }

    #[tokio::test]
    async fn invalid_json_is_a_decode_error() {
        let api = ScriptedApi::new();
        api.respond(URL, 200, "not json");

        let res: Result<Vec<String>, _> = fetcher(api).get(URL).await;
        assert!(matches!(res, Err(AppError::Decode(_))));
    }

    #[tokio::test]
    async fn request_propagates_reqwest_error() {
        let transport =
            HttpTransport::new("RGAPI-INVALID-KEY".into(), Duration::from_secs(5)).unwrap();

        let res = transport.send("ht!tp://invalid-url").await;

        assert!(matches!(res, Err(AppError::Http(_))));
    }
}
