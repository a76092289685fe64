use std::env;
use std::num::NonZeroU32;
use std::time::Duration;

use crate::error::AppError;
use crate::riot::{Backoff, Platform};

#[derive(Debug, Clone)]
pub struct Config {
    pub riot_api_key: String,
    pub platform: Platform,
    pub ddragon_version: String,
    pub limiter: LimiterConfig,
    pub retry: RetryConfig,
    pub request_timeout: Duration,
    pub match_history_count: u32,
}

/// Admission settings of the outbound request gate.
#[derive(Debug, Clone)]
pub struct LimiterConfig {
    pub per_second: NonZeroU32,
    pub reservoir: u32,
    pub refresh_amount: u32,
    pub refresh_interval: Duration,
    pub max_concurrent: usize,
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub backoff: Backoff,
}

const DEFAULT_PLATFORM: Platform = Platform::NA1;
const DEFAULT_DDRAGON_VERSION: &str = "15.6.1";
const DEFAULT_RATE_LIMIT_PER_SECOND: u32 = 20;
const DEFAULT_RESERVOIR: u32 = 90;
const DEFAULT_RESERVOIR_REFRESH_AMOUNT: u32 = 100;
const DEFAULT_RESERVOIR_REFRESH_SECS: u64 = 120;
const DEFAULT_MAX_CONCURRENT: usize = 5;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1_000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MATCH_HISTORY_COUNT: u32 = 5;

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            per_second: NonZeroU32::new(DEFAULT_RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN),
            reservoir: DEFAULT_RESERVOIR,
            refresh_amount: DEFAULT_RESERVOIR_REFRESH_AMOUNT,
            refresh_interval: Duration::from_secs(DEFAULT_RESERVOIR_REFRESH_SECS),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
            backoff: Backoff::Exponential,
        }
    }
}

/// Data Dragon version on its own, for lookups that need no API key.
pub fn ddragon_version() -> String {
    dotenvy::dotenv().ok();

    env::var("DDRAGON_VERSION").unwrap_or_else(|_| DEFAULT_DDRAGON_VERSION.to_string())
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let riot_api_key = var("RIOT_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::Config("RIOT_API_KEY must be set".into()))?;

        let platform = match var("RIOT_PLATFORM") {
            Some(value) => value.parse()?,
            None => DEFAULT_PLATFORM,
        };

        let ddragon_version =
            var("DDRAGON_VERSION").unwrap_or_else(|| DEFAULT_DDRAGON_VERSION.into());

        let parsed = |name: &str| var(name).and_then(|v| v.trim().parse::<u64>().ok());

        let limiter = LimiterConfig {
            per_second: parsed("RIOT_RATE_LIMIT_PER_SECOND")
                .and_then(|v| u32::try_from(v).ok())
                .and_then(NonZeroU32::new)
                .unwrap_or_else(|| LimiterConfig::default().per_second),
            reservoir: parsed("RIOT_RESERVOIR")
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(DEFAULT_RESERVOIR),
            refresh_amount: parsed("RIOT_RESERVOIR_REFRESH_AMOUNT")
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(DEFAULT_RESERVOIR_REFRESH_AMOUNT),
            refresh_interval: Duration::from_secs(
                parsed("RIOT_RESERVOIR_REFRESH_SECS")
                    .filter(|v| *v > 0)
                    .unwrap_or(DEFAULT_RESERVOIR_REFRESH_SECS),
            ),
            max_concurrent: parsed("RIOT_MAX_CONCURRENT")
                .filter(|v| *v > 0)
                .map(|v| v as usize)
                .unwrap_or(DEFAULT_MAX_CONCURRENT),
        };

        let backoff = match var("RIOT_RETRY_BACKOFF") {
            Some(value) => value.parse()?,
            None => Backoff::Exponential,
        };

        let retry = RetryConfig {
            max_retries: parsed("RIOT_MAX_RETRIES")
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(DEFAULT_MAX_RETRIES),
            base_delay: Duration::from_millis(
                parsed("RIOT_RETRY_BASE_DELAY_MS").unwrap_or(DEFAULT_RETRY_BASE_DELAY_MS),
            ),
            backoff,
        };

        let request_timeout = Duration::from_secs(
            parsed("RIOT_REQUEST_TIMEOUT_SECS")
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        );

        let match_history_count = parsed("MATCH_HISTORY_COUNT")
            .and_then(|v| u32::try_from(v).ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_MATCH_HISTORY_COUNT);

        Ok(Self {
            riot_api_key,
            platform,
            ddragon_version,
            limiter,
            retry,
            request_timeout,
            match_history_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let res = Config::from_vars(vars(&[]));
        assert!(matches!(res, Err(AppError::Config(_))));

        let res = Config::from_vars(vars(&[("RIOT_API_KEY", "  ")]));
        assert!(matches!(res, Err(AppError::Config(_))));
    }

    #[test]
    fn defaults_are_applied() {
        let config = Config::from_vars(vars(&[("RIOT_API_KEY", "RGAPI-TEST")])).unwrap();

        assert_eq!(config.riot_api_key, "RGAPI-TEST");
        assert_eq!(config.platform, Platform::NA1);
        assert_eq!(config.ddragon_version, "15.6.1");
        assert_eq!(config.limiter.reservoir, 90);
        assert_eq!(config.limiter.refresh_amount, 100);
        assert_eq!(config.limiter.refresh_interval, Duration::from_secs(120));
        assert_eq!(config.limiter.max_concurrent, 5);
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.base_delay, Duration::from_millis(1_000));
        assert_eq!(config.retry.backoff, Backoff::Exponential);
        assert_eq!(config.match_history_count, 5);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_vars(vars(&[
            ("RIOT_API_KEY", "RGAPI-TEST"),
            ("RIOT_PLATFORM", "euw"),
            ("RIOT_MAX_CONCURRENT", "20"),
            ("RIOT_RETRY_BACKOFF", "fixed"),
            ("RIOT_RETRY_BASE_DELAY_MS", "250"),
            ("MATCH_HISTORY_COUNT", "not-a-number"),
        ]))
        .unwrap();

        assert_eq!(config.platform, Platform::EUW1);
        assert_eq!(config.limiter.max_concurrent, 20);
        assert_eq!(config.retry.backoff, Backoff::Fixed);
        assert_eq!(config.retry.base_delay, Duration::from_millis(250));
        assert_eq!(config.match_history_count, 5);
    }

    #[test]
    fn unknown_platform_is_rejected() {
        let res = Config::from_vars(vars(&[
            ("RIOT_API_KEY", "RGAPI-TEST"),
            ("RIOT_PLATFORM", "atlantis"),
        ]));
        assert!(matches!(res, Err(AppError::InvalidPlatform(_))));
    }
}
