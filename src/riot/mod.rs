pub mod client;
mod endpoints;
pub mod fetcher;
pub mod rate_limiter;
pub mod region;
pub mod types;

pub use client::RiotClient;
pub use fetcher::{ApiRequest, Backoff, HttpTransport, RawResponse, RetryPolicy, RetryingFetcher};
pub use rate_limiter::{LimiterStats, RateLimiter};
pub use region::{Platform, Region};
pub use types::{
    AccountDto, LeagueEntryDto, MatchDto, ParticipantDto, SummonerDto, TeamDto,
    select_ranked_entry,
};
