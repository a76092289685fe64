//! Player lookup and lobby rank resolution on top of the Riot Games API.

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod ddragon;
pub mod error;
pub mod history;
pub mod logging;
pub mod players;
pub mod rank;
pub mod riot;
pub mod search;
pub mod stats;

pub use aggregator::RankAggregator;
pub use cache::{CachedRank, EntityCache};
pub use config::Config;
pub use error::AppError;
pub use history::{MatchHistoryResolver, MatchSummary};
pub use players::PlayerDirectory;
pub use rank::RankLabel;
pub use search::{SearchOutcome, SearchSession, SearchState};
