use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::aggregator::RankAggregator;
use crate::cache::EntityCache;
use crate::config::Config;
use crate::error::AppError;
use crate::history::{MatchHistoryResolver, MatchSummary};
use crate::players::PlayerDirectory;
use crate::riot::{AccountDto, LeagueEntryDto, RiotClient, SummonerDto};

pub const HISTORY_FAILED_MESSAGE: &str = "Failed to load match history.";

/// Everything a profile view needs, published after each stage of a search.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchState {
    pub riot_id: String,
    pub account: Option<AccountDto>,
    pub summoner: Option<SummonerDto>,
    /// `None` once the summoner is known means unranked.
    pub ranked: Option<LeagueEntryDto>,
    pub match_history: Vec<MatchSummary>,
    pub error_message: Option<String>,
    pub is_loading: bool,
}

impl SearchState {
    fn loading(riot_id: &str) -> Self {
        Self {
            riot_id: riot_id.to_string(),
            is_loading: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Completed,
    /// A newer search started before this one finished, its result was dropped.
    Superseded,
}

/// Splits `Name#TAG` into its halves.
///
/// Surrounding whitespace is ignored, spaces inside the game name are kept.
pub fn parse_riot_id(input: &str) -> Result<(String, String), AppError> {
    let invalid = || AppError::InvalidRiotId(input.to_string());

    let (game_name, tag_line) = input.trim().split_once('#').ok_or_else(invalid)?;
    let (game_name, tag_line) = (game_name.trim(), tag_line.trim());

    if game_name.is_empty() || tag_line.is_empty() || tag_line.contains('#') {
        return Err(invalid());
    }

    Ok((game_name.to_string(), tag_line.to_string()))
}

/// A player lookup screen: one search at a time, the latest one wins.
#[derive(Debug)]
pub struct SearchSession {
    players: PlayerDirectory,
    history: MatchHistoryResolver,
    match_count: u32,
    generation: AtomicU64,
    state: watch::Sender<SearchState>,
}

impl SearchSession {
    pub fn new(players: PlayerDirectory, match_count: u32) -> Self {
        let history = MatchHistoryResolver::new(RankAggregator::new(players.clone()));
        let (state, _) = watch::channel(SearchState::default());

        Self {
            players,
            history,
            match_count,
            generation: AtomicU64::new(0),
            state,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let client = Arc::new(RiotClient::new(config)?);
        let players = PlayerDirectory::new(client, Arc::new(EntityCache::new()));
        Ok(Self::new(players, config.match_history_count))
    }

    pub fn players(&self) -> &PlayerDirectory {
        &self.players
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Runs a full lookup of `input` and publishes its progress.
    ///
    /// Failures end up in [`SearchState::error_message`]; a failed match
    /// history keeps the profile part of the view.
    #[instrument(skip(self))]
    pub async fn search(&self, input: &str) -> SearchOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let riot_id = input.trim();
        self.publish(generation, SearchState::loading(riot_id));

        let state = match self.lookup(generation, riot_id).await {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "🔍 ⚠️ Search failed");
                SearchState {
                    riot_id: riot_id.to_string(),
                    error_message: Some(e.user_message()),
                    ..Default::default()
                }
            }
        };

        if self.publish(generation, state) {
            SearchOutcome::Completed
        } else {
            info!("🔍 Search superseded, result dropped");
            SearchOutcome::Superseded
        }
    }

    async fn lookup(&self, generation: u64, riot_id: &str) -> Result<SearchState, AppError> {
        let (game_name, tag_line) = parse_riot_id(riot_id)?;

        let account = self.players.account_by_riot_id(&game_name, &tag_line).await?;
        let summoner = self.players.summoner_by_puuid(&account.puuid).await?;

        let ranked = match self.players.ranked_for(&summoner).await {
            Ok(rank) => rank.into_entry(),
            Err(e) => {
                warn!(
                    error = %e,
                    puuid = %summoner.puuid,
                    "🔍 ⚠️ Ranked lookup failed, shown as unranked"
                );
                None
            }
        };

        let puuid = summoner.puuid.clone();
        let mut state = SearchState {
            riot_id: riot_id.to_string(),
            account: Some(account),
            summoner: Some(summoner),
            ranked,
            is_loading: true,
            ..Default::default()
        };

        if !self.publish(generation, state.clone()) {
            return Ok(state);
        }

        match self.history.fetch_match_history(&puuid, self.match_count).await {
            Ok(history) => state.match_history = history,
            Err(e) => {
                warn!(error = %e, "🔍 ⚠️ Match history failed");
                state.error_message = Some(HISTORY_FAILED_MESSAGE.to_string());
            }
        }
        state.is_loading = false;

        info!(
            riot_id,
            matches = state.match_history.len(),
            ranked = state.ranked.is_some(),
            "🔍 Search done"
        );
        Ok(state)
    }

    /// Replaces the published state unless a newer search has started.
    fn publish(&self, generation: u64, state: SearchState) -> bool {
        self.state.send_if_modified(|current| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *current = state;
            true
        })
    }
}
