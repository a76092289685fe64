use std::collections::HashMap;

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::aggregator::RankAggregator;
use crate::cache::EntityCache;
use crate::error::AppError;
use crate::rank::{RankLabel, average_label};
use crate::riot::{AccountDto, LeagueEntryDto, MatchDto, ParticipantDto, TeamDto};

/// A match ready for display: participants carry their ranked data when they
/// have any, and the lobby is summarised by its average rank.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub match_id: String,
    pub game_duration: i64,
    pub game_start_timestamp: i64,
    pub queue_id: i32,
    pub participants: Vec<ParticipantDto>,
    pub teams: Vec<TeamDto>,
    pub average_rank: RankLabel,
}

impl MatchSummary {
    pub fn participant(&self, puuid: &str) -> Option<&ParticipantDto> {
        self.participants.iter().find(|p| p.puuid == puuid)
    }
}

#[derive(Debug, Clone)]
pub struct MatchHistoryResolver {
    aggregator: RankAggregator,
}

impl MatchHistoryResolver {
    pub fn new(aggregator: RankAggregator) -> Self {
        Self { aggregator }
    }

    /// Recent matches of a player, newest first.
    ///
    /// Failing to list the matches is an error. A single match that cannot be
    /// loaded is dropped from the result.
    #[instrument(skip(self))]
    pub async fn fetch_match_history(
        &self,
        puuid: &str,
        count: u32,
    ) -> Result<Vec<MatchSummary>, AppError> {
        let client = self.aggregator.players().client();
        let match_ids = client.get_match_ids(puuid, count).await?;

        if match_ids.is_empty() {
            info!("📭 No recent matches");
            return Ok(Vec::new());
        }

        let summaries = join_all(match_ids.iter().map(|id| self.resolve_match(id))).await;
        let summaries: Vec<MatchSummary> = summaries.into_iter().flatten().collect();

        info!(
            requested = match_ids.len(),
            loaded = summaries.len(),
            "📜 Match history loaded"
        );
        Ok(summaries)
    }

    async fn resolve_match(&self, match_id: &str) -> Option<MatchSummary> {
        let players = self.aggregator.players();
        let game = match players.client().get_match(match_id).await {
            Ok(game) => game,
            Err(e) => {
                warn!(match_id, error = %e, "📜 ⚠️ Failed to load match");
                return None;
            }
        };

        remember_participants(&game, players.cache());

        let MatchDto { metadata, info } = game;
        let puuids = if metadata.participants.is_empty() {
            info.participants.iter().map(|p| p.puuid.clone()).collect()
        } else {
            metadata.participants
        };

        let entries = self.aggregator.resolve_ranked(&puuids).await;
        let average_rank = average_label(&entries);
        let ranked: HashMap<&str, &LeagueEntryDto> = entries
            .iter()
            .map(|entry| (entry.puuid.as_str(), entry))
            .collect();

        let mut participants = info.participants;
        for participant in &mut participants {
            if let Some(entry) = ranked.get(participant.puuid.as_str()) {
                participant.annotate_rank(entry);
            }
        }

        Some(MatchSummary {
            match_id: metadata.match_id,
            game_duration: info.game_duration,
            game_start_timestamp: info.game_start_timestamp,
            queue_id: info.queue_id,
            participants,
            teams: info.teams,
            average_rank,
        })
    }
}

/// Match payloads already name every participant, so their accounts are known
/// without asking the account endpoint.
fn remember_participants(game: &MatchDto, cache: &EntityCache) {
    for participant in &game.info.participants {
        let Some(riot_id) = participant.riot_id() else {
            continue;
        };
        let known = cache.account_by_puuid(&participant.puuid);
        if known.and_then(|account| account.riot_id()).is_some() {
            continue;
        }
        cache.set_account(
            &riot_id,
            AccountDto {
                puuid: participant.puuid.clone(),
                game_name: Some(participant.riot_id_game_name.clone()),
                tag_line: Some(participant.riot_id_tagline.clone()),
            },
        );
    }
}
