use std::collections::HashSet;

use futures::future::join_all;
use tracing::{debug, instrument, warn};

use crate::players::PlayerDirectory;
use crate::rank::{RankLabel, average_label};
use crate::riot::{LeagueEntryDto, SummonerDto};

/// Resolves ranked data for groups of players and reduces it to a lobby rank.
#[derive(Debug, Clone)]
pub struct RankAggregator {
    players: PlayerDirectory,
}

impl RankAggregator {
    pub fn new(players: PlayerDirectory) -> Self {
        Self { players }
    }

    pub fn players(&self) -> &PlayerDirectory {
        &self.players
    }

    /// Ranked entries of the given players, unranked and unresolvable players
    /// left out.
    ///
    /// Each distinct puuid costs at most one summoner and one league request,
    /// and none once its ranked data is cached. A player whose lookup fails is
    /// skipped and left uncached.
    #[instrument(skip_all, fields(players = puuids.len()))]
    pub async fn resolve_ranked(&self, puuids: &[String]) -> Vec<LeagueEntryDto> {
        let cache = self.players.cache();

        let mut seen = HashSet::new();
        let distinct: Vec<&str> = puuids
            .iter()
            .map(String::as_str)
            .filter(|puuid| seen.insert(*puuid))
            .collect();

        let mut already_ranked = Vec::new();
        let mut uncached = Vec::new();
        for puuid in distinct {
            match cache.ranked(puuid) {
                Some(rank) => already_ranked.extend(rank.into_entry()),
                None => uncached.push(puuid),
            }
        }

        if uncached.is_empty() {
            return already_ranked;
        }

        let mut summoners: Vec<SummonerDto> = Vec::with_capacity(uncached.len());
        let mut missing = Vec::new();
        for puuid in uncached {
            match cache.summoner(puuid) {
                Some(summoner) => summoners.push(summoner),
                None => missing.push(puuid),
            }
        }

        debug!(
            cached_ranked = already_ranked.len(),
            cached_summoners = summoners.len(),
            to_fetch = missing.len(),
            "🏆 Resolving ranked data"
        );

        let fetched = join_all(missing.into_iter().map(|puuid| async move {
            match self.players.summoner_by_puuid(puuid).await {
                Ok(summoner) => Some(summoner),
                Err(e) => {
                    warn!(error = %e, puuid, "🏆 ⚠️ Summoner lookup failed");
                    None
                }
            }
        }))
        .await;
        summoners.extend(fetched.into_iter().flatten());

        let ranked = join_all(summoners.iter().map(|summoner| async move {
            match self.players.ranked_for(summoner).await {
                Ok(rank) => rank.into_entry(),
                Err(e) => {
                    warn!(error = %e, puuid = %summoner.puuid, "🏆 ⚠️ Ranked lookup failed");
                    None
                }
            }
        }))
        .await;

        ranked.into_iter().flatten().chain(already_ranked).collect()
    }

    /// Average rank of the players, "Unranked" when none of them is on the ladder.
    pub async fn average_rank(&self, puuids: &[String]) -> RankLabel {
        let entries = self.resolve_ranked(puuids).await;
        let label = average_label(&entries);
        debug!(ranked = entries.len(), average = %label, "🏆 Average rank computed");
        label
    }
}
