use std::sync::Arc;

use tracing::debug;

use crate::cache::{CachedRank, EntityCache};
use crate::error::AppError;
use crate::riot::{AccountDto, RiotClient, SummonerDto, select_ranked_entry};

/// Cache-first player lookups.
///
/// Results are stored only once the request succeeded, except ranked lookups
/// which also remember that a player has no ranked entry.
#[derive(Debug, Clone)]
pub struct PlayerDirectory {
    client: Arc<RiotClient>,
    cache: Arc<EntityCache>,
}

impl PlayerDirectory {
    pub fn new(client: Arc<RiotClient>, cache: Arc<EntityCache>) -> Self {
        Self { client, cache }
    }

    pub fn client(&self) -> &Arc<RiotClient> {
        &self.client
    }

    pub fn cache(&self) -> &Arc<EntityCache> {
        &self.cache
    }

    pub async fn account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<AccountDto, AppError> {
        let riot_id = format!("{game_name}#{tag_line}");
        if let Some(account) = self.cache.account(&riot_id) {
            return Ok(account);
        }

        let account = self.client.get_account_by_riot_id(game_name, tag_line).await?;
        debug!(riot_id = %riot_id, puuid = %account.puuid, "👤 Account resolved");
        self.cache.set_account(&riot_id, account.clone());

        Ok(account)
    }

    pub async fn summoner_by_puuid(&self, puuid: &str) -> Result<SummonerDto, AppError> {
        if let Some(summoner) = self.cache.summoner(puuid) {
            return Ok(summoner);
        }

        let mut summoner = self.client.get_summoner_by_puuid(puuid).await?;
        if summoner.puuid.is_empty() {
            summoner.puuid = puuid.to_string();
        }

        // A cached summoner always has an account under the same puuid.
        if self.cache.account_by_puuid(puuid).is_none() {
            self.cache.set_account_by_puuid(AccountDto {
                puuid: puuid.to_string(),
                game_name: None,
                tag_line: None,
            });
        }
        self.cache.set_summoner(summoner.clone());

        Ok(summoner)
    }

    /// Selected ranked entry of a summoner: solo queue, else flex, else unranked.
    pub async fn ranked_for(&self, summoner: &SummonerDto) -> Result<CachedRank, AppError> {
        if let Some(rank) = self.cache.ranked(&summoner.puuid) {
            return Ok(rank);
        }

        let entries = self
            .client
            .get_league_entries_by_summoner(&summoner.id)
            .await?;

        let rank = CachedRank::from(select_ranked_entry(entries).map(|mut entry| {
            entry.puuid = summoner.puuid.clone();
            entry
        }));
        self.cache.set_ranked(&summoner.puuid, rank.clone());

        Ok(rank)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use serde_json::json;

    use super::*;
    use crate::riot::client::testing::{PLATFORM, REGION, client};
    use crate::riot::fetcher::testing::ScriptedApi;

    pub fn directory(api: Arc<ScriptedApi>) -> PlayerDirectory {
        PlayerDirectory::new(Arc::new(client(api)), Arc::new(EntityCache::new()))
    }

    pub fn account_url(game_name: &str, tag_line: &str) -> String {
        format!("{REGION}/riot/account/v1/accounts/by-riot-id/{game_name}/{tag_line}")
    }

    pub fn summoner_url(puuid: &str) -> String {
        format!("{PLATFORM}/lol/summoner/v4/summoners/by-puuid/{puuid}")
    }

    pub fn league_url(puuid: &str) -> String {
        format!("{PLATFORM}/lol/league/v4/entries/by-summoner/summoner-{puuid}")
    }

    pub fn mock_account(api: &ScriptedApi, game_name: &str, tag_line: &str, puuid: &str) {
        api.respond_json(
            &account_url(game_name, tag_line),
            json!({ "puuid": puuid, "gameName": game_name, "tagLine": tag_line }),
        );
    }

    pub fn mock_summoner(api: &ScriptedApi, puuid: &str) {
        api.respond_json(
            &summoner_url(puuid),
            json!({
                "id": format!("summoner-{puuid}"),
                "accountId": format!("account-{puuid}"),
                "puuid": puuid,
                "profileIconId": 4568,
                "summonerLevel": 312
            }),
        );
    }

    /// `entries` are `(queue, tier, rank)` triples.
    pub fn mock_league(api: &ScriptedApi, puuid: &str, entries: &[(&str, &str, &str)]) {
        let entries: Vec<_> = entries
            .iter()
            .map(|(queue, tier, rank)| {
                json!({
                    "queueType": queue,
                    "tier": tier,
                    "rank": rank,
                    "leaguePoints": 50,
                    "wins": 20,
                    "losses": 18
                })
            })
            .collect();
        api.respond_json(&league_url(puuid), json!(entries));
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::riot::fetcher::testing::ScriptedApi;

    #[tokio::test]
    async fn account_lookup_is_cached() {
        let api = ScriptedApi::new();
        mock_account(&api, "Player", "NA1", "p-1");
        let players = directory(api.clone());

        let first = players.account_by_riot_id("Player", "NA1").await.unwrap();
        let second = players.account_by_riot_id("Player", "NA1").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(api.calls_to(&account_url("Player", "NA1")), 1);
        assert_eq!(players.cache().account_by_puuid("p-1"), Some(first));
    }

    #[tokio::test]
    async fn summoner_lookup_is_cached() {
        let api = ScriptedApi::new();
        mock_summoner(&api, "p-1");
        let players = directory(api.clone());

        players.summoner_by_puuid("p-1").await.unwrap();
        let summoner = players.summoner_by_puuid("p-1").await.unwrap();

        assert_eq!(summoner.id, "summoner-p-1");
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn summoner_lookup_records_its_account() {
        let api = ScriptedApi::new();
        mock_account(&api, "Player", "NA1", "p-1");
        mock_summoner(&api, "p-1");
        mock_summoner(&api, "p-2");
        let players = directory(api.clone());

        let known = players.account_by_riot_id("Player", "NA1").await.unwrap();
        players.summoner_by_puuid("p-1").await.unwrap();
        players.summoner_by_puuid("p-2").await.unwrap();

        let cache = players.cache();
        assert_eq!(cache.account_by_puuid("p-1"), Some(known));
        let anonymous = cache.account_by_puuid("p-2").unwrap();
        assert_eq!(anonymous.game_name, None);
        assert_eq!(anonymous.riot_id(), None);
        assert_eq!(api.calls().len(), 3);
    }

    #[tokio::test]
    async fn failed_lookup_is_not_cached() {
        let api = ScriptedApi::new();
        let players = directory(api.clone());

        let res = players.summoner_by_puuid("p-1").await;
        assert!(matches!(res, Err(AppError::SummonerNotFound { .. })));

        mock_summoner(&api, "p-1");
        assert!(players.summoner_by_puuid("p-1").await.is_ok());
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn ranked_prefers_solo_queue() {
        let api = ScriptedApi::new();
        mock_summoner(&api, "p-1");
        mock_league(
            &api,
            "p-1",
            &[("RANKED_FLEX_SR", "GOLD", "I"), ("RANKED_SOLO_5x5", "SILVER", "II")],
        );
        let players = directory(api.clone());

        let summoner = players.summoner_by_puuid("p-1").await.unwrap();
        let rank = players.ranked_for(&summoner).await.unwrap();

        let entry = rank.entry().unwrap();
        assert_eq!(entry.tier, "SILVER");
        assert_eq!(entry.puuid, "p-1");
    }

    #[tokio::test]
    async fn unranked_result_is_cached() {
        let api = ScriptedApi::new();
        mock_summoner(&api, "p-1");
        mock_league(&api, "p-1", &[]);
        let players = directory(api.clone());

        let summoner = players.summoner_by_puuid("p-1").await.unwrap();
        assert_eq!(players.ranked_for(&summoner).await.unwrap(), CachedRank::Unranked);
        assert_eq!(players.ranked_for(&summoner).await.unwrap(), CachedRank::Unranked);

        assert_eq!(api.calls_to(&league_url("p-1")), 1);
    }
}
