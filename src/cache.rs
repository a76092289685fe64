//! In-memory memoization of Riot entities.
//!
//! Entries live as long as the cache itself: nothing expires and nothing is
//! evicted. Callers only store successful lookups, with one exception: a
//! player known to have no ranked entry is stored as [`CachedRank::Unranked`]
//! so the lookup is never repeated.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use tracing::trace;

use crate::riot::{AccountDto, LeagueEntryDto, SummonerDto};

/// Outcome of a ranked lookup, stored per puuid.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedRank {
    Ranked(LeagueEntryDto),
    Unranked,
}

impl CachedRank {
    pub fn entry(&self) -> Option<&LeagueEntryDto> {
        match self {
            CachedRank::Ranked(entry) => Some(entry),
            CachedRank::Unranked => None,
        }
    }

    pub fn into_entry(self) -> Option<LeagueEntryDto> {
        match self {
            CachedRank::Ranked(entry) => Some(entry),
            CachedRank::Unranked => None,
        }
    }
}

impl From<Option<LeagueEntryDto>> for CachedRank {
    fn from(value: Option<LeagueEntryDto>) -> Self {
        value.map_or(CachedRank::Unranked, CachedRank::Ranked)
    }
}

#[derive(Debug, Default)]
pub struct EntityCache {
    accounts: RwLock<AccountIndex>,
    summoners: RwLock<HashMap<String, SummonerDto>>,
    ranked: RwLock<HashMap<String, CachedRank>>,
}

#[derive(Debug, Default)]
struct AccountIndex {
    by_riot_id: HashMap<String, AccountDto>,
    by_puuid: HashMap<String, AccountDto>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub accounts: usize,
    pub summoners: usize,
    pub ranked: usize,
}

/// Riot ids are matched case-insensitively by the API, the cache does the same.
fn riot_id_key(riot_id: &str) -> String {
    riot_id.trim().to_lowercase()
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(&self, riot_id: &str) -> Option<AccountDto> {
        let accounts = self.accounts.read().unwrap_or_else(PoisonError::into_inner);
        let hit = accounts.by_riot_id.get(&riot_id_key(riot_id)).cloned();
        trace!(riot_id, hit = hit.is_some(), "[CACHE] account");
        hit
    }

    pub fn account_by_puuid(&self, puuid: &str) -> Option<AccountDto> {
        let accounts = self.accounts.read().unwrap_or_else(PoisonError::into_inner);
        accounts.by_puuid.get(puuid).cloned()
    }

    /// Stores `account` under `riot_id` and indexes it by puuid.
    pub fn set_account(&self, riot_id: &str, account: AccountDto) {
        let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
        accounts
            .by_puuid
            .insert(account.puuid.clone(), account.clone());
        accounts.by_riot_id.insert(riot_id_key(riot_id), account);
    }

    /// Indexes an account by puuid only, for players whose riot id is unknown.
    /// An account already indexed under that puuid is kept.
    pub fn set_account_by_puuid(&self, account: AccountDto) {
        let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
        accounts
            .by_puuid
            .entry(account.puuid.clone())
            .or_insert(account);
    }

    pub fn summoner(&self, puuid: &str) -> Option<SummonerDto> {
        let summoners = self.summoners.read().unwrap_or_else(PoisonError::into_inner);
        let hit = summoners.get(puuid).cloned();
        trace!(puuid, hit = hit.is_some(), "[CACHE] summoner");
        hit
    }

    /// Stores a summoner under its own puuid.
    pub fn set_summoner(&self, summoner: SummonerDto) {
        let mut summoners = self.summoners.write().unwrap_or_else(PoisonError::into_inner);
        summoners.insert(summoner.puuid.clone(), summoner);
    }

    pub fn ranked(&self, puuid: &str) -> Option<CachedRank> {
        let ranked = self.ranked.read().unwrap_or_else(PoisonError::into_inner);
        let hit = ranked.get(puuid).cloned();
        trace!(puuid, hit = hit.is_some(), "[CACHE] ranked");
        hit
    }

    pub fn set_ranked(&self, puuid: &str, rank: CachedRank) {
        let mut ranked = self.ranked.write().unwrap_or_else(PoisonError::into_inner);
        ranked.insert(puuid.to_string(), rank);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            accounts: self
                .accounts
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .by_puuid
                .len(),
            summoners: self
                .summoners
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .len(),
            ranked: self.ranked.read().unwrap_or_else(PoisonError::into_inner).len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::riot::types::fixtures::league_entry;

    fn account(puuid: &str) -> AccountDto {
        AccountDto {
            puuid: puuid.to_string(),
            game_name: Some("Player".into()),
            tag_line: Some("NA1".into()),
        }
    }

    #[test]
    fn account_is_indexed_by_riot_id_and_puuid() {
        let cache = EntityCache::new();
        cache.set_account("Player#NA1", account("p-1"));

        assert_eq!(cache.account("player#na1"), Some(account("p-1")));
        assert_eq!(cache.account_by_puuid("p-1"), Some(account("p-1")));
        assert_eq!(cache.account("Other#NA1"), None);
    }

    #[test]
    fn puuid_only_account_does_not_replace_a_known_one() {
        let cache = EntityCache::new();
        cache.set_account("Player#NA1", account("p-1"));
        cache.set_account_by_puuid(AccountDto {
            puuid: "p-1".into(),
            game_name: None,
            tag_line: None,
        });
        cache.set_account_by_puuid(AccountDto {
            puuid: "p-2".into(),
            game_name: None,
            tag_line: None,
        });

        assert_eq!(cache.account_by_puuid("p-1"), Some(account("p-1")));
        assert_eq!(cache.account_by_puuid("p-2").map(|a| a.game_name), Some(None));
        assert_eq!(cache.stats().accounts, 2);
    }

    #[test]
    fn summoner_is_keyed_by_its_puuid() {
        let cache = EntityCache::new();
        cache.set_summoner(SummonerDto {
            id: "s-1".into(),
            account_id: "a-1".into(),
            puuid: "p-1".into(),
            profile_icon_id: 7,
            summoner_level: 300,
        });

        assert_eq!(cache.summoner("p-1").map(|s| s.id), Some("s-1".to_string()));
        assert!(cache.summoner("p-2").is_none());
    }

    #[test]
    fn unranked_marker_is_distinct_from_a_miss() {
        let cache = EntityCache::new();
        cache.set_ranked("p-1", CachedRank::Unranked);
        cache.set_ranked(
            "p-2",
            CachedRank::Ranked(league_entry("p-2", "RANKED_SOLO_5x5", "GOLD", "II")),
        );

        assert_eq!(cache.ranked("p-1"), Some(CachedRank::Unranked));
        assert_eq!(
            cache.ranked("p-2").and_then(CachedRank::into_entry).map(|e| e.tier),
            Some("GOLD".to_string())
        );
        assert_eq!(cache.ranked("p-3"), None);
        assert_eq!(
            cache.stats(),
            CacheStats {
                accounts: 0,
                summoners: 0,
                ranked: 2
            }
        );
    }
}
