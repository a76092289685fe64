use crate::error::AppError;
use crate::riot::client::RiotClient;
use crate::riot::types::MatchDto;

impl RiotClient {
    /// Get the most recent match IDs of a player, newest first
    /// Uses regional routing (americas, europe, asia, sea)
    pub async fn get_match_ids(&self, puuid: &str, count: u32) -> Result<Vec<String>, AppError> {
        let url = self.region_url(&format!(
            "/lol/match/v5/matches/by-puuid/{puuid}/ids?start=0&count={count}"
        ));

        self.get(&url).await
    }

    /// Get match details by match ID
    /// Uses regional routing (americas, europe, asia, sea)
    pub async fn get_match(&self, match_id: &str) -> Result<MatchDto, AppError> {
        let url = self.region_url(&format!("/lol/match/v5/matches/{match_id}"));

        self.get(&url).await
    }
}
