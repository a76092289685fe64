use crate::error::AppError;
use crate::riot::client::RiotClient;
use crate::riot::types::SummonerDto;

impl RiotClient {
    /// Get summoner by PUUID
    /// Uses platform routing (euw1, na1, kr, etc.)
    pub async fn get_summoner_by_puuid(&self, puuid: &str) -> Result<SummonerDto, AppError> {
        let url = self.platform_url(&format!("/lol/summoner/v4/summoners/by-puuid/{puuid}"));

        self.get(&url).await.map_err(|e| {
            if matches!(&e, AppError::RiotApi { status: 404, .. }) {
                AppError::SummonerNotFound {
                    puuid: puuid.to_string(),
                }
            } else {
                e
            }
        })
    }
}
