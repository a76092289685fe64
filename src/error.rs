use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid Riot ID format: {0:?}. Use Name#Tag (e.g., Player#NA1)")]
    InvalidRiotId(String),

    #[error("Player not found: {game_name}#{tag_line}")]
    PlayerNotFound { game_name: String, tag_line: String },

    #[error("Summoner not found for puuid {puuid}")]
    SummonerNotFound { puuid: String },

    #[error("Riot API error: {status} - {message}")]
    RiotApi { status: u16, message: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Decoding response error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid platform: {0}")]
    InvalidPlatform(String),

    #[error("Data Dragon error: {status} on {url}")]
    DataDragon { status: u16, url: String },
}

impl AppError {
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::RiotApi { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::PlayerNotFound { .. } | AppError::SummonerNotFound { .. }
        ) || self.status() == Some(404)
    }

    /// Message shown to the user when a search aborts.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(_) => "API key is missing. Check your .env file.".to_string(),
            AppError::InvalidRiotId(_) => {
                "Invalid Riot ID format. Use Name#Tag (e.g., Player#NA1).".to_string()
            }
            AppError::PlayerNotFound {
                game_name,
                tag_line,
            } => format!("Riot ID not found: {game_name}#{tag_line}"),
            AppError::SummonerNotFound { .. } => {
                "No summoner profile exists for this account on the selected platform.".to_string()
            }
            AppError::RiotApi { status: 429, .. } => {
                "Riot API rate limit reached. Try again in a couple of minutes.".to_string()
            }
            AppError::DataDragon { .. } => {
                "Failed to load game data from Data Dragon. Try again later.".to_string()
            }
            _ => "Error fetching summoner data. Try again later.".to_string(),
        }
    }
}
