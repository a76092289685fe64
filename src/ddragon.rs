//! Static game data from Data Dragon: champions, items, runes and image URLs.
//!
//! Data Dragon is a public CDN, requests carry no key and bypass the Riot
//! rate limiter.

use std::{collections::HashMap, time::Duration};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::AppError;

pub const DDRAGON_BASE_URL: &str = "https://ddragon.leagueoflegends.com";
const LOCALE: &str = "en_US";

/// Summoner spell id to its Data Dragon image name.
pub const SUMMONER_SPELLS: [(i32, &str); 17] = [
    (1, "SummonerBoost"),
    (3, "SummonerExhaust"),
    (4, "SummonerFlash"),
    (6, "SummonerHaste"),
    (7, "SummonerHeal"),
    (11, "SummonerSmite"),
    (12, "SummonerTeleport"),
    (13, "SummonerMana"),
    (14, "SummonerDot"),
    (21, "SummonerBarrier"),
    (32, "SummonerSnowball"),
    (39, "SummonerChillingSmite"),
    (55, "SummonerPoroRecall"),
    (56, "SummonerMark"),
    (57, "SummonerPoroThrow"),
    (59, "SummonerPoroCoin"),
    (61, "SummonerShurimaRecall"),
];

pub fn summoner_spell_name(spell_id: i32) -> Option<&'static str> {
    SUMMONER_SPELLS
        .iter()
        .find(|(id, _)| *id == spell_id)
        .map(|(_, name)| *name)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDto {
    pub full: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChampionSummary {
    /// Data Dragon identifier, e.g. `MonkeyKing`.
    pub id: String,
    /// Numeric champion id as a string.
    pub key: String,
    pub name: String,
    pub title: String,
    pub tags: Vec<String>,
    pub image: ImageDto,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChampionDetail {
    pub id: String,
    pub key: String,
    pub name: String,
    pub title: String,
    pub tags: Vec<String>,
    pub blurb: String,
    pub image: ImageDto,
    pub passive: PassiveDto,
    pub spells: Vec<AbilityDto>,
    pub skins: Vec<SkinDto>,
    pub info: ChampionInfoDto,
}

impl ChampionDetail {
    /// Skins other than the default one.
    pub fn alternate_skins(&self) -> impl Iterator<Item = &SkinDto> {
        self.skins.iter().filter(|skin| skin.num != 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassiveDto {
    pub name: String,
    pub description: String,
    pub image: ImageDto,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityDto {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinDto {
    pub id: String,
    pub num: u32,
    pub name: String,
    pub chromas: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChampionInfoDto {
    pub attack: u8,
    pub defense: u8,
    pub magic: u8,
    pub difficulty: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemDto {
    pub name: String,
    pub description: String,
    pub plaintext: String,
    pub gold: GoldDto,
    pub image: ImageDto,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoldDto {
    pub base: u32,
    pub total: u32,
    pub sell: u32,
    pub purchasable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuneStyleDto {
    pub id: i32,
    pub key: String,
    pub icon: String,
    pub name: String,
    pub slots: Vec<RuneSlotDto>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuneSlotDto {
    pub runes: Vec<RuneDto>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuneDto {
    pub id: i32,
    pub key: String,
    pub icon: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: HashMap<String, T>,
}

/// Champions whose name contains `query`, ignoring case. A blank query keeps
/// every champion.
pub fn filter_champions<'a>(
    champions: &'a [ChampionSummary],
    query: &str,
) -> Vec<&'a ChampionSummary> {
    let query = query.trim().to_lowercase();
    champions
        .iter()
        .filter(|champion| query.is_empty() || champion.name.to_lowercase().contains(&query))
        .collect()
}

#[derive(Debug, Clone)]
pub struct DataDragon {
    client: reqwest::Client,
    base_url: String,
    version: String,
}

impl DataDragon {
    pub fn new(version: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: DDRAGON_BASE_URL.to_string(),
            version: version.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(&config.ddragon_version, config.request_timeout)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    async fn get<T: DeserializeOwned>(&self, url: String) -> Result<T, AppError> {
        debug!(url = %url, "📦 Data Dragon request");
        let res = self.client.get(&url).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(AppError::DataDragon {
                status: status.as_u16(),
                url,
            });
        }

        let body = res.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn data_url(&self, file: &str) -> String {
        format!("{}/cdn/{}/data/{LOCALE}/{file}", self.base_url, self.version)
    }

    /// Every champion, sorted by display name.
    #[instrument(skip(self))]
    pub async fn champions(&self) -> Result<Vec<ChampionSummary>, AppError> {
        let envelope: DataEnvelope<ChampionSummary> =
            self.get(self.data_url("champion.json")).await?;

        let mut champions: Vec<_> = envelope.data.into_values().collect();
        champions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(champions)
    }

    #[instrument(skip(self))]
    pub async fn champion(&self, champion_id: &str) -> Result<ChampionDetail, AppError> {
        let url = self.data_url(&format!("champion/{champion_id}.json"));
        let mut envelope: DataEnvelope<ChampionDetail> = self.get(url.clone()).await?;

        envelope
            .data
            .remove(champion_id)
            .ok_or(AppError::DataDragon { status: 404, url })
    }

    /// Items keyed by item id.
    pub async fn items(&self) -> Result<HashMap<String, ItemDto>, AppError> {
        let envelope: DataEnvelope<ItemDto> = self.get(self.data_url("item.json")).await?;
        Ok(envelope.data)
    }

    pub async fn runes_reforged(&self) -> Result<Vec<RuneStyleDto>, AppError> {
        self.get(self.data_url("runesReforged.json")).await
    }

    pub fn champion_icon_url(&self, champion_name: &str) -> String {
        // Match payloads spell it "FiddleSticks", the image is "Fiddlesticks".
        let champion_name = if champion_name == "FiddleSticks" {
            "Fiddlesticks"
        } else {
            champion_name
        };
        format!(
            "{}/cdn/{}/img/champion/{champion_name}.png",
            self.base_url, self.version
        )
    }

    pub fn splash_url(&self, champion_id: &str, skin_num: u32) -> String {
        format!(
            "{}/cdn/img/champion/splash/{champion_id}_{skin_num}.jpg",
            self.base_url
        )
    }

    pub fn loading_url(&self, champion_id: &str, skin_num: u32) -> String {
        format!(
            "{}/cdn/img/champion/loading/{champion_id}_{skin_num}.jpg",
            self.base_url
        )
    }

    pub fn passive_icon_url(&self, passive: &PassiveDto) -> String {
        format!(
            "{}/cdn/{}/img/passive/{}",
            self.base_url, self.version, passive.image.full
        )
    }

    pub fn ability_icon_url(&self, ability: &AbilityDto) -> String {
        format!(
            "{}/cdn/{}/img/spell/{}.png",
            self.base_url, self.version, ability.id
        )
    }

    /// `None` for an empty item slot.
    pub fn item_icon_url(&self, item_id: i32) -> Option<String> {
        (item_id > 0).then(|| {
            format!(
                "{}/cdn/{}/img/item/{item_id}.png",
                self.base_url, self.version
            )
        })
    }

    pub fn profile_icon_url(&self, profile_icon_id: i32) -> String {
        format!(
            "{}/cdn/{}/img/profileicon/{profile_icon_id}.png",
            self.base_url, self.version
        )
    }

    pub fn summoner_spell_icon_url(&self, spell_id: i32) -> Option<String> {
        summoner_spell_name(spell_id).map(|name| {
            format!(
                "{}/cdn/{}/img/spell/{name}.png",
                self.base_url, self.version
            )
        })
    }

    pub fn rune_style_icon_url(&self, styles: &[RuneStyleDto], style_id: i32) -> Option<String> {
        styles
            .iter()
            .find(|style| style.id == style_id)
            .map(|style| format!("{}/cdn/img/{}", self.base_url, style.icon))
    }

    pub fn rune_perk_icon_url(
        &self,
        styles: &[RuneStyleDto],
        style_id: i32,
        perk_id: i32,
    ) -> Option<String> {
        styles
            .iter()
            .find(|style| style.id == style_id)?
            .slots
            .iter()
            .flat_map(|slot| &slot.runes)
            .find(|rune| rune.id == perk_id)
            .map(|rune| format!("{}/cdn/img/{}", self.base_url, rune.icon))
    }
}
