use serde::{Deserialize, Serialize};

// ============================================================================
// Account-v1
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    #[serde(default)]
    pub game_name: Option<String>,
    #[serde(default)]
    pub tag_line: Option<String>,
}

impl AccountDto {
    /// `gameName#tagLine`, when both halves are known.
    pub fn riot_id(&self) -> Option<String> {
        match (&self.game_name, &self.tag_line) {
            (Some(name), Some(tag)) => Some(format!("{name}#{tag}")),
            _ => None,
        }
    }
}

// ============================================================================
// Summoner-v4
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerDto {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub account_id: String,
    pub puuid: String,
    pub profile_icon_id: i32,
    pub summoner_level: i64,
}

// ============================================================================
// League-v4
// ============================================================================

pub const RANKED_SOLO_QUEUE: &str = "RANKED_SOLO_5x5";
pub const RANKED_FLEX_QUEUE: &str = "RANKED_FLEX_SR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntryDto {
    #[serde(default)]
    pub puuid: String,
    pub queue_type: String,
    #[serde(default)]
    pub tier: String,
    #[serde(default)]
    pub rank: String,
    #[serde(default)]
    pub league_points: i32,
    #[serde(default)]
    pub wins: i32,
    #[serde(default)]
    pub losses: i32,
}

impl LeagueEntryDto {
    pub fn is_solo_queue(&self) -> bool {
        self.queue_type == RANKED_SOLO_QUEUE
    }

    pub fn is_flex_queue(&self) -> bool {
        self.queue_type == RANKED_FLEX_QUEUE
    }

    /// "GOLD II", or just the tier for apex players.
    pub fn label(&self) -> String {
        if self.rank.is_empty() || crate::rank::is_apex_tier(&self.tier) {
            self.tier.to_uppercase()
        } else {
            format!("{} {}", self.tier.to_uppercase(), self.rank.to_uppercase())
        }
    }

    pub fn win_rate(&self) -> Option<f64> {
        let games = self.wins + self.losses;
        (games > 0).then(|| self.wins as f64 / games as f64 * 100.0)
    }
}

/// Picks the entry shown for a player: solo queue first, then flex.
pub fn select_ranked_entry(entries: Vec<LeagueEntryDto>) -> Option<LeagueEntryDto> {
    let mut flex = None;

    for entry in entries {
        if entry.is_solo_queue() {
            return Some(entry);
        }
        if entry.is_flex_queue() && flex.is_none() {
            flex = Some(entry);
        }
    }

    flex
}

// ============================================================================
// Match-v5
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDto {
    pub metadata: MetadataDto,
    pub info: InfoDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDto {
    pub match_id: String,
    #[serde(default)]
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoDto {
    pub game_duration: i64,
    #[serde(default)]
    pub game_start_timestamp: i64,
    pub queue_id: i32,
    pub participants: Vec<ParticipantDto>,
    #[serde(default)]
    pub teams: Vec<TeamDto>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticipantDto {
    pub puuid: String,
    pub riot_id_game_name: String,
    pub riot_id_tagline: String,
    pub summoner_level: i64,
    pub champion_name: String,
    pub champ_level: i32,
    pub team_id: i32,
    pub team_position: String,
    pub win: bool,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    pub double_kills: i32,
    pub triple_kills: i32,
    pub quadra_kills: i32,
    pub penta_kills: i32,
    pub total_damage_dealt_to_champions: i64,
    pub total_damage_taken: i64,
    pub gold_earned: i64,
    pub total_minions_killed: i32,
    pub neutral_minions_killed: i32,
    pub vision_score: i32,
    pub wards_placed: i32,
    pub wards_killed: i32,
    pub detector_wards_placed: i32,
    pub summoner1_id: i32,
    pub summoner2_id: i32,
    pub item0: i32,
    pub item1: i32,
    pub item2: i32,
    pub item3: i32,
    pub item4: i32,
    pub item5: i32,
    pub item6: i32,
    pub perks: PerksDto,

    // Attached after ranked resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub league_points: Option<i32>,
}

impl ParticipantDto {
    /// Returns all item IDs (0 = empty slot)
    pub fn items(&self) -> [i32; 7] {
        [
            self.item0, self.item1, self.item2, self.item3, self.item4, self.item5, self.item6,
        ]
    }

    pub fn riot_id(&self) -> Option<String> {
        if self.riot_id_game_name.is_empty() || self.riot_id_tagline.is_empty() {
            None
        } else {
            Some(format!("{}#{}", self.riot_id_game_name, self.riot_id_tagline))
        }
    }

    pub fn annotate_rank(&mut self, entry: &LeagueEntryDto) {
        self.tier = Some(entry.tier.clone());
        self.rank = Some(entry.rank.clone());
        self.league_points = Some(entry.league_points);
    }

    pub fn is_annotated(&self) -> bool {
        self.tier.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerksDto {
    pub stat_perks: StatPerksDto,
    pub styles: Vec<PerkStyleDto>,
}

impl PerksDto {
    /// (primary style, keystone perk)
    pub fn keystone(&self) -> Option<(i32, i32)> {
        let primary = self.styles.first()?;
        let keystone = primary.selections.first()?;
        Some((primary.style, keystone.perk))
    }

    pub fn secondary_style(&self) -> Option<i32> {
        self.styles.get(1).map(|s| s.style)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatPerksDto {
    pub defense: i32,
    pub flex: i32,
    pub offense: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PerkStyleDto {
    pub description: String,
    pub style: i32,
    pub selections: Vec<PerkSelectionDto>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PerkSelectionDto {
    pub perk: i32,
    pub var1: i32,
    pub var2: i32,
    pub var3: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamDto {
    pub team_id: i32,
    pub win: bool,
    pub bans: Vec<BanDto>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BanDto {
    pub champion_id: i32,
    pub pick_turn: i32,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn league_entry(puuid: &str, queue: &str, tier: &str, rank: &str) -> LeagueEntryDto {
        LeagueEntryDto {
            puuid: puuid.to_string(),
            queue_type: queue.to_string(),
            tier: tier.to_string(),
            rank: rank.to_string(),
            league_points: 42,
            wins: 10,
            losses: 8,
        }
    }

    pub fn participant(puuid: &str, team_id: i32) -> ParticipantDto {
        ParticipantDto {
            puuid: puuid.to_string(),
            riot_id_game_name: format!("Name-{puuid}"),
            riot_id_tagline: "NA1".to_string(),
            champion_name: "Ahri".to_string(),
            team_id,
            kills: 2,
            deaths: 1,
            assists: 3,
            total_minions_killed: 150,
            neutral_minions_killed: 30,
            win: team_id == 100,
            ..Default::default()
        }
    }
}
