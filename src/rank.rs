//! Ordinal scoring of ranked tiers.
//!
//! Each tier/division pair maps to a score in `1..=27` (`IRON IV` is 1,
//! `CHALLENGER` is 27). Apex tiers carry no division. Averages over scores are
//! mapped back to the closest label.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::riot::LeagueEntryDto;

const APEX_TIERS: [&str; 3] = ["MASTER", "GRANDMASTER", "CHALLENGER"];

/// Labels indexed by `score - 1`.
const RANK_LABELS: [&str; 27] = [
    "IRON IV",
    "IRON III",
    "IRON II",
    "IRON I",
    "BRONZE IV",
    "BRONZE III",
    "BRONZE II",
    "BRONZE I",
    "SILVER IV",
    "SILVER III",
    "SILVER II",
    "SILVER I",
    "GOLD IV",
    "GOLD III",
    "GOLD II",
    "GOLD I",
    "PLATINUM IV",
    "PLATINUM III",
    "PLATINUM II",
    "PLATINUM I",
    "DIAMOND IV",
    "DIAMOND III",
    "DIAMOND II",
    "DIAMOND I",
    "MASTER",
    "GRANDMASTER",
    "CHALLENGER",
];

pub fn is_apex_tier(tier: &str) -> bool {
    APEX_TIERS.iter().any(|apex| apex.eq_ignore_ascii_case(tier))
}

/// Score of a tier and division, `None` when the pair is not on the ladder.
pub fn score_of(tier: &str, division: &str) -> Option<u8> {
    let tier = tier.trim().to_uppercase();
    if tier.is_empty() {
        return None;
    }

    let key = if is_apex_tier(&tier) {
        tier
    } else {
        format!("{} {}", tier, division.trim().to_uppercase())
    };

    RANK_LABELS
        .iter()
        .position(|label| *label == key)
        .map(|idx| idx as u8 + 1)
}

pub fn label_of(score: u8) -> Option<&'static str> {
    RANK_LABELS.get(usize::from(score).checked_sub(1)?).copied()
}

pub fn entry_score(entry: &LeagueEntryDto) -> Option<u8> {
    score_of(&entry.tier, &entry.rank)
}

/// Average skill label of a lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankLabel {
    Ranked(&'static str),
    Unranked,
}

impl RankLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankLabel::Ranked(label) => *label,
            RankLabel::Unranked => "Unranked",
        }
    }

    /// Tier part of the label ("GOLD" for "GOLD II").
    pub fn tier(&self) -> Option<&'static str> {
        match self {
            RankLabel::Ranked(label) => (*label).split(' ').next(),
            RankLabel::Unranked => None,
        }
    }
}

impl fmt::Display for RankLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RankLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Mean score of the entries that sit on the ladder, rounded half up and
/// mapped back to its label.
pub fn average_label(entries: &[LeagueEntryDto]) -> RankLabel {
    let scores: Vec<u32> = entries
        .iter()
        .filter_map(entry_score)
        .map(u32::from)
        .collect();

    if scores.is_empty() {
        return RankLabel::Unranked;
    }

    let mean = scores.iter().sum::<u32>() as f64 / scores.len() as f64;
    let rounded = mean.round();

    u8::try_from(rounded as u32)
        .ok()
        .and_then(label_of)
        .map(RankLabel::Ranked)
        .unwrap_or(RankLabel::Unranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::riot::types::fixtures::league_entry;

    fn solo(tier: &str, rank: &str) -> LeagueEntryDto {
        league_entry("p", "RANKED_SOLO_5x5", tier, rank)
    }

    #[test]
    fn scores_cover_the_whole_ladder() {
        assert_eq!(score_of("IRON", "IV"), Some(1));
        assert_eq!(score_of("gold", "iv"), Some(13));
        assert_eq!(score_of("GOLD", "III"), Some(14));
        assert_eq!(score_of("DIAMOND", "I"), Some(24));
        assert_eq!(score_of("MASTER", "I"), Some(25));
        assert_eq!(score_of("GRANDMASTER", ""), Some(26));
        assert_eq!(score_of("CHALLENGER", "I"), Some(27));
    }

    #[test]
    fn unknown_tiers_have_no_score() {
        assert_eq!(score_of("", "IV"), None);
        assert_eq!(score_of("EMERALD", "II"), None);
        assert_eq!(score_of("GOLD", "V"), None);
    }

    #[test]
    fn labels_round_trip_through_scores() {
        for score in 1..=27u8 {
            let label = label_of(score).unwrap();
            let mut parts = label.split(' ');
            let tier = parts.next().unwrap();
            let division = parts.next().unwrap_or("");
            assert_eq!(score_of(tier, division), Some(score));
        }
        assert_eq!(label_of(0), None);
        assert_eq!(label_of(28), None);
    }

    #[test]
    fn average_rounds_half_up() {
        let entries = vec![solo("GOLD", "IV"), solo("GOLD", "III")];
        assert_eq!(average_label(&entries), RankLabel::Ranked("GOLD III"));
    }

    #[test]
    fn average_ignores_off_ladder_entries() {
        let entries = vec![solo("SILVER", "I"), solo("EMERALD", "IV"), solo("", "")];
        assert_eq!(average_label(&entries), RankLabel::Ranked("SILVER I"));
    }

    #[test]
    fn empty_or_unscored_input_is_unranked() {
        assert_eq!(average_label(&[]), RankLabel::Unranked);
        assert_eq!(
            average_label(&[solo("EMERALD", "II")]),
            RankLabel::Unranked
        );
        assert_eq!(RankLabel::Unranked.to_string(), "Unranked");
    }

    #[test]
    fn apex_average() {
        let entries = vec![solo("CHALLENGER", "I"), solo("GRANDMASTER", "I")];
        assert_eq!(average_label(&entries), RankLabel::Ranked("CHALLENGER"));
        assert_eq!(RankLabel::Ranked("GOLD II").tier(), Some("GOLD"));
    }
}
