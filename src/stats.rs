//! Per-match figures shown next to a match: ratios, team splits and labels.

use chrono::{DateTime, TimeZone, Utc};

use crate::riot::ParticipantDto;

pub const BLUE_TEAM: i32 = 100;
pub const RED_TEAM: i32 = 200;

/// `(kills + assists) / deaths`, deathless games count deaths as one.
pub fn kda(participant: &ParticipantDto) -> f64 {
    let takedowns = f64::from(participant.kills + participant.assists);
    if participant.deaths == 0 {
        takedowns
    } else {
        takedowns / f64::from(participant.deaths)
    }
}

pub fn kda_label(participant: &ParticipantDto) -> String {
    format!("{:.2} : 1 KDA", kda(participant))
}

/// Share of the team's kills the participant took part in, in percent.
pub fn kill_participation(participant: &ParticipantDto, participants: &[ParticipantDto]) -> f64 {
    let team_kills: i32 = team(participants, participant.team_id)
        .map(|p| p.kills)
        .sum();

    if team_kills == 0 {
        return 0.0;
    }
    f64::from(participant.kills + participant.assists) / f64::from(team_kills) * 100.0
}

pub fn creep_score(participant: &ParticipantDto) -> i32 {
    participant.total_minions_killed
}

pub fn cs_per_minute(participant: &ParticipantDto, game_duration_secs: i64) -> f64 {
    if game_duration_secs <= 0 {
        return 0.0;
    }
    f64::from(creep_score(participant)) / (game_duration_secs as f64 / 60.0)
}

pub fn team(
    participants: &[ParticipantDto],
    team_id: i32,
) -> impl Iterator<Item = &ParticipantDto> {
    participants.iter().filter(move |p| p.team_id == team_id)
}

/// Participants split into blue and red side.
pub fn split_teams(
    participants: &[ParticipantDto],
) -> (Vec<&ParticipantDto>, Vec<&ParticipantDto>) {
    (
        team(participants, BLUE_TEAM).collect(),
        team(participants, RED_TEAM).collect(),
    )
}

/// Highest champion damage on a team, used to scale damage bars.
pub fn team_max_damage_dealt(participants: &[ParticipantDto], team_id: i32) -> i64 {
    team(participants, team_id)
        .map(|p| p.total_damage_dealt_to_champions)
        .max()
        .unwrap_or(0)
}

pub fn team_max_damage_taken(participants: &[ParticipantDto], team_id: i32) -> i64 {
    team(participants, team_id)
        .map(|p| p.total_damage_taken)
        .max()
        .unwrap_or(0)
}

pub fn queue_name(queue_id: i32) -> &'static str {
    match queue_id {
        420 => "Ranked Solo/Duo",
        430 => "Normal Blind",
        440 => "Ranked Flex",
        400 => "Normal Draft",
        450 => "ARAM",
        700 => "Clash",
        900 => "URF",
        _ => "Other",
    }
}

pub fn normalized_role(team_position: &str) -> &'static str {
    match team_position {
        "TOP" => "Top",
        "JUNGLE" => "Jungle",
        "MIDDLE" => "Mid",
        "BOTTOM" => "AD Carry",
        "UTILITY" => "Support",
        _ => "",
    }
}

/// `mm:ss` with unpadded minutes, e.g. `31:05`.
pub fn format_duration(game_duration_secs: i64) -> String {
    let secs = game_duration_secs.max(0);
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn plural(value: i64, unit: &str) -> String {
    if value == 1 {
        format!("{value} {unit} ago")
    } else {
        format!("{value} {unit}s ago")
    }
}

/// Coarse age of a game start timestamp (epoch millis) relative to `now`.
///
/// Hours under a day, then days under a week, weeks under four weeks, months
/// of thirty days beyond.
pub fn time_ago_from(timestamp_ms: i64, now: DateTime<Utc>) -> String {
    let started = Utc
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .unwrap_or(now);
    let elapsed = now.signed_duration_since(started);

    let hours = elapsed.num_hours().max(0);
    let days = elapsed.num_days().max(0);
    let weeks = days / 7;

    if hours < 24 {
        plural(hours, "hour")
    } else if days < 7 {
        plural(days, "day")
    } else if weeks < 4 {
        plural(weeks, "week")
    } else {
        plural(days / 30, "month")
    }
}

pub fn time_ago(timestamp_ms: i64) -> String {
    time_ago_from(timestamp_ms, Utc::now())
}

/// Display colour of a rank label such as `GOLD II`, gray when unknown.
pub fn tier_color(label: &str) -> &'static str {
    let tier = label.split(' ').next().unwrap_or_default();
    match tier {
        "IRON" => "#5e4b47",
        "BRONZE" => "#a97142",
        "SILVER" => "#9faecf",
        "GOLD" => "#d4af37",
        "PLATINUM" => "#27e2a4",
        "EMERALD" => "#20c997",
        "DIAMOND" => "#5b9ee9",
        "MASTER" => "#b660e1",
        "GRANDMASTER" => "#de453f",
        "CHALLENGER" => "#e0b75f",
        _ => "gray",
    }
}
