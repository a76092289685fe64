use std::time::Duration;

use clap::{Parser, Subcommand};
use rankscope::{
    AppError, Config, MatchSummary, SearchOutcome, SearchSession, SearchState,
    config::{DEFAULT_REQUEST_TIMEOUT_SECS, ddragon_version},
    ddragon::{DataDragon, filter_champions},
    logging, stats,
};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "rankscope")]
#[command(about = "Look up a League of Legends player and the rank of their lobbies")]
#[command(long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search a player by Riot ID (Name#Tag)
    Search {
        riot_id: String,

        /// Number of recent matches to resolve (default: MATCH_HISTORY_COUNT)
        #[arg(short, long)]
        count: Option<u32>,

        /// Print the search state as JSON
        #[arg(long)]
        json: bool,
    },
    /// List champions from Data Dragon
    Champions {
        /// Case-insensitive name filter
        #[arg(short, long)]
        filter: Option<String>,

        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logging::init();

    info!("🐙 Starting...");

    if let Err(e) = run(args).await {
        error!(error = %e, "❌ Command failed");
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    match args.command {
        Command::Search {
            riot_id,
            count,
            json,
        } => {
            let mut config = Config::from_env()?;
            if let Some(count) = count {
                config.match_history_count = count;
            }
            info!(platform = %config.platform, "🔍 Searching {}", riot_id);

            let session = SearchSession::from_config(&config)?;
            if session.search(&riot_id).await == SearchOutcome::Superseded {
                return Ok(());
            }
            let state = session.state();

            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                print_search(&state);
            }
            if state.summoner.is_none() {
                std::process::exit(1);
            }
        }
        Command::Champions { filter, json } => {
            let ddragon = DataDragon::new(
                &ddragon_version(),
                Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            )?;
            let champions = ddragon.champions().await?;
            let champions = filter_champions(&champions, filter.as_deref().unwrap_or_default());

            if json {
                println!("{}", serde_json::to_string_pretty(&champions)?);
            } else {
                for champion in champions {
                    println!("{:<16} {}", champion.name, champion.title);
                }
            }
        }
    }

    Ok(())
}

fn print_search(state: &SearchState) {
    if let (Some(account), Some(summoner)) = (&state.account, &state.summoner) {
        println!(
            "{}  (level {})",
            account.riot_id().unwrap_or_else(|| state.riot_id.clone()),
            summoner.summoner_level
        );
        match &state.ranked {
            Some(entry) => println!(
                "{} {} LP  {}W {}L",
                entry.label(),
                entry.league_points,
                entry.wins,
                entry.losses
            ),
            None => println!("Unranked"),
        }

        let puuid = &summoner.puuid;
        for game in &state.match_history {
            print_match(game, puuid);
        }
    }

    if let Some(message) = &state.error_message {
        eprintln!("{message}");
    }
}

fn print_match(game: &MatchSummary, puuid: &str) {
    println!();
    println!(
        "{}  {}  {}  avg {}",
        stats::queue_name(game.queue_id),
        stats::time_ago(game.game_start_timestamp),
        stats::format_duration(game.game_duration),
        game.average_rank
    );

    let Some(player) = game.participant(puuid) else {
        return;
    };
    println!(
        "  {} {}  {}/{}/{}  {}  KP {:.0}%  CS {} ({:.1}/min)",
        if player.win { "Victory" } else { "Defeat" },
        player.champion_name,
        player.kills,
        player.deaths,
        player.assists,
        stats::kda_label(player),
        stats::kill_participation(player, &game.participants),
        stats::creep_score(player),
        stats::cs_per_minute(player, game.game_duration),
    );
}
