use clap::Parser;
use thiserror::Error;

use crate::args::{Cli, Command};
use crate::card::{CardError, ScoreboardStyle};
use crate::db::prelude::*;
use crate::score::{ScoreError, ScoreObject};
use crate::scoreboard::Scoreboard;
use crate::util::{env, telemetry};

mod args;
mod card;
mod constants;
mod db;
mod score;
mod scoreboard;
mod util;

#[derive(Debug, Error)]
enum RunnerErr {
    #[error(transparent)]
    Env(#[from] env::EnvErr),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error(transparent)]
    Card(#[from] CardError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Std(#[from] Box<dyn std::error::Error>),
}

type Result<T> = core::result::Result<T, RunnerErr>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let telemetry = telemetry::Telemetry::new().await?.register();

    tracing::debug!(command = ?cli.command, "dispatching");

    let result = run(cli.command).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "command failed");
    }

    telemetry.shutdown();
    result
}

async fn run(command: Command) -> Result<()> {
    let pool = db_pool().await?;
    let store = PgScoreStore::new(pool);

    match command {
        Command::Rank { target, name, json } => {
            let (member_id, guild_id) = target.ids();
            let obj = ScoreObject::fetch(&store, member_id, guild_id).await?;
            let snapshot = obj.snapshot().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                let name = name.unwrap_or_else(|| member_id.to_string());
                print!("{}", card::rank_card::render(&name, &snapshot));
            }
        }

        Command::Scoreboard {
            guild,
            style,
            limit,
        } => {
            let style: ScoreboardStyle = style.parse()?;
            let limit = match limit {
                Some(l) => l,
                None => env::env().await?.scoreboard_limit,
            };

            let guild_id = GuildId(guild);
            let board = Scoreboard::fetch(&store, guild_id, limit, |_| None).await?;
            let out = card::render_scoreboard(&board, style, &guild_id.to_string()).await?;
            print!("{out}");
        }

        Command::DebugRepr { target } => {
            let (member_id, guild_id) = target.ids();
            let obj = ScoreObject::fetch(&store, member_id, guild_id).await?;
            println!("{}", obj.debug_repr().await?);
        }

        Command::ShowActive { guild } => {
            let members = store.list_members(GuildId(guild)).await?;
            if members.is_empty() {
                println!("no score records for guild {guild}");
            }
            for record in members {
                println!("{record}");
            }
        }

        Command::SetScore { target, score } => {
            let (member_id, guild_id) = target.ids();
            let record = store.set_score(member_id, guild_id, score).await?;

            let obj = ScoreObject::new(member_id, guild_id, record.score, &store);
            println!("{}", obj.summary().await?);
        }

        Command::InitDb => {
            db::schema::ensure_schema(pool).await?;
            println!("schema ready");
        }
    }

    Ok(())
}
