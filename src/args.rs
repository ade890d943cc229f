use std::num::NonZeroU32;

use clap::{Args, Parser, Subcommand};

use crate::db::models::{GuildId, MemberId};

/// Guild score, level and rank lookups against the score store
#[derive(Parser, Debug)]
#[command(name = "guild-score", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a member's rank card
    #[command(visible_aliases = ["level", "score"])]
    Rank {
        #[command(flatten)]
        target: MemberTarget,

        /// Name printed on the card (defaults to the member id)
        #[arg(short, long)]
        name: Option<String>,

        /// Print the score snapshot as JSON instead of a card
        #[arg(long)]
        json: bool,
    },

    /// Show the guild scoreboard
    Scoreboard {
        /// Guild id
        #[arg(short, long)]
        guild: i64,

        /// Layout: grid or list
        #[arg(short, long, default_value = "grid")]
        style: String,

        /// Number of members shown (defaults to SCOREBOARD_LIMIT)
        #[arg(short, long)]
        limit: Option<NonZeroU32>,
    },

    /// Dump every field of a member's score object
    DebugRepr {
        #[command(flatten)]
        target: MemberTarget,
    },

    /// List members of a guild with their active flag
    ShowActive {
        /// Guild id
        #[arg(short, long)]
        guild: i64,
    },

    /// Overwrite a member's stored score
    SetScore {
        #[command(flatten)]
        target: MemberTarget,

        /// New total score
        #[arg(short, long, value_parser = clap::value_parser!(i64).range(0..))]
        score: i64,
    },

    /// Create the scores table if it does not exist
    InitDb,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct MemberTarget {
    /// Guild id
    #[arg(short, long)]
    pub guild: i64,

    /// Member id
    #[arg(short, long)]
    pub member: i64,
}

impl MemberTarget {
    pub fn ids(&self) -> (MemberId, GuildId) {
        (MemberId(self.member), GuildId(self.guild))
    }
}
