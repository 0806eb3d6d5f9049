//! Command-line interface for Rooftop Rumble
//!
//! Headless by default; `--realtime` runs the match against the wall clock.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use rooftop_rumble::GameMode;

/// Variant selection on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Free-for-all against bots in a shrinking zone
    Royale,
    /// 1v1 against a scripted opponent
    Duel,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Royale => GameMode::Royale,
            ModeArg::Duel => GameMode::Duel,
        }
    }
}

/// Real-time 2D arena combat simulator
#[derive(Parser, Debug)]
#[command(name = "rooftop-rumble")]
#[command(about = "Real-time 2D arena combat simulator")]
#[command(version)]
pub struct Args {
    /// Game variant (ignored when --config sets a mode)
    #[arg(long, value_enum, default_value = "royale")]
    pub mode: ModeArg,

    /// Number of bots (battle royale)
    #[arg(long, default_value = "5")]
    pub bots: usize,

    /// RNG seed (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON config file overriding the mode preset
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Stop a headless run after this many frames
    #[arg(long, default_value = "36000")]
    pub max_ticks: u32,

    /// Drive the match from the wall clock instead of as fast as possible
    #[arg(long)]
    pub realtime: bool,

    /// Print one JSON frame snapshot per tick to stdout
    #[arg(long)]
    pub snapshots: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}
