//! Rooftop Rumble
//!
//! Runs one match from the command line, headless or against the wall
//! clock, and reports the outcome.

mod cli;

use std::collections::BTreeMap;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use rooftop_rumble::{
    VERSION,
    game::{
        config::MatchConfig,
        events::{GameEvent, GameEventData},
        snapshot::FrameSnapshot,
        state::{GameMode, MatchState, Skin},
        tick::simulate_with,
    },
    runtime::{FrameSink, MatchRunner, NoInput},
};

fn main() -> anyhow::Result<()> {
    let args = cli::parse_args();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Rooftop Rumble v{}", VERSION);

    let config = match &args.config {
        Some(path) => MatchConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => MatchConfig::for_mode(args.mode.into()),
    };
    let seed = args.seed.unwrap_or_else(rand::random);

    let state = match config.mode {
        GameMode::Royale => MatchState::royale(&config, args.bots, seed),
        GameMode::Duel => MatchState::duel(&config, Skin::Ninja, Skin::Azure, seed),
    };
    info!(
        mode = ?config.mode,
        combatants = state.combatants.len(),
        seed,
        "Match configured"
    );

    let banner = if args.realtime {
        run_realtime(state, config, args.snapshots)?
    } else {
        run_headless(state, &config, args.max_ticks, args.snapshots)?
    };

    match banner {
        Some(banner) => info!("{}", banner),
        None => warn!("Match stopped without a result"),
    }
    Ok(())
}

/// Run as fast as possible, calling the timer every `tick_rate` frames.
fn run_headless(
    mut state: MatchState,
    config: &MatchConfig,
    max_ticks: u32,
    snapshots: bool,
) -> anyhow::Result<Option<String>> {
    let mut printer = SnapshotPrinter { enabled: snapshots };
    let tick_rate = config.tick_rate.max(1);

    info!("Running up to {} ticks ({} s at {} Hz)...", max_ticks, max_ticks / tick_rate, tick_rate);

    simulate_with(&mut state, config, max_ticks, |_| BTreeMap::new(), |state, events| {
        printer.present(&FrameSnapshot::capture(state));
        printer.events(&events);
    });
    if state.is_ended() {
        info!("Match ended at tick {}", state.tick);
    }

    Ok(state.banner())
}

/// Run against the wall clock until the match ends or Ctrl-C.
fn run_realtime(state: MatchState, config: MatchConfig, snapshots: bool) -> anyhow::Result<Option<String>> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;

    runtime.block_on(async move {
        let handle = MatchRunner::spawn(state, config, NoInput, SnapshotPrinter { enabled: snapshots });

        let stop = handle.shutdown_sender();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received, stopping match");
                let _ = stop.send(());
            }
        });

        let report = handle.join().await.context("Match runner failed")?;
        info!(ticks = report.ticks, reason = ?report.reason, "Match finished");
        Ok::<_, anyhow::Error>(report.banner)
    })
}

/// Writes frames to stdout as JSON lines and logs notable events.
struct SnapshotPrinter {
    enabled: bool,
}

impl FrameSink for SnapshotPrinter {
    fn present(&mut self, frame: &FrameSnapshot) {
        if !self.enabled {
            return;
        }
        match serde_json::to_string(frame) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!("Failed to serialize frame {}: {}", frame.tick, e),
        }
    }

    fn events(&mut self, events: &[GameEvent]) {
        for event in events {
            match &event.data {
                GameEventData::CombatantDowned { victim, killer } => {
                    info!("Combatant {} downed by {:?} at tick {}", victim, killer, event.tick);
                }
                GameEventData::ZonePhase { phase, target_left, target_right } => {
                    info!("Zone phase {}: [{:.0}, {:.0}]", phase, target_left, target_right);
                }
                GameEventData::MatchEnded { outcome, duration_ticks } => {
                    info!("Match ended: {:?} after {} ticks", outcome, duration_ticks);
                }
                _ => {}
            }
        }
    }
}
