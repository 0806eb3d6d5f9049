//! Real-Time Match Runner
//!
//! Drives one match from a tokio task: a frame interval at the tick rate,
//! a separate one-second timer, and a shutdown channel. Input is polled and
//! a snapshot presented once per frame.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::game::config::MatchConfig;
use crate::game::events::GameEvent;
use crate::game::intent::Intent;
use crate::game::snapshot::FrameSnapshot;
use crate::game::state::{CombatantId, MatchOutcome, MatchState};
use crate::game::tick::{on_timer, tick};

/// Period of the secondary timer.
pub const TIMER_PERIOD: Duration = Duration::from_secs(1);

/// Runner errors.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The match task panicked or was cancelled.
    #[error("Match task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// `join` was called on a handle whose task is gone.
    #[error("Match task already joined")]
    AlreadyJoined,
}

/// Supplies player intents, once per frame.
pub trait InputSource: Send + 'static {
    /// Intents for player-controlled combatants this frame.
    fn poll(&mut self, state: &MatchState) -> BTreeMap<CombatantId, Intent>;
}

impl<F> InputSource for F
where
    F: FnMut(&MatchState) -> BTreeMap<CombatantId, Intent> + Send + 'static,
{
    fn poll(&mut self, state: &MatchState) -> BTreeMap<CombatantId, Intent> {
        self(state)
    }
}

/// No player input at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self, _state: &MatchState) -> BTreeMap<CombatantId, Intent> {
        BTreeMap::new()
    }
}

/// Receives what happened, once per frame.
pub trait FrameSink: Send + 'static {
    /// Draw the frame.
    fn present(&mut self, frame: &FrameSnapshot);

    /// Events from the frame or timer that just ran.
    fn events(&mut self, _events: &[GameEvent]) {}
}

impl<F> FrameSink for F
where
    F: FnMut(&FrameSnapshot) + Send + 'static,
{
    fn present(&mut self, frame: &FrameSnapshot) {
        self(frame)
    }
}

/// Discards every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _frame: &FrameSnapshot) {}
}

/// Why the runner stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The match reached an outcome
    Ended,
    /// `stop()` was called
    Shutdown,
}

/// Final state of a run.
#[derive(Debug)]
pub struct MatchReport {
    /// Why the loop exited
    pub reason: StopReason,
    /// Outcome, if the match ended
    pub outcome: Option<MatchOutcome>,
    /// End-screen headline, if the match ended
    pub banner: Option<String>,
    /// Frames simulated
    pub ticks: u32,
    /// State at exit
    pub state: MatchState,
}

/// Spawns match tasks.
pub struct MatchRunner;

impl MatchRunner {
    /// Start driving `state` on the current tokio runtime.
    pub fn spawn<I, S>(state: MatchState, config: MatchConfig, input: I, sink: S) -> MatchHandle
    where
        I: InputSource,
        S: FrameSink,
    {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let task = tokio::spawn(run_match_loop(state, config, input, sink, shutdown_rx));
        MatchHandle { shutdown_tx, task: Some(task) }
    }
}

/// Handle to a running match. Dropping it aborts the task.
pub struct MatchHandle {
    shutdown_tx: broadcast::Sender<()>,
    task: Option<JoinHandle<MatchReport>>,
}

impl MatchHandle {
    /// Ask the loop to exit after the current step.
    pub fn stop(&self) {
        // No receiver means the loop already exited
        let _ = self.shutdown_tx.send(());
    }

    /// A sender that triggers the same shutdown as [`MatchHandle::stop`],
    /// usable after the handle has been moved into `join`.
    pub fn shutdown_sender(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Check if the task has finished.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Wait for the loop to exit.
    pub async fn join(mut self) -> Result<MatchReport, RunnerError> {
        let task = self.task.take().ok_or(RunnerError::AlreadyJoined)?;
        Ok(task.await?)
    }
}

impl Drop for MatchHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Frame interval for a tick rate, never shorter than one microsecond.
fn frame_period(tick_rate: u32) -> Duration {
    let micros = 1_000_000 / u64::from(tick_rate.max(1));
    Duration::from_micros(micros.max(1))
}

/// The match task body.
async fn run_match_loop<I, S>(
    mut state: MatchState,
    config: MatchConfig,
    mut input: I,
    mut sink: S,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> MatchReport
where
    I: InputSource,
    S: FrameSink,
{
    let mut frames = interval(frame_period(config.tick_rate));
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut timer = interval_at(Instant::now() + TIMER_PERIOD, TIMER_PERIOD);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        mode = ?state.mode,
        combatants = state.combatants.len(),
        tick_rate = config.tick_rate,
        "Match started"
    );

    let reason = loop {
        tokio::select! {
            _ = frames.tick() => {
                let inputs = input.poll(&state);
                let result = tick(&mut state, &inputs, &config);

                sink.present(&FrameSnapshot::capture(&state));
                if !result.events.is_empty() {
                    sink.events(&result.events);
                }
                if result.match_ended {
                    break StopReason::Ended;
                }
            }
            _ = timer.tick() => {
                let events = on_timer(&mut state, &config);
                debug!(seconds = state.timer_seconds, countdown = ?state.countdown, "Timer");
                if !events.is_empty() {
                    sink.events(&events);
                }
            }
            _ = shutdown_rx.recv() => {
                info!("Shutdown signal received");
                break StopReason::Shutdown;
            }
        }
    };

    let banner = state.banner();
    info!(ticks = state.tick, ?reason, banner = ?banner, "Match loop exited");

    MatchReport {
        reason,
        outcome: state.outcome,
        banner,
        ticks: state.tick,
        state,
    }
}
