//! Runtime Module
//!
//! Wall-clock driving of a match. The simulation in `game/` never sees the
//! clock; this module owns the intervals and the task.

pub mod runner;

pub use runner::{
    FrameSink, InputSource, MatchHandle, MatchReport, MatchRunner, NoInput, NullSink, RunnerError,
    StopReason,
};
