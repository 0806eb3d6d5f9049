//! Game Logic Module
//!
//! All match simulation code. Nothing here touches the clock or does I/O.
//!
//! ## Module Structure
//!
//! - `config`: Tunable constants, presets and JSON loading
//! - `state`: Match state, identifiers, outcome
//! - `body`: Kinematic integration
//! - `combatant`: Per-combatant combat state machine
//! - `intent`: Per-tick controller output
//! - `policy`: Scripted decision making
//! - `resolver`: Hit detection and damage application
//! - `projectile`, `particle`: Short-lived entities
//! - `zone`: Shrinking safe zone (battle royale)
//! - `tick`: Frame loop and secondary timer
//! - `events`: Events surfaced to the host
//! - `snapshot`: Read-only frame view for rendering

pub mod body;
pub mod combatant;
pub mod config;
pub mod events;
pub mod intent;
pub mod particle;
pub mod policy;
pub mod projectile;
pub mod resolver;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod zone;

// Re-export key types
pub use combatant::{Combatant, Stance};
pub use config::{ConfigError, MatchConfig};
pub use events::{GameEvent, GameEventData};
pub use intent::Intent;
pub use snapshot::FrameSnapshot;
pub use state::{CombatantId, ControlMode, Facing, GameMode, MatchOutcome, MatchPhase, MatchState, Skin};
pub use tick::{on_timer, simulate, simulate_with, tick, TickResult};
