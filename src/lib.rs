//! # Rooftop Rumble
//!
//! Real-time 2D arena combat simulation: a battle royale with a shrinking
//! zone and a 1v1 duel with blocking, specials and combos.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ROOFTOP RUMBLE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Geometry and randomness                   │
//! │  ├── vec2.rs     - 2D vector (screen space, +y down)         │
//! │  ├── rect.rs     - AABB and circle tests                     │
//! │  └── rng.rs      - Seedable Xorshift128+ PRNG                │
//! │                                                              │
//! │  game/           - Simulation (no clock, no I/O)             │
//! │  ├── config.rs   - Tunables, presets, JSON loading           │
//! │  ├── state.rs    - Match state and identifiers               │
//! │  ├── body.rs     - Gravity, ground, friction                 │
//! │  ├── combatant.rs- Combat state machine                      │
//! │  ├── intent.rs   - Per-tick controller output                │
//! │  ├── policy.rs   - Scripted combatants                       │
//! │  ├── resolver.rs - Hits, blocks, combos, knockback           │
//! │  ├── zone.rs     - Shrinking safe zone                       │
//! │  ├── tick.rs     - Frame loop and secondary timer            │
//! │  └── snapshot.rs - Read-only frame for renderers             │
//! │                                                              │
//! │  runtime/        - Wall-clock driver (tokio)                 │
//! │  └── runner.rs   - Frame/timer intervals, shutdown           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Time
//!
//! Two clocks drive a match: the frame `tick` (movement, combat, zone
//! edges, hazard windows) and `on_timer`, once per second (zone shrink
//! steps, duel countdown). Headless callers interleave them by hand; the
//! runner keeps them on separate intervals.
//!
//! ```
//! use std::collections::BTreeMap;
//! use rooftop_rumble::{MatchConfig, MatchState, tick};
//!
//! let config = MatchConfig::royale();
//! let mut state = MatchState::royale(&config, 5, 42);
//! let result = tick(&mut state, &BTreeMap::new(), &config);
//! assert!(!result.match_ended);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod runtime;

// Re-export commonly used types
pub use crate::core::rng::DeterministicRng;
pub use crate::core::vec2::Vec2;
pub use game::config::{ConfigError, MatchConfig};
pub use game::intent::Intent;
pub use game::snapshot::FrameSnapshot;
pub use game::state::{CombatantId, Facing, GameMode, MatchOutcome, MatchState, Skin};
pub use game::tick::{on_timer, simulate, simulate_with, tick, TickResult};
pub use runtime::{MatchHandle, MatchRunner};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;
