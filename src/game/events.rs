//! Game Events
//!
//! Events generated during simulation, drained into each tick's result for
//! the host (logging, HUD, sound cues).

use serde::{Serialize, Deserialize};

use crate::game::state::{CombatantId, MatchOutcome};

/// Priority for event processing order.
///
/// Lower value = processed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// Deaths first
    Elimination = 0,
    /// Then damage
    Damage = 1,
    /// Then projectile lifecycle
    Projectile = 2,
    /// Then zone changes
    Zone = 3,
    /// Lowest priority
    Other = 255,
}

/// What dealt a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitSource {
    /// Attack volume on its activation tick
    Melee,
    /// Special projectile
    Projectile {
        /// Projectile that connected
        projectile_id: u32,
    },
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// An attack connected
    Hit {
        attacker: CombatantId,
        target: CombatantId,
        damage: f32,
        blocked: bool,
        /// Attacker's combo count after the hit
        combo: u32,
        source: HitSource,
    },

    /// A combatant reached zero health
    CombatantDowned {
        victim: CombatantId,
        killer: Option<CombatantId>,
    },

    /// A special was fired
    ProjectileFired {
        projectile_id: u32,
        owner: CombatantId,
    },

    /// A projectile left the arena without hitting
    ProjectileExpired {
        projectile_id: u32,
    },

    /// The zone targets stepped inward
    ZonePhase {
        phase: u32,
        target_left: f32,
        target_right: f32,
    },

    /// Zone hazard damage
    HazardDamage {
        victim: CombatantId,
        damage: f32,
    },

    /// Match ended
    MatchEnded {
        outcome: MatchOutcome,
        duration_ticks: u32,
    },
}

/// A game event with timing and priority.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Processing priority
    pub priority: EventPriority,

    /// Combatant involved (for tie-breaking)
    pub combatant: Option<CombatantId>,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, priority: EventPriority, data: GameEventData) -> Self {
        let combatant = match &data {
            GameEventData::Hit { target, .. } => Some(*target),
            GameEventData::CombatantDowned { victim, .. } => Some(*victim),
            GameEventData::ProjectileFired { owner, .. } => Some(*owner),
            GameEventData::HazardDamage { victim, .. } => Some(*victim),
            GameEventData::MatchEnded { outcome: MatchOutcome::Winner(id), .. } => Some(*id),
            _ => None,
        };

        Self {
            tick,
            priority,
            combatant,
            data,
        }
    }

    /// Create hit event.
    pub fn hit(
        tick: u32,
        attacker: CombatantId,
        target: CombatantId,
        damage: f32,
        blocked: bool,
        combo: u32,
        source: HitSource,
    ) -> Self {
        Self::new(
            tick,
            EventPriority::Damage,
            GameEventData::Hit { attacker, target, damage, blocked, combo, source },
        )
    }

    /// Create downed event.
    pub fn downed(tick: u32, victim: CombatantId, killer: Option<CombatantId>) -> Self {
        Self::new(
            tick,
            EventPriority::Elimination,
            GameEventData::CombatantDowned { victim, killer },
        )
    }

    /// Create projectile fired event.
    pub fn projectile_fired(tick: u32, projectile_id: u32, owner: CombatantId) -> Self {
        Self::new(
            tick,
            EventPriority::Projectile,
            GameEventData::ProjectileFired { projectile_id, owner },
        )
    }

    /// Create projectile expired event.
    pub fn projectile_expired(tick: u32, projectile_id: u32) -> Self {
        Self::new(
            tick,
            EventPriority::Projectile,
            GameEventData::ProjectileExpired { projectile_id },
        )
    }

    /// Create zone phase event.
    pub fn zone_phase(tick: u32, phase: u32, target_left: f32, target_right: f32) -> Self {
        Self::new(
            tick,
            EventPriority::Zone,
            GameEventData::ZonePhase { phase, target_left, target_right },
        )
    }

    /// Create hazard damage event.
    pub fn hazard_damage(tick: u32, victim: CombatantId, damage: f32) -> Self {
        Self::new(
            tick,
            EventPriority::Damage,
            GameEventData::HazardDamage { victim, damage },
        )
    }

    /// Create match ended event.
    pub fn match_ended(tick: u32, outcome: MatchOutcome) -> Self {
        Self::new(
            tick,
            EventPriority::Other,
            GameEventData::MatchEnded { outcome, duration_ticks: tick },
        )
    }
}

impl PartialEq for GameEvent {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick
            && self.priority == other.priority
            && self.combatant == other.combatant
    }
}

impl Eq for GameEvent {}

impl PartialOrd for GameEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GameEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: tick, then priority, then combatant
        self.tick
            .cmp(&other.tick)
            .then(self.priority.cmp(&other.priority))
            .then(self.combatant.cmp(&other.combatant))
    }
}
