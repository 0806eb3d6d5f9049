//! Game State Definitions
//!
//! The simulation context: every combatant, projectile, particle and the
//! zone live in one `MatchState` that the match loop owns and passes to
//! each component. Nothing else holds simulation state.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::combatant::Combatant;
use crate::game::config::MatchConfig;
use crate::game::events::GameEvent;
use crate::game::particle::Particle;
use crate::game::projectile::Projectile;
use crate::game::zone::Zone;

// =============================================================================
// IDENTIFIERS & TAGS
// =============================================================================

/// Combatant identifier: its index in the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct CombatantId(pub u32);

impl CombatantId {
    /// Roster slot.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Horizontal facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Toward smaller x
    Left,
    /// Toward larger x
    Right,
}

impl Facing {
    /// -1.0 for left, +1.0 for right.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Direction of a horizontal offset (`dx > 0` is right).
    #[inline]
    pub fn toward(dx: f32) -> Self {
        if dx > 0.0 {
            Facing::Right
        } else {
            Facing::Left
        }
    }
}

/// Who produces a combatant's intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    /// The input collaborator
    Player,
    /// The decision policy
    Scripted,
}

/// Simulation variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Free-for-all with a shrinking zone
    #[default]
    Royale,
    /// 1v1 with blocking, specials and combos
    Duel,
}

/// Cosmetic variant. Carried as data; the only simulation effect is the
/// damage of the projectile it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Skin {
    /// Pink/red
    Ninja = 0,
    /// Cyan
    Azure = 1,
    /// Lime
    Lime = 2,
    /// Violet
    Violet = 3,
    /// Orange
    Amber = 4,
    /// White
    Ghost = 5,
}

impl Skin {
    /// All skins in palette order.
    pub const ALL: [Skin; 6] = [
        Skin::Ninja,
        Skin::Azure,
        Skin::Lime,
        Skin::Violet,
        Skin::Amber,
        Skin::Ghost,
    ];

    /// Presentation color.
    pub fn color(self) -> &'static str {
        match self {
            Skin::Ninja => "#ff0055",
            Skin::Azure => "#00ccff",
            Skin::Lime => "#ccff00",
            Skin::Violet => "#aa00ff",
            Skin::Amber => "#ffaa00",
            Skin::Ghost => "#ffffff",
        }
    }

    /// Base damage of this skin's special projectile.
    pub fn projectile_damage(self) -> f32 {
        match self {
            Skin::Ninja => 12.0,
            Skin::Azure => 10.0,
            Skin::Lime => 11.0,
            Skin::Violet => 14.0,
            Skin::Amber => 12.0,
            Skin::Ghost => 9.0,
        }
    }

    /// Get from palette index (wraps).
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

// =============================================================================
// MATCH PHASE & OUTCOME
// =============================================================================

/// Current phase of the match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Active gameplay
    #[default]
    Playing,
    /// Terminal; further ticks are no-ops
    Ended,
}

/// How a match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// One side won
    Winner(CombatantId),
    /// Nobody (or everybody) won
    Draw,
}

// =============================================================================
// MATCH STATE
// =============================================================================

/// Complete state of a match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchState {
    /// Variant being simulated
    pub mode: GameMode,

    /// Frames simulated so far
    pub tick: u32,

    /// Current match phase
    pub phase: MatchPhase,

    /// RNG seed the match started from
    pub rng_seed: u64,

    /// Injected random source for policies and effects
    pub rng: DeterministicRng,

    /// Roster; `combatants[i].id == CombatantId(i)`
    pub combatants: Vec<Combatant>,

    /// Projectiles in flight
    pub projectiles: Vec<Projectile>,

    /// Cosmetic sparks
    pub particles: Vec<Particle>,

    /// Safe zone (battle royale only)
    pub zone: Option<Zone>,

    /// Secondary-timer seconds elapsed
    pub timer_seconds: u32,

    /// Duel countdown in seconds (duel only)
    pub countdown: Option<u32>,

    /// Next projectile ID (monotonic counter)
    pub next_projectile_id: u32,

    /// Number of combatants still alive
    pub alive_count: u32,

    /// Set once the match has ended
    pub outcome: Option<MatchOutcome>,

    /// Events generated this tick (cleared each tick)
    #[serde(skip)]
    pub pending_events: Vec<GameEvent>,
}

impl MatchState {
    /// Names given to battle royale bots, in spawn order.
    pub const BOT_NAMES: [&'static str; 5] =
        ["Bot Alpha", "Bot Beta", "Bot Gamma", "Bot Delta", "Bot Omega"];

    /// Create an empty match.
    pub fn new(mode: GameMode, rng_seed: u64) -> Self {
        Self {
            mode,
            tick: 0,
            phase: MatchPhase::Playing,
            rng_seed,
            rng: DeterministicRng::new(rng_seed),
            combatants: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            zone: None,
            timer_seconds: 0,
            countdown: None,
            next_projectile_id: 0,
            alive_count: 0,
            outcome: None,
            pending_events: Vec::new(),
        }
    }

    /// Battle royale: one player at the left plus `bots` scripted fighters
    /// dropped in from above.
    pub fn royale(config: &MatchConfig, bots: usize, rng_seed: u64) -> Self {
        let mut state = Self::new(GameMode::Royale, rng_seed);
        state.zone = Some(Zone::new(&config.zone));

        state.add_combatant("YOU", Skin::Ninja, ControlMode::Player, Vec2::new(100.0, 0.0), config);
        for i in 0..bots {
            let jitter = state.rng.next_range(0.0, 50.0);
            let name = match Self::BOT_NAMES.get(i) {
                Some(name) => (*name).to_string(),
                None => format!("Bot {}", i + 1),
            };
            state.add_combatant(
                name,
                Skin::from_index(i + 1),
                ControlMode::Scripted,
                Vec2::new(200.0 + i as f32 * 150.0 + jitter, -100.0),
                config,
            );
        }
        state
    }

    /// Duel: player on the left, scripted opponent on the right, facing
    /// each other on the ground.
    pub fn duel(config: &MatchConfig, player_skin: Skin, opponent_skin: Skin, rng_seed: u64) -> Self {
        let mut state = Self::new(GameMode::Duel, rng_seed);
        state.countdown = Some(config.duel_seconds);

        let y = config.arena.ground_y() - config.arena.body_height;
        let right_x = config.arena.width - 200.0 - config.arena.body_width;
        let player = state.add_combatant("Player", player_skin, ControlMode::Player, Vec2::new(200.0, y), config);
        let opponent = state.add_combatant("CPU", opponent_skin, ControlMode::Scripted, Vec2::new(right_x, y), config);

        state.combatants[player.index()].facing = Facing::Right;
        state.combatants[opponent.index()].facing = Facing::Left;
        state
    }

    /// Add a combatant and return its id.
    pub fn add_combatant(
        &mut self,
        name: impl Into<String>,
        skin: Skin,
        control: ControlMode,
        position: Vec2,
        config: &MatchConfig,
    ) -> CombatantId {
        let id = CombatantId(self.combatants.len() as u32);
        self.combatants.push(Combatant::new(id, name, skin, control, position, &config.arena));
        self.alive_count += 1;
        id
    }

    /// Get a combatant by ID.
    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(id.index())
    }

    /// Get a combatant mutably by ID.
    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(id.index())
    }

    /// Living combatants.
    pub fn living(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(|c| c.is_alive())
    }

    /// The other combatant in a duel.
    pub fn opponent_of(&self, id: CombatantId) -> Option<CombatantId> {
        self.combatants.iter().map(|c| c.id).find(|other| *other != id)
    }

    /// Record a death: terminal flag, bookkeeping, event.
    ///
    /// Does nothing if the victim is already recorded as eliminated.
    pub fn eliminate(&mut self, victim: CombatantId, killer: Option<CombatantId>) {
        let tick = self.tick;
        let Some(c) = self.combatants.get_mut(victim.index()) else {
            return;
        };
        if c.eliminated_tick.is_some() {
            return;
        }
        c.kill();
        c.eliminated_tick = Some(tick);
        c.eliminated_by = killer;
        self.alive_count = self.alive_count.saturating_sub(1);
        self.push_event(GameEvent::downed(tick, victim, killer));
    }

    /// Check if match has ended.
    pub fn is_ended(&self) -> bool {
        matches!(self.phase, MatchPhase::Ended)
    }

    /// Headline for the end screen.
    pub fn banner(&self) -> Option<String> {
        let outcome = self.outcome?;
        let text = match (self.mode, outcome) {
            (GameMode::Royale, MatchOutcome::Draw) => "DRAW".to_string(),
            (GameMode::Duel, MatchOutcome::Draw) => "Draw Game".to_string(),
            (mode, MatchOutcome::Winner(id)) => {
                let winner = self.get(id)?;
                match mode {
                    GameMode::Royale if winner.is_player() => "VICTORY ROYALE".to_string(),
                    GameMode::Royale => format!("{} WINS", winner.name),
                    GameMode::Duel => format!("{} Wins", winner.name),
                }
            }
        };
        Some(text)
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================
