//! Combat State Machine
//!
//! Per-combatant lifecycle: attack windows, blocking, hit-stun, cooldowns,
//! combos and death. Every action is guarded; a rejected action is a silent
//! no-op that leaves state untouched.

use serde::{Serialize, Deserialize};

use crate::core::rect::Rect;
use crate::core::vec2::Vec2;
use crate::game::body::Body;
use crate::game::config::{ArenaConfig, CombatConfig, PhysicsConfig};
use crate::game::intent::HorizontalLatch;
use crate::game::projectile::Projectile;
use crate::game::state::{CombatantId, ControlMode, Facing, Skin};

/// Observable behavior state, derived from the combatant's flags and timers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stance {
    /// Standing still
    Idle,
    /// Moving horizontally
    Moving,
    /// Inside an attack window
    Attacking,
    /// Holding a block (duel)
    Blocking,
    /// Reeling from unblocked damage
    HitStun,
    /// Terminal
    Dead,
}

/// What `take_damage` did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DamageReport {
    /// Target was already dead; nothing changed
    Ignored,
    /// Damage went through a block
    Blocked {
        /// Health actually removed
        applied: f32,
    },
    /// Full damage with hit-stun
    Taken {
        /// Health actually removed
        applied: f32,
        /// This hit brought health to zero
        lethal: bool,
    },
}

impl DamageReport {
    /// Health removed by the hit.
    pub fn applied(&self) -> f32 {
        match *self {
            DamageReport::Ignored => 0.0,
            DamageReport::Blocked { applied } | DamageReport::Taken { applied, .. } => applied,
        }
    }
}

/// A single fighter in the arena.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Combatant {
    /// Roster index
    pub id: CombatantId,
    /// Display name
    pub name: String,
    /// Cosmetic variant
    pub skin: Skin,
    /// Who produces this combatant's intent
    pub control: ControlMode,
    /// Kinematic state
    pub body: Body,

    /// Current health, in `[0, max_health]`
    pub health: f32,
    /// Starting health
    pub max_health: f32,
    /// Terminal flag; never goes back to false
    pub dead: bool,
    /// Direction the combatant looks and attacks in
    pub facing: Facing,

    /// Inside an attack window
    pub is_attacking: bool,
    /// Holding a block (duel only)
    pub is_blocking: bool,

    // =========================================================================
    // Timers (decremented once per tick, floor 0)
    // =========================================================================

    /// Ticks until the next attack is allowed
    pub attack_cooldown: u32,
    /// Ticks until the next special is allowed
    pub special_cooldown: u32,
    /// Remaining hit-stun ticks
    pub hit_stun: u32,
    /// Remaining active attack ticks
    pub attack_frame: u32,
    /// Ticks left before the combo drops
    pub combo_timer: u32,
    /// Consecutive unblocked hits landed
    pub combo_count: u32,

    // =========================================================================
    // Bookkeeping
    // =========================================================================

    /// Tick when this combatant went down
    pub eliminated_tick: Option<u32>,
    /// Who landed the final blow (None for zone deaths and draws)
    pub eliminated_by: Option<CombatantId>,
    /// Total health removed from others
    pub damage_dealt: f32,
    /// Hits landed (blocked or not)
    pub hits_landed: u32,
    /// Last combatant to damage this one
    pub last_hit_by: Option<CombatantId>,

    /// Contradictory-input resolution state
    #[serde(skip)]
    pub latch: HorizontalLatch,
}

impl Combatant {
    /// Create a combatant at `position` with full health.
    pub fn new(
        id: CombatantId,
        name: impl Into<String>,
        skin: Skin,
        control: ControlMode,
        position: Vec2,
        arena: &ArenaConfig,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            skin,
            control,
            body: Body::new(position, arena.body_width, arena.body_height),
            health: arena.max_health,
            max_health: arena.max_health,
            dead: false,
            facing: if id.0 % 2 == 0 { Facing::Right } else { Facing::Left },
            is_attacking: false,
            is_blocking: false,
            attack_cooldown: 0,
            special_cooldown: 0,
            hit_stun: 0,
            attack_frame: 0,
            combo_timer: 0,
            combo_count: 0,
            eliminated_tick: None,
            eliminated_by: None,
            damage_dealt: 0.0,
            hits_landed: 0,
            last_hit_by: None,
            latch: HorizontalLatch::default(),
        }
    }

    /// Still in the fight.
    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Player-driven.
    #[inline]
    pub fn is_player(&self) -> bool {
        self.control == ControlMode::Player
    }

    /// Current behavior state.
    pub fn stance(&self) -> Stance {
        if self.dead {
            Stance::Dead
        } else if self.hit_stun > 0 {
            Stance::HitStun
        } else if self.is_blocking {
            Stance::Blocking
        } else if self.is_attacking {
            Stance::Attacking
        } else if self.body.velocity.x.abs() > 0.01 {
            Stance::Moving
        } else {
            Stance::Idle
        }
    }

    /// Start an attack.
    ///
    /// Requires no cooldown, not dead, no hit-stun, not blocking.
    pub fn attack(&mut self, combat: &CombatConfig) -> bool {
        if self.attack_cooldown != 0 || self.dead || self.hit_stun != 0 || self.is_blocking {
            return false;
        }
        self.is_attacking = true;
        self.attack_frame = combat.attack_duration;
        self.attack_cooldown = combat.attack_cooldown;
        true
    }

    /// Jump off the ground.
    pub fn jump(&mut self, physics: &PhysicsConfig) -> bool {
        if !self.body.on_ground || self.dead || self.hit_stun != 0 || self.is_blocking {
            return false;
        }
        self.body.velocity.y = physics.jump_impulse;
        true
    }

    /// Raise or lower a block.
    ///
    /// Raising needs not dead, no hit-stun and no active attack; if that
    /// fails the block is forced down. Lowering always succeeds.
    pub fn block(&mut self, active: bool) -> bool {
        if !active {
            self.is_blocking = false;
            return true;
        }
        if self.dead || self.hit_stun != 0 || self.is_attacking {
            self.is_blocking = false;
            return false;
        }
        self.is_blocking = true;
        self.body.velocity.x = 0.0;
        true
    }

    /// Fire a special projectile at `target`.
    pub fn special(
        &mut self,
        combat: &CombatConfig,
        projectile_id: u32,
        target: CombatantId,
    ) -> Option<Projectile> {
        if self.special_cooldown != 0
            || self.dead
            || self.hit_stun != 0
            || self.is_blocking
            || self.is_attacking
        {
            return None;
        }
        self.special_cooldown = combat.special_cooldown;

        let rect = self.body.rect();
        let x = match self.facing {
            Facing::Right => rect.right(),
            Facing::Left => rect.x,
        };
        Some(Projectile::new(
            projectile_id,
            self.id,
            target,
            Vec2::new(x, rect.center().y),
            self.facing.sign() * combat.projectile_speed,
            combat.projectile_radius,
            self.skin.projectile_damage(),
        ))
    }

    /// Advance every timer by one tick.
    pub fn advance_timers(&mut self) {
        if self.is_attacking {
            self.attack_frame = self.attack_frame.saturating_sub(1);
            if self.attack_frame == 0 {
                self.is_attacking = false;
            }
        }
        self.attack_cooldown = self.attack_cooldown.saturating_sub(1);
        self.special_cooldown = self.special_cooldown.saturating_sub(1);
        self.hit_stun = self.hit_stun.saturating_sub(1);

        if self.combo_timer > 0 {
            self.combo_timer -= 1;
            if self.combo_timer == 0 {
                self.combo_count = 0;
            }
        }
    }

    /// Attack volume for the current position and facing.
    ///
    /// Adjacent to the body on the facing side, offset down from its top.
    pub fn attack_volume(&self, combat: &CombatConfig) -> Rect {
        let body = self.body.rect();
        let x = match self.facing {
            Facing::Right => body.right(),
            Facing::Left => body.x - combat.attack_width,
        };
        Rect::new(x, body.y + combat.attack_offset_y, combat.attack_width, combat.attack_height)
    }

    /// Attack volume, only while an attack is active.
    pub fn active_attack_volume(&self, combat: &CombatConfig) -> Option<Rect> {
        (self.is_attacking && !self.dead).then(|| self.attack_volume(combat))
    }

    /// The single tick on which this attack may register a hit.
    #[inline]
    pub fn is_activation_tick(&self, combat: &CombatConfig) -> bool {
        self.is_attacking && !self.dead && self.attack_frame == combat.activation_frame
    }

    /// Apply incoming damage.
    ///
    /// Blocking lets `block_factor` of the damage through with no hit-stun.
    /// Unblocked damage sets hit-stun and drops this combatant's combo.
    pub fn take_damage(&mut self, amount: f32, combat: &CombatConfig) -> DamageReport {
        if self.dead {
            return DamageReport::Ignored;
        }

        if self.is_blocking {
            let applied = self.drain(amount * combat.block_factor);
            self.mark_dead_if_drained(combat);
            return DamageReport::Blocked { applied };
        }

        let applied = self.drain(amount);
        self.hit_stun = combat.hit_stun;
        self.combo_count = 0;
        self.combo_timer = 0;
        let lethal = self.health <= 0.0;
        self.mark_dead_if_drained(combat);
        DamageReport::Taken { applied, lethal }
    }

    /// Remove up to `amount` health, clamping at zero. Returns what was removed.
    fn drain(&mut self, amount: f32) -> f32 {
        let applied = amount.max(0.0).min(self.health);
        if applied >= self.health {
            self.health = 0.0;
        } else {
            self.health -= applied;
        }
        applied
    }

    fn mark_dead_if_drained(&mut self, combat: &CombatConfig) {
        if !combat.defer_death && self.health <= 0.0 {
            self.kill();
        }
    }

    /// Enter the terminal state.
    pub fn kill(&mut self) {
        self.health = 0.0;
        self.dead = true;
        self.is_attacking = false;
        self.is_blocking = false;
        self.body.velocity = Vec2::ZERO;
    }

    /// Combo bonus for the next landed hit, then count the hit.
    ///
    /// The bonus uses the count of prior hits, so the Nth hit in a chain
    /// is boosted by N-1.
    pub fn register_combo_hit(&mut self, combat: &CombatConfig) -> f32 {
        let Some(multiplier) = combat.combo_multiplier else {
            return 0.0;
        };
        let bonus = (self.combo_count as f32 * multiplier).floor();
        self.combo_count += 1;
        self.combo_timer = combat.combo_window;
        bonus
    }
}
