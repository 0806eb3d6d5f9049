//! Projectiles (duel mode specials)
//!
//! Horizontal-only shots owned by the match state. A projectile dies on its
//! first hit or when it leaves the arena's horizontal bounds; dead shots are
//! swept from the collection the same tick.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::state::CombatantId;

/// A special-move projectile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Unique projectile ID (monotonic counter)
    pub id: u32,
    /// Who fired it
    pub owner: CombatantId,
    /// Who it can hit
    pub target: CombatantId,
    /// Center point
    pub position: Vec2,
    /// Horizontal speed (units/tick, signed)
    pub velocity_x: f32,
    /// Collision radius
    pub radius: f32,
    /// Base damage before combo/block rules
    pub damage: f32,
    /// Still in flight
    pub active: bool,
}

impl Projectile {
    /// Create an active projectile.
    pub fn new(
        id: u32,
        owner: CombatantId,
        target: CombatantId,
        position: Vec2,
        velocity_x: f32,
        radius: f32,
        damage: f32,
    ) -> Self {
        Self {
            id,
            owner,
            target,
            position,
            velocity_x,
            radius,
            damage,
            active: true,
        }
    }

    /// Move one tick. Returns false (and deactivates) once the center leaves
    /// `[0, arena_width]`.
    pub fn advance(&mut self, arena_width: f32) -> bool {
        if !self.active {
            return false;
        }
        self.position.x += self.velocity_x;
        if self.position.x < 0.0 || self.position.x > arena_width {
            self.active = false;
        }
        self.active
    }
}
