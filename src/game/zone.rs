//! Zone/Hazard Controller (battle royale)
//!
//! The safe zone is a horizontal band. Targets step inward on the secondary
//! timer; the visible edges chase the targets by exponential smoothing every
//! frame, so the wall lags and animates instead of jumping.

use serde::{Serialize, Deserialize};

use crate::core::rect::Rect;
use crate::core::vec2::Vec2;
use crate::game::combatant::{Combatant, DamageReport};
use crate::game::config::{CombatConfig, ZoneConfig};
use crate::game::state::CombatantId;

/// Safe-zone boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Current left edge
    pub left: f32,
    /// Current right edge
    pub right: f32,
    /// Left edge being approached
    pub target_left: f32,
    /// Right edge being approached
    pub target_right: f32,
    /// Number of shrinks applied so far (starts at 1, like the HUD counter)
    pub phase: u32,
}

/// Damage dealt by the hazard to one combatant this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HazardHit {
    /// Who was outside
    pub victim: CombatantId,
    /// Health removed
    pub damage: f32,
    /// The hit brought health to zero
    pub lethal: bool,
}

impl Zone {
    /// Zone at its starting edges.
    pub fn new(config: &ZoneConfig) -> Self {
        Self {
            left: config.initial_left,
            right: config.initial_right,
            target_left: config.target_left,
            target_right: config.target_right,
            phase: 1,
        }
    }

    /// Width between the targets.
    #[inline]
    pub fn target_width(&self) -> f32 {
        self.target_right - self.target_left
    }

    /// Step both targets inward, never narrower than `min_width`.
    pub fn shrink(&mut self, config: &ZoneConfig) {
        self.target_left += config.shrink_step;
        self.target_right -= config.shrink_step;

        if self.target_width() < config.min_width {
            let center = (self.target_left + self.target_right) / 2.0;
            self.target_left = center - config.min_width / 2.0;
            self.target_right = center + config.min_width / 2.0;
        }
        self.phase += 1;
    }

    /// Move the visible edges toward the targets by one smoothing step.
    pub fn advance(&mut self, config: &ZoneConfig) {
        let edges = Vec2::new(self.left, self.right)
            .approach(Vec2::new(self.target_left, self.target_right), config.smoothing);
        self.left = edges.x;
        self.right = edges.y;
    }

    /// Check if a body lies fully inside the current edges.
    #[inline]
    pub fn contains(&self, body: &Rect) -> bool {
        body.within_horizontal(self.left, self.right)
    }

    /// Hazard damage lands on alternating windows, not every tick.
    #[inline]
    pub fn hazard_active(tick: u32, config: &ZoneConfig) -> bool {
        (tick / config.hazard_window_ticks) % 2 == 0
    }
}

/// Damage and push every living combatant outside the zone.
///
/// Does nothing during an off window.
pub fn apply_hazard(
    zone: &Zone,
    combatants: &mut [Combatant],
    tick: u32,
    config: &ZoneConfig,
    combat: &CombatConfig,
) -> Vec<HazardHit> {
    let mut hits = Vec::new();
    if !Zone::hazard_active(tick, config) {
        return hits;
    }

    for combatant in combatants.iter_mut().filter(|c| c.is_alive()) {
        let rect = combatant.body.rect();
        if zone.contains(&rect) {
            continue;
        }

        let report = combatant.take_damage(config.damage, combat);
        if rect.x < zone.left {
            combatant.body.velocity.x += config.push;
        } else {
            combatant.body.velocity.x -= config.push;
        }

        let lethal = match report {
            DamageReport::Ignored => continue,
            DamageReport::Taken { lethal, .. } => lethal,
            DamageReport::Blocked { .. } => combatant.health <= 0.0,
        };
        hits.push(HazardHit { victim: combatant.id, damage: report.applied(), lethal });
    }

    hits
}
