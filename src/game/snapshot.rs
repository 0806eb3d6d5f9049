//! Frame Snapshots
//!
//! Read-only view of a match handed to the rendering collaborator once per
//! tick. Plain data, serializable so a host can ship it as JSON.

use serde::Serialize;

use crate::core::vec2::Vec2;
use crate::game::combatant::{Combatant, Stance};
use crate::game::particle::Particle;
use crate::game::projectile::Projectile;
use crate::game::state::{CombatantId, Facing, GameMode, MatchState};

/// What a renderer needs to draw one combatant.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CombatantView {
    pub id: CombatantId,
    pub name: String,
    /// Presentation color from the skin
    pub color: &'static str,
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    pub facing: Facing,
    pub stance: Stance,
    pub is_attacking: bool,
    pub is_blocking: bool,
    pub in_hit_stun: bool,
    pub health: f32,
    pub max_health: f32,
    pub dead: bool,
    pub combo: u32,
}

impl From<&Combatant> for CombatantView {
    fn from(c: &Combatant) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            color: c.skin.color(),
            position: c.body.position,
            width: c.body.width,
            height: c.body.height,
            facing: c.facing,
            stance: c.stance(),
            is_attacking: c.is_attacking,
            is_blocking: c.is_blocking,
            in_hit_stun: c.hit_stun > 0,
            health: c.health,
            max_health: c.max_health,
            dead: c.dead,
            combo: c.combo_count,
        }
    }
}

/// Projectile position and size.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectileView {
    pub id: u32,
    pub position: Vec2,
    pub radius: f32,
}

impl From<&Projectile> for ProjectileView {
    fn from(p: &Projectile) -> Self {
        Self { id: p.id, position: p.position, radius: p.radius }
    }
}

/// Spark position, size and fade.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParticleView {
    pub position: Vec2,
    pub size: f32,
    pub life: f32,
}

impl From<&Particle> for ParticleView {
    fn from(p: &Particle) -> Self {
        Self { position: p.position, size: p.size, life: p.life }
    }
}

/// Current zone edges and phase counter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ZoneView {
    pub left: f32,
    pub right: f32,
    pub phase: u32,
}

/// Everything drawn for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub mode: GameMode,
    pub tick: u32,
    /// Seconds left on the duel countdown
    pub countdown: Option<u32>,
    pub alive: u32,
    pub combatants: Vec<CombatantView>,
    pub projectiles: Vec<ProjectileView>,
    pub particles: Vec<ParticleView>,
    pub zone: Option<ZoneView>,
    /// End-screen headline once the match is over
    pub banner: Option<String>,
}

impl FrameSnapshot {
    /// Capture the current state.
    pub fn capture(state: &MatchState) -> Self {
        Self {
            mode: state.mode,
            tick: state.tick,
            countdown: state.countdown,
            alive: state.alive_count,
            combatants: state.combatants.iter().map(CombatantView::from).collect(),
            projectiles: state.projectiles.iter().map(ProjectileView::from).collect(),
            particles: state.particles.iter().map(ParticleView::from).collect(),
            zone: state.zone.as_ref().map(|z| ZoneView { left: z.left, right: z.right, phase: z.phase }),
            banner: state.banner(),
        }
    }
}
