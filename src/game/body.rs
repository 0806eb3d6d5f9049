//! Kinematic Body
//!
//! Position/velocity integration with gravity, a ground line and optional
//! friction. Shared by every combatant in both variants.

use serde::{Serialize, Deserialize};

use crate::core::rect::Rect;
use crate::core::vec2::Vec2;
use crate::game::config::PhysicsConfig;

/// A falling, sliding box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub position: Vec2,
    /// Units per tick
    pub velocity: Vec2,
    /// Fixed width
    pub width: f32,
    /// Fixed height
    pub height: f32,
    /// Standing on the ground line after the last integration
    pub on_ground: bool,
}

impl Body {
    /// Create a resting body at `position`.
    pub fn new(position: Vec2, width: f32, height: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            width,
            height,
            on_ground: false,
        }
    }

    /// Bounding rectangle.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }
}

/// Advance a body by one tick.
///
/// `position += velocity`, then either lands the body on `ground_y` (when
/// the next step would reach it) or accelerates it downward. Friction and
/// the horizontal clamp come from `physics`; `arena_width` is only used
/// when clamping.
pub fn integrate(body: &mut Body, ground_y: f32, physics: &PhysicsConfig, arena_width: f32) {
    body.position += body.velocity;

    if body.position.y + body.height + body.velocity.y >= ground_y {
        body.velocity.y = 0.0;
        body.position.y = ground_y - body.height;
        body.on_ground = true;
    } else {
        body.velocity.y += physics.gravity;
        body.on_ground = false;
    }

    if let Some(friction) = physics.friction {
        body.velocity.x *= friction;
    }

    if physics.clamp_to_arena {
        let max_x = (arena_width - body.width).max(0.0);
        body.position.x = body.position.x.clamp(0.0, max_x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUND: f32 = 480.0;

    fn royale_physics() -> PhysicsConfig {
        PhysicsConfig::default()
    }

    fn duel_physics() -> PhysicsConfig {
        PhysicsConfig {
            friction: None,
            clamp_to_arena: true,
            ..PhysicsConfig::default()
        }
    }

    #[test]
    fn test_airborne_body_accelerates() {
        let mut body = Body::new(Vec2::new(100.0, 0.0), 40.0, 100.0);
        integrate(&mut body, GROUND, &royale_physics(), 1024.0);

        assert!(!body.on_ground);
        assert!((body.velocity.y - 0.7).abs() < 1e-6);
        assert_eq!(body.position.y, 0.0);

        integrate(&mut body, GROUND, &royale_physics(), 1024.0);
        assert!((body.position.y - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_body_lands_exactly_on_ground() {
        let mut body = Body::new(Vec2::new(100.0, 370.0), 40.0, 100.0);
        body.velocity.y = 15.0;
        integrate(&mut body, GROUND, &royale_physics(), 1024.0);

        assert!(body.on_ground);
        assert_eq!(body.velocity.y, 0.0);
        assert_eq!(body.position.y, GROUND - 100.0);
    }

    #[test]
    fn test_resting_body_stays_grounded() {
        let mut body = Body::new(Vec2::new(100.0, GROUND - 100.0), 40.0, 100.0);
        for _ in 0..10 {
            integrate(&mut body, GROUND, &royale_physics(), 1024.0);
            assert!(body.on_ground);
            assert_eq!(body.position.y, GROUND - 100.0);
        }
    }

    #[test]
    fn test_friction_decays_horizontal_velocity() {
        let mut body = Body::new(Vec2::new(100.0, GROUND - 100.0), 40.0, 100.0);
        body.velocity.x = 10.0;
        integrate(&mut body, GROUND, &royale_physics(), 1024.0);

        assert_eq!(body.position.x, 110.0);
        assert!((body.velocity.x - 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_duel_profile_keeps_velocity_and_clamps() {
        let mut body = Body::new(Vec2::new(1000.0, GROUND - 100.0), 40.0, 100.0);
        body.velocity.x = 10.0;
        integrate(&mut body, GROUND, &duel_physics(), 1024.0);

        assert_eq!(body.velocity.x, 10.0);
        assert_eq!(body.position.x, 984.0);

        body.velocity.x = -2000.0;
        integrate(&mut body, GROUND, &duel_physics(), 1024.0);
        assert_eq!(body.position.x, 0.0);
    }

    #[test]
    fn test_royale_profile_does_not_clamp() {
        let mut body = Body::new(Vec2::new(5.0, GROUND - 100.0), 40.0, 100.0);
        body.velocity.x = -20.0;
        integrate(&mut body, GROUND, &royale_physics(), 1024.0);
        assert_eq!(body.position.x, -15.0);
    }
}
