//! Hit Particles
//!
//! Cosmetic sparks. The simulation only guarantees they exist and expire.

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;

/// Sparks spawned per hit.
pub const BURST_SIZE: usize = 8;

/// Life lost per tick.
pub const LIFE_DECAY: f32 = 0.05;

/// A single spark.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Position
    pub position: Vec2,
    /// Units per tick
    pub velocity: Vec2,
    /// Remaining life in `(0, 1]`; removed at 0
    pub life: f32,
    /// Square size for presentation
    pub size: f32,
}

/// Spawn a burst of sparks at `origin`.
pub fn spawn_burst<R: Rng + ?Sized>(particles: &mut Vec<Particle>, origin: Vec2, rng: &mut R) {
    for _ in 0..BURST_SIZE {
        particles.push(Particle {
            position: origin,
            velocity: Vec2::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0)),
            life: 1.0,
            size: rng.gen_range(2.0..7.0),
        });
    }
}

/// Advance all sparks one tick and drop the expired ones.
pub fn advance_particles(particles: &mut Vec<Particle>) {
    for p in particles.iter_mut() {
        p.position += p.velocity;
        p.life -= LIFE_DECAY;
    }
    particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::DeterministicRng;

    #[test]
    fn test_burst_and_expiry() {
        let mut rng = DeterministicRng::new(1);
        let mut particles = Vec::new();
        spawn_burst(&mut particles, Vec2::new(50.0, 50.0), &mut rng);
        assert_eq!(particles.len(), BURST_SIZE);
        assert!(particles.iter().all(|p| p.life == 1.0));

        let mut ticks = 0;
        while !particles.is_empty() {
            advance_particles(&mut particles);
            ticks += 1;
            assert!(ticks <= 21, "particles outlived their life");
        }
        assert!(ticks >= 19);
    }
}
