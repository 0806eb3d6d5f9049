//! Collision & Damage Resolver
//!
//! Turns overlaps into hits. Geometry is sampled first and hits applied
//! afterwards, so two fighters swinging on the same tick both connect.

use crate::core::vec2::Vec2;
use crate::game::combatant::DamageReport;
use crate::game::config::MatchConfig;
use crate::game::events::{GameEvent, HitSource};
use crate::game::particle::spawn_burst;
use crate::game::state::{CombatantId, Facing, MatchState};

/// A connected attack waiting to be applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingHit {
    /// Who dealt it
    pub attacker: CombatantId,
    /// Who receives it
    pub target: CombatantId,
    /// Damage before combo and block rules
    pub base_damage: f32,
    /// Direction knockback pushes toward
    pub direction: Facing,
    /// Melee or projectile
    pub source: HitSource,
}

/// Collect every melee overlap for attackers on their activation tick.
pub fn melee_hits(state: &MatchState, config: &MatchConfig) -> Vec<PendingHit> {
    let combat = &config.combat;
    let mut hits = Vec::new();

    for attacker in state.combatants.iter().filter(|c| c.is_activation_tick(combat)) {
        let volume = attacker.attack_volume(combat);
        for target in state.living() {
            if target.id == attacker.id || !volume.overlaps(&target.body.rect()) {
                continue;
            }
            hits.push(PendingHit {
                attacker: attacker.id,
                target: target.id,
                base_damage: combat.melee_damage,
                direction: attacker.facing,
                source: HitSource::Melee,
            });
        }
    }
    hits
}

/// Advance projectiles, collect their hits and sweep the dead ones.
///
/// A projectile can only hit its intended target and dies on the first hit.
pub fn projectile_hits(state: &mut MatchState, config: &MatchConfig) -> Vec<PendingHit> {
    let tick = state.tick;
    let arena_width = config.arena.width;
    let mut hits = Vec::new();
    let mut expired = Vec::new();

    for projectile in state.projectiles.iter_mut() {
        if !projectile.advance(arena_width) {
            expired.push(projectile.id);
            continue;
        }
        let Some(target) = state.combatants.get(projectile.target.index()) else {
            continue;
        };
        if !target.is_alive() || !target.body.rect().overlaps_circle(projectile.position, projectile.radius) {
            continue;
        }
        projectile.active = false;
        hits.push(PendingHit {
            attacker: projectile.owner,
            target: projectile.target,
            base_damage: projectile.damage,
            direction: Facing::toward(projectile.velocity_x),
            source: HitSource::Projectile { projectile_id: projectile.id },
        });
    }
    state.projectiles.retain(|p| p.active);

    for id in expired {
        state.push_event(GameEvent::projectile_expired(tick, id));
    }
    hits
}

/// Apply one hit: combo, block, damage, knockback, sparks and events.
///
/// Blocked hits take `block_factor` of the base damage and leave the
/// attacker's combo untouched. Unblocked hits feed the combo (bonus from
/// the prior count, then the increment) and knock the target back.
pub fn apply_hit(state: &mut MatchState, hit: PendingHit, config: &MatchConfig) {
    let combat = &config.combat;
    let tick = state.tick;

    let blocking = match state.get(hit.target) {
        Some(target) if target.is_alive() => target.is_blocking,
        _ => return,
    };

    let bonus = if blocking {
        0.0
    } else {
        state.get_mut(hit.attacker).map_or(0.0, |a| a.register_combo_hit(combat))
    };

    let Some(target) = state.get_mut(hit.target) else {
        return;
    };
    let report = target.take_damage(hit.base_damage + bonus, combat);
    target.last_hit_by = Some(hit.attacker);
    if matches!(report, DamageReport::Taken { .. }) && !target.dead {
        target.body.velocity = Vec2::new(combat.knockback.x * hit.direction.sign(), combat.knockback.y);
    }
    let origin = target.body.center();
    let target_dead = target.dead;

    if let DamageReport::Taken { .. } = report {
        spawn_burst(&mut state.particles, origin, &mut state.rng);
    }

    let combo = match state.get_mut(hit.attacker) {
        Some(attacker) => {
            attacker.damage_dealt += report.applied();
            attacker.hits_landed += 1;
            attacker.combo_count
        }
        None => 0,
    };

    let blocked = matches!(report, DamageReport::Blocked { .. });
    state.push_event(GameEvent::hit(
        tick,
        hit.attacker,
        hit.target,
        report.applied(),
        blocked,
        combo,
        hit.source,
    ));

    if target_dead {
        state.eliminate(hit.target, Some(hit.attacker));
    }
}

/// Melee then projectile resolution for one tick.
pub fn resolve_combat(state: &mut MatchState, config: &MatchConfig) {
    let mut hits = melee_hits(state, config);
    hits.extend(projectile_hits(state, config));
    for hit in hits {
        apply_hit(state, hit, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::GameEventData;
    use crate::game::projectile::Projectile;
    use crate::game::state::Skin;

    fn place(state: &mut MatchState, id: u32, x: f32, facing: Facing) {
        let c = &mut state.combatants[id as usize];
        c.body.position = Vec2::new(x, 380.0);
        c.body.on_ground = true;
        c.facing = facing;
    }

    fn duel_at(player_x: f32, cpu_x: f32) -> (MatchState, MatchConfig) {
        let config = MatchConfig::duel();
        let mut state = MatchState::duel(&config, Skin::Ninja, Skin::Azure, 3);
        place(&mut state, 0, player_x, Facing::Right);
        place(&mut state, 1, cpu_x, Facing::Left);
        (state, config)
    }

    /// Put combatant 0 on its activation tick.
    fn swing(state: &mut MatchState, config: &MatchConfig) {
        let c = &mut state.combatants[0];
        c.attack(&config.combat);
        c.attack_frame = config.combat.activation_frame;
    }

    #[test]
    fn test_melee_overlap_registers_once() {
        let (mut state, config) = duel_at(100.0, 180.0);
        swing(&mut state, &config);

        let hits = melee_hits(&state, &config);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target, CombatantId(1));

        // Off the activation tick nothing registers
        state.combatants[0].attack_frame -= 1;
        assert!(melee_hits(&state, &config).is_empty());
    }

    #[test]
    fn test_melee_touching_edges_overlap() {
        // Volume spans [140, 240]; target body starts exactly at 240
        let (mut state, config) = duel_at(100.0, 240.0);
        swing(&mut state, &config);
        assert_eq!(melee_hits(&state, &config).len(), 1);

        let (mut state, config) = duel_at(100.0, 240.5);
        swing(&mut state, &config);
        assert!(melee_hits(&state, &config).is_empty());
    }

    #[test]
    fn test_unblocked_duel_hit() {
        let (mut state, config) = duel_at(100.0, 180.0);
        swing(&mut state, &config);
        resolve_combat(&mut state, &config);

        let target = &state.combatants[1];
        assert_eq!(target.health, 92.0);
        assert_eq!(target.hit_stun, 15);
        assert_eq!(target.body.velocity, Vec2::new(6.0, -4.0));
        assert_eq!(state.combatants[0].combo_count, 1);
        assert_eq!(state.particles.len(), 8);

        let events = state.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0].data,
            GameEventData::Hit { damage, blocked: false, combo: 1, source: HitSource::Melee, .. } if damage == 8.0
        ));
    }

    #[test]
    fn test_blocked_duel_hit() {
        let (mut state, config) = duel_at(100.0, 180.0);
        state.combatants[0].combo_count = 2;
        state.combatants[0].combo_timer = 50;
        state.combatants[1].block(true);
        swing(&mut state, &config);
        resolve_combat(&mut state, &config);

        let target = &state.combatants[1];
        assert!((target.health - (100.0 - 8.0 * 0.1)).abs() < 1e-4);
        assert_eq!(target.hit_stun, 0);
        assert_eq!(target.body.velocity, Vec2::ZERO);
        assert_eq!(state.combatants[0].combo_count, 2);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_royale_hit_and_kill() {
        let config = MatchConfig::royale();
        let mut state = MatchState::royale(&config, 1, 3);
        place(&mut state, 0, 100.0, Facing::Left);
        place(&mut state, 1, 20.0, Facing::Right);
        state.combatants[1].health = 10.0;
        {
            let c = &mut state.combatants[0];
            c.attack(&config.combat);
            c.attack_frame = config.combat.activation_frame;
        }
        resolve_combat(&mut state, &config);

        let victim = &state.combatants[1];
        assert!(victim.dead);
        assert_eq!(victim.eliminated_by, Some(CombatantId(0)));
        assert_eq!(victim.body.velocity, Vec2::ZERO);
        assert_eq!(state.alive_count, 1);
        assert_eq!(state.combatants[0].damage_dealt, 10.0);

        let events = state.take_events();
        assert!(events.iter().any(|e| matches!(e.data, GameEventData::CombatantDowned { .. })));
    }

    #[test]
    fn test_simultaneous_swings_trade() {
        let config = MatchConfig::royale();
        let mut state = MatchState::royale(&config, 1, 3);
        place(&mut state, 0, 100.0, Facing::Right);
        place(&mut state, 1, 180.0, Facing::Left);
        for c in state.combatants.iter_mut() {
            c.attack(&config.combat);
            c.attack_frame = config.combat.activation_frame;
        }
        resolve_combat(&mut state, &config);
        assert_eq!(state.combatants[0].health, 90.0);
        assert_eq!(state.combatants[1].health, 90.0);
    }

    #[test]
    fn test_projectile_hits_intended_target_only() {
        let (mut state, config) = duel_at(100.0, 300.0);
        let shot = Projectile::new(0, CombatantId(0), CombatantId(1), Vec2::new(280.0, 430.0), 12.0, 15.0, 12.0);
        state.projectiles.push(shot);

        let hits = projectile_hits(&mut state, &config);
        assert_eq!(hits.len(), 1);
        assert!(state.projectiles.is_empty());

        // A shot aimed at the owner's opponent passes through the owner
        let stray = Projectile::new(1, CombatantId(1), CombatantId(0), Vec2::new(280.0, 430.0), 12.0, 15.0, 12.0);
        state.projectiles.push(stray);
        assert!(projectile_hits(&mut state, &config).is_empty());
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_projectile_combo_uses_prior_count() {
        let (mut state, config) = duel_at(100.0, 300.0);
        state.combatants[0].combo_count = 2;
        state.combatants[0].combo_timer = 30;
        let shot = Projectile::new(0, CombatantId(0), CombatantId(1), Vec2::new(280.0, 430.0), 12.0, 15.0, 12.0);
        state.projectiles.push(shot);
        resolve_combat(&mut state, &config);

        // 12 base + floor(2 * 1.5)
        assert_eq!(state.combatants[1].health, 85.0);
        assert_eq!(state.combatants[0].combo_count, 3);
    }

    #[test]
    fn test_projectile_expiry_event() {
        let (mut state, config) = duel_at(100.0, 300.0);
        let shot = Projectile::new(4, CombatantId(1), CombatantId(0), Vec2::new(1020.0, 100.0), 12.0, 15.0, 12.0);
        state.projectiles.push(shot);
        projectile_hits(&mut state, &config);

        assert!(state.projectiles.is_empty());
        let events = state.take_events();
        assert!(matches!(events[0].data, GameEventData::ProjectileExpired { projectile_id: 4 }));
    }

    #[test]
    fn test_duel_lethal_hit_waits_for_end_of_tick() {
        let (mut state, config) = duel_at(100.0, 180.0);
        state.combatants[1].health = 5.0;
        swing(&mut state, &config);
        resolve_combat(&mut state, &config);

        let victim = &state.combatants[1];
        assert_eq!(victim.health, 0.0);
        assert!(!victim.dead);
        assert_eq!(victim.last_hit_by, Some(CombatantId(0)));
        assert_eq!(state.alive_count, 2);
    }
}
