//! Decision Policy
//!
//! Produces the per-tick `Intent` for scripted combatants. The policy only
//! reads the roster; the match loop applies what it returns exactly like
//! player input. Randomness comes from the caller so runs can be seeded.

use rand::Rng;

use crate::game::combatant::Combatant;
use crate::game::config::{DuelPolicyConfig, RoyalePolicyConfig};
use crate::game::intent::Intent;
use crate::game::state::Facing;

/// Nearest living combatant other than `me`, by center distance.
pub fn nearest_target<'a>(me: &Combatant, roster: &'a [Combatant]) -> Option<&'a Combatant> {
    let origin = me.body.center();
    roster
        .iter()
        .filter(|other| other.id != me.id && other.is_alive())
        .min_by(|a, b| {
            let da = origin.distance_squared(a.body.center());
            let db = origin.distance_squared(b.body.center());
            da.total_cmp(&db).then(a.id.cmp(&b.id))
        })
}

/// Battle royale bot: chase the nearest fighter, swing when close.
pub fn royale_intent<R: Rng + ?Sized>(
    me: &Combatant,
    roster: &[Combatant],
    config: &RoyalePolicyConfig,
    rng: &mut R,
) -> Intent {
    if me.dead || me.hit_stun > 0 {
        return Intent::new();
    }
    let Some(target) = nearest_target(me, roster) else {
        return Intent::new().with_halt();
    };

    let dx = target.body.position.x - me.body.position.x;
    let dir = Facing::toward(dx);

    let mut intent = if dx.abs() > config.near_range {
        Intent::toward(dir, config.chase_throttle)
    } else {
        let mut intent = Intent::facing(dir);
        intent.set_attack(rng.gen_bool(config.attack_chance));
        intent
    };

    if me.body.on_ground {
        let target_above = target.body.position.y < me.body.position.y - config.jump_height_gap;
        if rng.gen_bool(config.jump_chance) || target_above {
            intent.set_jump(true);
        }
    }
    intent
}

/// Duel opponent: zone at range with specials, close in, then trade blows
/// and block what comes back.
pub fn duel_intent<R: Rng + ?Sized>(
    me: &Combatant,
    opponent: &Combatant,
    config: &DuelPolicyConfig,
    rng: &mut R,
) -> Intent {
    if me.dead || me.hit_stun > 0 {
        return Intent::new();
    }

    let dx = opponent.body.position.x - me.body.position.x;
    let distance = dx.abs();
    let dir = Facing::toward(dx);

    let mut intent = if distance > config.far_range {
        if me.special_cooldown == 0 && rng.gen_bool(config.special_chance) {
            Intent::facing(dir).with_special()
        } else {
            Intent::toward(dir, 1.0)
        }
    } else if distance >= config.near_range {
        Intent::toward(dir, 1.0)
    } else {
        let mut intent = Intent::facing(dir);
        if opponent.is_attacking {
            intent.set_block(rng.gen_bool(config.block_chance));
        } else {
            intent.set_attack(rng.gen_bool(config.attack_chance));
        }
        intent
    };

    if me.body.on_ground && rng.gen_bool(config.jump_chance) {
        intent.set_jump(true);
    }
    intent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::DeterministicRng;
    use crate::core::vec2::Vec2;
    use crate::game::config::MatchConfig;
    use crate::game::state::{CombatantId, ControlMode, Skin};

    fn fighter(id: u32, x: f32, config: &MatchConfig) -> Combatant {
        let mut c = Combatant::new(
            CombatantId(id),
            format!("F{}", id),
            Skin::from_index(id as usize),
            ControlMode::Scripted,
            Vec2::new(x, 380.0),
            &config.arena,
        );
        c.body.on_ground = true;
        c
    }

    /// Policy tuning with every random branch switched off.
    fn calm_royale() -> RoyalePolicyConfig {
        RoyalePolicyConfig { attack_chance: 0.0, jump_chance: 0.0, ..Default::default() }
    }

    fn calm_duel() -> DuelPolicyConfig {
        DuelPolicyConfig {
            special_chance: 0.0,
            block_chance: 0.0,
            attack_chance: 0.0,
            jump_chance: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_nearest_target_skips_dead_and_self() {
        let config = MatchConfig::royale();
        let mut roster = vec![
            fighter(0, 100.0, &config),
            fighter(1, 150.0, &config),
            fighter(2, 400.0, &config),
        ];
        assert_eq!(nearest_target(&roster[0], &roster).map(|c| c.id), Some(CombatantId(1)));

        roster[1].kill();
        assert_eq!(nearest_target(&roster[0], &roster).map(|c| c.id), Some(CombatantId(2)));

        roster[2].kill();
        assert!(nearest_target(&roster[0], &roster).is_none());
    }

    #[test]
    fn test_royale_chases_at_throttle() {
        let config = MatchConfig::royale();
        let roster = vec![fighter(0, 100.0, &config), fighter(1, 500.0, &config)];
        let mut rng = DeterministicRng::new(1);

        let intent = royale_intent(&roster[1], &roster, &calm_royale(), &mut rng);
        assert!(intent.left_held());
        assert_eq!(intent.throttle, 0.8);
        assert!(!intent.attack_pressed());
    }

    #[test]
    fn test_royale_attacks_in_range() {
        let config = MatchConfig::royale();
        let roster = vec![fighter(0, 100.0, &config), fighter(1, 140.0, &config)];
        let policy = RoyalePolicyConfig { attack_chance: 1.0, jump_chance: 0.0, ..Default::default() };
        let mut rng = DeterministicRng::new(1);

        let intent = royale_intent(&roster[1], &roster, &policy, &mut rng);
        assert!(intent.attack_pressed());
        assert!(!intent.left_held() && !intent.right_held());
        assert_eq!(intent.face, Some(Facing::Left));
    }

    #[test]
    fn test_royale_jumps_at_higher_target() {
        let config = MatchConfig::royale();
        let mut roster = vec![fighter(0, 100.0, &config), fighter(1, 300.0, &config)];
        roster[0].body.position.y = 200.0;
        let mut rng = DeterministicRng::new(1);

        let intent = royale_intent(&roster[1], &roster, &calm_royale(), &mut rng);
        assert!(intent.jump_pressed());

        // Airborne bots never jump
        roster[1].body.on_ground = false;
        let intent = royale_intent(&roster[1], &roster, &calm_royale(), &mut rng);
        assert!(!intent.jump_pressed());
    }

    #[test]
    fn test_royale_suspended_in_hit_stun() {
        let config = MatchConfig::royale();
        let mut roster = vec![fighter(0, 100.0, &config), fighter(1, 140.0, &config)];
        roster[1].hit_stun = 4;
        let policy = RoyalePolicyConfig { attack_chance: 1.0, jump_chance: 1.0, ..Default::default() };
        let mut rng = DeterministicRng::new(1);

        assert!(royale_intent(&roster[1], &roster, &policy, &mut rng).is_idle());
    }

    #[test]
    fn test_royale_lone_survivor_idles() {
        let config = MatchConfig::royale();
        let roster = vec![fighter(0, 100.0, &config)];
        let mut rng = DeterministicRng::new(1);
        let intent = royale_intent(&roster[0], &roster, &calm_royale(), &mut rng);
        assert!(intent.halt_requested());
        assert!(!intent.left_held() && !intent.right_held());
        assert!(!intent.attack_pressed() && !intent.jump_pressed());
    }

    #[test]
    fn test_duel_ranges() {
        let config = MatchConfig::duel();
        let me = fighter(1, 600.0, &config);
        let mut rng = DeterministicRng::new(1);

        // Far with specials disabled: close in
        let far = fighter(0, 100.0, &config);
        let intent = duel_intent(&me, &far, &calm_duel(), &mut rng);
        assert!(intent.left_held());

        // Far with certain special
        let eager = DuelPolicyConfig { special_chance: 1.0, ..calm_duel() };
        let intent = duel_intent(&me, &far, &eager, &mut rng);
        assert!(intent.special_pressed());
        assert!(!intent.left_held());

        // Mid range: close in
        let mid = fighter(0, 400.0, &config);
        assert!(duel_intent(&me, &mid, &eager, &mut rng).left_held());

        // Near: stand and face
        let near = fighter(0, 550.0, &config);
        let intent = duel_intent(&me, &near, &calm_duel(), &mut rng);
        assert!(!intent.left_held() && !intent.right_held());
        assert_eq!(intent.face, Some(Facing::Left));
    }

    #[test]
    fn test_duel_special_waits_for_cooldown() {
        let config = MatchConfig::duel();
        let mut me = fighter(1, 600.0, &config);
        me.special_cooldown = 10;
        let far = fighter(0, 100.0, &config);
        let eager = DuelPolicyConfig { special_chance: 1.0, ..calm_duel() };
        let mut rng = DeterministicRng::new(1);

        let intent = duel_intent(&me, &far, &eager, &mut rng);
        assert!(!intent.special_pressed());
        assert!(intent.left_held());
    }

    #[test]
    fn test_duel_blocks_incoming_attack() {
        let config = MatchConfig::duel();
        let me = fighter(1, 600.0, &config);
        let mut near = fighter(0, 550.0, &config);
        near.attack(&config.combat);
        let guarded = DuelPolicyConfig { block_chance: 1.0, attack_chance: 1.0, ..calm_duel() };
        let mut rng = DeterministicRng::new(1);

        let intent = duel_intent(&me, &near, &guarded, &mut rng);
        assert!(intent.block_held());
        assert!(!intent.attack_pressed());

        // Opponent idle: attack instead
        near.is_attacking = false;
        let intent = duel_intent(&me, &near, &guarded, &mut rng);
        assert!(intent.attack_pressed());
        assert!(!intent.block_held());
    }

    #[test]
    fn test_policy_is_reproducible() {
        let config = MatchConfig::royale();
        let roster = vec![fighter(0, 100.0, &config), fighter(1, 130.0, &config)];
        let policy = RoyalePolicyConfig::default();

        let mut a = DeterministicRng::new(42);
        let mut b = DeterministicRng::new(42);
        for _ in 0..200 {
            assert_eq!(
                royale_intent(&roster[1], &roster, &policy, &mut a),
                royale_intent(&roster[1], &roster, &policy, &mut b),
            );
        }
    }
}
