//! Property tests for the combat and zone invariants.

use std::collections::BTreeMap;

use proptest::prelude::*;

use rooftop_rumble::core::vec2::Vec2;
use rooftop_rumble::game::combatant::Combatant;
use rooftop_rumble::game::config::ZoneConfig;
use rooftop_rumble::game::events::{GameEventData, HitSource};
use rooftop_rumble::game::resolver::{apply_hit, PendingHit};
use rooftop_rumble::game::state::ControlMode;
use rooftop_rumble::game::zone::Zone;
use rooftop_rumble::{tick, on_timer, CombatantId, Facing, Intent, MatchConfig, MatchState, Skin};

fn grounded(id: u32, x: f32, config: &MatchConfig) -> Combatant {
    let mut c = Combatant::new(
        CombatantId(id),
        "Prop",
        Skin::Ninja,
        ControlMode::Player,
        Vec2::new(x, 380.0),
        &config.arena,
    );
    c.body.on_ground = true;
    c
}

fn intent_from_bits(bits: u8) -> Intent {
    Intent { flags: bits & 0x3F, ..Intent::new() }
}

proptest! {
    /// Property: no combatant ever regains health
    #[test]
    fn prop_health_never_increases(
        seed in any::<u64>(),
        bots in 1usize..6,
        duel in any::<bool>(),
        inputs in prop::collection::vec(any::<u8>(), 300),
    ) {
        let config = if duel { MatchConfig::duel() } else { MatchConfig::royale() };
        let mut state = if duel {
            MatchState::duel(&config, Skin::Ninja, Skin::Violet, seed)
        } else {
            MatchState::royale(&config, bots, seed)
        };
        let mut previous: Vec<f32> = state.combatants.iter().map(|c| c.health).collect();

        for bits in inputs {
            let frame = BTreeMap::from([(CombatantId(0), intent_from_bits(bits))]);
            tick(&mut state, &frame, &config);
            if state.tick % config.tick_rate == 0 {
                on_timer(&mut state, &config);
            }

            for (c, before) in state.combatants.iter().zip(&previous) {
                prop_assert!(c.health <= *before);
                prop_assert!(c.health >= 0.0);
            }
            previous = state.combatants.iter().map(|c| c.health).collect();
        }
    }

    /// Property: attacking on cooldown never starts an attack
    #[test]
    fn prop_attack_on_cooldown_is_noop(cooldown in 1u32..60, duel in any::<bool>()) {
        let config = if duel { MatchConfig::duel() } else { MatchConfig::royale() };
        let mut c = grounded(0, 100.0, &config);
        c.attack_cooldown = cooldown;

        prop_assert!(!c.attack(&config.combat));
        prop_assert!(!c.is_attacking);
        prop_assert_eq!(c.attack_cooldown, cooldown);
        prop_assert_eq!(c.attack_frame, 0);
    }

    /// Property: one swing damages a target at most once
    #[test]
    fn prop_single_hit_per_attack(gap in 0.0f32..100.0, seed in any::<u64>()) {
        let mut config = MatchConfig::duel();
        config.policy.duel.attack_chance = 0.0;
        config.policy.duel.special_chance = 0.0;
        config.policy.duel.block_chance = 0.0;
        config.policy.duel.jump_chance = 0.0;
        let mut state = MatchState::duel(&config, Skin::Ninja, Skin::Azure, seed);

        let mut hits = 0;
        let mut intent = Intent::new().with_attack();
        for _ in 0..config.combat.attack_duration + 5 {
            for (id, x) in [(0usize, 200.0), (1, 240.0 + gap)] {
                let c = &mut state.combatants[id];
                c.body.position = Vec2::new(x, 380.0);
                c.body.velocity = Vec2::ZERO;
                c.body.on_ground = true;
            }
            state.combatants[0].facing = Facing::Right;

            let frame = BTreeMap::from([(CombatantId(0), intent)]);
            intent = Intent::new();
            let result = tick(&mut state, &frame, &config);
            hits += result
                .events
                .iter()
                .filter(|e| matches!(e.data, GameEventData::Hit { source: HitSource::Melee, .. }))
                .count();
        }

        prop_assert_eq!(hits, 1);
    }

    /// Property: a block lets exactly `block_factor` through, with no
    /// knockback, no hit-stun and no combo change
    #[test]
    fn prop_block_takes_exactly_ten_percent(
        damage in 0.1f32..50.0,
        combo in 0u32..6,
        projectile in any::<bool>(),
    ) {
        let config = MatchConfig::duel();
        let mut state = MatchState::duel(&config, Skin::Ninja, Skin::Azure, 9);
        state.combatants[0].combo_count = combo;
        state.combatants[0].combo_timer = 40;
        state.combatants[1].body.velocity = Vec2::new(1.5, 0.0);
        prop_assert!(state.combatants[1].block(true));
        state.combatants[1].body.velocity = Vec2::new(1.5, 0.0);

        let source = if projectile { HitSource::Projectile { projectile_id: 0 } } else { HitSource::Melee };
        let hit = PendingHit {
            attacker: CombatantId(0),
            target: CombatantId(1),
            base_damage: damage,
            direction: Facing::Right,
            source,
        };
        apply_hit(&mut state, hit, &config);

        let target = &state.combatants[1];
        let taken = 100.0 - target.health;
        prop_assert!((taken - damage * config.combat.block_factor).abs() < 1e-4);
        prop_assert_eq!(target.hit_stun, 0);
        prop_assert_eq!(target.body.velocity, Vec2::new(1.5, 0.0));
        prop_assert_eq!(state.combatants[0].combo_count, combo);
    }

    /// Property: combos drop when the window runs out and on unblocked damage
    #[test]
    fn prop_combo_resets(hits in 1u32..10) {
        let config = MatchConfig::duel();
        let mut c = grounded(0, 100.0, &config);
        for _ in 0..hits {
            c.register_combo_hit(&config.combat);
        }
        prop_assert_eq!(c.combo_count, hits);

        let mut chained = c.clone();
        for _ in 0..config.combat.combo_window {
            c.advance_timers();
        }
        prop_assert_eq!(c.combo_count, 0);

        chained.take_damage(1.0, &config.combat);
        prop_assert_eq!(chained.combo_count, 0);
    }

    /// Property: the zone target never gets narrower than the minimum
    #[test]
    fn prop_zone_respects_min_width(
        step in 1.0f32..300.0,
        min_width in 10.0f32..1000.0,
        shrinks in 0usize..40,
    ) {
        let config = ZoneConfig { shrink_step: step, min_width, ..ZoneConfig::default() };
        let mut zone = Zone::new(&config);

        for _ in 0..shrinks {
            zone.shrink(&config);
            prop_assert!(zone.target_width() >= min_width - 1e-3);
        }
    }
}
