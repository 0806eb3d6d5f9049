//! Match Loop
//!
//! One `tick` is one frame of simulation. The order is fixed:
//!
//! 1. Gather intents (input for players, policy for scripted combatants)
//! 2. Apply intents (movement, facing, block, jump, attack, special)
//! 3. Integrate bodies
//! 4. Advance combat timers
//! 5. Resolve melee and projectiles
//! 6. Advance particles
//! 7. Zone hazard (battle royale)
//! 8. Settle deferred deaths and check for the end of the match
//!
//! `on_timer` is the second, slower clock (once per second). It never runs
//! inside a tick.

use std::collections::BTreeMap;

use tracing::debug;

use crate::game::config::MatchConfig;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::intent::{Contradiction, Intent};
use crate::game::particle::advance_particles;
use crate::game::policy::{duel_intent, royale_intent};
use crate::game::body::integrate;
use crate::game::resolver::resolve_combat;
use crate::game::state::{CombatantId, ControlMode, GameMode, MatchOutcome, MatchPhase, MatchState};
use crate::game::zone::apply_hazard;

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Whether the match is over (this tick or earlier)
    pub match_ended: bool,
    /// Outcome once the match is over
    pub outcome: Option<MatchOutcome>,
}

/// Run one simulation tick.
///
/// `inputs` only needs entries for player-controlled combatants; a missing
/// entry is an idle intent. Ticking an ended match changes nothing and
/// returns `match_ended = true` with no events.
pub fn tick(
    state: &mut MatchState,
    inputs: &BTreeMap<CombatantId, Intent>,
    config: &MatchConfig,
) -> TickResult {
    let mut result = TickResult::default();

    if state.phase == MatchPhase::Ended {
        result.match_ended = true;
        result.outcome = state.outcome;
        return result;
    }

    // 0. Advance tick counter
    state.tick += 1;

    // 1-2. Intents
    let intents = gather_intents(state, inputs, config);
    for (id, intent) in intents {
        apply_intent(state, id, &intent, config);
    }

    // 3. Physics
    let ground_y = config.arena.ground_y();
    for c in state.combatants.iter_mut().filter(|c| c.is_alive()) {
        integrate(&mut c.body, ground_y, &config.physics, config.arena.width);
    }

    // 4. Combat timers
    for c in state.combatants.iter_mut().filter(|c| c.is_alive()) {
        c.advance_timers();
    }

    // 5. Melee and projectiles
    resolve_combat(state, config);

    // 6. Sparks
    advance_particles(&mut state.particles);

    // 7. Zone
    process_zone(state, config);

    // 8. End of tick
    if config.combat.defer_death {
        settle_deaths(state);
    }
    check_end_conditions(state, &mut result);

    result.events = state.take_events();
    for event in &result.events {
        if let GameEventData::CombatantDowned { victim, killer } = event.data {
            debug!(tick = state.tick, %victim, ?killer, "Combatant downed");
        }
    }
    result
}

/// Secondary timer, called once per second.
///
/// Battle royale counts seconds and shrinks the zone every
/// `zone.period_secs`; duel counts the countdown down. The countdown
/// reaching zero is judged on the next tick.
pub fn on_timer(state: &mut MatchState, config: &MatchConfig) -> Vec<GameEvent> {
    if state.phase == MatchPhase::Ended {
        return Vec::new();
    }
    state.timer_seconds += 1;

    match state.mode {
        GameMode::Royale => {
            if state.timer_seconds % config.zone.period_secs == 0 {
                if let Some(zone) = state.zone.as_mut() {
                    zone.shrink(&config.zone);
                    let event = GameEvent::zone_phase(state.tick, zone.phase, zone.target_left, zone.target_right);
                    debug!(
                        phase = zone.phase,
                        left = zone.target_left,
                        right = zone.target_right,
                        "Zone shrinking"
                    );
                    state.push_event(event);
                }
            }
        }
        GameMode::Duel => {
            if let Some(countdown) = state.countdown.as_mut() {
                *countdown = countdown.saturating_sub(1);
            }
        }
    }

    state.take_events()
}

/// Drive a match headlessly: one timer call per `tick_rate` frames, until
/// the match ends or `max_ticks` frames have run.
///
/// `input` is asked for player intents before every frame.
pub fn simulate<F>(
    state: &mut MatchState,
    config: &MatchConfig,
    max_ticks: u32,
    input: F,
) -> Vec<GameEvent>
where
    F: FnMut(&MatchState) -> BTreeMap<CombatantId, Intent>,
{
    let mut events = Vec::new();
    simulate_with(state, config, max_ticks, input, |_, frame_events| events.extend(frame_events));
    events
}

/// [`simulate`] with a per-frame observer.
///
/// `observe` sees the state after each frame together with that frame's
/// events, timer events included. Returns the number of frames run.
pub fn simulate_with<F, O>(
    state: &mut MatchState,
    config: &MatchConfig,
    max_ticks: u32,
    mut input: F,
    mut observe: O,
) -> u32
where
    F: FnMut(&MatchState) -> BTreeMap<CombatantId, Intent>,
    O: FnMut(&MatchState, Vec<GameEvent>),
{
    let tick_rate = config.tick_rate.max(1);
    let mut frames = 0;

    for _ in 0..max_ticks {
        let inputs = input(state);
        let result = tick(state, &inputs, config);
        frames += 1;

        let mut events = result.events;
        if !result.match_ended && state.tick % tick_rate == 0 {
            events.extend(on_timer(state, config));
        }
        observe(state, events);

        if result.match_ended {
            break;
        }
    }

    frames
}

/// Player intents from input, scripted intents from the policy.
///
/// Every policy decision reads the roster as it was before this tick's
/// intents were applied.
fn gather_intents(
    state: &mut MatchState,
    inputs: &BTreeMap<CombatantId, Intent>,
    config: &MatchConfig,
) -> Vec<(CombatantId, Intent)> {
    let roster = &state.combatants;
    let rng = &mut state.rng;
    let mut intents = Vec::with_capacity(roster.len());

    for c in roster.iter().filter(|c| c.is_alive()) {
        let intent = match c.control {
            ControlMode::Player => inputs.get(&c.id).copied().unwrap_or_default(),
            ControlMode::Scripted => match state.mode {
                GameMode::Royale => royale_intent(c, roster, &config.policy.royale, rng),
                GameMode::Duel => match roster.iter().find(|o| o.id != c.id) {
                    Some(opponent) => duel_intent(c, opponent, &config.policy.duel, rng),
                    None => Intent::new(),
                },
            },
        };
        intents.push((c.id, intent));
    }
    intents
}

/// Apply one intent through the combatant's guarded actions.
fn apply_intent(state: &mut MatchState, id: CombatantId, intent: &Intent, config: &MatchConfig) {
    let mode = state.mode;
    let tick = state.tick;
    let target = state.opponent_of(id);
    let projectile_id = state.next_projectile_id;

    let Some(c) = state.combatants.get_mut(id.index()) else {
        return;
    };
    if c.dead {
        return;
    }

    let rule = match mode {
        GameMode::Royale => Contradiction::Cancel,
        GameMode::Duel => Contradiction::LastPressed,
    };
    let direction = c.latch.resolve(intent, rule);
    if mode == GameMode::Duel {
        c.block(intent.block_held());
    }

    if c.hit_stun == 0 {
        let speed = config.physics.move_speed * intent.throttle;
        match mode {
            GameMode::Royale => {
                // Players and halted bots stop; other bots coast on friction
                c.body.velocity.x = match direction {
                    Some(dir) => dir.sign() * speed,
                    None if c.is_player() || intent.halt_requested() => 0.0,
                    None => c.body.velocity.x,
                };
            }
            GameMode::Duel => {
                c.body.velocity.x = match direction {
                    Some(dir) if !c.is_blocking => dir.sign() * speed,
                    _ => 0.0,
                };
            }
        }
        if let Some(dir) = intent.face.or(direction) {
            c.facing = dir;
        }
    }

    if intent.jump_pressed() {
        c.jump(&config.physics);
    }
    if intent.attack_pressed() {
        c.attack(&config.combat);
    }

    let fired = match (mode, target) {
        (GameMode::Duel, Some(target)) if intent.special_pressed() => {
            c.special(&config.combat, projectile_id, target)
        }
        _ => None,
    };
    if let Some(projectile) = fired {
        state.next_projectile_id += 1;
        state.projectiles.push(projectile);
        state.push_event(GameEvent::projectile_fired(tick, projectile_id, id));
    }
}

/// Zone edges, hazard damage and zone eliminations.
fn process_zone(state: &mut MatchState, config: &MatchConfig) {
    let Some(zone) = state.zone.as_mut() else {
        return;
    };
    zone.advance(&config.zone);

    let hits = match &state.zone {
        Some(zone) => apply_hazard(zone, &mut state.combatants, state.tick, &config.zone, &config.combat),
        None => return,
    };

    for hit in hits {
        state.push_event(GameEvent::hazard_damage(state.tick, hit.victim, hit.damage));
        if let Some(c) = state.get_mut(hit.victim) {
            c.last_hit_by = None;
        }
        if hit.lethal && state.get(hit.victim).is_some_and(|c| c.dead) {
            state.eliminate(hit.victim, None);
        }
    }
}

/// Deaths left pending by the resolver become terminal here.
fn settle_deaths(state: &mut MatchState) {
    let drained: Vec<(CombatantId, Option<CombatantId>)> = state
        .combatants
        .iter()
        .filter(|c| !c.dead && c.health <= 0.0)
        .map(|c| (c.id, c.last_hit_by))
        .collect();

    for (victim, killer) in drained {
        state.eliminate(victim, killer);
    }
}

/// Check if match should end.
fn check_end_conditions(state: &mut MatchState, result: &mut TickResult) {
    let survivors: Vec<CombatantId> = state.living().map(|c| c.id).collect();

    let outcome = if survivors.len() <= 1 {
        Some(match survivors.first() {
            Some(id) => MatchOutcome::Winner(*id),
            None => MatchOutcome::Draw,
        })
    } else if state.countdown == Some(0) {
        Some(judge_on_health(state))
    } else {
        None
    };

    if let Some(outcome) = outcome {
        end_match(state, outcome, result);
    }
}

/// Highest health wins; a shared maximum is a draw.
fn judge_on_health(state: &MatchState) -> MatchOutcome {
    let best = state.living().map(|c| c.health).fold(f32::MIN, f32::max);
    let mut leaders = state.living().filter(|c| c.health == best);

    match (leaders.next(), leaders.next()) {
        (Some(leader), None) => MatchOutcome::Winner(leader.id),
        _ => MatchOutcome::Draw,
    }
}

/// End the match.
fn end_match(state: &mut MatchState, outcome: MatchOutcome, result: &mut TickResult) {
    state.phase = MatchPhase::Ended;
    state.outcome = Some(outcome);
    result.match_ended = true;
    result.outcome = Some(outcome);

    debug!(tick = state.tick, ?outcome, banner = ?state.banner(), "Match ended");
    state.push_event(GameEvent::match_ended(state.tick, outcome));
}
