//! Match Configuration
//!
//! Every tunable constant of the simulation lives here as typed data.
//! `MatchConfig::royale()` and `MatchConfig::duel()` are the two presets;
//! a JSON file may override any subset of fields.

use std::path::Path;
use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::state::GameMode;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for this schema.
    #[error("Failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the simulation cannot run with.
    #[error("Invalid config value `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field
        field: &'static str,
        /// Human-readable explanation
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid { field, reason: reason.into() }
    }
}

// =============================================================================
// ARENA & PHYSICS
// =============================================================================

/// Arena geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Arena width in units
    pub width: f32,
    /// Arena height in units
    pub height: f32,
    /// Height of the ground band at the bottom of the arena
    pub ground_height: f32,
    /// Combatant body width
    pub body_width: f32,
    /// Combatant body height
    pub body_height: f32,
    /// Starting health for every combatant
    pub max_health: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 576.0,
            ground_height: 96.0,
            body_width: 40.0,
            body_height: 100.0,
            max_health: 100.0,
        }
    }
}

impl ArenaConfig {
    /// The y coordinate bodies stand on.
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.height - self.ground_height
    }
}

/// Kinematic integration profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration added per tick while airborne
    pub gravity: f32,
    /// Multiplicative horizontal decay per tick (`None` = no decay)
    pub friction: Option<f32>,
    /// Clamp bodies horizontally to the arena
    pub clamp_to_arena: bool,
    /// Full horizontal move speed (units/tick)
    pub move_speed: f32,
    /// Vertical velocity applied by a jump (negative is up)
    pub jump_impulse: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.7,
            friction: Some(0.9),
            clamp_to_arena: false,
            move_speed: 5.0,
            jump_impulse: -20.0,
        }
    }
}

// =============================================================================
// COMBAT
// =============================================================================

/// Combat state machine and damage constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Ticks an attack stays active
    pub attack_duration: u32,
    /// `attack_frame` value on which the attack can register a hit
    pub activation_frame: u32,
    /// Recovery ticks before the next attack
    pub attack_cooldown: u32,
    /// Hit-stun ticks applied by unblocked damage
    pub hit_stun: u32,
    /// Attack volume width
    pub attack_width: f32,
    /// Attack volume height
    pub attack_height: f32,
    /// Attack volume offset below the top of the body
    pub attack_offset_y: f32,
    /// Base melee damage
    pub melee_damage: f32,
    /// Knockback velocity (x is multiplied by the attacker's facing sign)
    pub knockback: Vec2,
    /// Fraction of damage that gets through a block
    pub block_factor: f32,
    /// Combo bonus per prior hit (`None` disables combos)
    pub combo_multiplier: Option<f32>,
    /// Ticks a combo survives without a new hit
    pub combo_window: u32,
    /// Ticks between specials
    pub special_cooldown: u32,
    /// Projectile horizontal speed (units/tick)
    pub projectile_speed: f32,
    /// Projectile radius
    pub projectile_radius: f32,
    /// Leave the `dead` decision to the end-of-tick check
    pub defer_death: bool,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            attack_duration: 15,
            activation_frame: 10,
            attack_cooldown: 40,
            hit_stun: 10,
            attack_width: 100.0,
            attack_height: 60.0,
            attack_offset_y: 20.0,
            melee_damage: 10.0,
            knockback: Vec2::new(10.0, -5.0),
            block_factor: 0.1,
            combo_multiplier: None,
            combo_window: 90,
            special_cooldown: 120,
            projectile_speed: 12.0,
            projectile_radius: 15.0,
            defer_death: false,
        }
    }
}

// =============================================================================
// POLICY
// =============================================================================

/// Scripted-combatant tuning for battle royale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoyalePolicyConfig {
    /// Horizontal distance under which a bot stops chasing
    pub near_range: f32,
    /// Fraction of move speed used while chasing
    pub chase_throttle: f32,
    /// Per-tick attack probability in range
    pub attack_chance: f64,
    /// Per-tick random jump probability
    pub jump_chance: f64,
    /// Height advantage that triggers a jump
    pub jump_height_gap: f32,
}

impl Default for RoyalePolicyConfig {
    fn default() -> Self {
        Self {
            near_range: 60.0,
            chase_throttle: 0.8,
            attack_chance: 0.05,
            jump_chance: 0.01,
            jump_height_gap: 50.0,
        }
    }
}

/// Scripted-opponent tuning for duel mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelPolicyConfig {
    /// Distance beyond which the opponent considers a special
    pub far_range: f32,
    /// Distance under which the opponent fights in melee
    pub near_range: f32,
    /// Per-tick special probability at far range
    pub special_chance: f64,
    /// Probability of blocking an incoming attack
    pub block_chance: f64,
    /// Per-tick attack probability at near range
    pub attack_chance: f64,
    /// Per-tick random jump probability
    pub jump_chance: f64,
}

impl Default for DuelPolicyConfig {
    fn default() -> Self {
        Self {
            far_range: 300.0,
            near_range: 100.0,
            special_chance: 0.02,
            block_chance: 0.6,
            attack_chance: 0.08,
            jump_chance: 0.005,
        }
    }
}

/// Decision policy tuning for both variants.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Battle royale bots
    pub royale: RoyalePolicyConfig,
    /// Duel opponent
    pub duel: DuelPolicyConfig,
}

// =============================================================================
// ZONE
// =============================================================================

/// Shrinking safe-zone tuning (battle royale).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Starting left edge (usually off-screen)
    pub initial_left: f32,
    /// Starting right edge (usually off-screen)
    pub initial_right: f32,
    /// First left target
    pub target_left: f32,
    /// First right target
    pub target_right: f32,
    /// Inward step applied to each target per shrink
    pub shrink_step: f32,
    /// Narrowest allowed target width
    pub min_width: f32,
    /// Fraction of the remaining gap closed per tick
    pub smoothing: f32,
    /// Timer seconds between shrinks
    pub period_secs: u32,
    /// Hazard damage per tick outside the zone
    pub damage: f32,
    /// Horizontal push back toward the zone
    pub push: f32,
    /// Length of the alternating on/off hazard windows in ticks
    pub hazard_window_ticks: u32,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            initial_left: -500.0,
            initial_right: 1524.0,
            target_left: 0.0,
            target_right: 1024.0,
            shrink_step: 80.0,
            min_width: 200.0,
            smoothing: 0.01,
            period_secs: 10,
            damage: 0.5,
            push: 2.0,
            hazard_window_ticks: 30,
        }
    }
}

// =============================================================================
// MATCH CONFIG
// =============================================================================

/// Configuration for match simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Which variant this config drives
    pub mode: GameMode,
    /// Nominal frame rate (Hz)
    pub tick_rate: u32,
    /// Duel countdown in timer seconds
    pub duel_seconds: u32,
    /// Arena geometry
    pub arena: ArenaConfig,
    /// Integration profile
    pub physics: PhysicsConfig,
    /// Combat constants
    pub combat: CombatConfig,
    /// Scripted behavior
    pub policy: PolicyConfig,
    /// Safe zone (battle royale only)
    pub zone: ZoneConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::royale()
    }
}

impl MatchConfig {
    /// Highest accepted frame rate (Hz).
    pub const MAX_TICK_RATE: u32 = 1000;

    /// Battle royale preset.
    pub fn royale() -> Self {
        Self {
            mode: GameMode::Royale,
            tick_rate: crate::TICK_RATE,
            duel_seconds: 60,
            arena: ArenaConfig::default(),
            physics: PhysicsConfig::default(),
            combat: CombatConfig::default(),
            policy: PolicyConfig::default(),
            zone: ZoneConfig::default(),
        }
    }

    /// Duel preset.
    pub fn duel() -> Self {
        Self {
            mode: GameMode::Duel,
            physics: PhysicsConfig {
                friction: None,
                clamp_to_arena: true,
                ..PhysicsConfig::default()
            },
            combat: CombatConfig {
                attack_cooldown: 30,
                hit_stun: 15,
                melee_damage: 8.0,
                knockback: Vec2::new(6.0, -4.0),
                combo_multiplier: Some(1.5),
                defer_death: true,
                ..CombatConfig::default()
            },
            ..Self::royale()
        }
    }

    /// Preset for a mode.
    pub fn for_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::Royale => Self::royale(),
            GameMode::Duel => Self::duel(),
        }
    }

    /// Load configuration from a JSON file and validate it.
    ///
    /// Missing fields fall back to the preset of the file's `mode`
    /// (royale when absent).
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse configuration from a JSON string and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        struct ModeProbe {
            #[serde(default)]
            mode: GameMode,
        }

        // Pick the preset first so omitted fields inherit mode defaults
        let probe: ModeProbe = serde_json::from_str(json)?;
        let mut value = serde_json::to_value(Self::for_mode(probe.mode))?;
        merge_json(&mut value, serde_json::from_str(json)?);

        let config: MatchConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 || self.tick_rate > Self::MAX_TICK_RATE {
            return Err(ConfigError::invalid(
                "tick_rate",
                format!("must lie in [1, {}]", Self::MAX_TICK_RATE),
            ));
        }
        if self.arena.width <= 0.0 || self.arena.height <= 0.0 {
            return Err(ConfigError::invalid("arena", "width and height must be positive"));
        }
        if self.arena.ground_height < 0.0 || self.arena.ground_height >= self.arena.height {
            return Err(ConfigError::invalid(
                "arena.ground_height",
                format!("must lie in [0, {})", self.arena.height),
            ));
        }
        if self.arena.max_health <= 0.0 {
            return Err(ConfigError::invalid("arena.max_health", "must be positive"));
        }
        if self.physics.gravity <= 0.0 {
            return Err(ConfigError::invalid("physics.gravity", "must be positive"));
        }
        if let Some(friction) = self.physics.friction {
            if !(0.0..=1.0).contains(&friction) {
                return Err(ConfigError::invalid("physics.friction", "must lie in [0, 1]"));
            }
        }
        if self.combat.attack_duration == 0 {
            return Err(ConfigError::invalid("combat.attack_duration", "must be positive"));
        }
        if self.combat.activation_frame == 0
            || self.combat.activation_frame >= self.combat.attack_duration
        {
            return Err(ConfigError::invalid(
                "combat.activation_frame",
                format!("must lie in [1, {})", self.combat.attack_duration),
            ));
        }
        if !(0.0..=1.0).contains(&self.combat.block_factor) {
            return Err(ConfigError::invalid("combat.block_factor", "must lie in [0, 1]"));
        }
        if self.combat.combo_multiplier.is_some_and(|m| m < 0.0) {
            return Err(ConfigError::invalid("combat.combo_multiplier", "must not be negative"));
        }
        let chances = [
            ("policy.royale.attack_chance", self.policy.royale.attack_chance),
            ("policy.royale.jump_chance", self.policy.royale.jump_chance),
            ("policy.duel.special_chance", self.policy.duel.special_chance),
            ("policy.duel.block_chance", self.policy.duel.block_chance),
            ("policy.duel.attack_chance", self.policy.duel.attack_chance),
            ("policy.duel.jump_chance", self.policy.duel.jump_chance),
        ];
        for (field, chance) in chances {
            if !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::invalid(field, "probability must lie in [0, 1]"));
            }
        }
        if self.zone.min_width <= 0.0 || self.zone.min_width > self.arena.width {
            return Err(ConfigError::invalid(
                "zone.min_width",
                format!("must lie in (0, {}]", self.arena.width),
            ));
        }
        if self.zone.period_secs == 0 {
            return Err(ConfigError::invalid("zone.period_secs", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.zone.smoothing) {
            return Err(ConfigError::invalid("zone.smoothing", "must lie in [0, 1]"));
        }
        if self.zone.hazard_window_ticks == 0 {
            return Err(ConfigError::invalid("zone.hazard_window_ticks", "must be positive"));
        }
        Ok(())
    }
}

/// Overlay `patch` onto `base`, recursing into objects.
fn merge_json(base: &mut serde_json::Value, patch: serde_json::Value) {
    match (base, patch) {
        (serde_json::Value::Object(base_map), serde_json::Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        MatchConfig::royale().validate().unwrap();
        MatchConfig::duel().validate().unwrap();
    }

    #[test]
    fn test_duel_preset_differs() {
        let duel = MatchConfig::duel();
        assert_eq!(duel.mode, GameMode::Duel);
        assert_eq!(duel.physics.friction, None);
        assert!(duel.physics.clamp_to_arena);
        assert_eq!(duel.combat.combo_multiplier, Some(1.5));
        assert!(duel.combat.defer_death);

        let royale = MatchConfig::royale();
        assert_eq!(royale.physics.friction, Some(0.9));
        assert_eq!(royale.combat.combo_multiplier, None);
    }

    #[test]
    fn test_ground_line() {
        assert_eq!(ArenaConfig::default().ground_y(), 480.0);
    }

    #[test]
    fn test_from_json_inherits_mode_preset() {
        let config = MatchConfig::from_json(r#"{ "mode": "duel", "duel_seconds": 30 }"#).unwrap();
        assert_eq!(config.duel_seconds, 30);
        assert_eq!(config.combat.melee_damage, 8.0);
        assert_eq!(config.physics.friction, None);

        let config = MatchConfig::from_json(r#"{ "zone": { "min_width": 300.0 } }"#).unwrap();
        assert_eq!(config.mode, GameMode::Royale);
        assert_eq!(config.zone.min_width, 300.0);
        assert_eq!(config.zone.shrink_step, 80.0);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        let err = MatchConfig::from_json(r#"{ "combat": { "activation_frame": 20 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "combat.activation_frame", .. }));

        let err = MatchConfig::from_json(r#"{ "physics": { "gravity": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "physics.gravity", .. }));

        let err = MatchConfig::from_json(r#"{ "policy": { "duel": { "block_chance": 1.5 } } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "policy.duel.block_chance", .. }));

        let err = MatchConfig::from_json(r#"{ "tick_rate": 2000000 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "tick_rate", .. }));

        let err = MatchConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = MatchConfig::load_from_file(Path::new("/nonexistent/rumble.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
