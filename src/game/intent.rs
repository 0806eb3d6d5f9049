//! Intent Vectors
//!
//! The one thing every controller produces: what a combatant wants to do
//! this tick. Player input and the decision policy both emit `Intent`, so
//! the match loop never branches on who is in control.
//!
//! Held flags (left, right, block) are level-triggered; pressed flags
//! (jump, attack, special) are edge-triggered and only valid for the tick
//! they arrive on.

use serde::{Serialize, Deserialize};

use crate::game::state::Facing;

/// Per-tick controller output for one combatant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Action flags (packed bits):
    /// - Bit 0: Move left held
    /// - Bit 1: Move right held
    /// - Bit 2: Block held
    /// - Bit 3: Jump pressed this tick
    /// - Bit 4: Attack pressed this tick
    /// - Bit 5: Special pressed this tick
    /// - Bit 6: Halt horizontal movement this tick
    pub flags: u8,

    /// Fraction of full move speed (1.0 for players)
    pub throttle: f32,

    /// Face this way regardless of movement
    pub face: Option<Facing>,
}

impl Default for Intent {
    fn default() -> Self {
        Self::new()
    }
}

impl Intent {
    /// Move-left flag bit
    pub const FLAG_LEFT: u8 = 0x01;
    /// Move-right flag bit
    pub const FLAG_RIGHT: u8 = 0x02;
    /// Block flag bit
    pub const FLAG_BLOCK: u8 = 0x04;
    /// Jump flag bit
    pub const FLAG_JUMP: u8 = 0x08;
    /// Attack flag bit
    pub const FLAG_ATTACK: u8 = 0x10;
    /// Special flag bit
    pub const FLAG_SPECIAL: u8 = 0x20;
    /// Halt flag bit
    pub const FLAG_HALT: u8 = 0x40;

    /// Create an idle intent.
    pub const fn new() -> Self {
        Self {
            flags: 0,
            throttle: 1.0,
            face: None,
        }
    }

    /// Idle intent that only turns to face a direction.
    pub const fn facing(face: Facing) -> Self {
        Self {
            flags: 0,
            throttle: 1.0,
            face: Some(face),
        }
    }

    /// Intent that holds a move toward `direction` at `throttle`.
    pub fn toward(direction: Facing, throttle: f32) -> Self {
        let mut intent = Self::new();
        intent.set_move(direction, true);
        intent.throttle = throttle;
        intent.face = Some(direction);
        intent
    }

    #[inline]
    fn has(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }

    #[inline]
    fn set(&mut self, flag: u8, on: bool) {
        if on {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }

    /// Move left held.
    #[inline]
    pub fn left_held(&self) -> bool {
        self.has(Self::FLAG_LEFT)
    }

    /// Move right held.
    #[inline]
    pub fn right_held(&self) -> bool {
        self.has(Self::FLAG_RIGHT)
    }

    /// Block held.
    #[inline]
    pub fn block_held(&self) -> bool {
        self.has(Self::FLAG_BLOCK)
    }

    /// Jump pressed this tick.
    #[inline]
    pub fn jump_pressed(&self) -> bool {
        self.has(Self::FLAG_JUMP)
    }

    /// Attack pressed this tick.
    #[inline]
    pub fn attack_pressed(&self) -> bool {
        self.has(Self::FLAG_ATTACK)
    }

    /// Special pressed this tick.
    #[inline]
    pub fn special_pressed(&self) -> bool {
        self.has(Self::FLAG_SPECIAL)
    }

    /// Stand still this tick when no direction is held.
    #[inline]
    pub fn halt_requested(&self) -> bool {
        self.has(Self::FLAG_HALT)
    }

    /// Check if this is an idle intent.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.flags == 0 && self.face.is_none()
    }

    /// Set or clear a held move direction.
    #[inline]
    pub fn set_move(&mut self, direction: Facing, held: bool) {
        match direction {
            Facing::Left => self.set(Self::FLAG_LEFT, held),
            Facing::Right => self.set(Self::FLAG_RIGHT, held),
        }
    }

    /// Set block flag.
    #[inline]
    pub fn set_block(&mut self, held: bool) {
        self.set(Self::FLAG_BLOCK, held);
    }

    /// Set jump flag.
    #[inline]
    pub fn set_jump(&mut self, pressed: bool) {
        self.set(Self::FLAG_JUMP, pressed);
    }

    /// Set attack flag.
    #[inline]
    pub fn set_attack(&mut self, pressed: bool) {
        self.set(Self::FLAG_ATTACK, pressed);
    }

    /// Set special flag.
    #[inline]
    pub fn set_special(&mut self, pressed: bool) {
        self.set(Self::FLAG_SPECIAL, pressed);
    }

    /// Builder form of [`Intent::set_jump`].
    pub fn with_jump(mut self) -> Self {
        self.set_jump(true);
        self
    }

    /// Builder form of [`Intent::set_attack`].
    pub fn with_attack(mut self) -> Self {
        self.set_attack(true);
        self
    }

    /// Builder form of [`Intent::set_block`].
    pub fn with_block(mut self) -> Self {
        self.set_block(true);
        self
    }

    /// Builder form of [`Intent::set_special`].
    pub fn with_special(mut self) -> Self {
        self.set_special(true);
        self
    }

    /// Builder that asks the match loop to zero horizontal velocity.
    pub fn with_halt(mut self) -> Self {
        self.set(Self::FLAG_HALT, true);
        self
    }
}

// =============================================================================
// HORIZONTAL LATCH
// =============================================================================

/// How contradictory left+right input resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contradiction {
    /// Both held cancels out (battle royale)
    Cancel,
    /// The most recently pressed direction wins (duel)
    LastPressed,
}

/// Remembers which held direction was pressed most recently.
///
/// Held flags carry no ordering, so the latch watches for the tick on
/// which each direction goes from released to held.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizontalLatch {
    left_was_held: bool,
    right_was_held: bool,
    last_pressed: Option<Facing>,
}

impl HorizontalLatch {
    /// Feed this tick's intent and return the resolved direction.
    pub fn resolve(&mut self, intent: &Intent, rule: Contradiction) -> Option<Facing> {
        let left = intent.left_held();
        let right = intent.right_held();

        // Rising edges; if both rise on the same tick right wins, matching
        // the order keys are read in
        if left && !self.left_was_held {
            self.last_pressed = Some(Facing::Left);
        }
        if right && !self.right_was_held {
            self.last_pressed = Some(Facing::Right);
        }
        self.left_was_held = left;
        self.right_was_held = right;

        match (left, right) {
            (false, false) => None,
            (true, false) => Some(Facing::Left),
            (false, true) => Some(Facing::Right),
            (true, true) => match rule {
                Contradiction::Cancel => None,
                Contradiction::LastPressed => self.last_pressed,
            },
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
