//! Centralized game constants for the duel core.
//!
//! Arena geometry, per-frame physics and the timing windows shared by the
//! fighter, AI and match modules. Character-specific numbers (clip lengths,
//! strike boxes) live in `roster`.

/// Simulation time in milliseconds.
pub type Millis = u64;

// =====================================================
// Arena
// =====================================================

/// Playable width in world units
pub const SCREEN_WIDTH: f32 = 1024.0;

/// Playable height in world units
pub const SCREEN_HEIGHT: f32 = 576.0;

/// Height of the ground band at the bottom of the arena
pub const GROUND_HEIGHT: f32 = 96.0;

// =====================================================
// Physics (per frame)
// =====================================================

/// Downward acceleration added to vertical velocity each airborne frame
pub const GRAVITY: f32 = 0.7;

/// Horizontal speed of a running fighter
pub const RUN_SPEED: f32 = 5.0;

/// Upward impulse applied by a jump
pub const JUMP_IMPULSE: f32 = 20.0;

// =====================================================
// Fighters
// =====================================================

/// Body collision footprint width
pub const BODY_WIDTH: f32 = 50.0;

/// Body collision footprint height
pub const BODY_HEIGHT: f32 = 150.0;

/// Starting health for every round
pub const MAX_HEALTH: i32 = 100;

/// Health removed by one landed strike
pub const HIT_DAMAGE: i32 = 20;

// =====================================================
// Match flow
// =====================================================

/// Round wins needed to take the match (best of three)
pub const ROUNDS_TO_WIN: u32 = 2;

/// Default round clock in seconds
pub const DEFAULT_ROUND_SECS: u32 = 60;

/// Pause between a round result and the match-end evaluation
pub const ROUND_END_DELAY_MS: Millis = 2000;

/// First number shown by the between-rounds countdown
pub const COUNTDOWN_FROM: u8 = 3;

/// Interval between countdown numbers
pub const COUNTDOWN_STEP_MS: Millis = 1000;

/// Frame period at 60 Hz, rounded down to whole milliseconds
pub const FRAME_MS: Millis = 16;

// =====================================================
// AI
// =====================================================

/// Minimum time between decisions for the easy tier
pub const EASY_COOLDOWN_MS: Millis = 2000;

/// Minimum time between decisions for the expert tier
pub const EXPERT_COOLDOWN_MS: Millis = 800;

/// Minimum time between decisions for the master tier
pub const MASTER_COOLDOWN_MS: Millis = 300;

/// How long the defending flag stays raised after a retreat
pub const DEFEND_WINDOW_MS: Millis = 500;

/// Delay between a feint's attack and its retreat
pub const FEINT_DELAY_MS: Millis = 100;

/// Delay between a jump-attack's jump and its swing
pub const JUMP_ATTACK_DELAY_MS: Millis = 200;

/// Retreat speed as a fraction of run speed (applied twice per defend)
pub const RETREAT_SPEED_MULT: f32 = 0.5;
