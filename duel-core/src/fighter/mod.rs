//! Fighter State Machine
//!
//! Position, velocity, health and the motion clip of one combatant. A fighter
//! is advanced once per tick by [`Fighter::update`]; every other mutation
//! (swings, hits, jumps, AI nudges) happens through the methods below, so the
//! invariants live in one place:
//!
//! - a dead fighter ignores movement, jumps and swings
//! - Death, once its last frame shows, stays until [`Fighter::reset_health`]
//! - a fighter never leaves `0..=screen_width` horizontally

pub mod animation;

pub use animation::{admits, Animator, Clip, ClipSet, Motion, Transition};

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::combat::Volume;
use crate::config::ArenaConfig;
use crate::input::{InputAction, InputSource, KeyState, MoveIntent};
use crate::roster::{CharacterId, StrikeBox};
use crate::services::SoundCue;

// ============================================================================
// Identity
// ============================================================================

/// Which end of the arena a fighter belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    /// Spawn orientation: each side starts looking at the other.
    pub fn spawn_facing(self) -> Facing {
        match self {
            Side::Player => Facing::Left,
            Side::Enemy => Facing::Right,
        }
    }
}

/// Who drives a fighter. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    Human,
    Ai,
}

/// Sprite-sheet orientation flag.
///
/// The flag names the sheet the art was drawn for, which is the opposite of
/// the direction of travel:
///
/// | travel    | flag            | strike volume   |
/// |-----------|-----------------|-----------------|
/// | toward +x | `Facing::Left`  | right of body   |
/// | toward -x | `Facing::Right` | left of body    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// Flag for travel with horizontal sign `dx`.
    pub fn for_travel(dx: f32) -> Facing {
        if dx >= 0.0 {
            Facing::Left
        } else {
            Facing::Right
        }
    }

    /// Flag for a fighter at `from_x` looking at something at `to_x`.
    pub fn toward(from_x: f32, to_x: f32) -> Facing {
        if from_x < to_x {
            Facing::Left
        } else {
            Facing::Right
        }
    }
}

// ============================================================================
// Render view
// ============================================================================

/// Immutable per-frame snapshot handed to renderers and serialized in
/// match snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterView {
    pub side: Side,
    pub character: CharacterId,
    pub position: [f32; 2],
    pub facing: Facing,
    pub motion: Motion,
    pub frame: u32,
    pub health: i32,
    pub is_dead: bool,
    pub is_attacking: bool,
    pub body: Volume,
    pub strike: Volume,
}

impl FighterView {
    /// Health as a 0..=100 percentage of the round's starting health.
    pub fn health_percent(&self, max_health: i32) -> u32 {
        health_percent(self.health, max_health)
    }
}

pub fn health_percent(health: i32, max_health: i32) -> u32 {
    if max_health <= 0 {
        return 0;
    }
    (health.clamp(0, max_health) * 100 / max_health) as u32
}

// ============================================================================
// Fighter
// ============================================================================

#[derive(Debug, Clone)]
pub struct Fighter {
    side: Side,
    character: CharacterId,
    control: Control,
    arena: ArenaConfig,

    spawn: Vec2,
    position: Vec2,
    velocity: Vec2,
    size: Vec2,
    facing: Facing,

    health: i32,
    is_dead: bool,
    death_announced: bool,
    is_attacking: bool,
    can_jump: bool,

    strike_box: StrikeBox,
    strike_volume: Volume,
    attack_frame: u32,
    animator: Animator,

    keys: KeyState,
    cues: Vec<SoundCue>,
}

impl Fighter {
    pub fn new(
        side: Side,
        character: CharacterId,
        control: Control,
        spawn: Vec2,
        arena: ArenaConfig,
    ) -> Self {
        let profile = character.profile();
        let mut fighter = Self {
            side,
            character,
            control,
            arena,
            spawn,
            position: spawn,
            velocity: Vec2::ZERO,
            size: Vec2::new(arena.body_width, arena.body_height),
            facing: side.spawn_facing(),
            health: arena.max_health,
            is_dead: false,
            death_announced: false,
            is_attacking: false,
            can_jump: true,
            strike_box: profile.strike,
            strike_volume: Volume::default(),
            attack_frame: profile.attack_frame,
            animator: Animator::new(profile.clips),
            keys: KeyState::new(),
            cues: Vec::new(),
        };
        fighter.refresh_strike_volume();
        fighter
    }

    // --- queries ----------------------------------------------------------

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn character(&self) -> CharacterId {
        self.character
    }

    pub fn control(&self) -> Control {
        self.control
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.arena.max_health
    }

    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    pub fn is_attacking(&self) -> bool {
        self.is_attacking
    }

    pub fn can_jump(&self) -> bool {
        self.can_jump
    }

    pub fn motion(&self) -> Motion {
        self.animator.motion()
    }

    pub fn frame(&self) -> u32 {
        self.animator.frame()
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn attack_frame(&self) -> u32 {
        self.attack_frame
    }

    pub fn run_speed(&self) -> f32 {
        self.arena.run_speed
    }

    /// Damage this fighter's landed strikes deal.
    pub fn damage(&self) -> i32 {
        self.arena.hit_damage
    }

    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    pub fn body_volume(&self) -> Volume {
        Volume::from_origin(self.position, self.size)
    }

    /// Strike volume as of the last update.
    pub fn strike_volume(&self) -> Volume {
        self.strike_volume
    }

    /// Hit window: swinging, Attack clip showing, on the active hit frame.
    pub fn is_attack_in_progress(&self) -> bool {
        self.is_attacking
            && self.animator.motion() == Motion::Attack
            && self.animator.frame() == self.attack_frame
    }

    pub fn view(&self) -> FighterView {
        FighterView {
            side: self.side,
            character: self.character,
            position: [self.position.x, self.position.y],
            facing: self.facing,
            motion: self.animator.motion(),
            frame: self.animator.frame(),
            health: self.health,
            is_dead: self.is_dead,
            is_attacking: self.is_attacking,
            body: self.body_volume(),
            strike: self.strike_volume,
        }
    }

    /// Take the sound cues queued since the last drain.
    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }

    // --- per tick ---------------------------------------------------------

    /// Advance one tick. Animation always runs (unless dead); physics and
    /// input-driven movement only when `can_move`.
    pub fn update(&mut self, can_move: bool) {
        if !self.is_dead {
            self.animator.advance();
        }
        if self.animator.motion() == Motion::Death && self.animator.on_last_frame() {
            if !self.is_dead {
                debug!(side = ?self.side, "death clip complete");
            }
            self.is_dead = true;
        }

        self.refresh_strike_volume();

        if can_move {
            self.integrate();

            self.velocity.x = 0.0;
            match self.keys.move_intent() {
                Some(MoveIntent::Left) => self.move_left(),
                Some(MoveIntent::Right) => self.move_right(),
                None => self.set_idle(),
            }

            if self.velocity.y < 0.0 {
                self.animator.request(Motion::Jump);
            } else if self.velocity.y > 0.0 {
                self.animator.request(Motion::Fall);
            }
        }

        // A killing blow taken mid-swing shows Death once the swing releases.
        if self.health <= 0 {
            self.animator.request(Motion::Death);
        }

        // A swing whose clip was replaced before its hit frame is cancelled.
        if self.is_attacking && self.animator.motion() != Motion::Attack {
            self.is_attacking = false;
        }
    }

    fn integrate(&mut self) {
        self.position += self.velocity;

        let ground_line = self.arena.ground_line();
        if self.position.y + self.size.y + self.velocity.y >= ground_line {
            self.velocity.y = 0.0;
            self.position.y = ground_line - self.size.y;
            self.can_jump = true;
        } else {
            self.velocity.y += self.arena.gravity;
            self.can_jump = false;
        }
        trace!(side = ?self.side, x = self.position.x, y = self.position.y, "integrated");
    }

    fn refresh_strike_volume(&mut self) {
        let StrikeBox {
            offset_x,
            offset_y,
            width,
            height,
        } = self.strike_box;
        let x = match self.facing {
            Facing::Left => self.position.x + offset_x,
            Facing::Right => self.position.x - offset_x - self.size.x * 2.0,
        };
        self.strike_volume = Volume::new(x, self.position.y + offset_y, width, height);
    }

    // --- actions ----------------------------------------------------------

    /// Request the Attack clip. A hit reaction or Death on screen blocks the
    /// swing; a swing already showing keeps its frame.
    pub fn start_attack(&mut self) {
        if self.is_dead {
            return;
        }
        self.animator.request(Motion::Attack);
        if self.animator.motion() == Motion::Attack {
            self.is_attacking = true;
        }
    }

    /// Close the current swing, hit or miss.
    pub fn finish_attack(&mut self) {
        self.is_attacking = false;
        self.cues.push(SoundCue::Attack(self.side));
    }

    /// Apply `damage` and return the new health.
    pub fn take_hit(&mut self, damage: i32) -> i32 {
        self.health -= damage;
        if self.health <= 0 {
            if !self.death_announced {
                self.death_announced = true;
                self.cues.push(SoundCue::Death(self.side));
            }
            self.animator.request(Motion::Death);
        } else {
            self.animator.request(Motion::TakeHit);
        }
        self.health
    }

    pub fn jump(&mut self) {
        if self.is_dead || !self.can_jump {
            return;
        }
        self.velocity.y -= self.arena.jump_impulse;
        self.can_jump = false;
        self.cues.push(SoundCue::Jump(self.side));
    }

    pub fn move_left(&mut self) {
        if self.is_dead {
            return;
        }
        let speed = self.arena.run_speed;
        if self.position.x - speed < 0.0 {
            return;
        }
        self.velocity.x = -speed;
        self.facing = Facing::for_travel(-1.0);
        self.animator.request(Motion::Run);
    }

    pub fn move_right(&mut self) {
        if self.is_dead {
            return;
        }
        let speed = self.arena.run_speed;
        if self.position.x + speed + self.size.x > self.arena.screen_width {
            return;
        }
        self.velocity.x = speed;
        self.facing = Facing::for_travel(1.0);
        self.animator.request(Motion::Run);
    }

    pub fn set_idle(&mut self) {
        self.velocity.x = 0.0;
        self.animator.request(Motion::Idle);
    }

    /// Immediate horizontal displacement, bounded like running.
    /// Returns whether the fighter moved.
    pub fn nudge(&mut self, dx: f32) -> bool {
        if self.is_dead || dx == 0.0 {
            return false;
        }
        let x = self.position.x + dx;
        if x < 0.0 || x + self.size.x > self.arena.screen_width {
            return false;
        }
        self.position.x = x;
        true
    }

    pub fn face(&mut self, facing: Facing) {
        self.facing = facing;
    }

    pub fn face_toward(&mut self, target_x: f32) {
        self.facing = Facing::toward(self.position.x, target_x);
    }

    // --- input ------------------------------------------------------------

    /// Human key press. Ignored for AI-driven fighters. Jump and Attack fire
    /// only when `can_act`.
    pub fn key_down(&mut self, action: InputAction, can_act: bool) {
        if self.control != Control::Human {
            return;
        }
        let fresh = self.keys.key_down(action);
        if !fresh || !can_act {
            return;
        }
        match action {
            InputAction::Jump => self.jump(),
            InputAction::Attack => self.start_attack(),
            InputAction::MoveLeft | InputAction::MoveRight => {}
        }
    }

    pub fn key_up(&mut self, action: InputAction) {
        if self.control != Control::Human {
            return;
        }
        self.keys.key_up(action);
    }

    // --- round resets -----------------------------------------------------

    pub fn reset_health(&mut self) {
        self.health = self.arena.max_health;
        self.is_dead = false;
        self.death_announced = false;
        self.animator.reset();
    }

    pub fn reset_position(&mut self) {
        self.position = self.spawn;
        self.velocity = Vec2::ZERO;
        self.is_attacking = false;
        self.can_jump = true;
        self.animator.reset();
        self.refresh_strike_volume();
    }
}

// ============================================================================
// Tests
// ============================================================================
