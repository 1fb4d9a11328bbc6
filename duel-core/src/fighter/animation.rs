//! Motion clips and the animation priority machine.
//!
//! Exactly one [`Motion`] is showing at a time. Requests for a new motion go
//! through [`admits`], which encodes who may interrupt whom:
//!
//! | showing  | on last frame | accepts                      |
//! |----------|---------------|------------------------------|
//! | Death    | any           | nothing (only [`Animator::reset`]) |
//! | Attack   | no            | nothing                      |
//! | TakeHit  | no            | nothing                      |
//! | any      | otherwise     | any different motion         |

use serde::{Deserialize, Serialize};

/// Animation/state label of a fighter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Motion {
    Idle,
    Run,
    Jump,
    Fall,
    Attack,
    TakeHit,
    Death,
}

impl Motion {
    /// Motions that hold the fighter until their final frame.
    pub fn is_committed(self) -> bool {
        matches!(self, Motion::Attack | Motion::TakeHit)
    }
}

/// Frame count and hold rate of one clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clip {
    pub frames: u32,
    /// Ticks each frame is held before advancing
    pub hold: u32,
}

impl Clip {
    pub const fn new(frames: u32, hold: u32) -> Self {
        Self { frames, hold }
    }

    pub fn last_frame(&self) -> u32 {
        self.frames.saturating_sub(1)
    }
}

/// One clip per motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipSet {
    pub idle: Clip,
    pub run: Clip,
    pub jump: Clip,
    pub fall: Clip,
    pub attack: Clip,
    pub take_hit: Clip,
    pub death: Clip,
}

impl ClipSet {
    pub fn clip(&self, motion: Motion) -> Clip {
        match motion {
            Motion::Idle => self.idle,
            Motion::Run => self.run,
            Motion::Jump => self.jump,
            Motion::Fall => self.fall,
            Motion::Attack => self.attack,
            Motion::TakeHit => self.take_hit,
            Motion::Death => self.death,
        }
    }
}

/// Outcome of [`Animator::request`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Switched,
    /// Requested motion is already showing
    Unchanged,
    /// A higher-priority motion is holding
    Blocked,
}

/// Transition rule: may `requested` replace `current`?
pub fn admits(current: Motion, on_last_frame: bool, requested: Motion) -> bool {
    match current {
        Motion::Death => false,
        m if m.is_committed() && !on_last_frame => false,
        m => m != requested,
    }
}

/// Plays a [`ClipSet`] one tick at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animator {
    clips: ClipSet,
    motion: Motion,
    frame: u32,
    elapsed: u32,
}

impl Animator {
    pub fn new(clips: ClipSet) -> Self {
        Self {
            clips,
            motion: Motion::Idle,
            frame: 0,
            elapsed: 0,
        }
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn clip(&self) -> Clip {
        self.clips.clip(self.motion)
    }

    pub fn clips(&self) -> &ClipSet {
        &self.clips
    }

    pub fn frames_remaining(&self) -> u32 {
        self.clip().last_frame().saturating_sub(self.frame)
    }

    pub fn on_last_frame(&self) -> bool {
        self.frames_remaining() == 0
    }

    /// Advance one tick; the frame moves every `hold` ticks and wraps.
    pub fn advance(&mut self) {
        let clip = self.clip();
        self.elapsed = self.elapsed.wrapping_add(1);
        if self.elapsed % clip.hold.max(1) == 0 {
            self.frame = if self.frame < clip.last_frame() {
                self.frame + 1
            } else {
                0
            };
        }
    }

    pub fn request(&mut self, motion: Motion) -> Transition {
        if admits(self.motion, self.on_last_frame(), motion) {
            self.show(motion);
            Transition::Switched
        } else if self.motion == motion {
            Transition::Unchanged
        } else {
            Transition::Blocked
        }
    }

    /// Back to Idle from anything, Death included.
    pub fn reset(&mut self) {
        self.show(Motion::Idle);
    }

    fn show(&mut self, motion: Motion) {
        self.motion = motion;
        self.frame = 0;
        self.elapsed = 0;
    }
}
