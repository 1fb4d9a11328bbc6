//! Collaborator interfaces reached by the match controller.
//!
//! Sound, drawing and the score/UI sink sit behind these traits; none of them
//! feed anything back into the simulation. Every method has an empty default
//! so a host only implements what it shows.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::fighter::{FighterView, Motion, Side};
use crate::locale::TextKey;

/// Sound effects and music requested by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    Attack(Side),
    Jump(Side),
    Death(Side),
    Music,
}

pub trait AudioService {
    fn play(&mut self, _cue: SoundCue) {}
}

pub trait RenderService {
    fn draw_fighter(&mut self, _view: &FighterView) {}
}

/// Score and status sink (HUD, overlays, logs).
pub trait Presenter {
    fn round_changed(&mut self, _round: u32) {}
    fn score_changed(&mut self, _player: u32, _enemy: u32) {}
    /// Health as a 0..=100 percentage.
    fn health_changed(&mut self, _side: Side, _percent: u32) {}
    fn timer_changed(&mut self, _seconds: u32) {}
    fn round_result(&mut self, _text: TextKey) {}
    fn final_result(&mut self, _text: TextKey) {}
    fn countdown_shown(&mut self, _value: u8) {}
    fn countdown_hidden(&mut self) {}
}

/// Everything a match controller talks to.
pub trait Services: AudioService + RenderService + Presenter {}

impl<T: AudioService + RenderService + Presenter> Services for T {}

/// Discards every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullServices;

impl AudioService for NullServices {}
impl RenderService for NullServices {}
impl Presenter for NullServices {}

// ============================================================================
// Recording implementation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServiceEvent {
    Sound(SoundCue),
    Draw { side: Side, motion: Motion, frame: u32 },
    Round(u32),
    Score { player: u32, enemy: u32 },
    Health { side: Side, percent: u32 },
    Timer(u32),
    RoundResult(TextKey),
    FinalResult(TextKey),
    Countdown(u8),
    CountdownHidden,
}

/// Records every call in order. Draw calls are only kept when enabled,
/// since they arrive twice per tick.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<ServiceEvent>,
    record_draws: bool,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_draws() -> Self {
        Self {
            events: Vec::new(),
            record_draws: true,
        }
    }

    /// Take the events recorded so far.
    pub fn drain(&mut self) -> Vec<ServiceEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn count(&self, pred: impl Fn(&ServiceEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn last_score(&self) -> Option<(u32, u32)> {
        self.events.iter().rev().find_map(|e| match e {
            ServiceEvent::Score { player, enemy } => Some((*player, *enemy)),
            _ => None,
        })
    }

    fn push(&mut self, event: ServiceEvent) {
        self.events.push(event);
    }
}

impl AudioService for EventLog {
    fn play(&mut self, cue: SoundCue) {
        self.push(ServiceEvent::Sound(cue));
    }
}

impl RenderService for EventLog {
    fn draw_fighter(&mut self, view: &FighterView) {
        if self.record_draws {
            self.push(ServiceEvent::Draw {
                side: view.side,
                motion: view.motion,
                frame: view.frame,
            });
        }
    }
}

impl Presenter for EventLog {
    fn round_changed(&mut self, round: u32) {
        self.push(ServiceEvent::Round(round));
    }

    fn score_changed(&mut self, player: u32, enemy: u32) {
        self.push(ServiceEvent::Score { player, enemy });
    }

    fn health_changed(&mut self, side: Side, percent: u32) {
        self.push(ServiceEvent::Health { side, percent });
    }

    fn timer_changed(&mut self, seconds: u32) {
        self.push(ServiceEvent::Timer(seconds));
    }

    fn round_result(&mut self, text: TextKey) {
        self.push(ServiceEvent::RoundResult(text));
    }

    fn final_result(&mut self, text: TextKey) {
        self.push(ServiceEvent::FinalResult(text));
    }

    fn countdown_shown(&mut self, value: u8) {
        self.push(ServiceEvent::Countdown(value));
    }

    fn countdown_hidden(&mut self) {
        self.push(ServiceEvent::CountdownHidden);
    }
}

impl ServiceEvent {
    /// Emit this event through `tracing`. Timer and draw events go to debug.
    pub fn log(&self) {
        match self {
            ServiceEvent::Draw { .. } | ServiceEvent::Timer(_) | ServiceEvent::Sound(_) => {
                debug!(event = ?self, "service")
            }
            _ => info!(event = ?self, "service"),
        }
    }
}
