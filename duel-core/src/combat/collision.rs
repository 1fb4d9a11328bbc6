//! Axis-aligned collision volumes.
//!
//! Screen-space convention: `origin` is the top-left corner, +y points down.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Volume {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Volume {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Overlap test with inclusive edges: touching rectangles overlap.
    pub fn overlaps(&self, other: &Volume) -> bool {
        self.right() >= other.left()
            && self.left() <= other.right()
            && self.bottom() >= other.top()
            && self.top() <= other.bottom()
    }
}

/// True when `strike` reaches `body`. Evaluated once per direction; a strike
/// reaching the opponent says nothing about the opponent's strike reaching back.
pub fn strike_reaches(strike: &Volume, body: &Volume) -> bool {
    strike.overlaps(body)
}
