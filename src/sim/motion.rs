//! Pointer-driven ship motion
//!
//! A touch turns into one composed action: an eased move to the touch
//! point, a bank-turn that leans in, holds, and levels out over three equal
//! thirds of the travel time, and a parallax shift of the background.

use glam::Vec2;

use crate::consts::*;
use crate::{distance, travel_time};

/// Slow-in/slow-out timing curve (cubic), maps [0, 1] onto [0, 1]
#[inline]
pub fn ease_in_ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Eased interpolation between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: Vec2,
    pub to: Vec2,
    pub duration: f32,
    pub elapsed: f32,
}

impl Tween {
    pub fn new(from: Vec2, to: Vec2, duration: f32) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    /// Linear progress in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn value(&self) -> Vec2 {
        self.from.lerp(self.to, ease_in_ease_out(self.progress()))
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Lean-in, hold, lean-out over three equal segments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeanSequence {
    /// Rotation when the sequence started
    pub start: f32,
    /// Peak bank angle
    pub angle: f32,
    /// Length of each of the three segments
    pub segment: f32,
    pub elapsed: f32,
}

impl LeanSequence {
    /// Lean toward the side of travel: left turns bank positive
    pub fn toward(from: Vec2, to: Vec2, duration: f32) -> Self {
        let angle = if to.x < from.x { LEAN_ANGLE } else { -LEAN_ANGLE };
        Self {
            start: 0.0,
            angle,
            segment: duration.max(0.0) / 3.0,
            elapsed: 0.0,
        }
    }

    /// Begin the lean from the ship's current rotation
    pub fn from_rotation(mut self, rotation: f32) -> Self {
        self.start = rotation;
        self
    }

    /// Durations of lean-in, hold, lean-out
    pub fn segments(&self) -> [f32; 3] {
        [self.segment; 3]
    }

    pub fn total(&self) -> f32 {
        self.segments().iter().sum()
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(self.total());
    }

    /// Ship rotation after `elapsed` seconds of the sequence
    pub fn rotation_at(&self, elapsed: f32) -> f32 {
        let seg = self.segment;
        if seg <= 0.0 || elapsed >= self.total() {
            return 0.0;
        }
        if elapsed < seg {
            let t = elapsed / seg;
            self.start + (self.angle - self.start) * t
        } else if elapsed < 2.0 * seg {
            self.angle
        } else {
            let t = (elapsed - 2.0 * seg) / seg;
            self.angle * (1.0 - t)
        }
    }

    pub fn rotation(&self) -> f32 {
        self.rotation_at(self.elapsed)
    }
}

/// Move and bank, run together
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveAction {
    pub travel: Tween,
    pub lean: LeanSequence,
}

impl MoveAction {
    pub fn duration(&self) -> f32 {
        self.travel.duration
    }

    /// Step the action, returning the new (position, rotation)
    pub fn advance(&mut self, dt: f32) -> (Vec2, f32) {
        self.travel.advance(dt);
        self.lean.advance(dt);
        // Always land level, even if the thirds don't sum exactly
        let rotation = if self.finished() { 0.0 } else { self.lean.rotation() };
        (self.travel.value(), rotation)
    }

    pub fn finished(&self) -> bool {
        self.travel.finished()
    }
}

/// Plan a move of the ship from `from` to `to` at `speed` units/s
pub fn plan_move(from: Vec2, to: Vec2, speed: f32) -> MoveAction {
    let duration = travel_time(distance(from, to), speed);
    MoveAction {
        travel: Tween::new(from, to, duration),
        lean: LeanSequence::toward(from, to, duration),
    }
}

/// Background shift that goes with a move toward `target`
pub fn plan_parallax(background: Vec2, target: Vec2, duration: f32) -> Tween {
    Tween::new(background, -target / PARALLAX_DIVISOR, duration)
}
