//! Obstacle factory and the recurring spawn timer

use glam::Vec2;
use rand::Rng;

use super::state::{Body, Collider, Obstacle, ObstacleId, Playfield};
use crate::consts::*;

/// Shortest delay the schedule will ever wait between spawns
const MIN_SPAWN_DELAY: f32 = 0.05;

/// Build a fresh asteroid just above the top edge.
///
/// Spawn X is drawn from a fixed narrow lane `[0, SPAWN_LANE_WIDTH)` that
/// does not depend on the playfield width.
pub fn create_obstacle<R: Rng>(rng: &mut R, id: ObstacleId, playfield: &Playfield) -> Obstacle {
    let scale = rng.random_range(0..SCALE_STEPS) as f32 / 10.0 + 1.0;
    let size = OBSTACLE_SPRITE_SIZE * scale;

    let x = rng.random_range(0..SPAWN_LANE_WIDTH) as f32;
    let y = playfield.height + size.y;

    let angular_vel = unit_signed(rng) * SPIN_SCALE;
    let drift = unit_signed(rng) * DRIFT_SCALE;

    Obstacle {
        id,
        pos: Vec2::new(x, y),
        vel: Vec2::new(drift, 0.0),
        rotation: 0.0,
        angular_vel,
        scale,
        collider: Collider::Circle {
            radius: size.x.min(size.y) / 2.0,
        },
        body: Body::obstacle(),
    }
}

/// Uniform sample in [-1, 1)
fn unit_signed<R: Rng>(rng: &mut R) -> f32 {
    rng.random::<f32>() * 2.0 - 1.0
}

/// Recurring spawn timer: spawn, wait interval ± jitter, repeat.
///
/// Only advanced while the game is running, so paused time is never
/// counted and nothing is caught up on resume.
#[derive(Debug, Clone)]
pub struct SpawnSchedule {
    interval: f32,
    jitter: f32,
    /// Seconds until the next spawn
    countdown: f32,
}

impl Default for SpawnSchedule {
    fn default() -> Self {
        Self::new(SPAWN_INTERVAL, SPAWN_JITTER)
    }
}

impl SpawnSchedule {
    /// The first spawn is due immediately
    pub fn new(interval: f32, jitter: f32) -> Self {
        Self {
            interval,
            jitter: jitter.abs(),
            countdown: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.countdown = 0.0;
    }

    pub fn countdown(&self) -> f32 {
        self.countdown
    }

    /// Advance by `dt` and return how many spawns fell due
    pub fn advance<R: Rng>(&mut self, dt: f32, rng: &mut R) -> u32 {
        self.countdown -= dt;
        let mut due = 0;
        while self.countdown <= 0.0 {
            due += 1;
            self.countdown += self.next_delay(rng);
        }
        due
    }

    fn next_delay<R: Rng>(&self, rng: &mut R) -> f32 {
        (self.interval + unit_signed(rng) * self.jitter).max(MIN_SPAWN_DELAY)
    }
}
