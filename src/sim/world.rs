//! Entity/collision world
//!
//! Owns the ship, the live asteroids, the spawn timer and the seeded RNG.
//! The world never touches score or phase: it only reports what happened
//! (spawns, exits, contact) and lets the game decide.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::{Placed, collide, resolve_obstacle_collisions};
use super::motion::{MoveAction, Tween, plan_move, plan_parallax};
use super::spawn::{SpawnSchedule, create_obstacle};
use super::state::{Obstacle, ObstacleId, Playfield, PlayerActor};
use crate::consts::SHIP_SPEED;

/// The simulated scene
#[derive(Debug, Clone)]
pub struct World {
    pub playfield: Playfield,
    pub player: PlayerActor,
    /// Live asteroids, kept in id order
    pub obstacles: Vec<Obstacle>,
    /// Background offset (parallax)
    pub background: Vec2,
    movement: Option<MoveAction>,
    parallax: Option<Tween>,
    spawner: SpawnSchedule,
    rng: Pcg32,
    next_id: u32,
}

impl World {
    pub fn new(seed: u64, playfield: Playfield) -> Self {
        Self {
            playfield,
            player: PlayerActor::default(),
            obstacles: Vec::new(),
            background: Vec2::ZERO,
            movement: None,
            parallax: None,
            spawner: SpawnSchedule::default(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Replace the spawn timer (tests and tuning)
    pub fn with_spawner(mut self, spawner: SpawnSchedule) -> Self {
        self.spawner = spawner;
        self
    }

    fn next_obstacle_id(&mut self) -> ObstacleId {
        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create one asteroid above the top edge and add it to the set
    pub fn spawn_obstacle(&mut self) -> ObstacleId {
        let id = self.next_obstacle_id();
        let obstacle = create_obstacle(&mut self.rng, id, &self.playfield);
        log::debug!(
            "Spawned asteroid {:?} at ({:.0}, {:.0}) scale {:.1}",
            id,
            obstacle.pos.x,
            obstacle.pos.y,
            obstacle.scale
        );
        self.obstacles.push(obstacle);
        id
    }

    /// Run the spawn timer for `dt` and spawn whatever fell due
    pub fn advance_spawner(&mut self, dt: f32) -> Vec<ObstacleId> {
        let due = self.spawner.advance(dt, &mut self.rng);
        (0..due).map(|_| self.spawn_obstacle()).collect()
    }

    /// Steer toward a pointer position. Any move in progress is dropped.
    pub fn apply_pointer(&mut self, target: Vec2) {
        let movement = plan_move(self.player.pos, target, SHIP_SPEED);
        let movement = MoveAction {
            lean: movement.lean.from_rotation(self.player.rotation),
            ..movement
        };
        self.parallax = Some(plan_parallax(self.background, target, movement.duration()));
        self.movement = Some(movement);
    }

    /// Whether a move action is still running
    pub fn is_moving(&self) -> bool {
        self.movement.is_some()
    }

    /// Advance motion and physics by one step
    pub fn tick(&mut self, dt: f32) {
        if let Some(movement) = &mut self.movement {
            let (pos, rotation) = movement.advance(dt);
            self.player.pos = pos;
            self.player.rotation = rotation;
            if movement.finished() {
                self.movement = None;
            }
        }

        if let Some(parallax) = &mut self.parallax {
            parallax.advance(dt);
            self.background = parallax.value();
            if parallax.finished() {
                self.parallax = None;
            }
        }

        for obstacle in &mut self.obstacles {
            obstacle.integrate(dt);
        }
        resolve_obstacle_collisions(&mut self.obstacles);
    }

    /// Asteroids that have fallen past the bottom of the playfield
    pub fn detect_offscreen(&self) -> Vec<ObstacleId> {
        let exit_y = self.playfield.exit_y();
        self.obstacles
            .iter()
            .filter(|o| o.pos.y < exit_y)
            .map(|o| o.id)
            .collect()
    }

    /// Remove asteroids by id, returning how many were actually present.
    /// Removing an id twice counts it once.
    pub fn remove(&mut self, ids: &[ObstacleId]) -> usize {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| !ids.contains(&o.id));
        before - self.obstacles.len()
    }

    /// First asteroid touching the ship, if any
    pub fn contact(&self) -> Option<ObstacleId> {
        let player = &self.player;
        let ship = Placed::new(player.pos, player.rotation, &player.collider);
        self.obstacles
            .iter()
            .filter(|o| player.body.reports_contact_with(&o.body))
            .find(|o| collide(ship, Placed::new(o.pos, o.rotation, &o.collider)).hit)
            .map(|o| o.id)
    }

    /// Whether the ship overlaps any asteroid
    pub fn detect_contact(&self) -> bool {
        self.contact().is_some()
    }

    /// Fresh field for a new game: no asteroids, ship centred, spawning due
    pub fn reset(&mut self) {
        self.obstacles.clear();
        self.player.recenter();
        self.movement = None;
        self.parallax = None;
        self.spawner.reset();
    }
}
