//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod game;
pub mod motion;
pub mod spawn;
pub mod state;
pub mod world;

pub use collision::{CollisionResult, Placed, collide};
pub use game::{Game, GameEvent, TickInput};
pub use motion::{LeanSequence, MoveAction, Tween, ease_in_ease_out, plan_move, plan_parallax};
pub use spawn::{SpawnSchedule, create_obstacle};
pub use state::{
    Body, Category, Collider, GamePhase, Obstacle, ObstacleId, Playfield, PlayerActor,
};
pub use world::World;
