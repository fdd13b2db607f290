//! Entity types for the simulation
//!
//! Everything the world owns and mutates lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay, the only phase in which the world advances
    Running,
    /// Frozen, pause overlay shown
    Paused,
    /// Frozen after the ship was hit, game-over overlay shown
    GameOver,
}

/// Physics category bit flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Category(pub u32);

impl Category {
    pub const NONE: Category = Category(0);
    pub const PLAYER: Category = Category(1 << 0);
    pub const OBSTACLE: Category = Category(1 << 1);

    #[inline]
    pub fn intersects(self, other: Category) -> bool {
        self.0 & other.0 != 0
    }
}

impl std::ops::BitOr for Category {
    type Output = Category;

    fn bitor(self, rhs: Category) -> Category {
        Category(self.0 | rhs.0)
    }
}

/// Collision shape, centred on the body position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    Circle { radius: f32 },
    /// Box that rotates with the body
    Rect { half_extents: Vec2 },
}

/// Category masks of a physics body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// What this body is
    pub category: Category,
    /// What this body bounces off
    pub collision_mask: Category,
    /// What this body reports contact with
    pub contact_mask: Category,
}

impl Body {
    pub fn player() -> Self {
        Self {
            category: Category::PLAYER,
            collision_mask: Category::OBSTACLE,
            contact_mask: Category::OBSTACLE,
        }
    }

    pub fn obstacle() -> Self {
        Self {
            category: Category::OBSTACLE,
            collision_mask: Category::PLAYER | Category::OBSTACLE,
            contact_mask: Category::PLAYER,
        }
    }

    /// Contact is reported if either body asks for the other's category
    pub fn reports_contact_with(&self, other: &Body) -> bool {
        self.contact_mask.intersects(other.category) || other.contact_mask.intersects(self.category)
    }

    /// Physical response happens only if both bodies collide with each other
    pub fn collides_with(&self, other: &Body) -> bool {
        self.collision_mask.intersects(other.category)
            && other.collision_mask.intersects(self.category)
    }
}

/// Playfield bounds. The origin sits at the centre of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Obstacles below this Y have left the screen
    pub fn exit_y(&self) -> f32 {
        -self.height
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(375.0, 667.0)
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerActor {
    pub pos: Vec2,
    /// Radians, counter-clockwise
    pub rotation: f32,
    pub scale: f32,
    /// Sized once from the sprite bounds
    pub collider: Collider,
    pub body: Body,
}

impl Default for PlayerActor {
    fn default() -> Self {
        let size = SHIP_SPRITE_SIZE * SHIP_SCALE;
        Self {
            pos: Vec2::ZERO,
            rotation: 0.0,
            scale: SHIP_SCALE,
            collider: Collider::Rect {
                half_extents: size / 2.0,
            },
            body: Body::player(),
        }
    }
}

impl PlayerActor {
    /// Back to the centre, level
    pub fn recenter(&mut self) {
        self.pos = Vec2::ZERO;
        self.rotation = 0.0;
    }
}

/// Stable obstacle identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(pub u32);

/// A falling asteroid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    /// Radians per second
    pub angular_vel: f32,
    pub scale: f32,
    pub collider: Collider,
    pub body: Body,
}

impl Obstacle {
    /// Sprite size after scaling
    pub fn size(&self) -> Vec2 {
        OBSTACLE_SPRITE_SIZE * self.scale
    }

    /// Relative mass, proportional to area
    pub fn mass(&self) -> f32 {
        self.scale * self.scale
    }

    pub fn integrate(&mut self, dt: f32) {
        self.vel.y -= GRAVITY * dt;
        self.pos += self.vel * dt;
        self.rotation += self.angular_vel * dt;
    }
}
