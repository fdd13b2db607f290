//! Collision detection and response
//!
//! Asteroids are circles, the ship is a box that banks with the ship.
//! Overlap tests return the separating normal and depth so the same code
//! serves both the contact check and asteroid/asteroid bouncing.

use glam::Vec2;

use super::state::{Collider, Obstacle};
use crate::consts::RESTITUTION;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the shapes overlap
    pub hit: bool,
    /// Unit normal pointing from the first shape toward the second
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }

    fn contact(normal: Vec2, penetration: f32) -> Self {
        Self {
            hit: true,
            normal,
            penetration,
        }
    }

    /// Same contact seen from the other shape
    fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// A collider placed in the world
#[derive(Debug, Clone, Copy)]
pub struct Placed<'a> {
    pub pos: Vec2,
    pub rotation: f32,
    pub collider: &'a Collider,
}

impl<'a> Placed<'a> {
    pub fn new(pos: Vec2, rotation: f32, collider: &'a Collider) -> Self {
        Self {
            pos,
            rotation,
            collider,
        }
    }
}

/// Check two placed colliders for overlap
pub fn collide(a: Placed<'_>, b: Placed<'_>) -> CollisionResult {
    match (*a.collider, *b.collider) {
        (Collider::Circle { radius: ra }, Collider::Circle { radius: rb }) => {
            circle_circle(a.pos, ra, b.pos, rb)
        }
        (Collider::Circle { radius }, Collider::Rect { half_extents }) => {
            circle_rect(a.pos, radius, b.pos, half_extents, b.rotation).flipped()
        }
        (Collider::Rect { half_extents }, Collider::Circle { radius }) => {
            circle_rect(b.pos, radius, a.pos, half_extents, a.rotation)
        }
        (Collider::Rect { half_extents: ha }, Collider::Rect { half_extents: hb }) => {
            rect_rect(a.pos, ha, a.rotation, b.pos, hb, b.rotation)
        }
    }
}

/// Circle vs circle, normal from `a` to `b`
pub fn circle_circle(a: Vec2, ra: f32, b: Vec2, rb: f32) -> CollisionResult {
    let delta = b - a;
    let dist_sq = delta.length_squared();
    let reach = ra + rb;

    if dist_sq >= reach * reach {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    // Concentric circles: any direction separates them
    let normal = if dist > f32::EPSILON {
        delta / dist
    } else {
        Vec2::Y
    };
    CollisionResult::contact(normal, reach - dist)
}

/// Circle vs rotated box, normal from the box toward the circle
pub fn circle_rect(
    circle: Vec2,
    radius: f32,
    rect: Vec2,
    half_extents: Vec2,
    rotation: f32,
) -> CollisionResult {
    let to_world = Vec2::from_angle(rotation);
    let local = Vec2::from_angle(-rotation).rotate(circle - rect);

    let closest = local.clamp(-half_extents, half_extents);
    let offset = local - closest;
    let dist_sq = offset.length_squared();

    if dist_sq > f32::EPSILON {
        if dist_sq >= radius * radius {
            return CollisionResult::miss();
        }
        let dist = dist_sq.sqrt();
        return CollisionResult::contact(to_world.rotate(offset / dist), radius - dist);
    }

    // Centre inside the box: push out through the nearest face
    let gap_x = half_extents.x - local.x.abs();
    let gap_y = half_extents.y - local.y.abs();
    let local_normal = if gap_x < gap_y {
        Vec2::new(local.x.signum(), 0.0)
    } else {
        Vec2::new(0.0, local.y.signum())
    };
    CollisionResult::contact(to_world.rotate(local_normal), radius + gap_x.min(gap_y))
}

/// Rotated box vs rotated box (separating axis test), normal from `a` to `b`
pub fn rect_rect(
    a: Vec2,
    half_a: Vec2,
    rot_a: f32,
    b: Vec2,
    half_b: Vec2,
    rot_b: f32,
) -> CollisionResult {
    let axes_a = [Vec2::from_angle(rot_a), Vec2::from_angle(rot_a).perp()];
    let axes_b = [Vec2::from_angle(rot_b), Vec2::from_angle(rot_b).perp()];
    let delta = b - a;

    let project = |axes: &[Vec2; 2], half: Vec2, axis: Vec2| {
        half.x * axes[0].dot(axis).abs() + half.y * axes[1].dot(axis).abs()
    };

    let mut best = CollisionResult::contact(Vec2::ZERO, f32::MAX);
    for axis in axes_a.iter().chain(axes_b.iter()) {
        let overlap =
            project(&axes_a, half_a, *axis) + project(&axes_b, half_b, *axis) - delta.dot(*axis).abs();
        if overlap <= 0.0 {
            return CollisionResult::miss();
        }
        if overlap < best.penetration {
            let normal = if delta.dot(*axis) < 0.0 { -*axis } else { *axis };
            best = CollisionResult::contact(normal, overlap);
        }
    }
    best
}

/// Push two overlapping asteroids apart and exchange momentum along the
/// contact normal. Purely physical: no gameplay effect.
pub fn resolve_obstacle_pair(a: &mut Obstacle, b: &mut Obstacle) -> bool {
    if !a.body.collides_with(&b.body) {
        return false;
    }

    let result = collide(
        Placed::new(a.pos, a.rotation, &a.collider),
        Placed::new(b.pos, b.rotation, &b.collider),
    );
    if !result.hit {
        return false;
    }

    let inv_a = 1.0 / a.mass();
    let inv_b = 1.0 / b.mass();
    let inv_sum = inv_a + inv_b;

    // Positional correction, split by inverse mass
    let correction = result.normal * (result.penetration / inv_sum);
    a.pos -= correction * inv_a;
    b.pos += correction * inv_b;

    // Impulse only if they are still approaching
    let closing = (b.vel - a.vel).dot(result.normal);
    if closing < 0.0 {
        let impulse = -(1.0 + RESTITUTION) * closing / inv_sum;
        a.vel -= result.normal * impulse * inv_a;
        b.vel += result.normal * impulse * inv_b;
    }

    true
}

/// Resolve every overlapping asteroid pair once
pub fn resolve_obstacle_collisions(obstacles: &mut [Obstacle]) -> usize {
    let mut resolved = 0;
    for i in 1..obstacles.len() {
        let (head, tail) = obstacles.split_at_mut(i);
        let b = &mut tail[0];
        for a in head.iter_mut() {
            if resolve_obstacle_pair(a, b) {
                resolved += 1;
            }
        }
    }
    resolved
}
