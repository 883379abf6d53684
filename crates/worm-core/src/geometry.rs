//! Math / geometry primitives shared by physics, collision and the
//! spatial index: distance, angle normalization, circle intersection and
//! point-segment distance. Mirrors the role of the teacher's `Pos` in
//! `bug.rs`, generalized from a hex grid to continuous floating-point
//! world coordinates.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A point in continuous world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        self.distance_sq_to(other).sqrt()
    }

    pub fn distance_sq_to(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn add(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Normalize an angle to (-pi, pi].
pub fn normalize_angle(theta: f64) -> f64 {
    let mut a = theta % (2.0 * PI);
    if a <= -PI {
        a += 2.0 * PI;
    } else if a > PI {
        a -= 2.0 * PI;
    }
    a
}

/// Shortest signed angular delta from `from` to `to`, in (-pi, pi].
pub fn wrap_angle(theta: f64) -> f64 {
    normalize_angle(theta)
}

/// Whether two circles (center, radius) intersect.
pub fn circles_intersect(a: Point, ra: f64, b: Point, rb: f64) -> bool {
    let r = ra + rb;
    a.distance_sq_to(b) <= r * r
}

/// Squared distance from point `p` to the segment `[a, b]`.
pub fn dist_sq_point_segment(p: Point, a: Point, b: Point) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    if len_sq <= f64::EPSILON {
        return p.distance_sq_to(a);
    }
    let apx = p.x - a.x;
    let apy = p.y - a.y;
    let t = ((apx * abx + apy * aby) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + abx * t, a.y + aby * t);
    p.distance_sq_to(proj)
}
