//! Food pellets: the economy that worms consume to grow. Regular food
//! spawns passively up to `FOOD_TARGET`; death-loot food is the larger,
//! richer pellet trail a worm scatters along its body when it dies.

use crate::constants::*;
use crate::geometry::Point;
use crate::rng::DeterministicRng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub food_id: u64,
    pub position: Point,
    pub radius: f64,
    pub value: i64,
    pub color: String,
    pub is_loot: bool,
}

impl Food {
    pub fn new_ambient(food_id: u64, position: Point, radius: f64, color: String) -> Self {
        Self {
            food_id,
            position,
            radius,
            value: radius_to_value(radius),
            color,
            is_loot: false,
        }
    }

    pub fn new_loot(food_id: u64, position: Point, radius: f64, color: String) -> Self {
        Self {
            food_id,
            position,
            radius,
            value: radius_to_value(radius),
            color,
            is_loot: true,
        }
    }
}

/// Wire-facing representation of a pellet, used for full snapshots and
/// delta `added`/`updated` entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerializedFood {
    pub id: u64,
    pub position: Point,
    pub radius: f64,
    pub value: i64,
    pub color: String,
}

impl From<&Food> for SerializedFood {
    fn from(f: &Food) -> Self {
        Self {
            id: f.food_id,
            position: f.position,
            radius: f.radius,
            value: f.value,
            color: f.color.clone(),
        }
    }
}

/// `value = max(1, floor(radius * 0.5))`, per the death-to-loot formula;
/// applied uniformly so ambient pellets scale the same way.
fn radius_to_value(radius: f64) -> i64 {
    ((radius * 0.5).floor() as i64).max(1)
}

/// Pick a random color from the fixed palette.
pub fn random_color(rng: &mut DeterministicRng) -> String {
    let idx = rng.gen_range(FOOD_COLOR_PALETTE.len() as u32) as usize;
    FOOD_COLOR_PALETTE[idx].to_string()
}

/// Scatter `max(1, length/20)` loot pellets evenly along a dead worm's
/// retained path (by arc length), each slightly jittered so a tight
/// trail doesn't stack every pellet on one point.
pub fn loot_positions_from_path(path: &[Point], length: f64, rng: &mut DeterministicRng) -> Vec<Point> {
    if path.is_empty() {
        return Vec::new();
    }
    let count = ((length / 20.0).round() as usize).max(1);
    if path.len() == 1 {
        return (0..count).map(|_| jitter(path[0], rng)).collect();
    }

    let total_arc: f64 = path.windows(2).map(|w| w[0].distance_to(w[1])).sum();
    let spacing = if count > 1 { total_arc / count as f64 } else { 0.0 };

    let mut positions = Vec::with_capacity(count);
    let mut acc = 0.0;
    let mut next_target = 0.0;
    let mut prev = path[0];
    for &p in &path[1..] {
        let seg_len = prev.distance_to(p);
        while positions.len() < count && acc + seg_len >= next_target {
            let t = if seg_len > f64::EPSILON { ((next_target - acc) / seg_len).clamp(0.0, 1.0) } else { 0.0 };
            let sample = Point::new(prev.x + (p.x - prev.x) * t, prev.y + (p.y - prev.y) * t);
            positions.push(jitter(sample, rng));
            next_target += spacing.max(f64::EPSILON);
        }
        acc += seg_len;
        prev = p;
    }
    while positions.len() < count {
        positions.push(jitter(*path.last().unwrap(), rng));
    }
    positions
}

fn jitter(p: Point, rng: &mut DeterministicRng) -> Point {
    rng.gen_disk_point(p, SEG_RADIUS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loot_value_scales_with_radius() {
        let small = Food::new_loot(1, Point::new(0.0, 0.0), FOOD_MIN_RADIUS, "#fff".to_string());
        let large = Food::new_loot(2, Point::new(0.0, 0.0), FOOD_MAX_RADIUS, "#fff".to_string());
        assert!(large.value > small.value);
    }

    #[test]
    fn loot_value_is_never_below_one() {
        let f = Food::new_ambient(1, Point::new(0.0, 0.0), 1.0, "#fff".to_string());
        assert_eq!(f.value, 1);
    }

    #[test]
    fn loot_positions_scale_with_length() {
        let mut rng = DeterministicRng::new(1);
        let path: Vec<Point> = (0..200).map(|i| Point::new(i as f64, 0.0)).collect();
        let positions = loot_positions_from_path(&path, 400.0, &mut rng);
        assert_eq!(positions.len(), 20);
    }

    #[test]
    fn loot_positions_never_drop_below_one() {
        let mut rng = DeterministicRng::new(1);
        let path: Vec<Point> = (0..10).map(|i| Point::new(i as f64, 0.0)).collect();
        let positions = loot_positions_from_path(&path, 1.0, &mut rng);
        assert_eq!(positions.len(), 1);
    }

    #[test]
    fn empty_path_yields_no_loot() {
        let mut rng = DeterministicRng::new(1);
        assert!(loot_positions_from_path(&[], 100.0, &mut rng).is_empty());
    }

    #[test]
    fn random_color_picks_from_palette() {
        let mut rng = DeterministicRng::new(3);
        let color = random_color(&mut rng);
        assert!(FOOD_COLOR_PALETTE.contains(&color.as_str()));
    }
}
