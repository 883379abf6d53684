//! The central simulation entity: a path-based lengthening trail piloted
//! by a player. Generalizes the teacher's `Bug`/`BugState` (discrete hex
//! position + facing) into continuous floating-point kinematics with a
//! bounded path history and a derived, cached collision shape.

use crate::constants::*;
use crate::geometry::{circles_intersect, dist_sq_point_segment, wrap_angle, Point};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One sampled collision circle along a worm's path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub point: Point,
    pub radius: f64,
}

/// Wire-facing representation of a worm, used for full snapshots and as
/// the basis for delta computation in `worm-broadcaster`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerializedWorm {
    pub id: u64,
    pub player_id: u64,
    pub head: Point,
    pub direction: f64,
    pub length: f64,
    pub color: String,
    pub skin_id: String,
    pub is_boosting: bool,
    pub score: i64,
    pub name: String,
    pub path: Option<Vec<Point>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worm {
    pub worm_id: u64,
    pub player_id: u64,
    pub name: String,
    pub skin_id: String,
    pub color: String,

    pub head: Point,
    /// Head position at the start of this tick's `step`, before any
    /// movement was applied. Used as the far endpoint of the worm-food
    /// swept (anti-tunneling) check, so a single high-`dt` tick's full
    /// travel is covered rather than just its last substep.
    pub prev_head: Point,
    pub direction: f64,
    pub target_direction: f64,
    pub speed: f64,
    pub is_boosting: bool,
    pub spawn_time_ms: i64,

    pub length: f64,
    pub path: VecDeque<Point>,

    pub is_alive: bool,

    /// Fractional boost-burn accumulator (spec's deterministic accumulator).
    mass_debt: f64,

    #[serde(skip)]
    segments_cache: Option<Vec<Segment>>,
}

impl Worm {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        worm_id: u64,
        player_id: u64,
        name: String,
        origin: Point,
        direction: f64,
        color: String,
        skin_id: String,
        spawn_time_ms: i64,
    ) -> Self {
        let direction = wrap_angle(direction);
        let length = INIT_LEN;
        let total_dist = length * SEG_SPACING;
        let num_points = ((total_dist / PATH_RES).ceil() as usize + 1).max(2);

        let mut path = VecDeque::with_capacity(PATH_CAPACITY);
        for i in (0..num_points).rev() {
            let d = i as f64 * PATH_RES;
            path.push_back(origin.add(-d * direction.cos(), -d * direction.sin()));
        }
        if let Some(last) = path.back_mut() {
            *last = origin;
        }

        Self {
            worm_id,
            player_id,
            name,
            skin_id,
            color,
            head: origin,
            prev_head: origin,
            direction,
            target_direction: direction,
            speed: BASE_SPEED,
            is_boosting: false,
            spawn_time_ms,
            length,
            path,
            is_alive: true,
            mass_debt: 0.0,
            segments_cache: None,
        }
    }

    pub fn set_target_direction(&mut self, theta: f64) {
        self.target_direction = wrap_angle(theta);
    }

    pub fn set_boosting(&mut self, boosting: bool) {
        self.is_boosting = boosting && self.length > MIN_BOOST_LENGTH;
    }

    pub fn grow(&mut self, delta: f64) {
        self.length = (self.length + delta).min(MAX_LEN);
        self.segments_cache = None;
    }

    pub fn die(&mut self) {
        self.is_alive = false;
    }

    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms - self.spawn_time_ms
    }

    pub fn is_in_grace_period(&self, now_ms: i64) -> bool {
        self.age_ms(now_ms) < SPAWN_GRACE_MS
    }

    /// Advance the worm by one tick. `dt` is the elapsed time in seconds.
    pub fn step(&mut self, dt: f64) {
        self.prev_head = self.head;

        // 1. Boost mass burn (deterministic accumulator) and effective speed.
        if self.is_boosting {
            self.mass_debt += BOOST_BURN_PER_SEC * dt;
            while self.mass_debt >= 1.0 && self.length > 0.0 {
                self.length = (self.length - 1.0).max(0.0);
                self.mass_debt -= 1.0;
            }
            if self.length <= MIN_BOOST_LENGTH {
                self.is_boosting = false;
            }
        }
        let effective_speed = if self.is_boosting {
            self.speed * BOOST_MULT
        } else {
            self.speed
        };

        // 2. Angular update, clamped to the per-tick turn budget.
        let raw_delta = wrap_angle(self.target_direction - self.direction);
        let clamped_delta = raw_delta.clamp(-MAX_TURN_PER_TICK, MAX_TURN_PER_TICK);

        // 3. Substep the travel distance to preserve curve smoothness.
        let total_dist = (effective_speed * dt).max(0.0);
        let n_substeps = ((total_dist / STEP_MAX).ceil() as u32).max(1);
        let per_substep_delta = clamped_delta / n_substeps as f64;
        let per_substep_dist = total_dist / n_substeps as f64;

        for _ in 0..n_substeps {
            self.direction = wrap_angle(self.direction + per_substep_delta);
            let new_head = self
                .head
                .add(self.direction.cos() * per_substep_dist, self.direction.sin() * per_substep_dist);
            self.head = new_head;

            let should_append = match self.path.back() {
                Some(last) => last.distance_to(new_head) > PATH_RES,
                None => true,
            };
            if should_append {
                if self.path.len() >= PATH_CAPACITY {
                    self.path.pop_front();
                }
                self.path.push_back(new_head);
            }
        }

        // 4. Trim the tail so the retained arc length matches `length`.
        self.trim_path();

        // 5. Invalidate the derived segment cache.
        self.segments_cache = None;
    }

    /// Arc length of the retained path, used by invariant checks and tests.
    pub fn path_arc_length(&self) -> f64 {
        let mut total = 0.0;
        let mut iter = self.path.iter();
        if let Some(mut prev) = iter.next().copied() {
            for p in iter {
                total += prev.distance_to(*p);
                prev = *p;
            }
        }
        total
    }

    fn trim_path(&mut self) {
        let max_arc = self.length * SEG_SPACING;
        if self.path.len() < 2 {
            return;
        }

        let points: Vec<Point> = self.path.iter().copied().collect(); // tail..head
        let n = points.len();
        let mut acc = 0.0;
        let mut cut_index = 0usize;
        let mut cut_point: Option<Point> = None;

        for i in (1..n).rev() {
            let seg_len = points[i].distance_to(points[i - 1]);
            if acc + seg_len >= max_arc {
                let remain = (max_arc - acc).max(0.0);
                let t = if seg_len > f64::EPSILON {
                    (remain / seg_len).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let new_tail = Point::new(
                    points[i].x + (points[i - 1].x - points[i].x) * t,
                    points[i].y + (points[i - 1].y - points[i].y) * t,
                );
                cut_index = i - 1;
                cut_point = Some(new_tail);
                break;
            }
            acc += seg_len;
            cut_index = i - 1;
        }

        let mut new_path: VecDeque<Point> = points[cut_index..].iter().copied().collect();
        if let Some(p) = cut_point {
            if let Some(first) = new_path.front_mut() {
                *first = p;
            }
        }
        self.path = new_path;
    }

    /// Cached equidistant samples of the path, recomputed if dirty.
    pub fn segments(&mut self) -> &[Segment] {
        if self.segments_cache.is_none() {
            self.segments_cache = Some(self.compute_segments());
        }
        self.segments_cache.as_ref().unwrap()
    }

    fn compute_segments(&self) -> Vec<Segment> {
        let max_segments = self.length.floor().max(1.0) as usize;
        let mut result = Vec::with_capacity(max_segments.min(self.path.len().max(1)));

        if self.path.is_empty() {
            return result;
        }

        let mut points: Vec<Point> = self.path.iter().rev().copied().collect(); // head..tail
        result.push(Segment {
            point: points[0],
            radius: SEG_RADIUS + 2.0,
        });

        if points.len() == 1 {
            return result;
        }

        let mut acc = 0.0;
        let mut i = 0;
        while result.len() < max_segments && i + 1 < points.len() {
            let seg_len = points[i].distance_to(points[i + 1]);
            if seg_len <= f64::EPSILON {
                i += 1;
                continue;
            }
            if acc + seg_len < SEG_SPACING {
                acc += seg_len;
                i += 1;
                continue;
            }
            let remain = SEG_SPACING - acc;
            let t = (remain / seg_len).clamp(0.0, 1.0);
            let sample = Point::new(
                points[i].x + (points[i + 1].x - points[i].x) * t,
                points[i].y + (points[i + 1].y - points[i].y) * t,
            );
            result.push(Segment {
                point: sample,
                radius: SEG_RADIUS,
            });
            points[i] = sample;
            acc = 0.0;
        }

        result
    }

    pub fn serialize(&self, score: i64, include_full_path: bool) -> SerializedWorm {
        SerializedWorm {
            id: self.worm_id,
            player_id: self.player_id,
            head: self.head,
            direction: self.direction,
            length: self.length,
            color: self.color.clone(),
            skin_id: self.skin_id.clone(),
            is_boosting: self.is_boosting,
            score,
            name: self.name.clone(),
            path: if include_full_path {
                Some(self.path.iter().copied().collect())
            } else {
                None
            },
        }
    }
}

/// Test whether circle `(head, head_radius)` overlaps any of `segments`.
pub fn head_hits_any_segment(head: Point, head_radius: f64, segments: &[Segment]) -> Option<Point> {
    for seg in segments {
        if circles_intersect(head, head_radius, seg.point, seg.radius) {
            return Some(seg.point);
        }
    }
    None
}

/// Squared distance from `point` to the segment connecting a worm's head
/// and the path point just tail-ward of it (used for anti-tunneling food
/// pickup checks).
pub fn dist_sq_to_head_trail(point: Point, head: Point, penultimate: Point) -> f64 {
    dist_sq_point_segment(point, head, penultimate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_worm() -> Worm {
        Worm::new(
            1,
            1,
            "tester".to_string(),
            Point::new(2500.0, 2500.0),
            0.0,
            "#ffffff".to_string(),
            "default".to_string(),
            0,
        )
    }

    #[test]
    fn new_worm_path_ends_at_head() {
        let worm = make_worm();
        assert_eq!(*worm.path.back().unwrap(), worm.head);
        assert!(worm.path_arc_length() <= worm.length * SEG_SPACING + PATH_RES);
    }

    #[test]
    fn straight_movement_matches_spec_scenario_1() {
        let mut worm = make_worm();
        for _ in 0..60 {
            worm.step(1.0 / 60.0);
        }
        assert!((worm.head.x - 2650.0).abs() < 0.5);
        assert!((worm.head.y - 2500.0).abs() < 0.5);
        assert_eq!(worm.length, INIT_LEN);
        assert!(worm.path.len() <= PATH_CAPACITY);
        assert!(worm.path_arc_length() <= INIT_LEN * SEG_SPACING + PATH_RES);
    }

    #[test]
    fn direction_stays_normalized_after_step() {
        let mut worm = make_worm();
        worm.set_target_direction(std::f64::consts::PI);
        for _ in 0..200 {
            worm.step(1.0 / 60.0);
            assert!(worm.direction > -std::f64::consts::PI - 1e-9);
            assert!(worm.direction <= std::f64::consts::PI + 1e-9);
        }
    }

    #[test]
    fn boosting_below_min_length_is_rejected() {
        let mut worm = make_worm();
        worm.length = MIN_BOOST_LENGTH;
        worm.set_boosting(true);
        assert!(!worm.is_boosting);
    }

    #[test]
    fn boost_burns_length_deterministically() {
        let mut worm = make_worm();
        worm.length = 100.0;
        worm.set_boosting(true);
        assert!(worm.is_boosting);
        // 300ms of boost should burn ~1 length unit.
        for _ in 0..18 {
            worm.step(1.0 / 60.0);
        }
        assert!((worm.length - 99.0).abs() < 1.5);
    }

    #[test]
    fn arc_length_invariant_holds_after_growth() {
        let mut worm = make_worm();
        worm.grow(40.0);
        for _ in 0..120 {
            worm.step(1.0 / 60.0);
        }
        assert!(worm.path_arc_length() <= worm.length * SEG_SPACING + PATH_RES);
    }

    #[test]
    fn segments_start_at_head_with_larger_radius() {
        let mut worm = make_worm();
        for _ in 0..30 {
            worm.step(1.0 / 60.0);
        }
        let head = worm.head;
        let segs = worm.segments();
        assert!(!segs.is_empty());
        assert_eq!(segs[0].point, head);
        assert_eq!(segs[0].radius, SEG_RADIUS + 2.0);
        assert!(segs.len() as f64 <= worm.length);
    }

    #[test]
    fn segments_of_short_path_return_head_only() {
        let mut worm = make_worm();
        worm.path.clear();
        worm.path.push_back(worm.head);
        let segs = worm.segments();
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].point, worm.head);
    }
}
