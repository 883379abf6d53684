//! Uniform cell-hash grid used to avoid O(n^2) collision and visibility
//! queries. Worms are re-bucketed every tick (cheap since every worm moves
//! every tick anyway); food is maintained incrementally since most
//! pellets sit untouched for many ticks.

use crate::geometry::Point;
use crate::worm::Worm;
use std::collections::{HashMap, HashSet};

pub type CellKey = (i32, i32);

#[derive(Debug)]
pub struct SpatialIndex {
    cell_size: f64,
    worm_cells: HashMap<CellKey, Vec<u64>>,
    food_cells: HashMap<CellKey, Vec<u64>>,
    food_positions: HashMap<u64, CellKey>,
}

impl SpatialIndex {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            worm_cells: HashMap::new(),
            food_cells: HashMap::new(),
            food_positions: HashMap::new(),
        }
    }

    fn cell_of(&self, p: Point) -> CellKey {
        (
            (p.x / self.cell_size).floor() as i32,
            (p.y / self.cell_size).floor() as i32,
        )
    }

    /// Rebuild the worm bucket from scratch. Every worm's segment set
    /// changes every tick, so incremental maintenance would cost as much
    /// as a rebuild while adding bookkeeping complexity.
    pub fn rebuild_worms(&mut self, worms: &mut HashMap<u64, Worm>) {
        self.worm_cells.clear();
        for (id, worm) in worms.iter_mut() {
            if !worm.is_alive {
                continue;
            }
            let mut seen: HashSet<CellKey> = HashSet::new();
            for seg in worm.segments() {
                let key = self.cell_of(seg.point);
                if seen.insert(key) {
                    self.worm_cells.entry(key).or_default().push(*id);
                }
            }
        }
    }

    pub fn add_food(&mut self, food_id: u64, position: Point) {
        let key = self.cell_of(position);
        self.food_cells.entry(key).or_default().push(food_id);
        self.food_positions.insert(food_id, key);
    }

    pub fn remove_food(&mut self, food_id: u64) {
        if let Some(key) = self.food_positions.remove(&food_id) {
            if let Some(bucket) = self.food_cells.get_mut(&key) {
                bucket.retain(|id| *id != food_id);
                if bucket.is_empty() {
                    self.food_cells.remove(&key);
                }
            }
        }
    }

    pub fn clear_food(&mut self) {
        self.food_cells.clear();
        self.food_positions.clear();
    }

    fn cells_in_radius(&self, center: Point, radius: f64) -> Vec<CellKey> {
        let (cx, cy) = self.cell_of(center);
        let span = (radius / self.cell_size).ceil() as i32 + 1;
        let mut keys = Vec::with_capacity(((2 * span + 1) * (2 * span + 1)) as usize);
        for dx in -span..=span {
            for dy in -span..=span {
                keys.push((cx + dx, cy + dy));
            }
        }
        keys
    }

    /// Worm ids with at least one segment in a cell overlapping `radius`
    /// of `center`. Callers still need an exact-distance check since this
    /// is a coarse broad phase.
    pub fn worms_near(&self, center: Point, radius: f64) -> Vec<u64> {
        let mut ids = HashSet::new();
        for key in self.cells_in_radius(center, radius) {
            if let Some(bucket) = self.worm_cells.get(&key) {
                ids.extend(bucket.iter().copied());
            }
        }
        ids.into_iter().collect()
    }

    pub fn food_near(&self, center: Point, radius: f64) -> Vec<u64> {
        let mut ids = HashSet::new();
        for key in self.cells_in_radius(center, radius) {
            if let Some(bucket) = self.food_cells.get(&key) {
                ids.extend(bucket.iter().copied());
            }
        }
        ids.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn food_near_finds_added_pellet() {
        let mut index = SpatialIndex::new(500.0);
        index.add_food(1, Point::new(100.0, 100.0));
        let found = index.food_near(Point::new(110.0, 90.0), 50.0);
        assert_eq!(found, vec![1]);
    }

    #[test]
    fn removed_food_is_no_longer_found() {
        let mut index = SpatialIndex::new(500.0);
        index.add_food(1, Point::new(100.0, 100.0));
        index.remove_food(1);
        assert!(index.food_near(Point::new(100.0, 100.0), 50.0).is_empty());
    }

    #[test]
    fn far_food_is_not_returned() {
        let mut index = SpatialIndex::new(500.0);
        index.add_food(1, Point::new(100.0, 100.0));
        assert!(index.food_near(Point::new(4000.0, 4000.0), 50.0).is_empty());
    }

    #[test]
    fn rebuild_worms_indexes_segment_cells() {
        use crate::worm::Worm;
        let mut worms = HashMap::new();
        worms.insert(
            1,
            Worm::new(
                1,
                1,
                "a".to_string(),
                Point::new(250.0, 250.0),
                0.0,
                "#fff".to_string(),
                "default".to_string(),
                0,
            ),
        );
        let mut index = SpatialIndex::new(500.0);
        index.rebuild_worms(&mut worms);
        let nearby = index.worms_near(Point::new(250.0, 250.0), 10.0);
        assert_eq!(nearby, vec![1]);
    }
}
