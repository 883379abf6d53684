//! The simulation's state container: every worm, food pellet and player
//! in a room, addressed only by id. Mirrors the teacher's `World` (which
//! held bugs in a `HashMap<u64, Bug>` keyed by id rather than direct
//! references) so that dying worms, eaten food and disconnecting players
//! can be removed without chasing borrows.

use crate::constants::*;
use crate::food::{self, Food};
use crate::geometry::Point;
use crate::player::Player;
use crate::rng::DeterministicRng;
use crate::spatial::SpatialIndex;
use crate::worm::Worm;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorldStats {
    pub worm_count: usize,
    pub food_count: usize,
    pub player_count: usize,
    pub tick: u64,
}

pub struct World {
    pub worms: HashMap<u64, Worm>,
    pub food: HashMap<u64, Food>,
    pub players: HashMap<u64, Player>,
    pub spatial: SpatialIndex,
    pub rng: DeterministicRng,
    pub current_tick: u64,

    /// Worm ids in spawn order. `HashMap` iteration order is incidental;
    /// Collision (spec §4.4) requires a deterministic per-tick worm
    /// ordering, so every phase that must be order-stable walks this
    /// instead of `worms.keys()`.
    worm_order: Vec<u64>,

    next_worm_id: u64,
    next_food_id: u64,
    next_player_id: u64,
}

impl World {
    pub fn new(seed: u64) -> Self {
        Self {
            worms: HashMap::new(),
            food: HashMap::new(),
            players: HashMap::new(),
            spatial: SpatialIndex::new(CELL_SIZE),
            rng: DeterministicRng::new(seed),
            current_tick: 0,
            worm_order: Vec::new(),
            next_worm_id: 1,
            next_food_id: 1,
            next_player_id: 1,
        }
    }

    /// Living and dead worm ids in spawn order, for phases that must
    /// iterate worms deterministically within a tick.
    pub fn worm_ids_in_order(&self) -> &[u64] {
        &self.worm_order
    }

    pub fn add_player(&mut self, name: String, now_ms: i64) -> u64 {
        let id = self.next_player_id;
        self.next_player_id += 1;
        self.players.insert(id, Player::new(id, name, now_ms));
        id
    }

    pub fn remove_player(&mut self, player_id: u64) {
        if let Some(player) = self.players.remove(&player_id) {
            if let Some(worm_id) = player.worm_id {
                self.remove_worm(worm_id);
            }
        }
    }

    pub fn get_player(&self, player_id: u64) -> Option<&Player> {
        self.players.get(&player_id)
    }

    pub fn get_player_mut(&mut self, player_id: u64) -> Option<&mut Player> {
        self.players.get_mut(&player_id)
    }

    /// Spawn a fresh worm for `player_id` at a random point within the
    /// playable disk, facing a random direction.
    pub fn spawn_worm(
        &mut self,
        player_id: u64,
        name: String,
        color: String,
        skin_id: String,
        now_ms: i64,
    ) -> u64 {
        let origin = self.rng.gen_disk_point(Point::new(0.0, 0.0), R_MAP * 0.8);
        let direction = self.rng.gen_f64_range(-std::f64::consts::PI, std::f64::consts::PI);

        let id = self.next_worm_id;
        self.next_worm_id += 1;
        let worm = Worm::new(id, player_id, name, origin, direction, color, skin_id, now_ms);
        self.worms.insert(id, worm);
        self.worm_order.push(id);

        if let Some(player) = self.players.get_mut(&player_id) {
            player.assign_worm(id);
        }
        id
    }

    pub fn get_worm(&self, worm_id: u64) -> Option<&Worm> {
        self.worms.get(&worm_id)
    }

    pub fn get_worm_mut(&mut self, worm_id: u64) -> Option<&mut Worm> {
        self.worms.get_mut(&worm_id)
    }

    pub fn remove_worm(&mut self, worm_id: u64) -> Option<Worm> {
        let worm = self.worms.remove(&worm_id);
        if let Some(w) = &worm {
            self.worm_order.retain(|id| *id != worm_id);
            if let Some(player) = self.players.get_mut(&w.player_id) {
                if player.worm_id == Some(worm_id) {
                    player.enter_spectator();
                }
            }
        }
        worm
    }

    /// Kill a worm and scatter its body as loot food, returning the ids
    /// of the pellets created.
    pub fn kill_worm_to_loot(&mut self, worm_id: u64) -> Vec<u64> {
        let Some(worm) = self.worms.get(&worm_id) else {
            return Vec::new();
        };
        let path: Vec<Point> = worm.path.iter().copied().collect();
        let length = worm.length;
        let positions = food::loot_positions_from_path(&path, length, &mut self.rng);

        let mut ids = Vec::with_capacity(positions.len());
        for p in positions {
            let radius = self.rng.gen_f64_range(FOOD_MIN_RADIUS + 2.0, FOOD_MAX_RADIUS + 4.0);
            let color = food::random_color(&mut self.rng);
            let id = self.insert_food(Food::new_loot(0, p, radius, color));
            ids.push(id);
        }

        if let Some(w) = self.worms.get_mut(&worm_id) {
            w.die();
        }
        ids
    }

    /// Remove every worm marked dead (by the Physics boundary check or by
    /// Collision) from the world. Loot is scattered at the moment of death
    /// in [`World::kill_worm_to_loot`]; this sweep — run once per tick by
    /// the Food subsystem — is what actually frees the entity and demotes
    /// its player to spectator, per the "destroyed after death, once the
    /// Food subsystem has converted it to loot" lifecycle rule.
    pub fn remove_dead_worms(&mut self) -> Vec<u64> {
        let dead: Vec<u64> = self.worms.iter().filter(|(_, w)| !w.is_alive).map(|(id, _)| *id).collect();
        for id in &dead {
            self.remove_worm(*id);
        }
        dead
    }

    fn insert_food(&mut self, mut food: Food) -> u64 {
        let id = self.next_food_id;
        self.next_food_id += 1;
        food.food_id = id;
        self.spatial.add_food(id, food.position);
        self.food.insert(id, food);
        id
    }

    pub fn remove_food(&mut self, food_id: u64) -> Option<Food> {
        let food = self.food.remove(&food_id);
        if food.is_some() {
            self.spatial.remove_food(food_id);
        }
        food
    }

    /// Top up ambient food toward `FOOD_TARGET`, spawning at most
    /// `RESPAWN_PER_TICK` pellets this call. Spawn points are rejected and
    /// retried if they land within `FOOD_SPAWN_SAFE_RADIUS` of a live
    /// worm's head, up to `FOOD_SPAWN_MAX_ATTEMPTS` tries each.
    pub fn respawn_ambient_food(&mut self) -> usize {
        let deficit = FOOD_TARGET.saturating_sub(self.food.len());
        let to_spawn = deficit.min(RESPAWN_PER_TICK);
        let playfield_center = Point::new(0.0, 0.0);
        let spawn_radius = R_MAP - FOOD_SPAWN_MARGIN;

        let mut spawned = 0;
        for _ in 0..to_spawn {
            let mut candidate = None;
            for _ in 0..FOOD_SPAWN_MAX_ATTEMPTS {
                let p = self.rng.gen_disk_point(playfield_center, spawn_radius);
                if self.is_spawn_point_safe(p) {
                    candidate = Some(p);
                    break;
                }
            }
            let p = candidate.unwrap_or_else(|| self.rng.gen_disk_point(playfield_center, spawn_radius));
            let radius = self.rng.gen_f64_range(FOOD_MIN_RADIUS, FOOD_MAX_RADIUS);
            let color = food::random_color(&mut self.rng);
            self.insert_food(Food::new_ambient(0, p, radius, color));
            spawned += 1;
        }
        spawned
    }

    fn is_spawn_point_safe(&self, p: Point) -> bool {
        !self
            .worms
            .values()
            .filter(|w| w.is_alive)
            .any(|w| w.head.distance_to(p) < FOOD_SPAWN_SAFE_RADIUS)
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            worm_count: self.worms.len(),
            food_count: self.food.len(),
            player_count: self.players.len(),
            tick: self.current_tick,
        }
    }
}
