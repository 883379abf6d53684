//! The per-tick, per-client push: build either a full snapshot or a
//! minimal delta depending on cache state and the resync cadence, update
//! the client's cache to match, and return the payload for the transport
//! layer to send.

use crate::cache::{CacheStore, CachedFood, CachedWorm};
use crate::interest::{self, InterestWindow};
use crate::payload::{DeltaUpdate, FoodPositionUpdate, FullSnapshot, Payload, WorldSize, WormDelta};
use worm_core::constants::{RESYNC_INTERVAL, TELEPORT_DIST, WORLD_HEIGHT, WORLD_WIDTH};
use worm_core::food::SerializedFood;
use worm_core::world::World;

pub struct Broadcaster {
    cache: CacheStore,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self { cache: CacheStore::new() }
    }

    /// Drop a disconnected player's cached state.
    pub fn on_disconnect(&mut self, player_id: u64) {
        self.cache.remove(player_id);
    }

    pub fn cached_player_count(&self) -> usize {
        self.cache.len()
    }

    /// Build this broadcast's payload for `player_id` and refresh its cache.
    pub fn build(&mut self, world: &World, player_id: u64) -> Payload {
        let is_new = self.cache.is_new(player_id);
        let window = interest::compute(world, player_id);

        let needs_full = is_new || {
            let cache = self.cache.get_or_create(player_id);
            cache.broadcasts_since_resync >= RESYNC_INTERVAL
        };

        if needs_full {
            let snapshot = self.full_snapshot(world, &window);
            let cache = self.cache.get_or_create(player_id);
            refresh_cache_from_snapshot(cache, &snapshot);
            cache.broadcasts_since_resync = 0;
            Payload::GameState(snapshot)
        } else {
            let delta = self.delta(world, player_id, &window);
            Payload::DeltaUpdate(delta)
        }
    }

    fn full_snapshot(&self, world: &World, window: &InterestWindow) -> FullSnapshot {
        let worms = window
            .worm_ids
            .iter()
            .filter_map(|id| world.get_worm(*id))
            .map(|w| {
                let score = world.get_player(w.player_id).map(|p| p.score).unwrap_or(0);
                w.serialize(score, true)
            })
            .collect();
        let food = window
            .food_ids
            .iter()
            .filter_map(|id| world.food.get(id))
            .map(SerializedFood::from)
            .collect();
        FullSnapshot {
            tick: world.current_tick,
            world_size: WorldSize { width: WORLD_WIDTH, height: WORLD_HEIGHT },
            worms,
            food,
            leaderboard: worm_core::leaderboard::compute(world),
        }
    }

    fn delta(&mut self, world: &World, player_id: u64, window: &InterestWindow) -> DeltaUpdate {
        let leaderboard = worm_core::leaderboard::compute(world);
        let cache = self.cache.get_or_create(player_id);
        cache.broadcasts_since_resync += 1;

        let mut delta = DeltaUpdate { tick: world.current_tick, ..Default::default() };

        let visible_worms: std::collections::HashSet<u64> = window.worm_ids.iter().copied().collect();
        for id in &window.worm_ids {
            let Some(worm) = world.get_worm(*id) else { continue };
            let score = world.get_player(worm.player_id).map(|p| p.score).unwrap_or(0);
            match cache.worms.get(id) {
                None => {
                    delta.worms_added.push(worm.serialize(score, true));
                    cache.worms.insert(
                        *id,
                        CachedWorm { head: worm.head, direction: worm.direction, length: worm.length, score, has_path: true },
                    );
                }
                Some(prev) => {
                    let teleported = worm.head.distance_to(prev.head) > TELEPORT_DIST;
                    let send_path = !prev.has_path || teleported;
                    let mut field_changed = false;
                    let mut wd = WormDelta { id: *id, ..Default::default() };

                    if worm.head.distance_to(prev.head) > 1e-9 {
                        wd.head = Some(worm.head);
                        field_changed = true;
                    }
                    if (worm.direction - prev.direction).abs() > 1e-9 {
                        wd.direction = Some(worm.direction);
                        field_changed = true;
                    }
                    if (worm.length - prev.length).abs() > 1e-9 {
                        wd.length = Some(worm.length);
                        field_changed = true;
                    }
                    if score != prev.score {
                        wd.score = Some(score);
                        field_changed = true;
                    }
                    if send_path {
                        wd.path = Some(worm.path.iter().copied().collect());
                        field_changed = true;
                    }

                    if field_changed {
                        delta.worms_updated.push(wd);
                    }
                    cache.worms.insert(
                        *id,
                        CachedWorm { head: worm.head, direction: worm.direction, length: worm.length, score, has_path: true },
                    );
                }
            }
        }
        cache.worms.retain(|id, _| {
            let keep = visible_worms.contains(id);
            if !keep {
                delta.worms_removed.push(*id);
            }
            keep
        });

        let visible_food: std::collections::HashSet<u64> = window.food_ids.iter().copied().collect();
        for id in &window.food_ids {
            let Some(food) = world.food.get(id) else { continue };
            match cache.food.get(id) {
                None => {
                    delta.food_added.push(SerializedFood::from(food));
                    cache.food.insert(*id, CachedFood { position: food.position });
                }
                Some(prev) => {
                    if food.position.distance_to(prev.position) > 0.1 {
                        delta.food_updated.push(FoodPositionUpdate { id: *id, position: food.position });
                        cache.food.insert(*id, CachedFood { position: food.position });
                    }
                }
            }
        }
        cache.food.retain(|id, _| {
            let keep = visible_food.contains(id);
            if !keep {
                delta.food_removed.push(*id);
            }
            keep
        });

        if leaderboard != cache.leaderboard {
            cache.leaderboard = leaderboard.clone();
            delta.leaderboard = Some(leaderboard);
        }

        delta
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

fn refresh_cache_from_snapshot(cache: &mut crate::cache::ClientCache, snapshot: &FullSnapshot) {
    cache.worms.clear();
    for w in &snapshot.worms {
        cache.worms.insert(
            w.id,
            CachedWorm { head: w.head, direction: w.direction, length: w.length, score: w.score, has_path: true },
        );
    }
    cache.food.clear();
    for f in &snapshot.food {
        cache.food.insert(f.id, CachedFood { position: f.position });
    }
    cache.leaderboard = snapshot.leaderboard.clone();
}
