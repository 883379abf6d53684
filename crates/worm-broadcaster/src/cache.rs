//! Per-client cached state: the last payload each player's client is known
//! to have. Deltas are computed against this; it's refreshed on every full
//! snapshot and incrementally on every delta. Bounded LRU at `MAX_CACHED`
//! so a broadcaster serving a churn of short-lived connections doesn't
//! grow unbounded.

use std::collections::{HashMap, VecDeque};
use worm_core::constants::MAX_CACHED;
use worm_core::geometry::Point;
use worm_core::leaderboard::LeaderboardEntry;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedWorm {
    pub head: Point,
    pub direction: f64,
    pub length: f64,
    pub score: i64,
    pub has_path: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedFood {
    pub position: Point,
}

#[derive(Debug, Clone, Default)]
pub struct ClientCache {
    pub worms: HashMap<u64, CachedWorm>,
    pub food: HashMap<u64, CachedFood>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub broadcasts_since_resync: u32,
}

/// An LRU-bounded map of per-player caches.
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: HashMap<u64, ClientCache>,
    /// Least-recently-used at the front, most-recently-used at the back.
    order: VecDeque<u64>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a player's cache, creating an empty one (forcing a full
    /// snapshot on first use, since `broadcasts_since_resync` starts such
    /// that the caller always treats a brand-new cache as stale) if absent.
    pub fn get_or_create(&mut self, player_id: u64) -> &mut ClientCache {
        if !self.entries.contains_key(&player_id) {
            self.entries.insert(player_id, ClientCache::default());
            self.order.push_back(player_id);
            self.evict_if_over_capacity();
        } else {
            self.touch(player_id);
        }
        self.entries.get_mut(&player_id).unwrap()
    }

    pub fn is_new(&self, player_id: u64) -> bool {
        !self.entries.contains_key(&player_id)
    }

    pub fn remove(&mut self, player_id: u64) {
        self.entries.remove(&player_id);
        self.order.retain(|id| *id != player_id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn touch(&mut self, player_id: u64) {
        self.order.retain(|id| *id != player_id);
        self.order.push_back(player_id);
    }

    fn evict_if_over_capacity(&mut self) {
        while self.entries.len() > MAX_CACHED {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            } else {
                break;
            }
        }
    }
}
