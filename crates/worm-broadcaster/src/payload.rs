//! Wire payload shapes pushed to a single client each broadcast: either a
//! complete [`FullSnapshot`] (join, periodic resync) or a minimal
//! [`DeltaUpdate`] against that client's last-sent state.

use serde::{Deserialize, Serialize};
use worm_core::food::SerializedFood;
use worm_core::geometry::Point;
use worm_core::leaderboard::LeaderboardEntry;
use worm_core::worm::SerializedWorm;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FullSnapshot {
    pub tick: u64,
    pub world_size: WorldSize,
    pub worms: Vec<SerializedWorm>,
    pub food: Vec<SerializedFood>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// The subset of a worm's fields that changed since the client's cached
/// copy. Every field but `id` is optional; only changed fields are set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WormDelta {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    /// Present only when the client has no prior path for this worm or the
    /// head teleported more than `TELEPORT_DIST` this interval; otherwise
    /// the client reconstructs the trail locally from `head`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Point>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodPositionUpdate {
    pub id: u64,
    pub position: Point,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DeltaUpdate {
    pub tick: u64,
    pub worms_added: Vec<SerializedWorm>,
    pub worms_updated: Vec<WormDelta>,
    pub worms_removed: Vec<u64>,
    pub food_added: Vec<SerializedFood>,
    pub food_updated: Vec<FoodPositionUpdate>,
    pub food_removed: Vec<u64>,
    /// `None` when the leaderboard is unchanged from the client's cache.
    pub leaderboard: Option<Vec<LeaderboardEntry>>,
}

/// What the broadcaster sends a given client this broadcast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum Payload {
    GameState(FullSnapshot),
    DeltaUpdate(DeltaUpdate),
}
