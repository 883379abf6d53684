//! Leaderboard: top `LEADERBOARD_SIZE` players by score, recomputed from
//! scratch each broadcast tick since player counts per room stay small.

use crate::constants::LEADERBOARD_SIZE;
use crate::world::World;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntry {
    pub player_id: u64,
    pub name: String,
    pub score: i64,
}

pub fn compute(world: &World) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = world
        .players
        .values()
        .map(|p| LeaderboardEntry {
            player_id: p.player_id,
            name: p.name.clone(),
            score: p.score,
        })
        .collect();

    entries.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.player_id.cmp(&b.player_id)));
    entries.truncate(LEADERBOARD_SIZE);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaderboard_sorts_by_score_descending() {
        let mut world = World::new(1);
        let p1 = world.add_player("a".to_string(), 0);
        let p2 = world.add_player("b".to_string(), 0);
        world.get_player_mut(p1).unwrap().award(10);
        world.get_player_mut(p2).unwrap().award(50);

        let board = compute(&world);
        assert_eq!(board[0].player_id, p2);
        assert_eq!(board[1].player_id, p1);
    }

    #[test]
    fn leaderboard_caps_at_configured_size() {
        let mut world = World::new(1);
        for i in 0..(LEADERBOARD_SIZE + 5) {
            let id = world.add_player(format!("p{i}"), 0);
            world.get_player_mut(id).unwrap().award(i as i64);
        }
        assert_eq!(compute(&world).len(), LEADERBOARD_SIZE);
    }

    #[test]
    fn ties_break_by_player_id() {
        let mut world = World::new(1);
        let p1 = world.add_player("a".to_string(), 0);
        let p2 = world.add_player("b".to_string(), 0);
        let board = compute(&world);
        assert_eq!(board[0].player_id, p1.min(p2));
    }
}
