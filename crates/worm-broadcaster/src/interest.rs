//! Interest management: which worms and food a given client's broadcast
//! should include. A live player only needs what's near their own worm's
//! head; a dead player is dropped into spectator mode and sees everyone
//! alive plus a capped sample of food.

use worm_core::constants::{MAX_SPECTATOR_FOOD, R_BUF, R_VIEW};
use worm_core::world::World;

pub struct InterestWindow {
    pub worm_ids: Vec<u64>,
    pub food_ids: Vec<u64>,
}

/// Compute the visible entity ids for `player_id`'s next broadcast.
pub fn compute(world: &World, player_id: u64) -> InterestWindow {
    let player = world.get_player(player_id);
    let alive_worm = player
        .and_then(|p| p.worm_id)
        .and_then(|id| world.get_worm(id))
        .filter(|w| w.is_alive);

    match alive_worm {
        Some(worm) => {
            let radius = R_VIEW + R_BUF;
            let worm_ids = world.spatial.worms_near(worm.head, radius);
            let food_ids = world.spatial.food_near(worm.head, radius);
            InterestWindow { worm_ids, food_ids }
        }
        None => {
            let worm_ids = world
                .worms
                .iter()
                .filter(|(_, w)| w.is_alive)
                .map(|(id, _)| *id)
                .collect();
            let mut food_ids: Vec<u64> = world.food.keys().copied().collect();
            food_ids.sort_unstable();
            food_ids.truncate(MAX_SPECTATOR_FOOD);
            InterestWindow { worm_ids, food_ids }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alive_player_sees_their_own_worm() {
        let mut world = World::new(1);
        let player_id = world.add_player("a".to_string(), 0);
        let worm_id = world.spawn_worm(player_id, "a".to_string(), "#fff".to_string(), "d".to_string(), 0);
        let window = compute(&world, player_id);
        assert!(window.worm_ids.contains(&worm_id));
    }

    #[test]
    fn dead_player_sees_all_living_worms_and_capped_food() {
        let mut world = World::new(1);
        let player_id = world.add_player("a".to_string(), 0);
        let worm_id = world.spawn_worm(player_id, "a".to_string(), "#fff".to_string(), "d".to_string(), 0);
        world.remove_worm(worm_id);
        let other_player = world.add_player("b".to_string(), 0);
        let other_worm = world.spawn_worm(other_player, "b".to_string(), "#fff".to_string(), "d".to_string(), 0);

        let window = compute(&world, player_id);
        assert!(window.worm_ids.contains(&other_worm));
        assert!(window.food_ids.len() <= MAX_SPECTATOR_FOOD);
    }
}
