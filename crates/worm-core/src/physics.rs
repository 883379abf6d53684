//! Per-tick kinematic advancement: step every live worm forward and kill
//! any whose head has left the playable disk.

use crate::constants::R_MAP;
use crate::geometry::Point;
use crate::world::World;

/// Advance every live worm by `dt` seconds, then kill worms whose head
/// has crossed the world boundary. Returns the ids killed this phase.
pub fn advance(world: &mut World, dt: f64) -> Vec<u64> {
    let center = Point::new(0.0, 0.0);
    let worm_ids: Vec<u64> = world.worms.keys().copied().collect();

    for id in &worm_ids {
        if let Some(worm) = world.worms.get_mut(id) {
            if worm.is_alive {
                worm.step(dt);
            }
        }
    }

    let mut killed = Vec::new();
    for id in worm_ids {
        if let Some(worm) = world.worms.get(&id) {
            if worm.is_alive && worm.head.distance_to(center) > R_MAP {
                world.kill_worm_to_loot(id);
                killed.push(id);
            }
        }
    }
    killed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::World;

    #[test]
    fn worm_crossing_boundary_dies_and_drops_loot() {
        let mut world = World::new(1);
        let player_id = world.add_player("a".to_string(), 0);
        let worm_id = world.spawn_worm(player_id, "a".to_string(), "#fff".to_string(), "d".to_string(), 0);
        {
            let worm = world.get_worm_mut(worm_id).unwrap();
            worm.head = Point::new(R_MAP + 1.0, 0.0);
        }
        let killed = advance(&mut world, 1.0 / 60.0);
        assert_eq!(killed, vec![worm_id]);
        assert!(!world.get_worm(worm_id).unwrap().is_alive);
        assert!(world.food.values().any(|f| f.is_loot));
    }

    #[test]
    fn worm_within_bounds_stays_alive() {
        let mut world = World::new(1);
        let player_id = world.add_player("a".to_string(), 0);
        let worm_id = world.spawn_worm(player_id, "a".to_string(), "#fff".to_string(), "d".to_string(), 0);
        let killed = advance(&mut world, 1.0 / 60.0);
        assert!(killed.is_empty());
        assert!(world.get_worm(worm_id).unwrap().is_alive);
    }
}
