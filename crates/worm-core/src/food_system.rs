//! The Food subsystem's three per-tick phases (spec §4.5), run after
//! Collision has already consumed this tick's eaten pellets: sweep worms
//! killed earlier in the tick into loot and out of the world, pull
//! nearby food toward living heads (magnet), then top up ambient density.

use crate::constants::*;
use crate::geometry::Point;
use crate::world::World;

pub fn resolve(world: &mut World, dt: f64) {
    world.remove_dead_worms();
    apply_magnet(world, dt);
    world.respawn_ambient_food();
}

fn apply_magnet(world: &mut World, dt: f64) {
    let heads: Vec<Point> = world.worms.values().filter(|w| w.is_alive).map(|w| w.head).collect();
    for head in heads {
        let nearby = world.spatial.food_near(head, R_MAGNET);
        for food_id in nearby {
            let new_pos = {
                let Some(food) = world.food.get_mut(&food_id) else {
                    continue;
                };
                let dist = food.position.distance_to(head);
                if dist <= f64::EPSILON || dist > R_MAGNET {
                    continue;
                }
                let t = 1.0 - dist / R_MAGNET;
                let speed = MAGNET_V_MIN + t * (MAGNET_V_MAX - MAGNET_V_MIN);
                let step = (speed * dt).min(dist);
                let dx = (head.x - food.position.x) / dist;
                let dy = (head.y - food.position.y) / dist;
                food.position = food.position.add(dx * step, dy * step);
                food.position
            };
            world.spatial.remove_food(food_id);
            world.spatial.add_food(food_id, new_pos);
        }
    }
}
