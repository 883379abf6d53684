//! The Collision subsystem (spec §4.4): worm-worm resolution (a live
//! worm's head striking another worm's, or optionally its own, body kills
//! it) followed by worm-food consumption (direct-hit and swept
//! anti-tunneling pickup). Both run after the Physics phase so every
//! worm's head and path reflect this tick's movement, and worm-worm
//! always runs before worm-food, per the component's internal ordering.

use crate::constants::*;
use crate::geometry::dist_sq_point_segment;
use crate::world::World;
use std::collections::HashSet;

/// Segments nearest a worm's own head that are exempt from self-collision,
/// so a worm doesn't clip itself on the neck it just grew through.
const SELF_COLLISION_SKIP_SEGMENTS: usize = 3;

/// Resolve worm-worm collisions for this tick. Returns `(victim, killer)`
/// pairs; `killer` is `None` for a self-collision death. Worms still in
/// their spawn grace period cannot die. Worms are iterated in spawn
/// order, not `HashMap` order, so mutual-kill tie-breaking is
/// deterministic tick over tick.
pub fn resolve(world: &mut World, self_collision: bool, now_ms: i64) -> Vec<(u64, Option<u64>)> {
    world.spatial.rebuild_worms(&mut world.worms);

    let candidate_ids: Vec<u64> = world
        .worm_ids_in_order()
        .iter()
        .copied()
        .filter(|id| world.worms.get(id).is_some_and(|w| w.is_alive))
        .collect();

    let mut deaths: Vec<(u64, Option<u64>)> = Vec::new();
    let mut already_dead: HashSet<u64> = HashSet::new();
    let head_radius = SEG_RADIUS + 2.0;

    for id in candidate_ids {
        if already_dead.contains(&id) {
            continue;
        }
        let (head, in_grace) = match world.worms.get(&id) {
            Some(w) if w.is_alive => (w.head, w.is_in_grace_period(now_ms)),
            _ => continue,
        };
        if in_grace {
            continue;
        }

        let others = world.spatial.worms_near(head, head_radius + SEG_RADIUS);
        let mut hit_by: Option<u64> = None;

        for other_id in others {
            if other_id == id && !self_collision {
                continue;
            }
            if already_dead.contains(&other_id) {
                continue;
            }
            let Some(other) = world.worms.get_mut(&other_id) else {
                continue;
            };
            if !other.is_alive {
                continue;
            }
            let segs = other.segments();
            let start = if other_id == id {
                SELF_COLLISION_SKIP_SEGMENTS.min(segs.len())
            } else {
                0
            };
            if crate::worm::head_hits_any_segment(head, head_radius, &segs[start..]).is_some() {
                hit_by = Some(other_id);
                break;
            }
        }

        if let Some(killer) = hit_by {
            deaths.push((id, if killer == id { None } else { Some(killer) }));
            already_dead.insert(id);
        }
    }

    for (victim, killer) in &deaths {
        world.kill_worm_to_loot(*victim);
        if let Some(killer_id) = killer {
            if let Some(killer_worm) = world.worms.get(killer_id) {
                let player_id = killer_worm.player_id;
                if let Some(player) = world.players.get_mut(&player_id) {
                    player.award(POINTS_PER_KILL);
                }
            }
        }
    }

    deaths
}

/// Worm-food consumption (spec §4.4's third collision check): for each
/// living worm's head, direct-hit or swept pickup of nearby pellets. The
/// swept check uses the worm's pre-tick head (`prev_head`) as the far
/// endpoint rather than a path index, so a worm that travels its entire
/// tick's distance (high `dt`, or boosting) in one step can't tunnel
/// through a pellet between ticks. Consumed pellets are removed from the
/// spatial index immediately so the same pellet can't be eaten twice by
/// two worms whose heads both reach it this tick, and growth/scoring are
/// applied before the Food subsystem runs.
pub fn resolve_food(world: &mut World) {
    let worm_ids: Vec<u64> = world
        .worm_ids_in_order()
        .iter()
        .copied()
        .filter(|id| world.worms.get(id).is_some_and(|w| w.is_alive))
        .collect();
    let head_radius = SEG_RADIUS + 2.0;

    for id in worm_ids {
        let (head, prev_head, player_id) = {
            let Some(w) = world.worms.get(&id) else {
                continue;
            };
            (w.head, w.prev_head, w.player_id)
        };

        let travel = head.distance_to(prev_head);
        let search_radius = head_radius + FOOD_MAX_RADIUS + travel;
        let nearby = world.spatial.food_near(head, search_radius);
        let mut eaten = Vec::new();
        let mut growth = 0.0;
        let mut points = 0i64;

        for food_id in nearby {
            let Some(food) = world.food.get(&food_id) else {
                continue;
            };
            let r = head_radius + food.radius;
            if dist_sq_point_segment(food.position, head, prev_head) <= r * r {
                growth += food.value as f64;
                points += food.value * POINTS_PER_FOOD;
                eaten.push(food_id);
            }
        }

        if eaten.is_empty() {
            continue;
        }
        for food_id in eaten {
            world.remove_food(food_id);
        }
        if let Some(w) = world.worms.get_mut(&id) {
            w.grow(growth);
        }
        if let Some(p) = world.players.get_mut(&player_id) {
            p.award(points);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::world::World;

    #[test]
    fn head_into_another_body_kills_the_head_owner() {
        let mut world = World::new(1);
        let p1 = world.add_player("a".to_string(), -10_000);
        let p2 = world.add_player("b".to_string(), -10_000);
        let w1 = world.spawn_worm(p1, "a".to_string(), "#fff".to_string(), "d".to_string(), -10_000);
        let w2 = world.spawn_worm(p2, "b".to_string(), "#fff".to_string(), "d".to_string(), -10_000);

        {
            let other = world.get_worm_mut(w2).unwrap();
            other.path.clear();
            other.path.push_back(Point::new(0.0, 0.0));
            other.path.push_back(Point::new(20.0, 0.0));
            other.head = Point::new(20.0, 0.0);
        }
        {
            let victim = world.get_worm_mut(w1).unwrap();
            victim.head = Point::new(5.0, 0.0);
        }

        let deaths = resolve(&mut world, false, 0);
        assert_eq!(deaths, vec![(w1, Some(w2))]);
        assert!(!world.get_worm(w1).unwrap().is_alive);
        assert_eq!(world.get_player(p2).unwrap().score, POINTS_PER_KILL);
    }

    #[test]
    fn worms_in_grace_period_cannot_die() {
        let mut world = World::new(1);
        let p1 = world.add_player("a".to_string(), 0);
        let p2 = world.add_player("b".to_string(), 0);
        let w1 = world.spawn_worm(p1, "a".to_string(), "#fff".to_string(), "d".to_string(), 0);
        let w2 = world.spawn_worm(p2, "b".to_string(), "#fff".to_string(), "d".to_string(), 0);

        {
            let other = world.get_worm_mut(w2).unwrap();
            other.path.clear();
            other.path.push_back(Point::new(0.0, 0.0));
            other.path.push_back(Point::new(20.0, 0.0));
            other.head = Point::new(20.0, 0.0);
        }
        {
            let victim = world.get_worm_mut(w1).unwrap();
            victim.head = Point::new(5.0, 0.0);
        }

        let deaths = resolve(&mut world, false, 100);
        assert!(deaths.is_empty());
        assert!(world.get_worm(w1).unwrap().is_alive);
    }

    #[test]
    fn disjoint_worms_do_not_collide() {
        let mut world = World::new(1);
        let p1 = world.add_player("a".to_string(), -10_000);
        let w1 = world.spawn_worm(p1, "a".to_string(), "#fff".to_string(), "d".to_string(), -10_000);
        let deaths = resolve(&mut world, false, 0);
        assert!(deaths.is_empty());
        assert!(world.get_worm(w1).unwrap().is_alive);
    }

    #[test]
    fn worms_are_resolved_in_spawn_order_not_hash_order() {
        let mut world = World::new(1);
        let p1 = world.add_player("a".to_string(), -10_000);
        let w1 = world.spawn_worm(p1, "a".to_string(), "#fff".to_string(), "d".to_string(), -10_000);
        let p2 = world.add_player("b".to_string(), -10_000);
        let w2 = world.spawn_worm(p2, "b".to_string(), "#fff".to_string(), "d".to_string(), -10_000);
        assert_eq!(world.worm_ids_in_order(), &[w1, w2]);
    }

    #[test]
    fn eating_food_grows_the_worm_and_awards_points() {
        let mut world = World::new(1);
        let player_id = world.add_player("a".to_string(), 0);
        let worm_id = world.spawn_worm(player_id, "a".to_string(), "#fff".to_string(), "d".to_string(), 0);
        let head = world.get_worm(worm_id).unwrap().head;
        let food_id = {
            let mut f = crate::food::Food::new_ambient(0, head, FOOD_MIN_RADIUS, "#fff".to_string());
            f.food_id = 999;
            world.spatial.add_food(999, head);
            world.food.insert(999, f);
            999
        };
        let before_length = world.get_worm(worm_id).unwrap().length;
        resolve_food(&mut world);
        assert!(world.food.get(&food_id).is_none());
        assert!(world.get_worm(worm_id).unwrap().length > before_length);
        assert_eq!(world.get_player(player_id).unwrap().score, POINTS_PER_FOOD);
    }

    #[test]
    fn a_single_high_dt_tick_cannot_tunnel_through_a_pellet() {
        // Spec §8 scenario 3: head travels (2500,2500) -> (2560,2500) in one
        // tick; a pellet sitting between the start and end of that travel
        // must still be eaten even though the head is never sampled there.
        let mut world = World::new(1);
        let player_id = world.add_player("a".to_string(), 0);
        let worm_id = world.spawn_worm(player_id, "a".to_string(), "#fff".to_string(), "d".to_string(), 0);
        {
            let w = world.get_worm_mut(worm_id).unwrap();
            w.prev_head = Point::new(2500.0, 2500.0);
            w.head = Point::new(2560.0, 2500.0);
        }
        let food_pos = Point::new(2530.0, 2502.0);
        let food_id = {
            let mut f = crate::food::Food::new_ambient(0, food_pos, 5.0, "#fff".to_string());
            f.food_id = 42;
            world.spatial.add_food(42, food_pos);
            world.food.insert(42, f.clone());
            f.food_id
        };
        resolve_food(&mut world);
        assert!(world.food.get(&food_id).is_none(), "pellet between prev_head and head must be swept up");
    }

    #[test]
    fn worm_food_resolves_before_magnet_can_pull_a_pellet_into_range() {
        // The collision subsystem (this module) must consume food before
        // food_system::resolve runs its magnet phase in the same tick.
        let mut world = World::new(1);
        let player_id = world.add_player("a".to_string(), 0);
        let worm_id = world.spawn_worm(player_id, "a".to_string(), "#fff".to_string(), "d".to_string(), 0);
        let head = world.get_worm(worm_id).unwrap().head;
        let far_point = head.add(R_MAGNET - 1.0, 0.0);
        world.food.insert(7, crate::food::Food::new_ambient(7, far_point, FOOD_MIN_RADIUS, "#fff".to_string()));
        world.spatial.add_food(7, far_point);

        resolve_food(&mut world);
        assert!(world.food.get(&7).is_some(), "pellet outside grab range must survive the collision phase untouched");
        assert_eq!(world.food.get(&7).unwrap().position, far_point);
    }
}
