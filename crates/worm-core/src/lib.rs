pub mod collision;
pub mod constants;
pub mod error;
pub mod food;
pub mod food_system;
pub mod geometry;
pub mod input;
pub mod leaderboard;
pub mod physics;
pub mod player;
pub mod rng;
pub mod room;
pub mod room_manager;
pub mod spatial;
pub mod tick;
pub mod world;
pub mod worm;

pub use constants::*;
pub use room::{Room, RoomConfig, RoomEvent, RoomMessage};
pub use room_manager::RoomManager;
pub use world::World;
pub use worm::Worm;
