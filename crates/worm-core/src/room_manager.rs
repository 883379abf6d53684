//! Owns the set of live rooms. Each room runs on its own OS thread;
//! the manager only holds the `mpsc::Sender` half of its channel, so
//! routing a message to a room never touches that room's state directly.

use crate::room::{Room, RoomConfig, RoomEvent, RoomMessage};
use crate::world::World;
use std::collections::HashMap;
use std::sync::mpsc::{self, Sender};
use std::thread;

pub struct RoomManager {
    rooms: HashMap<u64, Sender<RoomMessage>>,
    next_room_id: u64,
    default_room_id: Option<u64>,
}

impl RoomManager {
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
            next_room_id: 1,
            default_room_id: None,
        }
    }

    /// Spawn a new room on its own thread. `on_broadcast` is called once
    /// per broadcast interval with the room's world; `on_event` is called
    /// once per lifecycle event (join/leave/death); `now_ms` supplies
    /// the wall-clock time for that room's tick loop.
    pub fn create_room(
        &mut self,
        config: RoomConfig,
        on_broadcast: impl FnMut(&mut World) + Send + 'static,
        on_event: impl FnMut(RoomEvent) + Send + 'static,
        now_ms: impl FnMut() -> i64 + Send + 'static,
    ) -> u64 {
        let room_id = self.next_room_id;
        self.next_room_id += 1;

        let (tx, rx) = mpsc::channel();
        let room = Room::new(room_id, config, rx);
        thread::Builder::new()
            .name(format!("room-{room_id}"))
            .spawn(move || room.run(on_broadcast, on_event, now_ms))
            .expect("failed to spawn room thread");

        self.rooms.insert(room_id, tx);
        if self.default_room_id.is_none() {
            self.default_room_id = Some(room_id);
        }
        room_id
    }

    pub fn sender(&self, room_id: u64) -> Option<&Sender<RoomMessage>> {
        self.rooms.get(&room_id)
    }

    pub fn default_room(&self) -> Option<u64> {
        self.default_room_id
    }

    /// The channel a joining player without a preference should use.
    pub fn assign_player(&self, room_id: Option<u64>) -> Option<&Sender<RoomMessage>> {
        let id = room_id.or(self.default_room_id)?;
        self.rooms.get(&id)
    }

    /// Remove a room. Forbidden for the default room, which always
    /// exists for the lifetime of the manager; returns `false` and
    /// leaves the room untouched if `room_id` is the default.
    pub fn destroy_room(&mut self, room_id: u64) -> bool {
        if self.default_room_id == Some(room_id) {
            return false;
        }
        self.rooms.remove(&room_id).is_some()
    }

    pub fn list_rooms(&self) -> Vec<u64> {
        self.rooms.keys().copied().collect()
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_created_room_becomes_default() {
        let mut manager = RoomManager::new();
        let room_id = manager.create_room(RoomConfig::default(), |_| {}, |_| {}, || 0);
        assert_eq!(manager.default_room(), Some(room_id));
        assert!(manager.assign_player(None).is_some());
    }

    #[test]
    fn destroying_the_default_room_is_forbidden() {
        let mut manager = RoomManager::new();
        let first = manager.create_room(RoomConfig::default(), |_| {}, |_| {}, || 0);
        let _second = manager.create_room(RoomConfig::default(), |_| {}, |_| {}, || 0);
        assert!(!manager.destroy_room(first));
        assert_eq!(manager.default_room(), Some(first));
        assert!(manager.sender(first).is_some());
    }

    #[test]
    fn destroying_a_non_default_room_removes_it() {
        let mut manager = RoomManager::new();
        let _first = manager.create_room(RoomConfig::default(), |_| {}, |_| {}, || 0);
        let second = manager.create_room(RoomConfig::default(), |_| {}, |_| {}, || 0);
        assert!(manager.destroy_room(second));
        assert!(manager.sender(second).is_none());
    }
}
