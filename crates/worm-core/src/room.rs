//! A `Room` owns one simulation's [`World`] plus its tick loop and is the
//! only thing allowed to touch that `World`. It runs on its own OS
//! thread; the `std::sync::mpsc` channel carrying [`RoomMessage`] is the
//! sole boundary between a room and everything outside it (transport,
//! other rooms), so there is never a lock to take or a race to reason
//! about inside the tick.

use crate::constants::{BROADCAST_RATE, TICK_RATE};
use crate::error::{JoinError, TickError};
use crate::input::{self, Command, InputQueue};
use crate::world::World;
use crate::{collision, food_system, physics};
use crate::tick::TickLoop;
use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Instant;

pub enum RoomMessage {
    Join {
        name: String,
        reply: Sender<Result<u64, JoinError>>,
    },
    Leave {
        player_id: u64,
    },
    Input {
        player_id: u64,
        command: Command,
    },
}

/// Lifecycle notifications a transport layer turns into the wire-facing
/// `player-joined` / `player-left` / `player-died` / `error` events from
/// the external interface. The Room only produces these; framing and
/// socket emission belong to the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    PlayerJoined { player_id: u64, player_name: String, worm_id: u64 },
    PlayerLeft { player_id: u64, reason: String },
    PlayerDied { player_id: u64 },
}

#[derive(Debug, Clone, Copy)]
pub struct RoomConfig {
    pub seed: u64,
    pub self_collision: bool,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            self_collision: false,
        }
    }
}

pub struct Room {
    pub room_id: u64,
    world: World,
    config: RoomConfig,
    receiver: Receiver<RoomMessage>,
    input_queues: HashMap<u64, InputQueue>,
    tick_loop: TickLoop,
    ticks_since_broadcast: u32,
    events: Vec<RoomEvent>,
}

impl Room {
    pub fn new(room_id: u64, config: RoomConfig, receiver: Receiver<RoomMessage>) -> Self {
        Self {
            room_id,
            world: World::new(config.seed),
            config,
            receiver,
            input_queues: HashMap::new(),
            tick_loop: TickLoop::new(),
            ticks_since_broadcast: 0,
            events: Vec::new(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Remove and return every lifecycle event produced since the last
    /// call, oldest first.
    pub fn drain_events(&mut self) -> Vec<RoomEvent> {
        std::mem::take(&mut self.events)
    }

    fn drain_messages(&mut self, now_ms: i64) {
        while let Ok(msg) = self.receiver.try_recv() {
            match msg {
                RoomMessage::Join { name, reply } => {
                    let result = self.handle_join(name, now_ms);
                    let _ = reply.send(result);
                }
                RoomMessage::Leave { player_id } => {
                    self.world.remove_player(player_id);
                    self.input_queues.remove(&player_id);
                    self.events.push(RoomEvent::PlayerLeft { player_id, reason: "disconnect".to_string() });
                }
                RoomMessage::Input { player_id, command } => {
                    self.handle_input(player_id, command, now_ms);
                }
            }
        }
    }

    fn handle_join(&mut self, name: String, now_ms: i64) -> Result<u64, JoinError> {
        let trimmed = name.trim();
        let len_ok = !trimmed.is_empty() && trimmed.chars().count() <= 20;
        let charset_ok = trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '_' || c == '-');
        if !len_ok || !charset_ok {
            return Err(JoinError::InvalidName);
        }
        let player_id = self.world.add_player(trimmed.to_string(), now_ms);
        self.input_queues.insert(player_id, InputQueue::new());
        let color = format!("#{:06x}", self.world.rng.gen_range(0x0100_0000));
        let worm_id =
            self.world
                .spawn_worm(player_id, trimmed.to_string(), color, "default".to_string(), now_ms);
        self.events.push(RoomEvent::PlayerJoined { player_id, player_name: trimmed.to_string(), worm_id });
        Ok(player_id)
    }

    fn handle_input(&mut self, player_id: u64, command: Command, now_ms: i64) {
        let Some(player) = self.world.players.get_mut(&player_id) else {
            return;
        };
        let Some(queue) = self.input_queues.get_mut(&player_id) else {
            return;
        };
        if let Err(reason) = input::accept(queue, player, command, now_ms) {
            log::debug!(
                "room {}: rejected input from player {}: {}",
                self.room_id,
                player_id,
                reason
            );
        }
    }

    fn apply_queued_input(&mut self) {
        for (player_id, queue) in self.input_queues.iter_mut() {
            let Some(player) = self.world.players.get(player_id) else {
                continue;
            };
            let Some(worm_id) = player.worm_id else {
                continue;
            };
            for cmd in queue.drain() {
                if let Some(worm) = self.world.worms.get_mut(&worm_id) {
                    match cmd {
                        Command::SetDirection { direction, .. } => worm.set_target_direction(direction),
                        Command::SetBoost { boosting, .. } => worm.set_boosting(boosting),
                    }
                }
            }
        }
    }

    fn step_one_tick(&mut self, now_ms: i64) {
        self.apply_queued_input();
        let dt = 1.0 / TICK_RATE as f64;

        let world = &mut self.world;
        let self_collision = self.config.self_collision;
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let boundary_deaths = physics::advance(world, dt);
            let collision_deaths = collision::resolve(world, self_collision, now_ms);
            // Worm-food consumption is the Collision subsystem's third
            // check (spec §4.4) and must run before the Food subsystem's
            // magnet/respawn phases see this tick's surviving pellets.
            collision::resolve_food(world);
            // Capture the dying worms' players before the Food subsystem's
            // same-tick sweep removes the worm entities.
            let mut died_players: Vec<u64> = Vec::new();
            for worm_id in boundary_deaths.iter().chain(collision_deaths.iter().map(|(victim, _)| victim)) {
                if let Some(worm) = world.worms.get(worm_id) {
                    died_players.push(worm.player_id);
                }
            }
            food_system::resolve(world, dt);
            died_players
        }));

        match result {
            Ok(died_players) => {
                for player_id in died_players {
                    self.events.push(RoomEvent::PlayerDied { player_id });
                }
            }
            Err(_) => {
                let err = TickError::Physics("tick panicked mid-phase".to_string());
                log::error!("room {}: tick {} dropped: {}", self.room_id, self.world.current_tick, err);
            }
        }
        self.world.current_tick += 1;
    }

    /// Run the room's fixed-rate tick loop until the process exits.
    /// `on_broadcast` is invoked once every `BROADCAST_INTERVAL_MS` with
    /// the latest world state; `on_event` is invoked once per lifecycle
    /// event as soon as it's produced; `now_ms` supplies the wall-clock
    /// time used for input timestamps and spawn grace periods.
    pub fn run(
        mut self,
        mut on_broadcast: impl FnMut(&mut World),
        mut on_event: impl FnMut(RoomEvent),
        mut now_ms: impl FnMut() -> i64,
    ) {
        let ticks_per_broadcast = (TICK_RATE / BROADCAST_RATE).max(1);
        loop {
            let ticks = self.tick_loop.wait_for_next();
            for _ in 0..ticks {
                let started = Instant::now();
                let t = now_ms();
                self.drain_messages(t);
                self.step_one_tick(t);
                for event in self.drain_events() {
                    on_event(event);
                }
                let unhealthy = self.tick_loop.record_processing_time(started.elapsed());
                if unhealthy {
                    log::error!("room {}: {} consecutive slow ticks", self.room_id, crate::constants::MAX_CONSEC_SLOW);
                }
            }
            self.ticks_since_broadcast += ticks;
            if self.ticks_since_broadcast >= ticks_per_broadcast {
                self.ticks_since_broadcast = 0;
                on_broadcast(&mut self.world);
            }
        }
    }
}
