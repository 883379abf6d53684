//! Headless bootstrap for one room's simulation core: spawns a `Room` on
//! its own OS thread, joins a handful of bot players so the tick loop has
//! something to simulate, and on every broadcast builds each bot's
//! broadcaster payload the way a real transport layer would for a
//! connected client. There is no socket here — wiring this to an actual
//! transport (framing, handshake, per-connection session) is an external
//! collaborator's job; this binary exists to prove the simulation core
//! runs end to end.

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, trace, warn};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use worm_broadcaster::{Broadcaster, Payload, ServerEvent};
use worm_core::input::Command;
use worm_core::{RoomConfig, RoomEvent, RoomManager, RoomMessage};

#[derive(Parser, Debug)]
#[command(name = "worm-server")]
#[command(about = "Worm Arena simulation core - headless room runner", long_about = None)]
struct Args {
    /// Deterministic seed for the room's world (food layout, spawn points).
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Number of bot players to join so the room has worms to simulate.
    #[arg(short, long, default_value = "8")]
    bots: usize,

    /// Stop after this many ticks; runs forever if omitted.
    #[arg(short, long)]
    max_ticks: Option<u64>,

    /// Enable the (default off) self-collision rule.
    #[arg(long, default_value_t = false)]
    self_collision: bool,
}

fn now_ms() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_millis() as i64
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    info!(
        "worm arena simulation core starting: seed={} bots={} self_collision={}",
        args.seed, args.bots, args.self_collision
    );

    let bot_ids: Arc<Mutex<Vec<u64>>> = Arc::new(Mutex::new(Vec::new()));
    let broadcast_bot_ids = Arc::clone(&bot_ids);

    let progress = match args.max_ticks {
        Some(max) => ProgressBar::new(max),
        None => ProgressBar::new_spinner(),
    };
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] tick {pos} | {msg}")
            .expect("static template is valid")
            .progress_chars("#>-"),
    );
    let progress_for_loop = progress.clone();
    let max_ticks = args.max_ticks;

    let mut broadcaster = Broadcaster::new();
    let mut room_manager = RoomManager::new();
    let room_id = room_manager.create_room(
        RoomConfig { seed: args.seed, self_collision: args.self_collision },
        move |world| {
            progress_for_loop.set_position(world.current_tick);
            let alive = world.worms.values().filter(|w| w.is_alive).count();
            progress_for_loop.set_message(format!("{alive} worms alive, {} food", world.food.len()));

            let ids: Vec<u64> = broadcast_bot_ids.lock().unwrap().clone();
            for player_id in ids {
                let payload = broadcaster.build(world, player_id);
                let bytes = serde_json::to_vec(&payload).map(|v| v.len()).unwrap_or(0);
                match payload {
                    Payload::GameState(snapshot) => {
                        debug!(
                            "player {player_id}: full snapshot ({} worms, {} food, {bytes}B)",
                            snapshot.worms.len(),
                            snapshot.food.len()
                        );
                    }
                    Payload::DeltaUpdate(delta) => {
                        trace!(
                            "player {player_id}: delta +{} ~{} -{} worms ({bytes}B)",
                            delta.worms_added.len(),
                            delta.worms_updated.len(),
                            delta.worms_removed.len()
                        );
                    }
                }
            }

            if let Some(max) = max_ticks {
                if world.current_tick >= max {
                    let leaderboard = worm_core::leaderboard::compute(world);
                    info!("reached max_ticks={max}, stopping. leaderboard: {leaderboard:?}");
                    std::process::exit(0);
                }
            }
        },
        |event: RoomEvent| {
            let wire = ServerEvent::from(event);
            debug!("{}", serde_json::to_string(&wire).unwrap_or_default());
        },
        now_ms,
    );

    let sender = room_manager
        .sender(room_id)
        .expect("room was just created")
        .clone();

    for i in 0..args.bots {
        let (reply_tx, reply_rx) = mpsc::channel();
        sender
            .send(RoomMessage::Join { name: format!("bot-{i}"), reply: reply_tx })
            .expect("room thread is gone");
        match reply_rx.recv() {
            Ok(Ok(player_id)) => bot_ids.lock().unwrap().push(player_id),
            Ok(Err(e)) => warn!("bot-{i} failed to join: {e}"),
            Err(_) => warn!("bot-{i}: room never replied to join"),
        }
    }
    info!("{} bots joined room {room_id}", bot_ids.lock().unwrap().len());

    // Nudge the bots' headings periodically so the demo has visible
    // turning, boosting and (eventually) collisions to broadcast.
    let mut tick: u64 = 0;
    loop {
        std::thread::sleep(Duration::from_millis(500));
        tick += 1;
        let ids = bot_ids.lock().unwrap().clone();
        for (i, player_id) in ids.iter().enumerate() {
            let direction = (i as f64) * 0.77 + (tick as f64) * 0.2;
            let _ = sender.send(RoomMessage::Input {
                player_id: *player_id,
                command: Command::SetDirection { direction, client_time_ms: now_ms() },
            });
        }
    }
}
