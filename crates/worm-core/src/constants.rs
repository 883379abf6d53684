//! Authoritative tunable constants, matching the specification's
//! configuration table. Kept as a flat module of `pub const`s rather than
//! a runtime-loaded config file — these values define the simulation's
//! physics and are not meant to vary per deployment.

// Simulation / network rates
pub const TICK_RATE: u32 = 60;
pub const BROADCAST_RATE: u32 = 20;
pub const TICK_INTERVAL_MS: u64 = 1000 / TICK_RATE as u64;
pub const BROADCAST_INTERVAL_MS: u64 = 1000 / BROADCAST_RATE as u64;

// World geometry
pub const WORLD_WIDTH: f64 = 5000.0;
pub const WORLD_HEIGHT: f64 = 5000.0;
pub const R_MAP: f64 = WORLD_WIDTH / 2.0;

// Worm kinematics
pub const INIT_LEN: f64 = 10.0;
pub const MAX_LEN: f64 = 500.0;
pub const MIN_LEN: f64 = 10.0;
pub const BASE_SPEED: f64 = 150.0; // units/sec
pub const BOOST_MULT: f64 = 2.0;
pub const MIN_BOOST_LENGTH: f64 = 10.0;
pub const MAX_TURN_PER_TICK: f64 = 0.15; // radians

// Worm shape / path sampling
pub const SEG_RADIUS: f64 = 8.0;
pub const SEG_SPACING: f64 = 15.0;
pub const PATH_RES: f64 = 2.0;
pub const STEP_MAX: f64 = 4.0;
pub const PATH_CAPACITY: usize = 2000;

// Boost mass burn (spec's deterministic accumulator, pinned at 1 unit / 300ms)
pub const BOOST_BURN_PER_SEC: f64 = 1.0 / 0.3;

// Food
pub const FOOD_TARGET: usize = 1500;
pub const FOOD_MIN_RADIUS: f64 = 3.0;
pub const FOOD_MAX_RADIUS: f64 = 8.0;
pub const RESPAWN_PER_TICK: usize = 20;
pub const R_MAGNET: f64 = 50.0;
pub const MAGNET_V_MIN: f64 = 50.0;
pub const MAGNET_V_MAX: f64 = 600.0;
pub const FOOD_SPAWN_SAFE_RADIUS: f64 = 100.0;
pub const FOOD_SPAWN_MAX_ATTEMPTS: u32 = 10;
pub const FOOD_SPAWN_MARGIN: f64 = 50.0;

// Scoring
pub const POINTS_PER_FOOD: i64 = 2;
pub const POINTS_PER_KILL: i64 = 100;
pub const LEADERBOARD_SIZE: usize = 10;

// Survival / spawn
pub const SPAWN_GRACE_MS: i64 = 3000;

// Input queue
pub const INPUT_BUFFER_SIZE: usize = 10;
pub const MAX_INPUT_RATE: u32 = 60; // commands/sec
pub const T_SKEW_MS: i64 = 5000;

// Networking / sessions
pub const PING_TIMEOUT_MS: i64 = 10_000;
pub const RESYNC_INTERVAL: u32 = 40; // broadcasts between full snapshots
pub const TELEPORT_DIST: f64 = 100.0;
pub const R_VIEW: f64 = 1500.0;
pub const R_BUF: f64 = 200.0;
pub const MAX_CACHED: usize = 200;
pub const MAX_SPECTATOR_FOOD: usize = 50;

// Tick loop health
pub const SLOW_TICK_MS: u64 = 40;
pub const MAX_CONSEC_SLOW: u32 = 10;
pub const MAX_CATCHUP_TICKS: u32 = 3;

// Spatial index
pub const CELL_SIZE: f64 = 500.0;

// Food cosmetics: a fixed palette, one entry picked at random per pellet.
pub const FOOD_COLOR_PALETTE: &[&str] = &[
    "#ff5252", "#ff9d52", "#ffe352", "#9dff52", "#52ff9d", "#52e3ff", "#5295ff", "#9d52ff",
    "#ff52e3", "#ffffff",
];
