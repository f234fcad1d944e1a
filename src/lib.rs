//! Fruitfall - merge rule engine for a falling-fruit puzzle game
//!
//! Core modules:
//! - `sim`: Deterministic merge/progression logic (contacts in, commands out)
//! - `config`: Data-driven tunables (field geometry, deadline, delays)
//! - `skins`: Sprite set bookkeeping for the presentation host
//! - `highscores`: Local leaderboard
//!
//! Physics and rendering are NOT here. A host engine (Matter.js in the
//! browser build) integrates bodies, detects contacts and executes the
//! commands this crate emits.

pub mod config;
pub mod highscores;
pub mod skins;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use config::GameConfig;
pub use highscores::HighScores;
pub use sim::{Command, EngineOutput, Notification, PieceSnapshot, Session, TierTable};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matching the host's fixed runner)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Y of the spawn line where the aim piece hangs (y grows downward)
    pub const SPAWN_Y: f32 = 80.0;
    /// Pieces resting above this line end the run
    pub const DEADLINE_Y: f32 = 100.0;

    /// |vel.y| below this counts as settled rather than in transit
    pub const SETTLE_SPEED: f32 = 0.2;
    /// Ticks a piece must have been live before it can trigger game over (2 s)
    pub const SETTLE_GRACE_TICKS: u64 = 120;

    /// Ticks between a drop and the next aim piece (1 s, host-scheduled)
    pub const POST_DROP_DELAY_TICKS: u32 = 60;

    /// Extra clearance kept between the aim piece and the side walls
    pub const WALL_MARGIN: f32 = 0.0;

    /// Freshly spawned aim pieces draw a rank from 1..=SPAWN_RANK_MAX
    pub const SPAWN_RANK_MAX: u8 = 3;
}
