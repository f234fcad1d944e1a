//! Deterministic merge rule engine
//!
//! All game-progression logic lives here. This module must be pure and
//! deterministic:
//! - Seeded RNG only
//! - No world mutation: entry points return commands, the host executes them
//! - Contacts only enqueue; `on_tick` is the sole producer of removals
//! - Stable FIFO merge order
//!
//! The host calls exactly two things per physics step: `Session::on_contact`
//! for each contact-pair onset, then `Session::on_tick` once after the step
//! has resolved. User intent arrives through the `request_*` operations.

pub mod commands;
pub mod input;
pub mod merge;
pub mod state;
pub mod tick;
pub mod tiers;

pub use commands::{Command, EngineOutput, Notification};
pub use state::{ActivePiece, PendingMerge, PieceId, PieceSnapshot, Session};
pub use tiers::{Tier, TierTable, TierTableError};
