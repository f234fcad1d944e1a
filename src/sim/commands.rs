//! Host command protocol
//!
//! The engine never touches the physics world. Every entry point returns an
//! `EngineOutput`: world mutations for the physics host to execute and
//! notifications for the presentation host to display. Commands must be
//! executed in order; removals and creations are only ever produced by
//! `on_tick`, never from inside a contact callback.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::PieceId;

/// World mutation, executed by the physics host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Delete these bodies from the world
    RemoveBodies(Vec<PieceId>),
    /// Create a body for a piece. `held` pieces hang at the spawn line
    /// (static); merge results fall immediately with zero initial velocity.
    CreateBody {
        id: PieceId,
        rank: u8,
        pos: Vec2,
        held: bool,
    },
    /// Reposition a held body, leaving its velocity alone
    MoveBody { id: PieceId, pos: Vec2 },
    /// Flip a held body to dynamic so it falls
    ReleaseBody(PieceId),
}

/// Observable event, consumed by the presentation host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    ScoreChanged(u64),
    /// Terminal; carries the final score
    GameOver(u64),
    /// A merge produced a piece of the maximum rank
    MaxTierReached,
}

/// Output of one engine entry point
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineOutput {
    pub commands: Vec<Command>,
    pub notifications: Vec<Notification>,
}

impl EngineOutput {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.notifications.is_empty()
    }
}
