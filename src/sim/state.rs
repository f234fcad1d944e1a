//! Session state and core engine types
//!
//! The `Session` owns everything the reducer needs between callbacks: the
//! score, the terminal flag, the pending-merge queue and the two side
//! tables (merge locks and piece ages). Piece bodies themselves belong to
//! the physics host; the session references them by id only.

use std::collections::{HashMap, HashSet, VecDeque};

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::commands::{Command, EngineOutput, Notification};
use super::tiers::TierTable;
use crate::config::GameConfig;

/// Opaque piece identity
///
/// Allocated by the session from a monotone counter; the physics host maps
/// ids to bodies. Ids are never reused within a session generation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PieceId(pub u64);

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "piece#{}", self.0)
    }
}

/// Host-reported view of one live piece, sampled after the physics step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieceSnapshot {
    pub id: PieceId,
    /// Tier rank, 1-based
    pub rank: u8,
    pub pos: Vec2,
    pub vel: Vec2,
    /// True while the piece hangs at the spawn line awaiting a drop
    pub held: bool,
}

/// The aimable, not-yet-dropped piece (at most one at a time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePiece {
    pub id: PieceId,
    pub rank: u8,
}

/// A merge observed during the contact phase, waiting for the next safe
/// point to mutate the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingMerge {
    pub a: PieceId,
    pub b: PieceId,
    /// Pre-merge rank; the result is `rank + 1`
    pub rank: u8,
    pub midpoint: Vec2,
}

/// One game session: the merge rule engine's complete state
#[derive(Debug, Clone)]
pub struct Session {
    pub config: GameConfig,
    pub tiers: TierTable,
    /// Monotone within a session; only merges add to it
    pub score: u64,
    /// Terminal flag; monotone until `reset`
    pub over: bool,
    /// Highest rank any merge has produced this run (0 before the first)
    pub best_rank: u8,
    /// Engine tick counter, advanced once per `on_tick`
    pub tick: u64,
    /// The currently aimable piece, if any
    pub active: Option<ActivePiece>,
    pub(crate) rng: Pcg32,
    pub(crate) pending: VecDeque<PendingMerge>,
    /// Ids claimed by a pending merge; at most one claim per piece
    pub(crate) locked: HashSet<PieceId>,
    /// First-live tick per piece, for the game-over debounce
    pub(crate) ages: HashMap<PieceId, u64>,
    next_id: u64,
}

impl Session {
    /// Start a fresh session
    pub fn new(seed: u64, config: GameConfig, tiers: TierTable) -> Self {
        let mut config = config;
        if config.spawn_rank_max > tiers.max_rank() {
            log::warn!(
                "spawn_rank_max {} exceeds table max rank {}, clamping",
                config.spawn_rank_max,
                tiers.max_rank()
            );
            config.spawn_rank_max = tiers.max_rank();
        }
        Self {
            config,
            tiers,
            score: 0,
            over: false,
            best_rank: 0,
            tick: 0,
            active: None,
            rng: Pcg32::seed_from_u64(seed),
            pending: VecDeque::new(),
            locked: HashSet::new(),
            ages: HashMap::new(),
            next_id: 1,
        }
    }

    /// Session with the default config and the classic tier table
    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, GameConfig::default(), TierTable::default())
    }

    /// Allocate a fresh piece id
    pub(crate) fn next_piece_id(&mut self) -> PieceId {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Age of a piece in ticks, if the session has seen it
    pub(crate) fn age_of(&self, id: PieceId) -> Option<u64> {
        self.ages.get(&id).map(|born| self.tick.saturating_sub(*born))
    }

    /// Wipe the session for a new run and tell the host to clear the world
    ///
    /// The one operation that un-sets `over`.
    pub fn reset(&mut self, seed: u64) -> EngineOutput {
        let mut known: Vec<PieceId> = self.ages.keys().copied().collect();
        known.sort();

        let mut output = EngineOutput::default();
        if !known.is_empty() {
            output.commands.push(Command::RemoveBodies(known));
        }
        output.notifications.push(Notification::ScoreChanged(0));

        self.score = 0;
        self.over = false;
        self.best_rank = 0;
        self.tick = 0;
        self.active = None;
        self.rng = Pcg32::seed_from_u64(seed);
        self.pending.clear();
        self.locked.clear();
        self.ages.clear();

        log::info!("session reset, seed {seed}");
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_clean() {
        let session = Session::with_seed(7);
        assert_eq!(session.score, 0);
        assert!(!session.over);
        assert!(session.active.is_none());
        assert!(session.pending.is_empty());
        assert!(session.locked.is_empty());
    }

    #[test]
    fn test_piece_ids_are_unique() {
        let mut session = Session::with_seed(7);
        let a = session.next_piece_id();
        let b = session.next_piece_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_spawn_rank_max_clamped_to_table() {
        let config = GameConfig {
            spawn_rank_max: 200,
            ..Default::default()
        };
        let session = Session::new(7, config, TierTable::default());
        assert_eq!(session.config.spawn_rank_max, 11);
    }

    #[test]
    fn test_reset_clears_state_and_world() {
        let mut session = Session::with_seed(7);
        session.score = 500;
        session.over = true;
        session.tick = 99;
        session.ages.insert(PieceId(3), 10);
        session.ages.insert(PieceId(1), 20);
        session.locked.insert(PieceId(3));

        let output = session.reset(8);
        assert_eq!(session.score, 0);
        assert!(!session.over);
        assert_eq!(session.tick, 0);
        assert!(session.ages.is_empty());
        assert!(session.locked.is_empty());

        // Known bodies removed in id order, HUD zeroed
        assert_eq!(
            output.commands,
            vec![Command::RemoveBodies(vec![PieceId(1), PieceId(3)])]
        );
        assert_eq!(output.notifications, vec![Notification::ScoreChanged(0)]);
    }
}
