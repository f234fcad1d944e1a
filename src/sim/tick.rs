//! Per-tick orchestration
//!
//! `on_tick` runs once per physics step, after the host has resolved
//! positions and velocities. Order matters and is part of the host
//! contract: bookkeeping, then the merge drain, then the game-over scan,
//! so a drain never sees ids removed this tick and the scan never sees
//! pieces the drain just consumed.

use std::collections::HashSet;

use super::commands::{EngineOutput, Notification};
use super::state::{PieceId, PieceSnapshot, Session};

impl Session {
    /// End-of-step callback
    ///
    /// No-op once the session is over; `reset` is the only way back.
    pub fn on_tick(&mut self, world: &[PieceSnapshot]) -> EngineOutput {
        if self.over {
            return EngineOutput::default();
        }
        self.tick += 1;

        let mut live: HashSet<PieceId> = HashSet::with_capacity(world.len());
        for piece in world {
            live.insert(piece.id);
            // First sighting starts the settle clock
            self.ages.entry(piece.id).or_insert(self.tick);
        }
        self.ages.retain(|id, _| live.contains(id));

        let mut output = EngineOutput::default();
        self.drain_merges(&mut live, &mut output);
        self.check_game_over(world, &live, &mut output);
        output
    }

    /// Scan for a settled piece over the deadline
    ///
    /// A piece qualifies when it is live (not consumed by this tick's
    /// drain), not the held aim piece, above the deadline, slower than the
    /// settle threshold, and older than the grace window. The grace window
    /// is load-bearing: a freshly merged piece can pass through the
    /// deadline zone with momentarily low vertical speed.
    fn check_game_over(
        &mut self,
        world: &[PieceSnapshot],
        live: &HashSet<PieceId>,
        output: &mut EngineOutput,
    ) {
        if self.over {
            return;
        }
        for piece in world {
            if piece.held || !live.contains(&piece.id) {
                continue;
            }
            if piece.pos.y >= self.config.deadline_y {
                continue;
            }
            if piece.vel.y.abs() >= self.config.settle_speed {
                continue;
            }
            let seasoned = self
                .age_of(piece.id)
                .is_some_and(|age| age >= self.config.settle_grace_ticks);
            if seasoned {
                self.over = true;
                output.notifications.push(Notification::GameOver(self.score));
                return;
            }
        }
    }
}
