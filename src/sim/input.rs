//! User-intent operations
//!
//! Thin state transitions forwarded from the host's input handling: spawn
//! an aim piece, steer it along the spawn line, drop it. All of them are
//! no-ops once the session is over. The post-drop respawn delay is the
//! host's job (`config.post_drop_delay_ticks`); the engine never schedules.

use glam::Vec2;
use rand::Rng;

use super::commands::{Command, EngineOutput};
use super::state::{ActivePiece, Session};

impl Session {
    /// Spawn the next aim piece at the spawn line
    ///
    /// The rank is drawn uniformly from `1..=spawn_rank_max` using the
    /// session RNG. Ignored while a previous aim piece is still held.
    pub fn request_spawn(&mut self) -> EngineOutput {
        let mut output = EngineOutput::default();
        if self.over || self.active.is_some() {
            return output;
        }

        let rank = self.rng.random_range(1..=self.config.spawn_rank_max);
        let id = self.next_piece_id();
        self.active = Some(ActivePiece { id, rank });
        self.ages.insert(id, self.tick);

        output.commands.push(Command::CreateBody {
            id,
            rank,
            pos: Vec2::new(self.config.field_width * 0.5, self.config.spawn_y),
            held: true,
        });
        output
    }

    /// Move the held piece to `x`, clamped so it cannot poke into a wall
    ///
    /// Position only; velocity is never touched.
    pub fn request_steer(&mut self, x: f32) -> EngineOutput {
        let mut output = EngineOutput::default();
        if self.over {
            return output;
        }
        let Some(active) = self.active else {
            return output;
        };
        let Some(radius) = self.tiers.radius(active.rank) else {
            return output;
        };

        let min = radius + self.config.wall_margin;
        let max = self.config.field_width - radius - self.config.wall_margin;
        // A piece wider than the field has nowhere to go but the middle
        let x = if min <= max {
            x.clamp(min, max)
        } else {
            self.config.field_width * 0.5
        };

        output.commands.push(Command::MoveBody {
            id: active.id,
            pos: Vec2::new(x, self.config.spawn_y),
        });
        output
    }

    /// Release the held piece into free fall
    ///
    /// Restamps the piece's age: its settle clock starts now, not at spawn.
    pub fn request_drop(&mut self) -> EngineOutput {
        let mut output = EngineOutput::default();
        if self.over {
            return output;
        }
        let Some(active) = self.active.take() else {
            return output;
        };

        self.ages.insert(active.id, self.tick);
        output.commands.push(Command::ReleaseBody(active.id));
        output
    }
}
