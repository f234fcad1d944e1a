//! Game configuration
//!
//! Everything tunable that is not the tier table: field geometry, the
//! deadline, settle thresholds and host-scheduled delays. Loaded from JSON
//! by embedding hosts; defaults reproduce the classic 400x600 game.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;

/// Configuration validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("field dimensions must be positive, got {width}x{height}")]
    BadField { width: f32, height: f32 },
    #[error("deadline_y {deadline_y} must lie inside the field (0..{height})")]
    BadDeadline { deadline_y: f32, height: f32 },
    #[error("settle_speed must be positive, got {0}")]
    BadSettleSpeed(f32),
    #[error("spawn_rank_max must be at least 1")]
    BadSpawnRank,
    #[error("config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Runtime tunables
///
/// Y grows downward, matching the host's screen coordinates: the deadline
/// sits near the top of the field, so a piece is over the line when its
/// `pos.y` is *below* `deadline_y` numerically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Playfield width in world units
    pub field_width: f32,
    /// Playfield height in world units
    pub field_height: f32,
    /// Y of the spawn line where the aim piece hangs
    pub spawn_y: f32,
    /// Pieces settled above this line end the run
    pub deadline_y: f32,
    /// |vel.y| below this counts as settled
    pub settle_speed: f32,
    /// Minimum piece age (ticks) before it may trigger game over
    pub settle_grace_ticks: u64,
    /// Host-scheduled gap between a drop and the next spawn (ticks)
    pub post_drop_delay_ticks: u32,
    /// Extra clearance kept between the aim piece and the side walls
    pub wall_margin: f32,
    /// Aim pieces draw a rank uniformly from 1..=spawn_rank_max
    pub spawn_rank_max: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: consts::FIELD_WIDTH,
            field_height: consts::FIELD_HEIGHT,
            spawn_y: consts::SPAWN_Y,
            deadline_y: consts::DEADLINE_Y,
            settle_speed: consts::SETTLE_SPEED,
            settle_grace_ticks: consts::SETTLE_GRACE_TICKS,
            post_drop_delay_ticks: consts::POST_DROP_DELAY_TICKS,
            wall_margin: consts::WALL_MARGIN,
            spawn_rank_max: consts::SPAWN_RANK_MAX,
        }
    }
}

impl GameConfig {
    /// Check the config for values the engine cannot operate with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.field_width > 0.0 && self.field_height > 0.0) {
            return Err(ConfigError::BadField {
                width: self.field_width,
                height: self.field_height,
            });
        }
        if !(self.deadline_y > 0.0 && self.deadline_y < self.field_height) {
            return Err(ConfigError::BadDeadline {
                deadline_y: self.deadline_y,
                height: self.field_height,
            });
        }
        if !(self.settle_speed > 0.0) {
            return Err(ConfigError::BadSettleSpeed(self.settle_speed));
        }
        if self.spawn_rank_max == 0 {
            return Err(ConfigError::BadSpawnRank);
        }
        Ok(())
    }

    /// Parse and validate a config from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::info!(
            "loaded config: field {}x{}, deadline y={}, {} spawn ranks",
            config.field_width,
            config.field_height,
            config.deadline_y,
            config.spawn_rank_max
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = GameConfig::from_json(r#"{"deadline_y": 120.0}"#).unwrap();
        assert_eq!(config.deadline_y, 120.0);
        assert_eq!(config.field_width, consts::FIELD_WIDTH);
        assert_eq!(config.spawn_rank_max, consts::SPAWN_RANK_MAX);
    }

    #[test]
    fn test_rejects_deadline_outside_field() {
        let config = GameConfig {
            deadline_y: 700.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadDeadline { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_field_and_thresholds() {
        let config = GameConfig {
            field_width: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::BadField { .. })));

        let config = GameConfig {
            settle_speed: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadSettleSpeed(_))
        ));

        let config = GameConfig {
            spawn_rank_max: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::BadSpawnRank)));
    }
}
