//! Sprite set bookkeeping
//!
//! The presentation host draws each piece as a sprite; this module owns the
//! mapping from tier rank to texture path and from piece radius to sprite
//! scale. Two sprite sets ship with the game and can be swapped live,
//! including on the held aim piece.

use serde::{Deserialize, Serialize};

/// Source sprite size in pixels; scale maps a piece diameter onto it
pub const SPRITE_SOURCE_SIZE: f32 = 100.0;

/// Which sprite set to draw with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SkinSet {
    #[default]
    Classic,
    Alternate,
}

impl SkinSet {
    /// Texture filename prefix for this set
    pub fn prefix(&self) -> &'static str {
        match self {
            SkinSet::Classic => "fruit",
            SkinSet::Alternate => "skinB_fruit",
        }
    }

    /// The other set
    pub fn toggled(&self) -> Self {
        match self {
            SkinSet::Classic => SkinSet::Alternate,
            SkinSet::Alternate => SkinSet::Classic,
        }
    }

    /// Texture path for a tier rank (1-based); textures are indexed from 00
    pub fn texture_path(&self, rank: u8) -> String {
        format!("asset/{}{:02}.png", self.prefix(), rank.saturating_sub(1))
    }
}

/// Sprite scale that renders a piece of the given radius at true size
pub fn sprite_scale(radius: f32) -> f32 {
    radius * 2.0 / SPRITE_SOURCE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_paths_are_zero_padded() {
        assert_eq!(SkinSet::Classic.texture_path(1), "asset/fruit00.png");
        assert_eq!(SkinSet::Classic.texture_path(11), "asset/fruit10.png");
        assert_eq!(
            SkinSet::Alternate.texture_path(2),
            "asset/skinB_fruit01.png"
        );
    }

    #[test]
    fn test_toggle_round_trips() {
        assert_eq!(SkinSet::Classic.toggled(), SkinSet::Alternate);
        assert_eq!(SkinSet::Classic.toggled().toggled(), SkinSet::Classic);
    }

    #[test]
    fn test_sprite_scale_matches_diameter() {
        // 100 px source sprite: a radius-50 piece renders at scale 1
        assert_eq!(sprite_scale(50.0), 1.0);
        assert_eq!(sprite_scale(17.5), 0.35);
    }
}
