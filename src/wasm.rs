//! Browser host boundary
//!
//! The browser build keeps physics in the host page (a Matter.js world);
//! this module exposes the session over wasm-bindgen so the page's contact
//! handler, tick handler and DOM input handlers can drive it. Payloads
//! cross the boundary as JSON and commands come back the same way for the
//! host to execute against its world.

use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::highscores::HighScores;
use crate::sim::{PieceSnapshot, Session, TierTable};
use crate::skins::{SkinSet, sprite_scale};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json(value: &impl serde::Serialize) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(to_js)
}

/// One game session driven by a JS physics host
#[wasm_bindgen]
pub struct WasmSession {
    inner: Session,
    skin: SkinSet,
}

#[wasm_bindgen]
impl WasmSession {
    /// Start a session; pass JSON to override the default config or tier
    /// table
    #[wasm_bindgen(constructor)]
    pub fn new(
        seed: u64,
        config_json: Option<String>,
        tiers_json: Option<String>,
    ) -> Result<WasmSession, JsValue> {
        let config = match config_json {
            Some(json) => GameConfig::from_json(&json).map_err(to_js)?,
            None => GameConfig::default(),
        };
        let tiers = match tiers_json {
            Some(json) => TierTable::from_json(&json).map_err(to_js)?,
            None => TierTable::default(),
        };
        log::info!("Session started with seed: {seed}");
        Ok(Self {
            inner: Session::new(seed, config, tiers),
            skin: SkinSet::default(),
        })
    }

    /// Contact-pair onset; both arguments are PieceSnapshot JSON.
    /// Malformed snapshots are ignored, per the engine's error policy.
    pub fn on_contact(&mut self, a_json: &str, b_json: &str) {
        let parsed: Result<(PieceSnapshot, PieceSnapshot), _> = serde_json::from_str(a_json)
            .and_then(|a| serde_json::from_str(b_json).map(|b| (a, b)));
        match parsed {
            Ok((a, b)) => self.inner.on_contact(&a, &b),
            Err(err) => log::debug!("ignoring malformed contact: {err}"),
        }
    }

    /// End-of-step callback; takes the live world as a JSON array of
    /// PieceSnapshot, returns an EngineOutput as JSON
    pub fn on_tick(&mut self, world_json: &str) -> Result<String, JsValue> {
        let world: Vec<PieceSnapshot> = serde_json::from_str(world_json).map_err(to_js)?;
        to_json(&self.inner.on_tick(&world))
    }

    pub fn request_spawn(&mut self) -> Result<String, JsValue> {
        to_json(&self.inner.request_spawn())
    }

    pub fn request_steer(&mut self, x: f32) -> Result<String, JsValue> {
        to_json(&self.inner.request_steer(x))
    }

    pub fn request_drop(&mut self) -> Result<String, JsValue> {
        to_json(&self.inner.request_drop())
    }

    pub fn reset(&mut self, seed: u64) -> Result<String, JsValue> {
        to_json(&self.inner.reset(seed))
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> u64 {
        self.inner.score
    }

    #[wasm_bindgen(getter)]
    pub fn over(&self) -> bool {
        self.inner.over
    }

    #[wasm_bindgen(getter)]
    pub fn post_drop_delay_ticks(&self) -> u32 {
        self.inner.config.post_drop_delay_ticks
    }

    /// Record the finished run on the local leaderboard.
    /// Returns the 1-indexed rank achieved, or 0 if it didn't qualify.
    pub fn record_highscore(&self) -> usize {
        let mut scores = HighScores::load();
        let rank = scores.add_score(self.inner.score, self.inner.best_rank, js_sys::Date::now());
        if rank.is_some() {
            scores.save();
        }
        rank.unwrap_or(0)
    }

    /// Swap sprite sets; the host re-textures existing bodies
    pub fn toggle_skin(&mut self) {
        self.skin = self.skin.toggled();
    }

    /// Texture path for a tier rank under the current skin
    pub fn texture_path(&self, rank: u8) -> String {
        self.skin.texture_path(rank)
    }

    /// Sprite scale for a tier rank (0 for unknown ranks)
    pub fn texture_scale(&self, rank: u8) -> f32 {
        self.inner
            .tiers
            .radius(rank)
            .map(sprite_scale)
            .unwrap_or(0.0)
    }
}
