//! Star Swarm - a grid-invasion arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, formation, collisions, play loop)
//! - `game`: Session, state stack and per-tick dispatch
//! - `difficulty`: Data-driven per-level balance
//! - `config`: Validated base tunables
//! - `events`: Sound/score requests emitted toward the driver
//! - `render`: Abstract draw surface for the external renderer

pub mod config;
pub mod difficulty;
pub mod events;
pub mod game;
pub mod render;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use difficulty::LevelParams;
pub use events::{FrameEvent, Sound};
pub use game::{Game, GameState, Key, Session};

/// Game geometry constants
pub mod consts {
    /// Ship collision box
    pub const SHIP_WIDTH: f32 = 20.0;
    pub const SHIP_HEIGHT: f32 = 16.0;

    /// Invader collision box
    pub const INVADER_WIDTH: f32 = 18.0;
    pub const INVADER_HEIGHT: f32 = 14.0;

    /// Saucer (bonus target) collision box
    pub const SAUCER_WIDTH: f32 = 20.0;
    pub const SAUCER_HEIGHT: f32 = 16.0;

    /// Rockets spawn this far above the ship's center (the "nose")
    pub const ROCKET_NOSE_OFFSET: f32 = 12.0;
    /// The saucer patrols this far above the play area
    pub const SAUCER_TOP_OFFSET: f32 = 30.0;

    /// Total horizontal span of the invader formation at spawn
    pub const FORMATION_WIDTH: f32 = 200.0;
    /// Vertical spacing between invader ranks at spawn
    pub const RANK_SPACING: f32 = 20.0;

    /// Fraction of the surface occupied by the play area
    pub const PLAY_WIDTH_FRACTION: f32 = 0.35;
    pub const PLAY_HEIGHT_FRACTION: f32 = 0.4;

    /// Level intro countdown duration in seconds
    pub const COUNTDOWN_SECS: f32 = 3.0;
    /// Level-clear bonus is this many points per cleared level
    pub const LEVEL_CLEAR_BONUS: u32 = 50;
}

/// The drawable surface plus the centered play rectangle the action is
/// confined to. The play area is deliberately smaller than the surface so
/// rockets and bombs survive a short way past its edges before culling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    /// Full surface size
    pub width: f32,
    pub height: f32,
    /// Play area edges
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl WorldBounds {
    pub fn new(width: f32, height: f32) -> Self {
        let play_w = width * consts::PLAY_WIDTH_FRACTION;
        let play_h = height * consts::PLAY_HEIGHT_FRACTION;
        Self {
            width,
            height,
            left: width / 2.0 - play_w / 2.0,
            right: width / 2.0 + play_w / 2.0,
            // Top sits slightly higher than a symmetric split so the grid has
            // room to descend before reaching the ship's line.
            top: height / 2.0 - play_h / 2.5,
            bottom: height / 2.0 + play_h / 2.0,
        }
    }
}
