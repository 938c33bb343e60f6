//! Base game tunables
//!
//! One `GameConfig` describes the whole difficulty-1 game; everything the
//! levels change is derived from it in `difficulty`. Bad values are a
//! programmer error and are rejected up front by [`GameConfig::validate`]
//! rather than surfacing as NaNs mid-simulation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tick rate must be positive (got {0})")]
    InvalidTickRate(f32),
    #[error("invader grid needs at least one rank and one file (got {ranks}x{files})")]
    EmptyGrid { ranks: u32, files: u32 },
    #[error("bomb velocity range is inverted ({min}..{max})")]
    InvertedBombRange { min: f32, max: f32 },
    #[error("invader drop distance must be positive (got {0})")]
    InvalidDropDistance(f32),
    #[error("rocket fire rate cap must be positive (got {0})")]
    InvalidFireRate(f32),
    #[error("surface {width}x{height} leaves no play area")]
    DegenerateSurface { width: f32, height: f32 },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Base (level 1) tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Per-file bomb drop probability per second
    pub bomb_rate: f32,
    pub bomb_min_velocity: f32,
    pub bomb_max_velocity: f32,
    pub invader_initial_velocity: f32,
    /// Speed gained at each formation reversal
    pub invader_acceleration: f32,
    /// Vertical distance the formation drops after a reversal
    pub invader_drop_distance: f32,
    pub rocket_velocity: f32,
    /// Maximum player shots per second
    pub rocket_max_fire_rate: f32,
    /// Driver tick rate (ticks per second)
    pub fps: f32,
    pub invader_ranks: u32,
    pub invader_files: u32,
    pub ship_speed: f32,
    pub saucer_speed: f32,
    /// Fractional difficulty gain per level
    pub level_difficulty_multiplier: f32,
    pub points_per_invader: u32,
    pub points_per_saucer: u32,
    /// Level past which capped parameters stop growing
    pub limit_level_increase: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            bomb_rate: 0.05,
            bomb_min_velocity: 50.0,
            bomb_max_velocity: 50.0,
            invader_initial_velocity: 25.0,
            invader_acceleration: 1.0,
            invader_drop_distance: 20.0,
            rocket_velocity: 120.0,
            rocket_max_fire_rate: 2.0,
            fps: 50.0,
            invader_ranks: 5,
            invader_files: 10,
            ship_speed: 120.0,
            saucer_speed: 5.0,
            level_difficulty_multiplier: 0.2,
            points_per_invader: 5,
            points_per_saucer: 50,
            limit_level_increase: 25,
        }
    }
}

impl GameConfig {
    /// Reject configurations the simulation cannot run on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps <= 0.0 {
            return Err(ConfigError::InvalidTickRate(self.fps));
        }
        if self.invader_ranks == 0 || self.invader_files == 0 {
            return Err(ConfigError::EmptyGrid {
                ranks: self.invader_ranks,
                files: self.invader_files,
            });
        }
        if self.bomb_min_velocity > self.bomb_max_velocity {
            return Err(ConfigError::InvertedBombRange {
                min: self.bomb_min_velocity,
                max: self.bomb_max_velocity,
            });
        }
        if self.invader_drop_distance <= 0.0 {
            return Err(ConfigError::InvalidDropDistance(self.invader_drop_distance));
        }
        if self.rocket_max_fire_rate <= 0.0 {
            return Err(ConfigError::InvalidFireRate(self.rocket_max_fire_rate));
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Fixed simulation timestep in seconds
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        let config = GameConfig {
            fps: 0.0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTickRate(_))
        ));
    }

    #[test]
    fn empty_grid_is_rejected() {
        let config = GameConfig {
            invader_files: 0,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyGrid { .. })));
    }

    #[test]
    fn inverted_bomb_range_is_rejected() {
        let config = GameConfig {
            bomb_min_velocity: 80.0,
            bomb_max_velocity: 50.0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedBombRange { .. })
        ));
    }

    #[test]
    fn from_json_overrides_and_defaults() {
        let config = GameConfig::from_json(r#"{"bomb_rate": 0.1, "invader_ranks": 3}"#).unwrap();
        assert_eq!(config.bomb_rate, 0.1);
        assert_eq!(config.invader_ranks, 3);
        // untouched fields keep their defaults
        assert_eq!(config.ship_speed, 120.0);
    }

    #[test]
    fn from_json_rejects_invalid_values() {
        assert!(GameConfig::from_json(r#"{"rocket_max_fire_rate": 0.0}"#).is_err());
        assert!(GameConfig::from_json("not json").is_err());
    }

    #[test]
    fn tick_dt_matches_rate() {
        let config = GameConfig::default();
        assert!((config.tick_dt() - 0.02).abs() < 1e-6);
    }
}
