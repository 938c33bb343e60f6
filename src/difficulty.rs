//! Per-level difficulty curve
//!
//! A pure derivation from the base config and a level number. Parameters in
//! the "capped" group stop growing at `limit_level_increase` so late levels
//! stay playable; invader velocity and the bomb parameters keep scaling with
//! the raw level.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// Parameters for one level, derived once on entry into play.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelParams {
    pub ship_speed: f32,
    pub saucer_speed: f32,
    pub invader_velocity: f32,
    pub invader_acceleration: f32,
    pub invader_drop_distance: f32,
    pub bomb_rate: f32,
    pub bomb_min_velocity: f32,
    pub bomb_max_velocity: f32,
    pub rocket_velocity: f32,
    pub rocket_max_fire_rate: f32,
    pub points_per_invader: u32,
    pub points_per_saucer: u32,
    /// Grid rows, growing slowly with the capped level
    pub ranks: u32,
    /// Grid columns
    pub files: u32,
}

impl LevelParams {
    pub fn derive(config: &GameConfig, level: u32) -> Self {
        let multiplier = level as f32 * config.level_difficulty_multiplier;
        let capped = level.min(config.limit_level_increase) as f32;

        Self {
            ship_speed: config.ship_speed,
            saucer_speed: config.saucer_speed,
            invader_velocity: config.invader_initial_velocity
                + 1.5 * multiplier * config.invader_initial_velocity,
            invader_acceleration: config.invader_acceleration,
            invader_drop_distance: config.invader_drop_distance,
            bomb_rate: config.bomb_rate + multiplier * config.bomb_rate,
            bomb_min_velocity: config.bomb_min_velocity + multiplier * config.bomb_min_velocity,
            bomb_max_velocity: config.bomb_max_velocity + multiplier * config.bomb_max_velocity,
            rocket_velocity: config.rocket_velocity,
            rocket_max_fire_rate: config.rocket_max_fire_rate + 0.4 * capped,
            points_per_invader: config.points_per_invader,
            points_per_saucer: config.points_per_saucer,
            // Fractional growth rounds up, so the grid gains its first extra
            // rank/file already at level 1.
            ranks: (config.invader_ranks as f32 + 0.1 * capped).ceil() as u32,
            files: (config.invader_files as f32 + 0.2 * capped).ceil() as u32,
        }
    }

    /// Minimum wall-clock milliseconds between two rocket launches
    pub fn fire_interval_ms(&self) -> f64 {
        1000.0 / self.rocket_max_fire_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn level_one_derivation() {
        let params = LevelParams::derive(&GameConfig::default(), 1);
        // 25 * (1 + 1.5 * 0.2)
        assert!((params.invader_velocity - 32.5).abs() < 1e-4);
        assert!((params.bomb_rate - 0.06).abs() < 1e-6);
        assert!((params.rocket_max_fire_rate - 2.4).abs() < 1e-6);
        assert_eq!(params.ranks, 6);
        assert_eq!(params.files, 11);
    }

    #[test]
    fn capped_parameters_stop_growing_past_limit() {
        let config = GameConfig::default();
        let at_cap = LevelParams::derive(&config, config.limit_level_increase);
        let past_cap = LevelParams::derive(&config, config.limit_level_increase + 10);
        assert_eq!(at_cap.rocket_max_fire_rate, past_cap.rocket_max_fire_rate);
        assert_eq!(at_cap.ranks, past_cap.ranks);
        assert_eq!(at_cap.files, past_cap.files);
        // uncapped parameters keep scaling
        assert!(past_cap.invader_velocity > at_cap.invader_velocity);
    }

    #[test]
    fn fire_interval_from_rate() {
        let params = LevelParams::derive(&GameConfig::default(), 1);
        assert!((params.fire_interval_ms() - 1000.0 / 2.4).abs() < 1e-6);
    }

    proptest! {
        /// Difficulty never decreases with level, up to the cap level.
        #[test]
        fn difficulty_is_monotonic(a in 1u32..25, b in 1u32..25) {
            let config = GameConfig::default();
            let (lo, hi) = (a.min(b), a.max(b));
            let lo_params = LevelParams::derive(&config, lo);
            let hi_params = LevelParams::derive(&config, hi);
            prop_assert!(hi_params.invader_velocity >= lo_params.invader_velocity);
            prop_assert!(hi_params.bomb_rate >= lo_params.bomb_rate);
            prop_assert!(hi_params.rocket_max_fire_rate >= lo_params.rocket_max_fire_rate);
            prop_assert!(hi_params.ranks >= lo_params.ranks);
            prop_assert!(hi_params.files >= lo_params.files);
        }
    }
}
