//! Tunable game constants.
//!
//! Every number the simulation depends on lives in [`GameConfig`]. The
//! defaults reproduce the stock game; a RON file can override any subset of
//! fields since missing fields fall back to [`Default`].

use std::path::Path;
use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One launch-speed bucket. A tick count belongs to the first tier whose
/// `max_ticks` is greater than or equal to it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChargeTier {
    /// Inclusive upper bound of the tier in charge ticks.
    pub max_ticks: u32,
    /// Launch value in the same arbitrary units as `launch_scale`.
    pub value: f32,
}

impl ChargeTier {
    pub const fn new(max_ticks: u32, value: f32) -> Self {
        Self { max_ticks, value }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Downward acceleration magnitude.
    pub gravity: f32,
    /// Tier values are divided by this to get a launch speed.
    pub launch_scale: f32,
    /// Vertical launch component as a multiple of the launch speed.
    pub lift: f32,
    pub max_horizontal_speed: f32,
    pub max_vertical_speed: f32,
    /// Ordered by `max_ticks`; the last tier should cover `u32::MAX`.
    pub tiers: Vec<ChargeTier>,
    pub squash_per_tick: f32,
    pub squash_max_ticks: u32,

    /// Height of every platform top; falling below it triggers a landing scan.
    pub landing_height: f32,
    /// Falling to or below this height with no platform underneath ends the run.
    pub death_height: f32,

    pub platform_radius: f32,
    pub platform_height: f32,
    /// Candidate spacings between consecutive platforms.
    pub step_lengths: Vec<f32>,
    /// How many platforms behind the active one stay visible.
    pub visible_behind: usize,

    pub camera_offset: Vec3,
    /// Seconds of wall-clock time are multiplied by this to get a step delta.
    pub time_scale: f32,
    /// Fixed seed for the level generator. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: 0.9,
            launch_scale: 10.0,
            lift: 1.0,
            max_horizontal_speed: 4.0,
            max_vertical_speed: 4.0,
            tiers: vec![
                ChargeTier::new(5, 10.0),
                ChargeTier::new(15, 13.0),
                ChargeTier::new(25, 20.0),
                ChargeTier::new(35, 30.0),
                ChargeTier::new(u32::MAX, 40.0),
            ],
            squash_per_tick: 0.01,
            squash_max_ticks: 40,
            landing_height: 1.0,
            death_height: 0.0,
            platform_radius: 1.5,
            platform_height: 1.0,
            step_lengths: vec![5.0, 10.0, 20.0],
            visible_behind: 3,
            camera_offset: Vec3::new(0.0, 10.0, 20.0),
            time_scale: 10.0,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Reads and validates a RON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&text)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())?)
    }

    /// Simulation delta for a frame that took `elapsed` of wall-clock time.
    pub fn step_delta(&self, elapsed: Duration) -> f32 {
        elapsed.as_secs_f32() * self.time_scale
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if !(self.gravity > 0.0) {
            return Err(invalid("gravity", format!("must be positive, got {}", self.gravity)));
        }
        if !(self.launch_scale > 0.0) {
            return Err(invalid(
                "launch_scale",
                format!("must be positive, got {}", self.launch_scale),
            ));
        }
        if !(self.lift > 0.0) {
            return Err(invalid("lift", format!("must be positive, got {}", self.lift)));
        }
        if !(self.max_horizontal_speed >= 0.0) {
            return Err(invalid("max_horizontal_speed", "must not be negative"));
        }
        if !(self.max_vertical_speed >= 0.0) {
            return Err(invalid("max_vertical_speed", "must not be negative"));
        }
        if self.tiers.is_empty() {
            return Err(invalid("tiers", "at least one tier is required"));
        }
        if self.tiers.windows(2).any(|w| w[0].max_ticks >= w[1].max_ticks) {
            return Err(invalid("tiers", "max_ticks must be strictly increasing"));
        }
        if self.tiers.iter().any(|t| !(t.value > 0.0)) {
            return Err(invalid("tiers", "every tier value must be positive"));
        }
        if self.step_lengths.is_empty() {
            return Err(invalid("step_lengths", "at least one step length is required"));
        }
        if self.step_lengths.iter().any(|s| !(*s > 0.0)) {
            return Err(invalid("step_lengths", "step lengths must be positive"));
        }
        if !(self.platform_radius > 0.0) {
            return Err(invalid("platform_radius", "must be positive"));
        }
        if self.death_height > self.landing_height {
            return Err(invalid(
                "death_height",
                format!(
                    "{} is above landing_height {}",
                    self.death_height, self.landing_height
                ),
            ));
        }
        if !(self.time_scale > 0.0) {
            return Err(invalid("time_scale", "must be positive"));
        }
        Ok(())
    }
}
