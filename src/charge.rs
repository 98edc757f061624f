//! Jump charge model: hold to accumulate ticks, release to launch.

use glam::Vec3;

use crate::config::GameConfig;
use crate::game::{Lane, Player};

/// Tier value for `ticks`. Anything past the last tier's bound uses the last
/// tier.
pub fn tier_value(config: &GameConfig, ticks: u32) -> f32 {
    config
        .tiers
        .iter()
        .find(|t| ticks <= t.max_ticks)
        .or_else(|| config.tiers.last())
        .map_or(0.0, |t| t.value)
}

/// Launch velocity for a release after `ticks` frames of charge on `lane`.
/// Each component is clamped on its own.
pub fn launch_velocity(config: &GameConfig, ticks: u32, lane: Lane) -> Vec3 {
    let speed = tier_value(config, ticks) / config.launch_scale;
    let horizontal = speed.min(config.max_horizontal_speed);
    let vertical = (speed * config.lift).min(config.max_vertical_speed);
    match lane {
        Lane::X => Vec3::new(horizontal, vertical, 0.0),
        Lane::Z => Vec3::new(0.0, vertical, -horizontal),
    }
}

pub fn squash_for(config: &GameConfig, ticks: u32) -> f32 {
    let held = ticks.min(config.squash_max_ticks) as f32;
    (1.0 - config.squash_per_tick * held).max(0.0)
}

/// One frame of held jump input. Ignored mid-air.
pub fn charge(config: &GameConfig, player: &mut Player) -> bool {
    if player.falling {
        return false;
    }
    player.charge_ticks = player.charge_ticks.saturating_add(1);
    player.squash = squash_for(config, player.charge_ticks);
    true
}

/// Converts the accumulated charge into a launch. A release with no charge
/// at all is still a minimum-tier jump. Returns the launch velocity, or
/// `None` when the player is already airborne.
pub fn release(config: &GameConfig, player: &mut Player) -> Option<Vec3> {
    if player.falling {
        return None;
    }
    let velocity = launch_velocity(config, player.charge_ticks, player.lane);
    log::debug!(
        "launch: ticks={} lane={:?} velocity={:?}",
        player.charge_ticks,
        player.lane,
        velocity
    );
    player.velocity = velocity;
    player.charge_ticks = 0;
    player.falling = true;
    player.squash = 1.0;
    Some(velocity)
}
