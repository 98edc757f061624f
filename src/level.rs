//! Procedural platform generation.
//!
//! After every successful landing one new platform is placed a fixed step
//! away from the frontier, along a randomly chosen axis. That axis becomes
//! the lane of the next jump.

use glam::Vec3;
use rand::RngCore;

use crate::game::{Frontier, Lane, Platform, PlatformRegistry, Player};

/// Source of the generator's random choices. Any `rand` RNG works; tests can
/// plug in a scripted sequence.
pub trait RandomSource {
    /// A fair coin flip.
    fn coin(&mut self) -> bool;
}

impl<R: RngCore> RandomSource for R {
    fn coin(&mut self) -> bool {
        self.next_u32() & 1 == 1
    }
}

/// Picks a step length by flipping a coin per candidate: heads takes the
/// current one, tails moves on. The last candidate is taken if every flip
/// comes up tails. With `[5, 10, 20]` that gives 1/2, 1/4, 1/4.
pub fn pick_step(lengths: &[f32], rng: &mut impl RandomSource) -> f32 {
    let Some((&last, rest)) = lengths.split_last() else {
        return 0.0;
    };
    rest.iter().copied().find(|_| rng.coin()).unwrap_or(last)
}

pub fn pick_axis(rng: &mut impl RandomSource) -> Lane {
    if rng.coin() {
        Lane::X
    } else {
        Lane::Z
    }
}

/// Where the next platform goes: `+step` along X or `-step` along Z.
pub fn next_position(frontier: Frontier, axis: Lane, step: f32) -> Vec3 {
    match axis {
        Lane::X => Vec3::new(frontier.last_x + step, 0.0, frontier.last_z),
        Lane::Z => Vec3::new(frontier.last_x, 0.0, frontier.last_z - step),
    }
}

#[derive(Clone, Debug)]
pub struct LevelParams<'a> {
    pub step_lengths: &'a [f32],
    pub platform_radius: f32,
    pub platform_height: f32,
    pub visible_behind: usize,
}

/// What one generator pass did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spawn {
    pub index: usize,
    pub position: Vec3,
    pub axis: Lane,
    pub step: f32,
}

/// Runs once per landing. `standing_on` is the platform the player just
/// landed on; it, not the new platform, becomes the active one.
pub fn advance(
    registry: &mut PlatformRegistry,
    frontier: &mut Frontier,
    player: &mut Player,
    standing_on: usize,
    params: &LevelParams<'_>,
    rng: &mut impl RandomSource,
) -> Spawn {
    let step = pick_step(params.step_lengths, rng);
    let axis = pick_axis(rng);
    let position = next_position(*frontier, axis, step);

    let index = registry.push(Platform::new(
        position,
        params.platform_radius,
        params.platform_height,
    ));
    frontier.last_x = position.x;
    frontier.last_z = position.z;
    player.lane = axis;
    registry.activate(standing_on, params.visible_behind);

    log::debug!(
        "spawned platform {} at {:?} (step {} along {:?})",
        index,
        position,
        step,
        axis
    );
    Spawn {
        index,
        position,
        axis,
        step,
    }
}
