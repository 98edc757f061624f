//! The game world: single owner of every piece of simulation state, and the
//! Playing/GameOver state machine that gates the per-frame pipeline.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::camera::CameraTarget;
use crate::charge;
use crate::config::GameConfig;
use crate::error::{ConfigError, StepError};
use crate::game::{Frontier, Lane, Phase, Platform, PlatformRegistry, Player};
use crate::kinematics;
use crate::landing::{self, Contact, LandingHeights};
use crate::level::{self, LevelParams, RandomSource, Spawn};
use crate::palette::{Palette, Rgba};

/// Something that happened during a frame, for the host to react to.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameEvent {
    Launched { velocity: Vec3, lane: Lane },
    Landed { platform: usize, position: Vec3 },
    PlatformSpawned { platform: usize, position: Vec3, lane: Lane },
    CameraMoved { eye: Vec3, focus: Vec3 },
    GameOver { landings: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    pub phase: Phase,
    /// The player ended the frame on a platform.
    pub on_block: bool,
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub frame_id: u64,
    pub phase: Phase,
    pub player: Player,
    pub platforms: Vec<PlatformView>,
    pub camera: CameraTarget,
    pub landings: u32,
    /// False until the first launch.
    pub started: bool,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PlatformView {
    pub position: Vec3,
    pub radius: f32,
    pub height: f32,
    pub active: bool,
    pub visible: bool,
    pub color: Rgba,
}

const PALETTE_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

pub struct GameWorld<R: RandomSource = StdRng> {
    config: GameConfig,
    phase: Phase,
    frame_id: u64,
    player: Player,
    platforms: PlatformRegistry,
    frontier: Frontier,
    camera: CameraTarget,
    palette: Palette,
    /// Colours only. Kept apart from `rng` so recolouring never shifts the
    /// level layout.
    palette_rng: StdRng,
    rng: R,
    /// Set by `release_jump`, consumed by the next `tick`.
    pending_release: bool,
    on_block: bool,
    started: bool,
    landings: u32,
    frame_events: Vec<FrameEvent>,
}

impl GameWorld<StdRng> {
    /// Fresh run seeded from `config.seed`, or from entropy if unset.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: RandomSource> GameWorld<R> {
    /// Fresh run: the player stands on a start platform at the origin and the
    /// first target platform has already been generated.
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        let mut platforms = PlatformRegistry::new();
        platforms.push(Platform::new(
            Vec3::ZERO,
            config.platform_radius,
            config.platform_height,
        ));
        let player = Player::standing_at(Vec3::new(0.0, config.landing_height, 0.0), Lane::X);

        let mut world = Self::from_parts(config, player, platforms, rng)?;
        world.spawn_next(0);
        world.frame_events.clear();
        log::info!(
            "new run: {} platforms, next lane {:?}",
            world.platforms.len(),
            world.player.lane
        );
        Ok(world)
    }

    /// World built around an arbitrary player and registry. The frontier is
    /// taken from the last platform and the camera is placed on the player.
    /// No platform is generated here.
    pub fn from_parts(
        config: GameConfig,
        player: Player,
        platforms: PlatformRegistry,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let frontier = platforms
            .as_slice()
            .last()
            .map(|p| Frontier {
                last_x: p.position.x,
                last_z: p.position.z,
            })
            .unwrap_or_default();
        let camera = CameraTarget::new(config.camera_offset, player.position);
        let mut palette_rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ PALETTE_SEED_SALT),
            None => StdRng::from_entropy(),
        };
        let palette = Palette::random(&mut palette_rng);
        Ok(Self {
            config,
            phase: Phase::Playing,
            frame_id: 0,
            player,
            platforms,
            frontier,
            camera,
            palette,
            palette_rng,
            rng,
            pending_release: false,
            on_block: !player.falling,
            started: false,
            landings: 0,
            frame_events: Vec::new(),
        })
    }

    /// One frame of held jump input.
    pub fn charge_jump(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        charge::charge(&self.config, &mut self.player);
    }

    /// Jump key released. The launch happens on the next `tick`.
    pub fn release_jump(&mut self) {
        if self.phase != Phase::Playing || self.player.falling {
            return;
        }
        self.pending_release = true;
    }

    /// New random platform colours. Has no effect on the simulation.
    pub fn change_color(&mut self) {
        self.palette.reroll(&mut self.palette_rng);
    }

    /// Advances the world by `dt` simulation units. Once the run is over this
    /// returns immediately without touching anything.
    pub fn tick(&mut self, dt: f32) -> Result<FrameReport, StepError> {
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("rejected frame delta {}", dt);
            return Err(StepError::InvalidDelta(dt));
        }
        if self.phase == Phase::GameOver {
            self.pending_release = false;
            return Ok(self.report());
        }

        self.frame_id += 1;
        self.frame_events.clear();
        log::trace!("tick: frame_id={} dt={}", self.frame_id, dt);

        let mut launched = false;
        if std::mem::take(&mut self.pending_release) {
            if let Some(velocity) = charge::release(&self.config, &mut self.player) {
                launched = true;
                self.started = true;
                self.frame_events.push(FrameEvent::Launched {
                    velocity,
                    lane: self.player.lane,
                });
            }
        }

        kinematics::integrate(&mut self.player, self.config.gravity, dt);

        let heights = LandingHeights {
            landing: self.config.landing_height,
            death: self.config.death_height,
        };
        // The launch frame starts at the platform top; testing it would put
        // the player straight back down on a zero delta.
        let contact = if launched {
            Contact::Airborne
        } else {
            landing::detect(&mut self.player, &self.platforms, heights)
        };
        match contact {
            Contact::Landed(index) => self.on_landed(index),
            Contact::Dead => self.game_over(),
            Contact::Standing | Contact::Airborne => {}
        }
        self.on_block = contact.on_block();

        Ok(self.report())
    }

    fn on_landed(&mut self, index: usize) {
        self.landings += 1;
        self.frame_events.push(FrameEvent::Landed {
            platform: index,
            position: self.player.position,
        });
        self.spawn_next(index);
        self.camera.hop_to(self.player.position);
        self.frame_events.push(FrameEvent::CameraMoved {
            eye: self.camera.eye,
            focus: self.camera.focus,
        });
    }

    fn spawn_next(&mut self, standing_on: usize) -> Spawn {
        let params = LevelParams {
            step_lengths: &self.config.step_lengths,
            platform_radius: self.config.platform_radius,
            platform_height: self.config.platform_height,
            visible_behind: self.config.visible_behind,
        };
        let spawn = level::advance(
            &mut self.platforms,
            &mut self.frontier,
            &mut self.player,
            standing_on,
            &params,
            &mut self.rng,
        );
        self.frame_events.push(FrameEvent::PlatformSpawned {
            platform: spawn.index,
            position: spawn.position,
            lane: spawn.axis,
        });
        spawn
    }

    fn game_over(&mut self) {
        self.phase = Phase::GameOver;
        log::info!(
            "game over at {:?} after {} landings",
            self.player.position,
            self.landings
        );
        self.frame_events.push(FrameEvent::GameOver {
            landings: self.landings,
        });
    }

    fn report(&self) -> FrameReport {
        FrameReport {
            phase: self.phase,
            on_block: self.on_block,
        }
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            frame_id: self.frame_id,
            phase: self.phase,
            player: self.player,
            platforms: self
                .platforms
                .as_slice()
                .iter()
                .enumerate()
                .map(|(i, p)| PlatformView {
                    position: p.position,
                    radius: p.radius,
                    height: p.height,
                    active: p.active,
                    visible: p.visible,
                    color: self.palette.color_for(i),
                })
                .collect(),
            camera: self.camera,
            landings: self.landings,
            started: self.started,
        }
    }

    pub fn events(&self) -> &[FrameEvent] {
        &self.frame_events
    }

    pub fn drain_events(&mut self) -> Vec<FrameEvent> {
        std::mem::take(&mut self.frame_events)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn platforms(&self) -> &PlatformRegistry {
        &self.platforms
    }

    pub fn frontier(&self) -> Frontier {
        self.frontier
    }

    pub fn camera(&self) -> &CameraTarget {
        &self.camera
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn on_block(&self) -> bool {
        self.on_block
    }

    pub fn landings(&self) -> u32 {
        self.landings
    }

    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::tests::Scripted;
    use approx::assert_relative_eq;

    fn seeded() -> GameWorld {
        let config = GameConfig {
            seed: Some(11),
            ..GameConfig::default()
        };
        GameWorld::new(config).unwrap()
    }

    #[test]
    fn new_run_has_start_platform_and_one_target() {
        let world = seeded();
        assert_eq!(world.platforms().len(), 2);
        assert_eq!(world.platforms().active_index(), Some(0));
        assert_eq!(world.phase(), Phase::Playing);
        assert!(world.on_block());
        assert!(world.events().is_empty());
        assert_eq!(world.camera().focus, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn release_launches_on_next_tick_only() {
        let mut world = seeded();
        world.release_jump();
        assert!(!world.player().falling);
        let report = world.tick(0.0).unwrap();
        assert!(world.player().falling);
        assert!(!report.on_block);
        assert_eq!(world.player().charge_ticks, 0);
        assert!(matches!(world.events(), [FrameEvent::Launched { .. }]));
    }

    #[test]
    fn charge_accumulates_until_release() {
        let mut world = seeded();
        for _ in 0..20 {
            world.charge_jump();
            world.tick(0.16).unwrap();
        }
        assert_eq!(world.player().charge_ticks, 20);
        assert!(world.player().squash < 1.0);
        world.release_jump();
        world.tick(0.0).unwrap();
        let v = world.player().velocity;
        let speed = v.x.abs().max(v.z.abs());
        assert_relative_eq!(speed, 2.0);
    }

    #[test]
    fn charge_is_ignored_while_falling() {
        let mut world = seeded();
        world.release_jump();
        world.tick(0.1).unwrap();
        world.charge_jump();
        world.release_jump();
        assert_eq!(world.player().charge_ticks, 0);
        world.tick(0.1).unwrap();
        assert!(world.events().is_empty());
    }

    #[test]
    fn negative_or_nan_delta_is_rejected_without_side_effects() {
        let mut world = seeded();
        world.release_jump();
        assert_eq!(world.tick(-1.0), Err(StepError::InvalidDelta(-1.0)));
        assert!(world.tick(f32::NAN).is_err());
        assert_eq!(world.frame_id(), 0);
        assert!(!world.player().falling);
    }

    #[test]
    fn perfect_jump_lands_spawns_and_moves_camera() {
        // Target 10 along X from the start platform: step flips (tails, heads),
        // axis flip heads. The next spawn: step 5 along Z.
        let flips = [false, true, true, true, false];
        let mut world =
            GameWorld::with_rng(GameConfig::default(), Scripted::new(&flips)).unwrap();
        assert_eq!(world.player().lane, Lane::X);
        assert_eq!(world.frontier(), Frontier { last_x: 10.0, last_z: 0.0 });

        for _ in 0..20 {
            world.charge_jump();
        }
        world.release_jump();
        let mut landed = false;
        for _ in 0..200 {
            let report = world.tick(0.05).unwrap();
            if report.on_block {
                landed = true;
                break;
            }
        }
        assert!(landed, "expected to land, player at {:?}", world.player().position);
        assert_eq!(world.player().position, Vec3::new(10.0, 1.0, 0.0));
        assert_eq!(world.landings(), 1);
        assert_eq!(world.platforms().active_index(), Some(1));
        assert_eq!(world.platforms().active_count(), 1);
        assert_eq!(world.platforms().len(), 3);
        assert_eq!(world.player().lane, Lane::Z);
        assert_eq!(world.frontier(), Frontier { last_x: 10.0, last_z: -5.0 });
        assert_eq!(world.camera().eye, Vec3::new(10.0, 11.0, 20.0));
        assert_eq!(world.camera().eye - world.camera().focus, world.camera().offset());
        assert!(world
            .events()
            .iter()
            .any(|e| matches!(e, FrameEvent::CameraMoved { .. })));
    }

    #[test]
    fn camera_does_not_track_mid_air() {
        let mut world = seeded();
        let before = *world.camera();
        world.release_jump();
        for _ in 0..3 {
            world.tick(0.1).unwrap();
            assert!(world.player().falling);
            assert_eq!(*world.camera(), before);
        }
    }

    #[test]
    fn game_over_freezes_everything() {
        let mut world = GameWorld::from_parts(
            GameConfig::default(),
            Player::standing_at(Vec3::new(0.0, 1.0, 0.0), Lane::X),
            PlatformRegistry::new(),
            Scripted::new(&[]),
        )
        .unwrap();
        world.release_jump();
        let mut report = world.tick(0.1).unwrap();
        for _ in 0..500 {
            if report.phase == Phase::GameOver {
                break;
            }
            report = world.tick(0.1).unwrap();
        }
        assert_eq!(report.phase, Phase::GameOver);
        assert!(matches!(
            world.events().last(),
            Some(FrameEvent::GameOver { landings: 0 })
        ));

        let frozen = world.snapshot();
        world.charge_jump();
        world.release_jump();
        world.tick(1.0).unwrap();
        assert_eq!(world.phase(), Phase::GameOver);
        assert_eq!(world.player().position, frozen.player.position);
        assert_eq!(world.player().charge_ticks, 0);
        assert_eq!(world.frame_id(), frozen.frame_id);

        // Recolouring is render-only and still works after the run ends.
        let colours = world.palette().clone();
        world.change_color();
        assert_ne!(*world.palette(), colours);
        assert_eq!(world.player().position, frozen.player.position);
    }

    #[test]
    fn change_color_leaves_physics_alone() {
        let mut world = seeded();
        let before = world.snapshot();
        world.change_color();
        let after = world.snapshot();
        assert_ne!(before.platforms[0].color, after.platforms[0].color);
        assert_eq!(before.player.position, after.player.position);
        assert_eq!(before.platforms.len(), after.platforms.len());
    }

    #[test]
    fn change_color_does_not_shift_the_next_spawn() {
        for seed in 0..20u64 {
            let build = || {
                let mut registry = PlatformRegistry::new();
                registry.push(Platform::new(Vec3::ZERO, 1.5, 1.0));
                let mut player = Player::standing_at(Vec3::new(0.0, 4.0, 0.0), Lane::X);
                player.velocity = Vec3::new(0.0, -1.0, 0.0);
                player.falling = true;
                let config = GameConfig {
                    seed: Some(seed),
                    ..GameConfig::default()
                };
                GameWorld::from_parts(config, player, registry, StdRng::seed_from_u64(seed))
                    .unwrap()
            };
            let mut plain = build();
            let mut recoloured = build();
            let colours_before = recoloured.palette().clone();
            recoloured.change_color();
            assert_ne!(*recoloured.palette(), colours_before);

            for world in [&mut plain, &mut recoloured] {
                while !world.tick(0.1).unwrap().on_block {}
            }
            let newest = |w: &GameWorld| *w.platforms().as_slice().last().unwrap();
            assert_eq!(newest(&plain).position, newest(&recoloured).position, "seed {seed}");
            assert_eq!(plain.player().lane, recoloured.player().lane, "seed {seed}");
            assert_eq!(plain.frontier(), recoloured.frontier(), "seed {seed}");
        }
    }

    #[test]
    fn snapshot_marks_start_after_first_launch() {
        let mut world = seeded();
        assert!(!world.snapshot().started);
        world.release_jump();
        world.tick(0.0).unwrap();
        assert!(world.snapshot().started);
    }
}
