//! Lane Hopper: charge a jump, hop along one of two lanes, land on the next
//! platform or fall off the world.
//!
//! [`GameWorld`] owns the whole simulation. A host calls the input methods
//! ([`GameWorld::charge_jump`], [`GameWorld::release_jump`],
//! [`GameWorld::change_color`]) as keys arrive, then [`GameWorld::tick`] once
//! per rendered frame, and draws from [`GameWorld::snapshot`].

pub mod camera;
pub mod charge;
pub mod config;
pub mod error;
pub mod game;
pub mod kinematics;
pub mod landing;
pub mod level;
pub mod palette;
pub mod world;

pub use camera::CameraTarget;
pub use config::{ChargeTier, GameConfig};
pub use error::{ConfigError, StepError};
pub use game::{Frontier, Lane, Phase, Platform, PlatformRegistry, Player};
pub use level::RandomSource;
pub use world::{FrameEvent, FrameReport, GameWorld, PlatformView, RenderSnapshot};
