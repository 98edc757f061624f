//! Landing detection against the platform registry.

use crate::game::{Platform, PlatformRegistry, Player};

/// Result of one landing check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    /// Player was not airborne; nothing was tested.
    Standing,
    /// Still in the air, either above the platform tops or between them and
    /// the death height with nothing underneath.
    Airborne,
    /// Snapped onto the platform at this registry index.
    Landed(usize),
    /// Dropped to the death height with no platform underneath.
    Dead,
}

impl Contact {
    /// True when the player ends the frame on top of a platform.
    pub fn on_block(self) -> bool {
        matches!(self, Contact::Standing | Contact::Landed(_))
    }
}

/// Heights that drive the landing test.
#[derive(Clone, Copy, Debug)]
pub struct LandingHeights {
    pub landing: f32,
    pub death: f32,
}

/// Tests an airborne player against `registry` and snaps on a hit.
///
/// The test fires once the player is at or below the platform top. The
/// registry is scanned in insertion order along the player's lane
/// and the first overlapping platform wins, even an old one the player has
/// already passed.
pub fn detect(player: &mut Player, registry: &PlatformRegistry, heights: LandingHeights) -> Contact {
    if !player.falling {
        return Contact::Standing;
    }
    if player.position.y > heights.landing {
        return Contact::Airborne;
    }

    match registry.first_overlap(player.lane, player.position) {
        Some(index) => {
            if let Some(platform) = registry.get(index) {
                snap(player, platform, heights.landing);
            }
            log::debug!("landed on platform {} at {:?}", index, player.position);
            Contact::Landed(index)
        }
        None if player.position.y <= heights.death => {
            log::debug!("no platform under {:?}", player.position);
            Contact::Dead
        }
        None => Contact::Airborne,
    }
}

fn snap(player: &mut Player, platform: &Platform, landing_height: f32) {
    player.position.x = platform.position.x;
    player.position.y = landing_height;
    player.position.z = platform.position.z;
    player.velocity = glam::Vec3::ZERO;
    player.falling = false;
    player.squash = 1.0;
}
