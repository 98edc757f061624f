use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Horizontal axis a jump travels along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lane {
    X,
    Z,
}

impl Lane {
    /// Component of `v` that the landing test compares on this lane.
    #[inline]
    pub fn component(self, v: Vec3) -> f32 {
        match self {
            Lane::X => v.x,
            Lane::Z => v.z,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Playing,
    /// Terminal. Nothing moves once here.
    GameOver,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Player {
    /// Centre of the bottom face of the player volume.
    pub position: Vec3,
    pub velocity: Vec3,
    /// Frames the jump key has been held. Always 0 while `falling`.
    pub charge_ticks: u32,
    pub falling: bool,
    /// Render-only deformation, 1.0 at rest.
    pub squash: f32,
    /// Lane of the next (or current) jump.
    pub lane: Lane,
}

impl Player {
    pub fn standing_at(position: Vec3, lane: Lane) -> Self {
        Player {
            position,
            velocity: Vec3::ZERO,
            charge_ticks: 0,
            falling: false,
            squash: 1.0,
            lane,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Platform {
    /// Centre of the bottom face.
    pub position: Vec3,
    pub radius: f32,
    pub height: f32,
    pub active: bool,
    pub visible: bool,
}

impl Platform {
    pub fn new(position: Vec3, radius: f32, height: f32) -> Self {
        Platform {
            position,
            radius,
            height,
            active: false,
            visible: true,
        }
    }

    /// Slab test along a single lane axis: the other axis is ignored.
    #[inline]
    pub fn overlaps(&self, lane: Lane, point: Vec3) -> bool {
        (lane.component(self.position) - lane.component(point)).abs() <= self.radius
    }
}

/// Running coordinates of the most recently placed platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontier {
    pub last_x: f32,
    pub last_z: f32,
}

/// Insertion-ordered platform list. Platforms are only ever appended; the
/// order decides which platform wins a landing scan.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlatformRegistry {
    platforms: Vec<Platform>,
}

impl PlatformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, platform: Platform) -> usize {
        self.platforms.push(platform);
        self.platforms.len() - 1
    }

    pub fn as_slice(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn get(&self, index: usize) -> Option<&Platform> {
        self.platforms.get(index)
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    /// Index of the first platform, in insertion order, whose slab on `lane`
    /// contains `point`. Earlier platforms win even if a later one is nearer.
    pub fn first_overlap(&self, lane: Lane, point: Vec3) -> Option<usize> {
        self.platforms.iter().position(|p| p.overlaps(lane, point))
    }

    pub fn active_index(&self) -> Option<usize> {
        self.platforms.iter().position(|p| p.active)
    }

    pub fn active_count(&self) -> usize {
        self.platforms.iter().filter(|p| p.active).count()
    }

    /// Clears every `active` flag and sets it on `index` alone. Platforms more
    /// than `visible_behind` places before it are hidden.
    pub fn activate(&mut self, index: usize, visible_behind: usize) {
        for (i, p) in self.platforms.iter_mut().enumerate() {
            p.active = i == index;
            p.visible = i + visible_behind >= index;
        }
    }
}
