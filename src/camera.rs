use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Where the renderer should look from and at.
///
/// Only moves when [`CameraTarget::hop_to`] is called, which the world does
/// once per landing. There is no per-frame tracking or easing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraTarget {
    pub eye: Vec3,
    pub focus: Vec3,
    offset: Vec3,
}

impl CameraTarget {
    pub fn new(offset: Vec3, focus: Vec3) -> Self {
        Self {
            eye: focus + offset,
            focus,
            offset,
        }
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn hop_to(&mut self, focus: Vec3) {
        self.focus = focus;
        self.eye = focus + self.offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hop_keeps_fixed_offset() {
        let mut cam = CameraTarget::new(Vec3::new(0.0, 10.0, 20.0), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(cam.eye, Vec3::new(0.0, 11.0, 20.0));
        cam.hop_to(Vec3::new(15.0, 1.0, -5.0));
        assert_eq!(cam.focus, Vec3::new(15.0, 1.0, -5.0));
        assert_eq!(cam.eye, Vec3::new(15.0, 11.0, 15.0));
    }
}
