//! Render-facing platform colours. Nothing here feeds back into the physics.

use serde::{Deserialize, Serialize};

use rand::Rng;

pub const PALETTE_SIZE: usize = 8;

pub type Rgba = [f32; 4];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    colors: [Rgba; PALETTE_SIZE],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: [[0.5, 1.0, 1.0, 1.0]; PALETTE_SIZE],
        }
    }
}

impl Palette {
    pub fn random(rng: &mut impl Rng) -> Self {
        let mut palette = Self::default();
        palette.reroll(rng);
        palette
    }

    /// Fresh opaque random colour for every slot.
    pub fn reroll(&mut self, rng: &mut impl Rng) {
        for c in self.colors.iter_mut() {
            *c = [rng.gen(), rng.gen(), rng.gen(), 1.0];
        }
    }

    /// Colour for the platform at `index`; slots repeat every
    /// [`PALETTE_SIZE`] platforms.
    pub fn color_for(&self, index: usize) -> Rgba {
        self.colors[index % PALETTE_SIZE]
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }
}
