//! Parallax Background
//!
//! Each background layer is a horizontally tiled texture that scrolls at its
//! own speed. One accumulating scroll offset drives every layer:
//!
//! ```text
//! x = -(offset * layer.scroll_speed)   wrapped into (-width, 0]
//! ```
//!
//! Drawing the texture at `x`, `x + width`, ... until the screen is covered
//! gives seamless infinite scrolling however large the offset grows.
//!
//! Layer 0 is the farthest back. Speeds never decrease with the index, so
//! far layers drift slower than near ones.

use crate::backend::{Backend, BackendError, TextureId};
use serde::{Deserialize, Serialize};

/// How a layer's scroll speed derives from its index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpeedPolicy {
    /// `factor * (index + 1)`
    Linear { factor: f32 },
    /// `0.4 + 0.25 * index`
    Smooth,
}

impl Default for SpeedPolicy {
    fn default() -> Self {
        SpeedPolicy::Linear { factor: 0.1 }
    }
}

impl SpeedPolicy {
    pub fn speed_for(&self, index: usize) -> f32 {
        match self {
            SpeedPolicy::Linear { factor } => factor * (index + 1) as f32,
            SpeedPolicy::Smooth => 0.4 + 0.25 * index as f32,
        }
    }
}

/// One repeating background image
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub texture: Option<TextureId>,
    pub active: bool,
    pub width: u32,
    pub height: u32,
    pub position: (f32, f32),
    pub scroll_speed: f32,
}

impl Layer {
    pub fn new(texture: TextureId, width: u32, height: u32, scroll_speed: f32) -> Self {
        Layer {
            texture: Some(texture),
            active: true,
            width,
            height,
            position: (0.0, 0.0),
            scroll_speed,
        }
    }

    /// A slot whose texture could not be produced
    pub fn inactive() -> Self {
        Layer {
            texture: None,
            active: false,
            width: 0,
            height: 0,
            position: (0.0, 0.0),
            scroll_speed: 0.0,
        }
    }

    /// Active with a texture that can be tiled
    pub fn is_drawable(&self) -> bool {
        self.active && self.texture.is_some() && self.width > 0 && self.height > 0
    }
}

/// Wrap a raw x position into `(-width, 0]`
///
/// `width` must be positive. Wrapping happens in `f64` so a huge raw value
/// still lands on the right pixel.
pub fn wrap_position(raw: f64, width: f64) -> f32 {
    let x = raw % width;
    let x = if x > 0.0 { x - width } else { x };
    x as f32
}

/// Accumulates the scroll offset and positions layers from it
///
/// The offset is `f64`: an `f32` stops growing by 1.0 once it reaches 2^24.
#[derive(Debug, Clone, Default)]
pub struct ParallaxScroller {
    offset: f64,
}

impl ParallaxScroller {
    pub fn new() -> Self {
        ParallaxScroller { offset: 0.0 }
    }

    /// Total distance scrolled so far
    #[cfg(test)]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Move the background by `delta` (pixels per frame at speed 1.0)
    pub fn advance(&mut self, delta: f32) {
        self.offset += f64::from(delta);
    }

    /// Wrapped x for `layer`, or `None` for layers that cannot be tiled
    pub fn position_of(&self, layer: &Layer) -> Option<f32> {
        if !layer.is_drawable() {
            return None;
        }
        Some(wrap_position(
            -(self.offset * f64::from(layer.scroll_speed)),
            f64::from(layer.width),
        ))
    }

    /// Store each drawable layer's current position
    pub fn update_layers(&self, layers: &mut [Layer]) {
        for layer in layers.iter_mut() {
            if let Some(x) = self.position_of(layer) {
                layer.position.0 = x;
            }
        }
    }

    /// Draw layers back to front, tiling each across `screen_width`
    ///
    /// Uses the positions stored by [`ParallaxScroller::update_layers`].
    pub fn draw(
        &self,
        layers: &[Layer],
        screen_width: u32,
        backend: &mut impl Backend,
    ) -> Result<(), BackendError> {
        for layer in layers.iter().filter(|l| l.is_drawable()) {
            let Some(texture) = layer.texture else {
                continue;
            };

            let width = layer.width as f32;
            let mut x = layer.position.0;
            while x < screen_width as f32 {
                backend.draw_texture(texture, x, layer.position.1)?;
                x += width;
            }
        }
        Ok(())
    }
}
