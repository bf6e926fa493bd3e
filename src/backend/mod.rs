//! Presentation Backend
//!
//! The game core never talks to SDL2 directly. Everything it needs from a
//! graphics/audio toolkit (textures, fonts, sounds, input edges, window
//! modes, frame pacing) goes through the [`Backend`] trait, so the screens
//! and the parallax scroller can be driven by a fake backend in tests.
//!
//! # Handles
//!
//! Loaded assets are referred to by small `Copy` ids. The backend owns the
//! real objects; unloading an id that is unknown or already released is a
//! no-op, which makes double-release harmless.

pub mod sdl;

#[cfg(test)]
pub mod fake;

use serde::{Deserialize, Serialize};
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use std::fmt;
use std::path::Path;

/// Handle to a texture owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// Handle to a TrueType font owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub usize);

/// Handle to a short sound effect owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId(pub usize);

/// Handle to a streamed music track owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MusicId(pub usize);

/// Font used for a draw or measure call
///
/// `BuiltIn` is the bitmap font in [`crate::text`] and is always available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontRef {
    #[default]
    BuiltIn,
    Loaded(FontId),
}

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Z,
}

/// Window presentation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindowMode {
    #[default]
    Original,
    Maximized,
    Fullscreen,
}

impl WindowMode {
    /// Label shown in the options menu
    pub fn label(&self) -> &'static str {
        match self {
            WindowMode::Original => "Windowed",
            WindowMode::Maximized => "Maximized",
            WindowMode::Fullscreen => "Fullscreen",
        }
    }
}

/// Size, spacing and color for a text draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub spacing: f32,
    pub color: Color,
}

impl TextStyle {
    pub fn new(size: f32, color: Color) -> Self {
        TextStyle {
            size,
            spacing: 2.0,
            color,
        }
    }

    /// Same size and spacing, different color
    pub fn with_color(&self, color: Color) -> Self {
        TextStyle { color, ..*self }
    }
}

/// Errors reported by a presentation backend
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Error string from the underlying toolkit
    Sdl(String),

    /// A handle that was never issued or has been released
    InvalidHandle(&'static str, usize),

    /// The toolkit cannot do what was asked (zero-size texture, etc.)
    Unsupported(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BackendError::Sdl(msg) => write!(f, "SDL error: {}", msg),
            BackendError::InvalidHandle(kind, id) => write!(f, "Invalid {} handle: {}", kind, id),
            BackendError::Unsupported(msg) => write!(f, "Unsupported: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<String> for BackendError {
    fn from(msg: String) -> Self {
        BackendError::Sdl(msg)
    }
}

/// The graphics/audio/input toolkit the game is built on
///
/// One implementation wraps SDL2 ([`sdl::SdlBackend`]); tests use a
/// recording fake. All calls happen on the thread that owns the window.
pub trait Backend {
    // === Assets ===

    /// Whether an asset file is present on disk
    fn file_exists(&self, path: &Path) -> bool;

    fn load_texture(&mut self, path: &Path) -> Result<TextureId, BackendError>;

    /// Generate a solid-color texture (placeholder layers)
    fn create_solid_texture(
        &mut self,
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<TextureId, BackendError>;

    /// Width and height of a live texture, `None` once released
    fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)>;

    fn unload_texture(&mut self, texture: TextureId);

    fn load_font(&mut self, path: &Path) -> Result<FontId, BackendError>;

    fn unload_font(&mut self, font: FontId);

    fn load_sound(&mut self, path: &Path) -> Result<SoundId, BackendError>;

    fn unload_sound(&mut self, sound: SoundId);

    fn load_music(&mut self, path: &Path) -> Result<MusicId, BackendError>;

    fn unload_music(&mut self, music: MusicId);

    // === Audio ===

    fn play_sound(&mut self, sound: SoundId) -> Result<(), BackendError>;

    /// Start looping playback of a music track
    fn play_music(&mut self, music: MusicId) -> Result<(), BackendError>;

    /// Feed the music stream, called once per frame
    fn update_music(&mut self, music: MusicId);

    /// Volume in [0, 1]
    fn set_sound_volume(&mut self, sound: SoundId, volume: f32);

    /// Volume in [0, 1]
    fn set_music_volume(&mut self, music: MusicId, volume: f32);

    // === Drawing ===

    /// Width and height of `text` when drawn with `style`
    fn measure_text(&self, font: FontRef, text: &str, style: &TextStyle) -> (f32, f32);

    fn clear(&mut self, color: Color);

    fn draw_texture(&mut self, texture: TextureId, x: f32, y: f32) -> Result<(), BackendError>;

    fn draw_text(
        &mut self,
        font: FontRef,
        text: &str,
        x: f32,
        y: f32,
        style: &TextStyle,
    ) -> Result<(), BackendError>;

    /// Fill a rectangle, blending when `color.a < 255`
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), BackendError>;

    /// Logical drawing size in pixels
    fn screen_size(&self) -> (u32, u32);

    // === Window and frame ===

    fn set_window_mode(&mut self, mode: WindowMode) -> Result<(), BackendError>;

    /// Pump window events and latch this frame's key presses
    fn begin_frame(&mut self);

    /// Present the frame and wait out the rest of the frame budget
    fn end_frame(&mut self);

    /// True only on the frame the key went down
    fn is_key_pressed(&self, key: Key) -> bool;

    /// Duration of the previous frame in seconds
    fn frame_delta_seconds(&self) -> f32;

    /// The user asked to close the window
    fn close_requested(&self) -> bool;
}
