//! Screen-Space GUI Helpers
//!
//! Building blocks shared by every screen:
//! - [`Menu`] - cyclic selection with a blinking highlight
//! - [`BlinkTimer`] - the one-second blink cycle used for prompts and highlights
//! - [`draw_shadowed_text`] / [`draw_centered_text`] - text with a 2px drop shadow
//!
//! Everything draws through the [`Backend`] trait, never SDL2 directly.

pub mod menu;

pub use menu::{BlinkTimer, Menu, MenuItem};

use crate::backend::{Backend, BackendError, FontRef, TextStyle};
use sdl2::pixels::Color;

/// Offset of the drop shadow in pixels
pub const SHADOW_OFFSET: f32 = 2.0;

pub const WHITE: Color = Color::RGB(255, 255, 255);
pub const BLACK: Color = Color::RGB(0, 0, 0);
pub const YELLOW: Color = Color::RGB(253, 249, 0);
pub const GOLD: Color = Color::RGB(255, 203, 0);

/// Draw text with a black shadow behind it
pub fn draw_shadowed_text(
    backend: &mut impl Backend,
    font: FontRef,
    text: &str,
    x: f32,
    y: f32,
    style: &TextStyle,
) -> Result<(), BackendError> {
    backend.draw_text(
        font,
        text,
        x + SHADOW_OFFSET,
        y + SHADOW_OFFSET,
        &style.with_color(BLACK),
    )?;
    backend.draw_text(font, text, x, y, style)
}

/// X that horizontally centres `text` on `center_x`
pub fn centered_x(
    backend: &impl Backend,
    font: FontRef,
    text: &str,
    center_x: f32,
    style: &TextStyle,
) -> f32 {
    let (width, _) = backend.measure_text(font, text, style);
    center_x - width / 2.0
}

/// Shadowed text centred horizontally on the screen
pub fn draw_centered_text(
    backend: &mut impl Backend,
    font: FontRef,
    text: &str,
    y: f32,
    style: &TextStyle,
) -> Result<(), BackendError> {
    let center_x = backend.screen_size().0 as f32 / 2.0;
    let x = centered_x(&*backend, font, text, center_x, style);
    draw_shadowed_text(backend, font, text, x, y, style)
}
