//! Base Menu Component
//!
//! A vertical list of items with keyboard selection. The selected item
//! flashes between two colors on a one-second cycle and gets a `>` marker.

use super::{draw_centered_text, draw_shadowed_text, GOLD, WHITE, YELLOW};
use crate::backend::{Backend, BackendError, FontRef, TextStyle};
use sdl2::pixels::Color;

/// Seconds per blink cycle
const BLINK_PERIOD: f32 = 1.0;

/// Highlight shows its first color while the timer is below this
const BLINK_ON: f32 = 0.7;

/// Timer cycling through `[0, 1)` seconds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BlinkTimer {
    time: f32,
}

impl BlinkTimer {
    pub fn new() -> Self {
        BlinkTimer { time: 0.0 }
    }

    /// Advance by `dt` seconds, restarting the cycle once it completes
    pub fn tick(&mut self, dt: f32) {
        self.time += dt;
        if self.time >= BLINK_PERIOD {
            self.time = 0.0;
        }
    }

    #[cfg(test)]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// First part of the cycle
    pub fn is_on(&self) -> bool {
        self.time < BLINK_ON
    }
}

/// Configuration for menu appearance
#[derive(Debug, Clone)]
pub struct MenuStyle {
    pub title_size: f32,
    pub item_size: f32,
    /// Title baseline from the top of the screen
    pub title_y: f32,
    /// First item relative to the vertical centre
    pub first_item_offset: f32,
    pub item_spacing: f32,
    /// Gap between the `>` marker and the item text
    pub marker_gap: f32,

    pub title_color: Color,
    pub item_color: Color,
    /// Selected color during the "on" part of the blink
    pub selected_color: Color,
    /// Selected color during the rest of the blink
    pub selected_alt_color: Color,
}

impl Default for MenuStyle {
    fn default() -> Self {
        MenuStyle {
            title_size: 30.0,
            item_size: 30.0,
            title_y: 40.0,
            first_item_offset: -60.0,
            item_spacing: 80.0,
            marker_gap: 40.0,
            title_color: WHITE,
            item_color: WHITE,
            selected_color: YELLOW,
            selected_alt_color: GOLD,
        }
    }
}

/// A menu item
#[derive(Debug, Clone)]
pub struct MenuItem {
    pub text: String,
}

impl MenuItem {
    pub fn new(text: impl Into<String>) -> Self {
        MenuItem { text: text.into() }
    }
}

/// A stateful menu
///
/// Selection wraps in both directions, so `select_next` followed by
/// `select_previous` always returns to the same item.
#[derive(Debug, Clone)]
pub struct Menu {
    title: String,
    items: Vec<MenuItem>,
    selected_index: usize,
    blink: BlinkTimer,
    style: MenuStyle,
}

impl Menu {
    /// Creates a new menu with default styling
    ///
    /// An empty `items` list builds a menu whose navigation does nothing.
    pub fn new(title: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self::with_style(title, items, MenuStyle::default())
    }

    pub fn with_style(title: impl Into<String>, items: Vec<MenuItem>, style: MenuStyle) -> Self {
        Menu {
            title: title.into(),
            items,
            selected_index: 0,
            blink: BlinkTimer::new(),
            style,
        }
    }

    /// Move selection up (wraps to bottom)
    pub fn select_previous(&mut self) {
        let n = self.items.len();
        if n == 0 {
            return;
        }
        self.selected_index = (self.selected_index + n - 1) % n;
    }

    /// Move selection down (wraps to top)
    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected_index = (self.selected_index + 1) % self.items.len();
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Advance the highlight blink
    pub fn tick(&mut self, dt: f32) {
        self.blink.tick(dt);
    }

    /// Color for item `index` this frame
    pub fn item_color(&self, index: usize) -> Color {
        if index != self.selected_index {
            self.style.item_color
        } else if self.blink.is_on() {
            self.style.selected_color
        } else {
            self.style.selected_alt_color
        }
    }

    /// Title at the top, items stacked around the vertical centre
    pub fn render(&self, backend: &mut impl Backend, font: FontRef) -> Result<(), BackendError> {
        let title_style = TextStyle::new(self.style.title_size, self.style.title_color);
        draw_centered_text(backend, font, &self.title, self.style.title_y, &title_style)?;

        let (screen_w, screen_h) = backend.screen_size();
        let center_x = screen_w as f32 / 2.0;
        let start_y = screen_h as f32 / 2.0 + self.style.first_item_offset;

        for (i, item) in self.items.iter().enumerate() {
            let style = TextStyle::new(self.style.item_size, self.item_color(i));
            let (width, _) = backend.measure_text(font, &item.text, &style);
            let x = center_x - width / 2.0;
            let y = start_y + i as f32 * self.style.item_spacing;

            draw_shadowed_text(backend, font, &item.text, x, y, &style)?;

            if i == self.selected_index {
                backend.draw_text(font, ">", x - self.style.marker_gap, y, &style)?;
            }
        }

        Ok(())
    }
}
