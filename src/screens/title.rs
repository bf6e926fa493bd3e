//! Title Screen
//!
//! Shows the game title and a blinking prompt. Confirm starts a fade to
//! black; the switch to the main menu happens only when the fade completes.

use super::{ScreenContext, ScreenKind, Transition};
use crate::backend::{Backend, BackendError, TextStyle};
use crate::gui::{draw_centered_text, BlinkTimer, WHITE};
use crate::input::MenuAction;
use crate::resources::ResourceSet;

const TITLE: &str = "PARALLAX BACKGROUND";
const PROMPT: &str = "PRESS ENTER TO CONTINUE";

/// Alpha added per frame while fading out
pub const FADE_STEP: f32 = 0.05;

/// Frames from transparent to opaque (1.0 / FADE_STEP)
pub const FADE_FRAMES: u32 = 20;

#[derive(Debug, Clone, Default)]
pub struct TitleScreen {
    blink: BlinkTimer,
    fade_out: bool,
    fade_frames: u32,
}

impl TitleScreen {
    pub fn new() -> Self {
        TitleScreen::default()
    }

    pub fn is_fading(&self) -> bool {
        self.fade_out
    }

    /// Current fade opacity in [0, 1]
    pub fn alpha(&self) -> f32 {
        self.fade_frames as f32 * FADE_STEP
    }

    /// Frame-counted so the fade always takes exactly `FADE_FRAMES` updates,
    /// with no float accumulation error.
    fn step_fade(&mut self) -> bool {
        self.fade_frames += 1;
        if self.fade_frames >= FADE_FRAMES {
            self.fade_frames = 0;
            self.fade_out = false;
            return true;
        }
        false
    }

    pub fn update<B: Backend>(&mut self, ctx: &mut ScreenContext<B>) -> Transition {
        self.blink.tick(ctx.dt);

        if self.fade_out {
            if self.step_fade() {
                return Transition::To(ScreenKind::MainMenu);
            }
        } else if ctx.actions.contains(MenuAction::Confirm) {
            ctx.resources.play_confirm(ctx.backend);
            self.fade_out = true;
        }

        Transition::None
    }

    pub fn draw(
        &self,
        backend: &mut impl Backend,
        resources: &ResourceSet,
    ) -> Result<(), BackendError> {
        let font = resources.font;
        let (_, screen_h) = backend.screen_size();

        draw_centered_text(backend, font, TITLE, 30.0, &TextStyle::new(40.0, WHITE))?;

        if self.blink.is_on() {
            let y = screen_h as f32 - 100.0;
            draw_centered_text(backend, font, PROMPT, y, &TextStyle::new(20.0, WHITE))?;
        }

        Ok(())
    }
}
