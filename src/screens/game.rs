//! Game Screen
//!
//! Placeholder for gameplay: a heading over the scrolling background and a
//! hint for getting back to the menu.

use super::{ScreenContext, ScreenKind, Transition};
use crate::backend::{Backend, BackendError, TextStyle};
use crate::gui::{draw_centered_text, WHITE};
use crate::input::MenuAction;
use crate::resources::ResourceSet;

#[derive(Debug, Clone)]
pub struct GameScreen {
    back_hint: String,
}

impl GameScreen {
    pub fn new(back_hint: &str) -> Self {
        GameScreen {
            back_hint: format!("{} to menu", back_hint),
        }
    }

    pub fn update<B: Backend>(&mut self, ctx: &mut ScreenContext<B>) -> Transition {
        if ctx.actions.contains(MenuAction::Back) {
            ctx.resources.play_select(ctx.backend);
            return Transition::To(ScreenKind::MainMenu);
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

        draw_centered_text(backend, font, "GAME SCREEN", 40.0, &TextStyle::new(30.0, WHITE))?;
        draw_centered_text(
            backend,
            font,
            &self.back_hint,
            screen_h as f32 - 100.0,
            &TextStyle::new(20.0, WHITE),
        )
    }
}
