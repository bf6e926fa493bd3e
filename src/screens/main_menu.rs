//! Main Menu Screen

use super::{ScreenContext, ScreenKind, Transition};
use crate::backend::{Backend, BackendError};
use crate::gui::{Menu, MenuItem};
use crate::input::MenuAction;
use crate::resources::ResourceSet;

/// Entries of the main menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuOption {
    StartGame,
    Options,
    Exit,
}

impl MainMenuOption {
    const ALL: [MainMenuOption; 3] = [
        MainMenuOption::StartGame,
        MainMenuOption::Options,
        MainMenuOption::Exit,
    ];

    fn label(&self) -> &'static str {
        match self {
            MainMenuOption::StartGame => "START GAME",
            MainMenuOption::Options => "OPTIONS",
            MainMenuOption::Exit => "EXIT",
        }
    }

    fn transition(&self) -> Transition {
        match self {
            MainMenuOption::StartGame => Transition::To(ScreenKind::Game),
            MainMenuOption::Options => Transition::To(ScreenKind::Options),
            MainMenuOption::Exit => Transition::Exit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MainMenu {
    menu: Menu,
}

impl MainMenu {
    pub fn new() -> Self {
        let items = MainMenuOption::ALL
            .iter()
            .map(|option| MenuItem::new(option.label()))
            .collect();

        MainMenu {
            menu: Menu::new("MAIN MENU", items),
        }
    }

    #[cfg(test)]
    pub fn selected_index(&self) -> usize {
        self.menu.selected_index()
    }

    pub fn selected_option(&self) -> MainMenuOption {
        MainMenuOption::ALL[self.menu.selected_index()]
    }

    pub fn update<B: Backend>(&mut self, ctx: &mut ScreenContext<B>) -> Transition {
        self.menu.tick(ctx.dt);

        if ctx.actions.contains(MenuAction::Down) {
            ctx.resources.play_select(ctx.backend);
            self.menu.select_next();
        }
        if ctx.actions.contains(MenuAction::Up) {
            ctx.resources.play_select(ctx.backend);
            self.menu.select_previous();
        }

        if ctx.actions.contains(MenuAction::Confirm) {
            ctx.resources.play_confirm(ctx.backend);
            return self.selected_option().transition();
        }

        Transition::None
    }

    pub fn draw(
        &self,
        backend: &mut impl Backend,
        resources: &ResourceSet,
    ) -> Result<(), BackendError> {
        self.menu.render(backend, resources.font)
    }
}

impl Default for MainMenu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;
    use crate::input::ActionSet;

    fn press(menu: &mut MainMenu, action: MenuAction) -> Transition {
        let mut backend = FakeBackend::new();
        let resources = ResourceSet::default();
        let mut ctx = ScreenContext {
            backend: &mut backend,
            resources: &resources,
            actions: [action].into_iter().collect::<ActionSet>(),
            dt: 1.0 / 60.0,
        };
        menu.update(&mut ctx)
    }

    #[test]
    fn test_starts_on_first_item() {
        let menu = MainMenu::new();
        assert_eq!(menu.selected_index(), 0);
        assert_eq!(menu.selected_option(), MainMenuOption::StartGame);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut menu = MainMenu::new();
        press(&mut menu, MenuAction::Up);
        assert_eq!(menu.selected_index(), 2);
        press(&mut menu, MenuAction::Down);
        assert_eq!(menu.selected_index(), 0);
    }

    #[test]
    fn test_confirm_transitions() {
        let mut menu = MainMenu::new();
        assert_eq!(press(&mut menu, MenuAction::Confirm), Transition::To(ScreenKind::Game));

        press(&mut menu, MenuAction::Down);
        assert_eq!(press(&mut menu, MenuAction::Confirm), Transition::To(ScreenKind::Options));

        press(&mut menu, MenuAction::Down);
        assert_eq!(press(&mut menu, MenuAction::Confirm), Transition::Exit);
    }

    #[test]
    fn test_back_does_nothing() {
        let mut menu = MainMenu::new();
        assert_eq!(press(&mut menu, MenuAction::Back), Transition::None);
    }
}
