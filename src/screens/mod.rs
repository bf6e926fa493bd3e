//! Screen State Machine
//!
//! Exactly one screen is active at a time. Screens never switch themselves;
//! they return a [`Transition`] and the [`ScreenMachine`] builds the next
//! screen's state. Entering a screen always starts from fresh state, while
//! [`Settings`] survive for the whole session.

pub mod game;
pub mod main_menu;
pub mod options;
pub mod title;

pub use game::GameScreen;
pub use main_menu::MainMenu;
pub use options::OptionsMenu;
pub use title::TitleScreen;

use crate::backend::{Backend, BackendError, WindowMode};
use crate::config::{GameConfig, WindowModeSet};
use crate::input::ActionSet;
use crate::resources::ResourceSet;
use log::debug;

/// Everything a screen may touch during one update
pub struct ScreenContext<'a, B: Backend> {
    pub backend: &'a mut B,
    pub resources: &'a ResourceSet,
    pub actions: ActionSet,
    /// Seconds since the previous frame
    pub dt: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Title,
    MainMenu,
    Options,
    Game,
}

/// Result of a screen update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    To(ScreenKind),
    Exit,
}

/// User choices that outlive a visit to the options screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub music_volume: f32,
    pub sfx_volume: f32,
    pub window_mode: WindowMode,
}

impl Settings {
    pub fn from_config(config: &GameConfig) -> Self {
        Settings {
            music_volume: config.music_volume,
            sfx_volume: config.sfx_volume,
            window_mode: WindowMode::Original,
        }
    }
}

/// Per-screen state
#[derive(Debug, Clone)]
pub enum Screen {
    Title(TitleScreen),
    MainMenu(MainMenu),
    Options(OptionsMenu),
    Game(GameScreen),
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Title(_) => ScreenKind::Title,
            Screen::MainMenu(_) => ScreenKind::MainMenu,
            Screen::Options(_) => ScreenKind::Options,
            Screen::Game(_) => ScreenKind::Game,
        }
    }
}

pub struct ScreenMachine {
    screen: Screen,
    settings: Settings,
    back_hint: &'static str,
    window_modes: WindowModeSet,
    options_back_item: bool,
}

impl ScreenMachine {
    /// Starts on the title screen
    pub fn new(config: &GameConfig) -> Self {
        ScreenMachine {
            screen: Screen::Title(TitleScreen::new()),
            settings: Settings::from_config(config),
            back_hint: config.back_key.hint(),
            window_modes: config.window_modes,
            options_back_item: config.options_back_item,
        }
    }

    pub fn current_kind(&self) -> ScreenKind {
        self.screen.kind()
    }

    #[cfg(test)]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    #[cfg(test)]
    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Opacity of the black overlay, while the title is fading out
    pub fn fade_alpha(&self) -> Option<f32> {
        match &self.screen {
            Screen::Title(title) if title.is_fading() => Some(title.alpha()),
            _ => None,
        }
    }

    /// Run the active screen for one frame and apply its transition
    ///
    /// `Transition::Exit` is passed back to the caller; everything else is
    /// handled here.
    pub fn update<B: Backend>(
        &mut self,
        backend: &mut B,
        resources: &ResourceSet,
        actions: ActionSet,
        dt: f32,
    ) -> Transition {
        let mut ctx = ScreenContext {
            backend,
            resources,
            actions,
            dt,
        };

        let transition = match &mut self.screen {
            Screen::Title(s) => s.update(&mut ctx),
            Screen::MainMenu(s) => s.update(&mut ctx),
            Screen::Options(s) => s.update(&mut ctx),
            Screen::Game(s) => s.update(&mut ctx),
        };

        if let Transition::To(kind) = transition {
            self.enter(kind);
        }
        transition
    }

    fn enter(&mut self, kind: ScreenKind) {
        if let Screen::Options(options) = &self.screen {
            self.settings = options.settings();
        }
        debug!("Screen {:?} -> {:?}", self.screen.kind(), kind);

        self.screen = match kind {
            ScreenKind::Title => Screen::Title(TitleScreen::new()),
            ScreenKind::MainMenu => Screen::MainMenu(MainMenu::new()),
            ScreenKind::Options => Screen::Options(OptionsMenu::new(
                self.settings,
                self.window_modes,
                self.options_back_item,
                self.back_hint,
            )),
            ScreenKind::Game => Screen::Game(GameScreen::new(self.back_hint)),
        };
    }

    pub fn draw(
        &self,
        backend: &mut impl Backend,
        resources: &ResourceSet,
    ) -> Result<(), BackendError> {
        match &self.screen {
            Screen::Title(s) => s.draw(backend, resources),
            Screen::MainMenu(s) => s.draw(backend, resources),
            Screen::Options(s) => s.draw(backend, resources),
            Screen::Game(s) => s.draw(backend, resources),
        }
    }

    /// Selected main menu row, when the main menu is showing
    #[cfg(test)]
    pub fn main_menu_selection(&self) -> Option<usize> {
        match &self.screen {
            Screen::MainMenu(menu) => Some(menu.selected_index()),
            _ => None,
        }
    }
}
