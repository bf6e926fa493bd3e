//! Options Screen
//!
//! Music volume, sound-effect volume and window mode. Every adjustment is
//! applied to the backend on the spot; there is no separate "apply" step.
//! Once anything changes, the title shows a `*` for the rest of the visit.

use super::{ScreenContext, ScreenKind, Settings, Transition};
use crate::backend::{Backend, BackendError, TextStyle};
use crate::config::WindowModeSet;
use crate::gui::{centered_x, draw_shadowed_text, Menu, MenuItem, WHITE};
use crate::input::MenuAction;
use crate::resources::ResourceSet;
use log::{info, warn};
use sdl2::pixels::Color;
use sdl2::rect::Rect;

/// Volume change per left/right press
pub const VOLUME_STEP: f32 = 0.1;

const BOX_WIDTH: u32 = 500;
const BOX_HEIGHT: u32 = 250;
const BOX_COLOR: Color = Color::RGBA(0, 0, 0, 180);
const ROW_SPACING: f32 = 40.0;

/// Rows of the options list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionItem {
    MusicVolume,
    SfxVolume,
    WindowMode,
    Back,
}

impl OptionItem {
    fn label(&self) -> &'static str {
        match self {
            OptionItem::MusicVolume => "Music Volume",
            OptionItem::SfxVolume => "SFX Volume",
            OptionItem::WindowMode => "Window Mode",
            OptionItem::Back => "Back",
        }
    }
}

/// Step a volume by `delta`, snapped to tenths and clamped to [0, 1]
pub fn step_volume(volume: f32, delta: f32) -> f32 {
    (((volume + delta) * 10.0).round() / 10.0).clamp(0.0, 1.0)
}

fn percent(volume: f32) -> String {
    format!("{:.0}%", volume * 100.0)
}

#[derive(Debug, Clone)]
pub struct OptionsMenu {
    items: Vec<OptionItem>,
    menu: Menu,
    settings: Settings,
    window_modes: WindowModeSet,
    back_hint: &'static str,
    changed: bool,
}

impl OptionsMenu {
    pub fn new(
        settings: Settings,
        window_modes: WindowModeSet,
        back_item: bool,
        back_hint: &'static str,
    ) -> Self {
        let mut items = vec![
            OptionItem::MusicVolume,
            OptionItem::SfxVolume,
            OptionItem::WindowMode,
        ];
        if back_item {
            items.push(OptionItem::Back);
        }
        let menu_items = items.iter().map(|item| MenuItem::new(item.label())).collect();

        OptionsMenu {
            items,
            menu: Menu::new("OPTIONS", menu_items),
            settings,
            window_modes,
            back_hint,
            changed: false,
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    #[cfg(test)]
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn selected_item(&self) -> OptionItem {
        self.items[self.menu.selected_index()]
    }

    fn adjust<B: Backend>(&mut self, ctx: &mut ScreenContext<B>, forward: bool) {
        let delta = if forward { VOLUME_STEP } else { -VOLUME_STEP };

        match self.selected_item() {
            OptionItem::MusicVolume => {
                self.settings.music_volume = step_volume(self.settings.music_volume, delta);
                ctx.resources
                    .apply_music_volume(ctx.backend, self.settings.music_volume);
                info!("Music volume: {}", percent(self.settings.music_volume));
            }
            OptionItem::SfxVolume => {
                self.settings.sfx_volume = step_volume(self.settings.sfx_volume, delta);
                ctx.resources
                    .apply_sfx_volume(ctx.backend, self.settings.sfx_volume);
                info!("SFX volume: {}", percent(self.settings.sfx_volume));
            }
            OptionItem::WindowMode => {
                let mode = self.window_modes.cycle(self.settings.window_mode, forward);
                if let Err(e) = ctx.backend.set_window_mode(mode) {
                    warn!("Failed to switch window mode to {:?}: {}", mode, e);
                }
                self.settings.window_mode = mode;
                info!("Window mode: {}", mode.label());
            }
            OptionItem::Back => return,
        }
        self.changed = true;
    }

    pub fn update<B: Backend>(&mut self, ctx: &mut ScreenContext<B>) -> Transition {
        self.menu.tick(ctx.dt);

        if ctx.actions.contains(MenuAction::Back) {
            ctx.resources.play_select(ctx.backend);
            return Transition::To(ScreenKind::MainMenu);
        }

        if ctx.actions.contains(MenuAction::Down) {
            ctx.resources.play_select(ctx.backend);
            self.menu.select_next();
        }
        if ctx.actions.contains(MenuAction::Up) {
            ctx.resources.play_select(ctx.backend);
            self.menu.select_previous();
        }

        // Left and Right together cancel out
        match (
            ctx.actions.contains(MenuAction::Left),
            ctx.actions.contains(MenuAction::Right),
        ) {
            (true, false) => self.adjust(ctx, false),
            (false, true) => self.adjust(ctx, true),
            _ => {}
        }

        if ctx.actions.contains(MenuAction::Confirm) {
            match self.selected_item() {
                OptionItem::WindowMode => self.adjust(ctx, true),
                OptionItem::Back => {
                    ctx.resources.play_select(ctx.backend);
                    return Transition::To(ScreenKind::MainMenu);
                }
                OptionItem::MusicVolume | OptionItem::SfxVolume => {}
            }
        }

        Transition::None
    }

    fn value_text(&self, item: OptionItem) -> String {
        match item {
            OptionItem::MusicVolume => percent(self.settings.music_volume),
            OptionItem::SfxVolume => percent(self.settings.sfx_volume),
            OptionItem::WindowMode => self.settings.window_mode.label().to_string(),
            OptionItem::Back => String::new(),
        }
    }

    pub fn draw(
        &self,
        backend: &mut impl Backend,
        resources: &ResourceSet,
    ) -> Result<(), BackendError> {
        let font = resources.font;
        let (screen_w, screen_h) = backend.screen_size();
        let center_x = screen_w as f32 / 2.0;
        let box_x = (screen_w as i32 - BOX_WIDTH as i32) / 2;
        let box_y = (screen_h as i32 - BOX_HEIGHT as i32) / 2;

        backend.fill_rect(Rect::new(box_x, box_y, BOX_WIDTH, BOX_HEIGHT), BOX_COLOR)?;

        let title = if self.changed { "OPTIONS *" } else { "OPTIONS" };
        let title_style = TextStyle::new(30.0, WHITE);
        let x = centered_x(&*backend, font, title, center_x, &title_style);
        draw_shadowed_text(backend, font, title, x, box_y as f32 + 20.0, &title_style)?;

        let first_row = box_y as f32 + 70.0;
        for (i, item) in self.items.iter().enumerate() {
            let y = first_row + i as f32 * ROW_SPACING;
            let label_style = TextStyle::new(20.0, self.menu.item_color(i));
            backend.draw_text(font, item.label(), center_x - 180.0, y, &label_style)?;

            let value = self.value_text(*item);
            if !value.is_empty() {
                let value_style = TextStyle::new(20.0, WHITE);
                backend.draw_text(font, &value, center_x + 100.0, y, &value_style)?;
            }
        }

        let hint_style = TextStyle::new(18.0, WHITE);
        let x = centered_x(&*backend, font, self.back_hint, center_x, &hint_style);
        let y = (box_y + BOX_HEIGHT as i32) as f32 - 30.0;
        draw_shadowed_text(backend, font, self.back_hint, x, y, &hint_style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;
    use crate::backend::{MusicId, WindowMode};
    use crate::input::ActionSet;
    use std::path::Path;

    fn settings() -> Settings {
        Settings {
            music_volume: 0.5,
            sfx_volume: 0.5,
            window_mode: WindowMode::Original,
        }
    }

    fn options(back_item: bool) -> OptionsMenu {
        OptionsMenu::new(settings(), WindowModeSet::Three, back_item, "Press Z to return")
    }

    fn press_all(
        screen: &mut OptionsMenu,
        backend: &mut FakeBackend,
        resources: &ResourceSet,
        actions: &[MenuAction],
    ) -> Transition {
        let mut ctx = ScreenContext {
            backend,
            resources,
            actions: actions.iter().copied().collect::<ActionSet>(),
            dt: 1.0 / 60.0,
        };
        screen.update(&mut ctx)
    }

    fn press(
        screen: &mut OptionsMenu,
        backend: &mut FakeBackend,
        resources: &ResourceSet,
        action: MenuAction,
    ) -> Transition {
        press_all(screen, backend, resources, &[action])
    }

    #[test]
    fn test_step_volume_clamps() {
        let mut v = 1.0;
        for _ in 0..15 {
            v = step_volume(v, -VOLUME_STEP);
            assert!(v >= 0.0);
        }
        assert_eq!(v, 0.0);

        for _ in 0..15 {
            v = step_volume(v, VOLUME_STEP);
            assert!(v <= 1.0);
        }
        assert_eq!(v, 1.0);
    }

    #[test]
    fn test_step_volume_has_no_drift() {
        let mut v = 0.0;
        for _ in 0..3 {
            v = step_volume(v, VOLUME_STEP);
        }
        assert_eq!(v, 0.3);
    }

    #[test]
    fn test_music_volume_applies_immediately() {
        let mut backend = FakeBackend::new().with_file("music.ogg", 0, 0);
        let music = backend.load_music(Path::new("music.ogg")).unwrap();
        assert_eq!(music, MusicId(0));
        let resources = ResourceSet {
            music: Some(music),
            ..ResourceSet::default()
        };
        let mut screen = options(false);

        press(&mut screen, &mut backend, &resources, MenuAction::Right);
        assert_eq!(screen.settings().music_volume, 0.6);
        assert_eq!(backend.music_volume, Some(0.6));
        assert!(screen.is_changed());
    }

    #[test]
    fn test_sfx_volume_row() {
        let mut backend = FakeBackend::new()
            .with_file("select.ogg", 0, 0)
            .with_file("confirm.ogg", 0, 0);
        let select = backend.load_sound(Path::new("select.ogg")).unwrap();
        let confirm = backend.load_sound(Path::new("confirm.ogg")).unwrap();
        let resources = ResourceSet {
            select_sfx: Some(select),
            confirm_sfx: Some(confirm),
            ..ResourceSet::default()
        };
        let mut screen = options(false);

        press(&mut screen, &mut backend, &resources, MenuAction::Down);
        assert_eq!(screen.selected_item(), OptionItem::SfxVolume);
        press(&mut screen, &mut backend, &resources, MenuAction::Left);
        assert_eq!(screen.settings().sfx_volume, 0.4);
        assert_eq!(screen.settings().music_volume, 0.5);

        // Both effects follow the new volume
        assert_eq!(backend.sound_volumes.get(&select), Some(&0.4));
        assert_eq!(backend.sound_volumes.get(&confirm), Some(&0.4));
        assert_eq!(backend.music_volume, None);
    }

    #[test]
    fn test_left_and_right_together_do_nothing() {
        let mut backend = FakeBackend::new();
        let resources = ResourceSet::default();
        let mut screen = options(false);

        let both = [MenuAction::Left, MenuAction::Right];
        press_all(&mut screen, &mut backend, &resources, &both);
        assert_eq!(screen.settings().music_volume, 0.5);
        assert!(!screen.is_changed());

        press(&mut screen, &mut backend, &resources, MenuAction::Up);
        assert_eq!(screen.selected_item(), OptionItem::WindowMode);
        press_all(&mut screen, &mut backend, &resources, &both);
        assert!(backend.window_modes.is_empty());
        assert_eq!(screen.settings().window_mode, WindowMode::Original);
        assert!(!screen.is_changed());
    }

    #[test]
    fn test_window_mode_cycles_and_applies() {
        let mut backend = FakeBackend::new();
        let resources = ResourceSet::default();
        let mut screen = options(false);

        press(&mut screen, &mut backend, &resources, MenuAction::Up);
        assert_eq!(screen.selected_item(), OptionItem::WindowMode);

        press(&mut screen, &mut backend, &resources, MenuAction::Right);
        press(&mut screen, &mut backend, &resources, MenuAction::Confirm);
        press(&mut screen, &mut backend, &resources, MenuAction::Right);
        assert_eq!(
            backend.window_modes,
            vec![WindowMode::Maximized, WindowMode::Fullscreen, WindowMode::Original]
        );

        press(&mut screen, &mut backend, &resources, MenuAction::Left);
        assert_eq!(screen.settings().window_mode, WindowMode::Fullscreen);
    }

    #[test]
    fn test_unchanged_until_adjusted() {
        let mut backend = FakeBackend::new();
        let resources = ResourceSet::default();
        let mut screen = options(false);

        press(&mut screen, &mut backend, &resources, MenuAction::Down);
        press(&mut screen, &mut backend, &resources, MenuAction::Confirm);
        assert!(!screen.is_changed());
    }

    #[test]
    fn test_back_key_leaves() {
        let mut backend = FakeBackend::new();
        let resources = ResourceSet::default();
        let mut screen = options(false);

        assert_eq!(
            press(&mut screen, &mut backend, &resources, MenuAction::Back),
            Transition::To(ScreenKind::MainMenu)
        );
    }

    #[test]
    fn test_back_item() {
        let mut backend = FakeBackend::new();
        let resources = ResourceSet::default();
        let mut screen = options(true);

        press(&mut screen, &mut backend, &resources, MenuAction::Up);
        assert_eq!(screen.selected_item(), OptionItem::Back);
        // Left/right on Back changes nothing
        press(&mut screen, &mut backend, &resources, MenuAction::Right);
        assert!(!screen.is_changed());
        assert_eq!(
            press(&mut screen, &mut backend, &resources, MenuAction::Confirm),
            Transition::To(ScreenKind::MainMenu)
        );
    }

    #[test]
    fn test_draw_shows_values_and_indicator() {
        let mut backend = FakeBackend::new();
        let resources = ResourceSet::default();
        let mut screen = options(false);

        screen.draw(&mut backend, &resources).unwrap();
        let texts = backend.drawn_texts();
        assert!(texts.contains(&"OPTIONS".to_string()));
        assert!(texts.contains(&"50%".to_string()));
        assert!(texts.contains(&"Windowed".to_string()));

        press(&mut screen, &mut backend, &resources, MenuAction::Right);
        backend.draws.clear();
        screen.draw(&mut backend, &resources).unwrap();
        let texts = backend.drawn_texts();
        assert!(texts.contains(&"OPTIONS *".to_string()));
        assert!(texts.contains(&"60%".to_string()));
    }
}
