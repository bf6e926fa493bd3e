//! Frame Driver
//!
//! One frame, in order:
//! 1. pump events, stop if the window was closed
//! 2. feed the music stream
//! 3. read input and advance the scroll offset
//! 4. update the active screen
//! 5. clear, draw the background layers, then the screen
//! 6. draw the fade overlay on top, present

use crate::backend::{Backend, BackendError};
use crate::config::GameConfig;
use crate::gui::BLACK;
use crate::input::InputMap;
use crate::parallax::ParallaxScroller;
use crate::resources::ResourceSet;
use crate::screens::{ScreenKind, ScreenMachine, Transition};
use log::{debug, info};
use sdl2::pixels::Color;
use sdl2::rect::Rect;

/// What the main loop should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Exit,
}

pub struct FrameDriver {
    scroller: ParallaxScroller,
    machine: ScreenMachine,
    input: InputMap,
    title_scroll_speed: f32,
    menu_scroll_speed: f32,
    frames: u64,
}

impl FrameDriver {
    pub fn new(config: &GameConfig) -> Self {
        FrameDriver {
            scroller: ParallaxScroller::new(),
            machine: ScreenMachine::new(config),
            input: InputMap::new(config.back_key),
            title_scroll_speed: config.title_scroll_speed,
            menu_scroll_speed: config.menu_scroll_speed,
            frames: 0,
        }
    }

    fn scroll_speed(&self) -> f32 {
        match self.machine.current_kind() {
            ScreenKind::Title => self.title_scroll_speed,
            _ => self.menu_scroll_speed,
        }
    }

    pub fn run_frame<B: Backend>(
        &mut self,
        backend: &mut B,
        resources: &mut ResourceSet,
    ) -> Result<FrameOutcome, BackendError> {
        backend.begin_frame();
        if backend.close_requested() {
            info!("Window closed");
            return Ok(FrameOutcome::Exit);
        }

        resources.update_music(backend);

        let dt = backend.frame_delta_seconds();
        let actions = self.input.collect(&*backend);

        self.scroller.advance(self.scroll_speed());

        if self.machine.update(backend, resources, actions, dt) == Transition::Exit {
            info!("Exit selected");
            return Ok(FrameOutcome::Exit);
        }

        backend.clear(BLACK);

        let (screen_w, screen_h) = backend.screen_size();
        self.scroller.update_layers(&mut resources.layers);
        self.scroller.draw(&resources.layers, screen_w, backend)?;

        self.machine.draw(backend, resources)?;

        if let Some(alpha) = self.machine.fade_alpha() {
            let a = (alpha.clamp(0.0, 1.0) * 255.0) as u8;
            backend.fill_rect(Rect::new(0, 0, screen_w, screen_h), Color::RGBA(0, 0, 0, a))?;
        }

        backend.end_frame();
        self.frames += 1;
        Ok(FrameOutcome::Continue)
    }

    /// Run frames until the window closes or Exit is chosen
    pub fn run<B: Backend>(
        &mut self,
        backend: &mut B,
        resources: &mut ResourceSet,
    ) -> Result<(), BackendError> {
        info!("Entering main loop");
        while self.run_frame(backend, resources)? == FrameOutcome::Continue {}
        debug!("Main loop finished after {} frames", self.frames);
        Ok(())
    }
}

#[cfg(test)]
impl FrameDriver {
    pub fn machine(&self) -> &ScreenMachine {
        &self.machine
    }

    pub fn scroller(&self) -> &ParallaxScroller {
        &self.scroller
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Key;
    use crate::backend::fake::{DrawCall, FakeBackend};
    use crate::screens::title::FADE_FRAMES;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn setup() -> (FrameDriver, FakeBackend, ResourceSet) {
        let config = GameConfig::default();
        let mut backend = FakeBackend::new();
        let resources =
            ResourceSet::load(&mut backend, &config, &mut StdRng::seed_from_u64(1)).unwrap();
        (FrameDriver::new(&config), backend, resources)
    }

    #[test]
    fn test_close_stops_before_drawing() {
        let (mut driver, mut backend, mut resources) = setup();
        backend.close_after = Some(0);

        let outcome = driver.run_frame(&mut backend, &mut resources).unwrap();
        assert_eq!(outcome, FrameOutcome::Exit);
        assert_eq!(backend.frames_presented, 0);
        assert!(backend.draws.is_empty());
    }

    #[test]
    fn test_run_until_closed() {
        let (mut driver, mut backend, mut resources) = setup();
        backend.close_after = Some(5);

        driver.run(&mut backend, &mut resources).unwrap();
        assert_eq!(backend.frames_presented, 5);
        assert_eq!(driver.frames(), 5);
    }

    #[test]
    fn test_draw_order() {
        let (mut driver, mut backend, mut resources) = setup();
        driver.run_frame(&mut backend, &mut resources).unwrap();

        assert_eq!(backend.draws.first(), Some(&DrawCall::Clear(BLACK)));
        let first_text = backend
            .draws
            .iter()
            .position(|d| matches!(d, DrawCall::Text { .. }))
            .unwrap();
        let last_texture = backend
            .draws
            .iter()
            .rposition(|d| matches!(d, DrawCall::Texture { .. }))
            .unwrap();
        // Background first, screen on top
        assert!(last_texture < first_text);
    }

    #[test]
    fn test_title_scrolls_slower() {
        let (mut driver, mut backend, mut resources) = setup();
        driver.run_frame(&mut backend, &mut resources).unwrap();
        assert_eq!(driver.scroller().offset(), 0.5);
    }

    #[test]
    fn test_fade_overlay_then_main_menu() {
        let (mut driver, mut backend, mut resources) = setup();
        let mut frames = vec![vec![Key::Enter]];
        frames.extend((0..FADE_FRAMES).map(|_| Vec::new()));
        backend.script_frames(frames);

        driver.run_frame(&mut backend, &mut resources).unwrap();
        let overlay = backend.draws.last().cloned();
        assert_eq!(
            overlay,
            Some(DrawCall::Rect {
                rect: Rect::new(0, 0, 800, 600),
                color: Color::RGBA(0, 0, 0, 0),
            })
        );

        for _ in 0..FADE_FRAMES {
            driver.run_frame(&mut backend, &mut resources).unwrap();
        }
        assert_eq!(driver.machine().current_kind(), ScreenKind::MainMenu);
        assert!(!backend.draws.iter().any(|d| matches!(d, DrawCall::Rect { .. })));
        assert!(backend.drawn_texts().contains(&"MAIN MENU".to_string()));
    }

    #[test]
    fn test_exit_from_menu() {
        let (mut driver, mut backend, mut resources) = setup();
        let mut frames = vec![vec![Key::Enter]];
        frames.extend((0..FADE_FRAMES).map(|_| Vec::new()));
        frames.push(vec![Key::Down]);
        frames.push(vec![Key::Down]);
        frames.push(vec![Key::Enter]);
        backend.script_frames(frames);

        driver.run(&mut backend, &mut resources).unwrap();
        assert_eq!(driver.machine().current_kind(), ScreenKind::MainMenu);
        assert_eq!(backend.frames_presented as u32, 1 + FADE_FRAMES + 2);
    }

    #[test]
    fn test_music_fed_every_frame() {
        let config = GameConfig::default();
        let mut backend = FakeBackend::new().with_file(&config.assets.music, 0, 0);
        let mut resources =
            ResourceSet::load(&mut backend, &config, &mut StdRng::seed_from_u64(1)).unwrap();
        let mut driver = FrameDriver::new(&config);
        backend.close_after = Some(3);

        driver.run(&mut backend, &mut resources).unwrap();
        assert_eq!(backend.music_updates, 3);
    }
}
