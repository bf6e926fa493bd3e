//! SDL2 Presentation Backend
//!
//! Implements [`Backend`] on top of `sdl2` with the `image`, `ttf` and
//! `mixer` extensions. Drawing happens in a fixed logical resolution
//! (`canvas.set_logical_size`), so window mode changes never move anything
//! on screen.

use super::{
    Backend, BackendError, FontId, FontRef, Key, MusicId, SoundId, TextStyle, TextureId,
    WindowMode,
};
use crate::text;
use log::{debug, warn};
use sdl2::event::Event;
use sdl2::image::LoadTexture;
use sdl2::keyboard::Keycode;
use sdl2::mixer::{Channel, Chunk, Music, MAX_VOLUME};
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::rect::Rect;
use sdl2::render::{BlendMode, Canvas, Texture, TextureCreator};
use sdl2::surface::Surface;
use sdl2::ttf::{Font, Sdl2TtfContext};
use sdl2::video::{FullscreenType, Window, WindowContext, WindowPos};
use sdl2::EventPump;
use std::collections::HashSet;
use std::path::Path;
use std::time::{Duration, Instant};

/// Point size TrueType fonts are rasterized at; other sizes are scaled
const FONT_BASE_SIZE: u16 = 40;

/// SDL2-backed implementation of the presentation backend
///
/// Textures and fonts borrow from the texture creator and TTF context, which
/// must outlive the backend (both are created in `main`).
pub struct SdlBackend<'a> {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    texture_creator: &'a TextureCreator<WindowContext>,
    ttf: &'a Sdl2TtfContext,
    audio_enabled: bool,

    textures: Vec<Option<Texture<'a>>>,
    fonts: Vec<Option<Font<'a, 'static>>>,
    sounds: Vec<Option<Chunk>>,
    music: Vec<Option<Music<'static>>>,

    pressed: HashSet<Key>,
    close_requested: bool,
    logical_size: (u32, u32),
    frame_budget: Duration,
    frame_start: Instant,
    frame_delta: f32,
}

impl<'a> SdlBackend<'a> {
    /// Wraps an already-built canvas
    ///
    /// `audio_enabled` is false when the mixer could not open a device; all
    /// audio loads then fail and the game runs silently.
    pub fn new(
        mut canvas: Canvas<Window>,
        event_pump: EventPump,
        texture_creator: &'a TextureCreator<WindowContext>,
        ttf: &'a Sdl2TtfContext,
        audio_enabled: bool,
        target_fps: u32,
    ) -> Result<Self, BackendError> {
        let (width, height) = canvas.window().size();
        canvas
            .set_logical_size(width, height)
            .map_err(|e| BackendError::Sdl(e.to_string()))?;

        Ok(SdlBackend {
            canvas,
            event_pump,
            texture_creator,
            ttf,
            audio_enabled,
            textures: Vec::new(),
            fonts: Vec::new(),
            sounds: Vec::new(),
            music: Vec::new(),
            pressed: HashSet::new(),
            close_requested: false,
            logical_size: (width, height),
            frame_budget: Duration::from_secs_f64(1.0 / target_fps.max(1) as f64),
            frame_start: Instant::now(),
            frame_delta: 0.0,
        })
    }

    fn texture(&self, id: TextureId) -> Result<&Texture<'a>, BackendError> {
        self.textures
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(BackendError::InvalidHandle("texture", id.0))
    }

    fn push_texture(&mut self, texture: Texture<'a>) -> TextureId {
        self.textures.push(Some(texture));
        TextureId(self.textures.len() - 1)
    }

    fn require_audio(&self) -> Result<(), BackendError> {
        if self.audio_enabled {
            Ok(())
        } else {
            Err(BackendError::Unsupported("audio device is not open".to_string()))
        }
    }

    fn draw_ttf_text(
        &mut self,
        font: FontId,
        text: &str,
        x: f32,
        y: f32,
        style: &TextStyle,
    ) -> Result<(), BackendError> {
        let font = self
            .fonts
            .get(font.0)
            .and_then(Option::as_ref)
            .ok_or(BackendError::InvalidHandle("font", font.0))?;

        let surface = font
            .render(text)
            .blended(style.color)
            .map_err(|e| BackendError::Sdl(e.to_string()))?;
        let texture = self
            .texture_creator
            .create_texture_from_surface(&surface)
            .map_err(|e| BackendError::Sdl(e.to_string()))?;

        let scale = style.size / FONT_BASE_SIZE as f32;
        let width = (surface.width() as f32 * scale).round() as u32;
        let height = (surface.height() as f32 * scale).round() as u32;
        self.canvas
            .copy(&texture, None, Rect::new(x.round() as i32, y.round() as i32, width, height))?;
        Ok(())
    }
}

/// Volume in [0, 1] to the mixer's 0..=128 range
fn mixer_volume(volume: f32) -> i32 {
    (volume.clamp(0.0, 1.0) * MAX_VOLUME as f32).round() as i32
}

fn map_keycode(keycode: Keycode) -> Option<Key> {
    match keycode {
        Keycode::Up => Some(Key::Up),
        Keycode::Down => Some(Key::Down),
        Keycode::Left => Some(Key::Left),
        Keycode::Right => Some(Key::Right),
        Keycode::Return | Keycode::KpEnter => Some(Key::Enter),
        Keycode::Escape => Some(Key::Escape),
        Keycode::Z => Some(Key::Z),
        _ => None,
    }
}

impl<'a> Backend for SdlBackend<'a> {
    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn load_texture(&mut self, path: &Path) -> Result<TextureId, BackendError> {
        let texture = self.texture_creator.load_texture(path)?;
        Ok(self.push_texture(texture))
    }

    fn create_solid_texture(
        &mut self,
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<TextureId, BackendError> {
        if width == 0 || height == 0 {
            return Err(BackendError::Unsupported(format!(
                "zero-sized texture {}x{}",
                width, height
            )));
        }

        let mut surface = Surface::new(width, height, PixelFormatEnum::RGBA8888)?;
        surface.fill_rect(None, color)?;

        let mut texture = self
            .texture_creator
            .create_texture_from_surface(&surface)
            .map_err(|e| BackendError::Sdl(e.to_string()))?;
        texture.set_blend_mode(BlendMode::Blend);

        Ok(self.push_texture(texture))
    }

    fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)> {
        self.texture(texture).ok().map(|t| {
            let query = t.query();
            (query.width, query.height)
        })
    }

    fn unload_texture(&mut self, texture: TextureId) {
        if let Some(slot) = self.textures.get_mut(texture.0) {
            slot.take();
        }
    }

    fn load_font(&mut self, path: &Path) -> Result<FontId, BackendError> {
        let font = self.ttf.load_font(path, FONT_BASE_SIZE)?;
        self.fonts.push(Some(font));
        Ok(FontId(self.fonts.len() - 1))
    }

    fn unload_font(&mut self, font: FontId) {
        if let Some(slot) = self.fonts.get_mut(font.0) {
            slot.take();
        }
    }

    fn load_sound(&mut self, path: &Path) -> Result<SoundId, BackendError> {
        self.require_audio()?;
        let chunk = Chunk::from_file(path)?;
        self.sounds.push(Some(chunk));
        Ok(SoundId(self.sounds.len() - 1))
    }

    fn unload_sound(&mut self, sound: SoundId) {
        if let Some(slot) = self.sounds.get_mut(sound.0) {
            slot.take();
        }
    }

    fn load_music(&mut self, path: &Path) -> Result<MusicId, BackendError> {
        self.require_audio()?;
        let music = Music::from_file(path)?;
        self.music.push(Some(music));
        Ok(MusicId(self.music.len() - 1))
    }

    fn unload_music(&mut self, music: MusicId) {
        if let Some(slot) = self.music.get_mut(music.0) {
            if slot.take().is_some() {
                Music::halt();
            }
        }
    }

    fn play_sound(&mut self, sound: SoundId) -> Result<(), BackendError> {
        let chunk = self
            .sounds
            .get(sound.0)
            .and_then(Option::as_ref)
            .ok_or(BackendError::InvalidHandle("sound", sound.0))?;
        Channel::all().play(chunk, 0)?;
        Ok(())
    }

    fn play_music(&mut self, music: MusicId) -> Result<(), BackendError> {
        let track = self
            .music
            .get(music.0)
            .and_then(Option::as_ref)
            .ok_or(BackendError::InvalidHandle("music", music.0))?;
        track.play(-1)?;
        Ok(())
    }

    fn update_music(&mut self, _music: MusicId) {
        // SDL_mixer streams music on its own audio thread
    }

    fn set_sound_volume(&mut self, sound: SoundId, volume: f32) {
        if let Some(Some(chunk)) = self.sounds.get_mut(sound.0) {
            chunk.set_volume(mixer_volume(volume));
        }
    }

    fn set_music_volume(&mut self, music: MusicId, volume: f32) {
        // SDL_mixer has a single global music volume
        if matches!(self.music.get(music.0), Some(Some(_))) {
            Music::set_volume(mixer_volume(volume));
        }
    }

    fn measure_text(&self, font: FontRef, text: &str, style: &TextStyle) -> (f32, f32) {
        if let FontRef::Loaded(id) = font {
            if let Some(Some(font)) = self.fonts.get(id.0) {
                match font.size_of(text) {
                    Ok((w, h)) => {
                        let scale = style.size / FONT_BASE_SIZE as f32;
                        return (w as f32 * scale, h as f32 * scale);
                    }
                    Err(e) => warn!("Failed to measure text {:?}: {}", text, e),
                }
            }
        }
        text::measure(text, style)
    }

    fn clear(&mut self, color: Color) {
        self.canvas.set_draw_color(color);
        self.canvas.clear();
    }

    fn draw_texture(&mut self, texture: TextureId, x: f32, y: f32) -> Result<(), BackendError> {
        let texture = self
            .textures
            .get(texture.0)
            .and_then(Option::as_ref)
            .ok_or(BackendError::InvalidHandle("texture", texture.0))?;
        let query = texture.query();
        self.canvas.copy(
            texture,
            None,
            Rect::new(x.round() as i32, y.round() as i32, query.width, query.height),
        )?;
        Ok(())
    }

    fn draw_text(
        &mut self,
        font: FontRef,
        text: &str,
        x: f32,
        y: f32,
        style: &TextStyle,
    ) -> Result<(), BackendError> {
        match font {
            FontRef::Loaded(id) => self.draw_ttf_text(id, text, x, y, style),
            FontRef::BuiltIn => {
                text::draw(&mut self.canvas, text, x.round() as i32, y.round() as i32, style)?;
                Ok(())
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), BackendError> {
        let blend = if color.a < 255 { BlendMode::Blend } else { BlendMode::None };
        self.canvas.set_blend_mode(blend);
        self.canvas.set_draw_color(color);
        let result = self.canvas.fill_rect(rect);
        self.canvas.set_blend_mode(BlendMode::None);
        result?;
        Ok(())
    }

    fn screen_size(&self) -> (u32, u32) {
        self.logical_size
    }

    fn set_window_mode(&mut self, mode: WindowMode) -> Result<(), BackendError> {
        let (width, height) = self.logical_size;
        let window = self.canvas.window_mut();
        match mode {
            WindowMode::Original => {
                window.set_fullscreen(FullscreenType::Off)?;
                window.restore();
                window
                    .set_size(width, height)
                    .map_err(|e| BackendError::Sdl(e.to_string()))?;
                window.set_position(WindowPos::Centered, WindowPos::Centered);
            }
            WindowMode::Maximized => {
                window.set_fullscreen(FullscreenType::Off)?;
                window.maximize();
            }
            WindowMode::Fullscreen => {
                window.set_fullscreen(FullscreenType::Desktop)?;
            }
        }
        debug!("Window mode set to {:?}", mode);
        Ok(())
    }

    fn begin_frame(&mut self) {
        let now = Instant::now();
        self.frame_delta = now.duration_since(self.frame_start).as_secs_f32();
        self.frame_start = now;

        self.pressed.clear();
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => self.close_requested = true,
                Event::KeyDown {
                    keycode: Some(keycode),
                    repeat: false,
                    ..
                } => {
                    if let Some(key) = map_keycode(keycode) {
                        self.pressed.insert(key);
                    }
                }
                _ => {}
            }
        }
    }

    fn end_frame(&mut self) {
        self.canvas.present();

        let elapsed = self.frame_start.elapsed();
        if elapsed < self.frame_budget {
            std::thread::sleep(self.frame_budget - elapsed);
        }
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    fn frame_delta_seconds(&self) -> f32 {
        self.frame_delta
    }

    fn close_requested(&self) -> bool {
        self.close_requested
    }
}
