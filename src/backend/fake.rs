//! Recording backend for unit tests
//!
//! Never opens a window. Asset "files" exist when registered with
//! [`FakeBackend::with_file`]; key presses are scripted per frame; every
//! draw, sound and window change is recorded for assertions.

use super::{
    Backend, BackendError, FontId, FontRef, Key, MusicId, SoundId, TextStyle, TextureId,
    WindowMode,
};
use crate::text;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Color),
    Texture { id: TextureId, x: f32, y: f32 },
    Text { text: String, x: f32, y: f32, color: Color },
    Rect { rect: Rect, color: Color },
}

pub struct FakeBackend {
    files: HashMap<PathBuf, (u32, u32)>,
    broken_files: HashSet<PathBuf>,
    /// Number of upcoming `create_solid_texture` calls that fail
    pub failing_solid_textures: usize,
    pub textures: Vec<Option<(u32, u32, Option<Color>)>>,
    pub fonts: Vec<bool>,
    pub sounds: Vec<bool>,
    pub music: Vec<bool>,
    pub unload_calls: usize,

    pub played_sounds: Vec<SoundId>,
    pub playing_music: Option<MusicId>,
    pub music_updates: usize,
    pub sound_volumes: HashMap<SoundId, f32>,
    pub music_volume: Option<f32>,
    pub window_modes: Vec<WindowMode>,

    pub draws: Vec<DrawCall>,
    pub frames_presented: usize,

    script: VecDeque<Vec<Key>>,
    pressed: HashSet<Key>,
    pub close_after: Option<usize>,
    frames_begun: usize,
    pub delta: f32,
    size: (u32, u32),
}

impl FakeBackend {
    pub fn new() -> Self {
        FakeBackend {
            files: HashMap::new(),
            broken_files: HashSet::new(),
            failing_solid_textures: 0,
            textures: Vec::new(),
            fonts: Vec::new(),
            sounds: Vec::new(),
            music: Vec::new(),
            unload_calls: 0,
            played_sounds: Vec::new(),
            playing_music: None,
            music_updates: 0,
            sound_volumes: HashMap::new(),
            music_volume: None,
            window_modes: Vec::new(),
            draws: Vec::new(),
            frames_presented: 0,
            script: VecDeque::new(),
            pressed: HashSet::new(),
            close_after: None,
            frames_begun: 0,
            delta: 1.0 / 60.0,
            size: (800, 600),
        }
    }

    /// Register a loadable asset; images get the given dimensions
    pub fn with_file(mut self, path: impl AsRef<Path>, width: u32, height: u32) -> Self {
        self.files.insert(path.as_ref().to_path_buf(), (width, height));
        self
    }

    /// Register a file that exists but fails to decode
    pub fn with_broken_file(mut self, path: impl AsRef<Path>) -> Self {
        self.broken_files.insert(path.as_ref().to_path_buf());
        self
    }

    /// Keys pressed on the next frames, one entry per frame
    pub fn script_frames(&mut self, frames: Vec<Vec<Key>>) {
        self.script.extend(frames);
    }

    /// Press keys for the current frame without pumping a new one
    pub fn press(&mut self, keys: &[Key]) {
        self.pressed = keys.iter().copied().collect();
    }

    pub fn live_textures(&self) -> usize {
        self.textures.iter().filter(|t| t.is_some()).count()
    }

    pub fn drawn_texts(&self) -> Vec<String> {
        self.draws
            .iter()
            .filter_map(|d| match d {
                DrawCall::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn open(&self, path: &Path) -> Result<(u32, u32), BackendError> {
        if self.broken_files.contains(path) {
            return Err(BackendError::Sdl(format!("cannot decode {}", path.display())));
        }
        self.files
            .get(path)
            .copied()
            .ok_or_else(|| BackendError::Sdl(format!("no such file {}", path.display())))
    }
}

impl Backend for FakeBackend {
    fn file_exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.broken_files.contains(path)
    }

    fn load_texture(&mut self, path: &Path) -> Result<TextureId, BackendError> {
        let (w, h) = self.open(path)?;
        self.textures.push(Some((w, h, None)));
        Ok(TextureId(self.textures.len() - 1))
    }

    fn create_solid_texture(
        &mut self,
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<TextureId, BackendError> {
        if self.failing_solid_textures > 0 {
            self.failing_solid_textures -= 1;
            return Err(BackendError::Sdl("out of memory".to_string()));
        }
        self.textures.push(Some((width, height, Some(color))));
        Ok(TextureId(self.textures.len() - 1))
    }

    fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)> {
        self.textures
            .get(texture.0)
            .copied()
            .flatten()
            .map(|(w, h, _)| (w, h))
    }

    fn unload_texture(&mut self, texture: TextureId) {
        if let Some(slot) = self.textures.get_mut(texture.0) {
            if slot.take().is_some() {
                self.unload_calls += 1;
            }
        }
    }

    fn load_font(&mut self, path: &Path) -> Result<FontId, BackendError> {
        self.open(path)?;
        self.fonts.push(true);
        Ok(FontId(self.fonts.len() - 1))
    }

    fn unload_font(&mut self, font: FontId) {
        if let Some(live) = self.fonts.get_mut(font.0) {
            if std::mem::take(live) {
                self.unload_calls += 1;
            }
        }
    }

    fn load_sound(&mut self, path: &Path) -> Result<SoundId, BackendError> {
        self.open(path)?;
        self.sounds.push(true);
        Ok(SoundId(self.sounds.len() - 1))
    }

    fn unload_sound(&mut self, sound: SoundId) {
        if let Some(live) = self.sounds.get_mut(sound.0) {
            if std::mem::take(live) {
                self.unload_calls += 1;
            }
        }
    }

    fn load_music(&mut self, path: &Path) -> Result<MusicId, BackendError> {
        self.open(path)?;
        self.music.push(true);
        Ok(MusicId(self.music.len() - 1))
    }

    fn unload_music(&mut self, music: MusicId) {
        if let Some(live) = self.music.get_mut(music.0) {
            if std::mem::take(live) {
                self.unload_calls += 1;
            }
        }
    }

    fn play_sound(&mut self, sound: SoundId) -> Result<(), BackendError> {
        if !self.sounds.get(sound.0).copied().unwrap_or(false) {
            return Err(BackendError::InvalidHandle("sound", sound.0));
        }
        self.played_sounds.push(sound);
        Ok(())
    }

    fn play_music(&mut self, music: MusicId) -> Result<(), BackendError> {
        self.playing_music = Some(music);
        Ok(())
    }

    fn update_music(&mut self, _music: MusicId) {
        self.music_updates += 1;
    }

    fn set_sound_volume(&mut self, sound: SoundId, volume: f32) {
        self.sound_volumes.insert(sound, volume);
    }

    fn set_music_volume(&mut self, _music: MusicId, volume: f32) {
        self.music_volume = Some(volume);
    }

    fn measure_text(&self, _font: FontRef, text: &str, style: &TextStyle) -> (f32, f32) {
        text::measure(text, style)
    }

    fn clear(&mut self, color: Color) {
        self.draws.push(DrawCall::Clear(color));
    }

    fn draw_texture(&mut self, id: TextureId, x: f32, y: f32) -> Result<(), BackendError> {
        if self.texture_size(id).is_none() {
            return Err(BackendError::InvalidHandle("texture", id.0));
        }
        self.draws.push(DrawCall::Texture { id, x, y });
        Ok(())
    }

    fn draw_text(
        &mut self,
        _font: FontRef,
        text: &str,
        x: f32,
        y: f32,
        style: &TextStyle,
    ) -> Result<(), BackendError> {
        self.draws.push(DrawCall::Text {
            text: text.to_string(),
            x,
            y,
            color: style.color,
        });
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), BackendError> {
        self.draws.push(DrawCall::Rect { rect, color });
        Ok(())
    }

    fn screen_size(&self) -> (u32, u32) {
        self.size
    }

    fn set_window_mode(&mut self, mode: WindowMode) -> Result<(), BackendError> {
        self.window_modes.push(mode);
        Ok(())
    }

    fn begin_frame(&mut self) {
        self.frames_begun += 1;
        self.draws.clear();
        self.pressed = self.script.pop_front().unwrap_or_default().into_iter().collect();
    }

    fn end_frame(&mut self) {
        self.frames_presented += 1;
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    fn frame_delta_seconds(&self) -> f32 {
        self.delta
    }

    fn close_requested(&self) -> bool {
        self.close_after.is_some_and(|n| self.frames_begun > n)
    }
}
