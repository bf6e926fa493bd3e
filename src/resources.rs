//! Resource Set
//!
//! Loads the font, music, sound effects and background layers once at
//! start-up and releases them once at shutdown.
//!
//! Loading never fails because of a missing or broken file:
//! - font → built-in bitmap font
//! - music / sound effects → left unloaded, playback is silently skipped
//! - layer image → solid translucent placeholder of screen size
//! - no usable layer at all → one opaque dark-blue layer
//!
//! The only fatal case is strict mode refusing to run when a placeholder
//! cannot even be generated.

use crate::backend::{Backend, BackendError, FontRef, MusicId, SoundId, TextureId};
use crate::config::GameConfig;
use crate::error::AssetError;
use crate::parallax::Layer;
use log::{debug, error, info, warn};
use rand::Rng;
use sdl2::pixels::Color;
use std::path::Path;

/// Background used when no layer image or placeholder could be made
pub const FALLBACK_LAYER_COLOR: Color = Color::RGBA(0, 82, 172, 255);

/// Everything loaded from disk, shared read-mostly by all screens
#[derive(Debug, Default)]
pub struct ResourceSet {
    pub font: FontRef,
    pub music: Option<MusicId>,
    pub select_sfx: Option<SoundId>,
    pub confirm_sfx: Option<SoundId>,
    pub layers: Vec<Layer>,
}

/// Check the file exists, then load it with `loader`
fn load_asset<B: Backend, T>(
    backend: &mut B,
    path: &Path,
    loader: impl FnOnce(&mut B, &Path) -> Result<T, BackendError>,
) -> Result<T, AssetError> {
    if !backend.file_exists(path) {
        return Err(AssetError::AssetMissing(path.to_path_buf()));
    }
    loader(backend, path).map_err(|e| AssetError::AssetLoadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Load an image layer, rejecting zero-sized textures
fn load_layer_texture<B: Backend>(
    backend: &mut B,
    path: &Path,
) -> Result<(TextureId, u32, u32), AssetError> {
    let texture = load_asset(backend, path, |b, p| b.load_texture(p))?;
    match backend.texture_size(texture) {
        Some((w, h)) if w > 0 && h > 0 => Ok((texture, w, h)),
        _ => {
            backend.unload_texture(texture);
            Err(AssetError::AssetLoadFailed {
                path: path.to_path_buf(),
                reason: "texture has zero size".to_string(),
            })
        }
    }
}

/// Random translucent color for placeholder layer `index` of `count`
///
/// Layers draw back to front, so the backmost (index 0) is opaque and each
/// nearer layer lets more of the ones behind it show through.
pub fn placeholder_color(rng: &mut impl Rng, index: usize, count: usize) -> Color {
    let alpha = ((count - index) as f32 / count as f32 * 255.0).round() as u8;
    Color::RGBA(
        rng.gen_range(55..=254),
        rng.gen_range(55..=254),
        rng.gen_range(55..=254),
        alpha,
    )
}

fn log_asset_error(what: &str, err: &AssetError) {
    match err {
        AssetError::AssetMissing(_) => info!("{} not used: {}", what, err),
        _ => warn!("{} not used: {}", what, err),
    }
}

impl ResourceSet {
    /// Load every asset named in `config`
    ///
    /// `rng` picks placeholder colors; pass a seeded generator for
    /// reproducible output.
    pub fn load<B: Backend>(
        backend: &mut B,
        config: &GameConfig,
        rng: &mut impl Rng,
    ) -> Result<Self, AssetError> {
        let assets = &config.assets;
        let mut resources = ResourceSet::default();

        match load_asset(backend, &assets.font, |b, p| b.load_font(p)) {
            Ok(font) => {
                info!("Loaded font {}", assets.font.display());
                resources.font = FontRef::Loaded(font);
            }
            Err(e) => log_asset_error("Font (using built-in)", &e),
        }

        match load_asset(backend, &assets.music, |b, p| b.load_music(p)) {
            Ok(music) => {
                info!("Loaded music {}", assets.music.display());
                backend.set_music_volume(music, config.music_volume);
                if let Err(e) = backend.play_music(music) {
                    warn!("Failed to start music: {}", e);
                }
                resources.music = Some(music);
            }
            Err(e) => log_asset_error("Music", &e),
        }

        for (slot, path) in [
            (&mut resources.select_sfx, &assets.select_sound),
            (&mut resources.confirm_sfx, &assets.confirm_sound),
        ] {
            match load_asset(backend, path, |b, p| b.load_sound(p)) {
                Ok(sound) => {
                    info!("Loaded sound {}", path.display());
                    *slot = Some(sound);
                }
                Err(e) => log_asset_error("Sound", &e),
            }
        }
        resources.apply_sfx_volume(backend, config.sfx_volume);

        resources.layers = Self::load_layers(backend, config, rng)?;
        info!("Loaded {} valid parallax layers", resources.valid_layers());

        Ok(resources)
    }

    fn load_layers<B: Backend>(
        backend: &mut B,
        config: &GameConfig,
        rng: &mut impl Rng,
    ) -> Result<Vec<Layer>, AssetError> {
        let count = config.assets.layer_count();
        let (screen_w, screen_h) = (config.screen_width, config.screen_height);
        let mut layers = Vec::with_capacity(count);

        for index in 0..count {
            let path = config.assets.layer_path(index);
            let speed = config.speed_policy.speed_for(index);

            match load_layer_texture(backend, &path) {
                Ok((texture, w, h)) => {
                    info!("Loaded layer {} from {}", index, path.display());
                    layers.push(Layer::new(texture, w, h, speed));
                    continue;
                }
                Err(e) => log_asset_error("Layer image (using placeholder)", &e),
            }

            let color = placeholder_color(rng, index, count);
            match backend.create_solid_texture(screen_w, screen_h, color) {
                Ok(texture) => {
                    debug!("Created placeholder for layer {} ({:?})", index, color);
                    layers.push(Layer::new(texture, screen_w, screen_h, speed));
                }
                Err(e) => {
                    error!("Failed to create placeholder for layer {}: {}", index, e);
                    if config.strict_assets {
                        return Err(AssetError::CriticalAssetFailure(format!(
                            "placeholder for layer {}: {}",
                            index, e
                        )));
                    }
                    layers.push(Layer::inactive());
                }
            }
        }

        if !layers.iter().any(Layer::is_drawable) {
            warn!("No valid layers loaded, creating default layer");
            let speed = config.speed_policy.speed_for(0);
            match backend.create_solid_texture(screen_w, screen_h, FALLBACK_LAYER_COLOR) {
                Ok(texture) => {
                    let fallback = Layer::new(texture, screen_w, screen_h, speed);
                    match layers.first_mut() {
                        Some(first) => *first = fallback,
                        None => layers.push(fallback),
                    }
                }
                Err(e) => {
                    error!("Failed to create default layer: {}", e);
                    if config.strict_assets {
                        return Err(AssetError::CriticalAssetFailure(format!(
                            "default layer: {}",
                            e
                        )));
                    }
                }
            }
        }

        Ok(layers)
    }

    /// Number of layers that will actually be drawn
    pub fn valid_layers(&self) -> usize {
        self.layers.iter().filter(|l| l.is_drawable()).count()
    }

    /// Navigation / back sound, if loaded
    pub fn play_select(&self, backend: &mut impl Backend) {
        Self::play(backend, self.select_sfx);
    }

    /// Confirmation sound, if loaded
    pub fn play_confirm(&self, backend: &mut impl Backend) {
        Self::play(backend, self.confirm_sfx);
    }

    fn play(backend: &mut impl Backend, sound: Option<SoundId>) {
        if let Some(sound) = sound {
            if let Err(e) = backend.play_sound(sound) {
                debug!("Skipping sound playback: {}", e);
            }
        }
    }

    pub fn apply_music_volume(&self, backend: &mut impl Backend, volume: f32) {
        if let Some(music) = self.music {
            backend.set_music_volume(music, volume);
        }
    }

    /// Applies to both sound effects
    pub fn apply_sfx_volume(&self, backend: &mut impl Backend, volume: f32) {
        for sound in [self.select_sfx, self.confirm_sfx].into_iter().flatten() {
            backend.set_sound_volume(sound, volume);
        }
    }

    /// Feed the music stream; called once per frame
    pub fn update_music(&self, backend: &mut impl Backend) {
        if let Some(music) = self.music {
            backend.update_music(music);
        }
    }

    /// Release every loaded handle; calling it again does nothing
    pub fn unload(&mut self, backend: &mut impl Backend) {
        for layer in self.layers.iter_mut() {
            if let Some(texture) = layer.texture.take() {
                backend.unload_texture(texture);
            }
            layer.active = false;
        }

        if let FontRef::Loaded(font) = std::mem::take(&mut self.font) {
            backend.unload_font(font);
        }
        if let Some(music) = self.music.take() {
            backend.unload_music(music);
        }
        for sound in [self.select_sfx.take(), self.confirm_sfx.take()]
            .into_iter()
            .flatten()
        {
            backend.unload_sound(sound);
        }
        debug!("Resources unloaded");
    }
}
