//! Game Configuration
//!
//! Settings are read from a JSON file at start-up and never written back.
//! Every field has a default, so a partial (or absent) file is fine.
//!
//! # Lookup order
//!
//! 1. `assets/config/game.json` next to the working directory
//! 2. `<platform config dir>/parallax_menu/game.json`
//! 3. Built-in defaults

use crate::backend::WindowMode;
use crate::parallax::SpeedPolicy;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_SCREEN_WIDTH: u32 = 800;
pub const DEFAULT_SCREEN_HEIGHT: u32 = 600;

/// Upper bound on background layers
pub const MAX_LAYERS: usize = 8;

const LOCAL_CONFIG_PATH: &str = "assets/config/game.json";

/// Which key leaves the Options and Game screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BackKeyBinding {
    Z,
    Escape,
    #[default]
    Both,
}

impl BackKeyBinding {
    /// Hint shown at the bottom of screens that can go back
    pub fn hint(&self) -> &'static str {
        match self {
            BackKeyBinding::Z => "Press Z to return",
            BackKeyBinding::Escape => "Press ESC to return",
            BackKeyBinding::Both => "Press Z or ESC to return",
        }
    }
}

/// Window modes the options menu cycles through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindowModeSet {
    /// Original and Fullscreen only
    Two,
    /// Original, Maximized, Fullscreen
    #[default]
    Three,
}

impl WindowModeSet {
    pub fn modes(&self) -> &'static [WindowMode] {
        match self {
            WindowModeSet::Two => &[WindowMode::Original, WindowMode::Fullscreen],
            WindowModeSet::Three => &[
                WindowMode::Original,
                WindowMode::Maximized,
                WindowMode::Fullscreen,
            ],
        }
    }

    /// Mode after `current`, wrapping; `forward == false` steps backwards
    pub fn cycle(&self, current: WindowMode, forward: bool) -> WindowMode {
        let modes = self.modes();
        let n = modes.len();
        // A mode outside the set (e.g. Maximized with `Two`) restarts the cycle
        let index = modes.iter().position(|&m| m == current).unwrap_or(0);
        let next = if forward { (index + 1) % n } else { (index + n - 1) % n };
        modes[next]
    }
}

/// Asset file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub font: PathBuf,
    pub music: PathBuf,
    pub select_sound: PathBuf,
    pub confirm_sound: PathBuf,
    pub layer_dir: PathBuf,
    pub layer_count: usize,
}

impl Default for AssetPaths {
    fn default() -> Self {
        AssetPaths {
            font: PathBuf::from("resources/RobotoCondensed-Bold.ttf"),
            music: PathBuf::from("resources/Sound/background_music.ogg"),
            select_sound: PathBuf::from("resources/Sound/select.ogg"),
            confirm_sound: PathBuf::from("resources/Sound/confirm.ogg"),
            layer_dir: PathBuf::from("resources/Image/Background"),
            layer_count: 4,
        }
    }
}

impl AssetPaths {
    /// Number of layer files to try, within 1..=MAX_LAYERS
    pub fn layer_count(&self) -> usize {
        self.layer_count.clamp(1, MAX_LAYERS)
    }

    /// `layer_<n>.png` for a zero-based layer index
    pub fn layer_path(&self, index: usize) -> PathBuf {
        self.layer_dir.join(format!("layer_{}.png", index + 1))
    }
}

/// Top-level game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window_title: String,
    pub screen_width: u32,
    pub screen_height: u32,
    pub target_fps: u32,

    pub back_key: BackKeyBinding,
    pub window_modes: WindowModeSet,
    /// Show an explicit "Back" row in the options list
    pub options_back_item: bool,

    pub speed_policy: SpeedPolicy,
    /// Scroll advance per frame on the title screen
    pub title_scroll_speed: f32,
    /// Scroll advance per frame everywhere else
    pub menu_scroll_speed: f32,

    pub music_volume: f32,
    pub sfx_volume: f32,

    /// Abort start-up when a placeholder or fallback layer cannot be created
    pub strict_assets: bool,
    /// Fixed seed for placeholder layer colors
    pub placeholder_seed: Option<u64>,

    pub assets: AssetPaths,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            window_title: "Parallax Menu".to_string(),
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            target_fps: 60,
            back_key: BackKeyBinding::default(),
            window_modes: WindowModeSet::default(),
            options_back_item: false,
            speed_policy: SpeedPolicy::default(),
            title_scroll_speed: 0.5,
            menu_scroll_speed: 1.0,
            music_volume: 0.5,
            sfx_volume: 0.5,
            strict_assets: false,
            placeholder_seed: None,
            assets: AssetPaths::default(),
        }
    }
}

/// Errors reading a configuration file
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: GameConfig = serde_json::from_str(json)?;
        config.music_volume = config.music_volume.clamp(0.0, 1.0);
        config.sfx_volume = config.sfx_volume.clamp(0.0, 1.0);
        Ok(config)
    }

    /// Candidate config files, most specific first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_PATH)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("parallax_menu").join("game.json"));
        }
        paths
    }

    /// First readable config from `paths`, else defaults
    ///
    /// A malformed file is reported and skipped rather than aborting start-up.
    pub fn discover(paths: &[PathBuf]) -> Self {
        for path in paths {
            if !path.is_file() {
                continue;
            }
            match Self::load_from_file(path) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => warn!("Ignoring config {}: {}", path.display(), e),
            }
        }
        info!("No config file found, using defaults");
        GameConfig::default()
    }
}
