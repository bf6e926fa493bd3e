mod backend;
mod config;
mod error;
mod frame;
mod gui;
mod input;
mod parallax;
mod resources;
mod screens;
mod text;

use backend::sdl::SdlBackend;
use config::GameConfig;
use error::AppError;
use frame::FrameDriver;
use log::{error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use resources::ResourceSet;
use sdl2::mixer::{self, InitFlag, Sdl2MixerContext, DEFAULT_CHANNELS, DEFAULT_FORMAT};

const AUDIO_FREQUENCY: i32 = 44_100;
const AUDIO_CHUNK_SIZE: i32 = 1_024;
const MIXING_CHANNELS: i32 = 8;

/// Open the audio device and mixer
///
/// Any failure just means a silent game.
fn init_audio(sdl_context: &sdl2::Sdl) -> Option<(sdl2::AudioSubsystem, Sdl2MixerContext)> {
    let audio = match sdl_context.audio() {
        Ok(audio) => audio,
        Err(e) => {
            warn!("Audio subsystem unavailable: {}", e);
            return None;
        }
    };
    if let Err(e) = mixer::open_audio(AUDIO_FREQUENCY, DEFAULT_FORMAT, DEFAULT_CHANNELS, AUDIO_CHUNK_SIZE) {
        warn!("Failed to open audio device: {}", e);
        return None;
    }
    let mixer_context = match mixer::init(InitFlag::OGG | InitFlag::MP3) {
        Ok(ctx) => ctx,
        Err(e) => {
            warn!("Failed to initialize mixer: {}", e);
            mixer::close_audio();
            return None;
        }
    };
    mixer::allocate_channels(MIXING_CHANNELS);
    Some((audio, mixer_context))
}

fn run() -> Result<(), AppError> {
    let config = GameConfig::discover(&GameConfig::search_paths());

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;
    let _image_context = sdl2::image::init(sdl2::image::InitFlag::PNG)?;
    let ttf_context = sdl2::ttf::init().map_err(|e| e.to_string())?;
    let audio = init_audio(&sdl_context);

    let window = video_subsystem
        .window(&config.window_title, config.screen_width, config.screen_height)
        .position_centered()
        .resizable()
        .build()
        .map_err(|e| e.to_string())?;

    let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
    let texture_creator = canvas.texture_creator();
    let event_pump = sdl_context.event_pump()?;

    info!(
        "Window {}x{} at {} fps, audio {}",
        config.screen_width,
        config.screen_height,
        config.target_fps,
        if audio.is_some() { "on" } else { "off" }
    );

    let mut backend = SdlBackend::new(
        canvas,
        event_pump,
        &texture_creator,
        &ttf_context,
        audio.is_some(),
        config.target_fps,
    )?;

    let mut rng = match config.placeholder_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut resources = ResourceSet::load(&mut backend, &config, &mut rng)?;

    let mut driver = FrameDriver::new(&config);
    let result = driver.run(&mut backend, &mut resources);

    resources.unload(&mut backend);
    drop(backend);
    if audio.is_some() {
        mixer::close_audio();
    }
    result?;

    info!("Goodbye");
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}
