//! character-viewer: an animated character in a field of obstacle cubes
//!
//! - Number keys 1-5 swap the character asset (Idle, Walk, Run, Jump, Dying)
//! - WASD steps the character, arrow keys pan the camera, space jumps
//! - Mouse drag orbits, wheel zooms
//! - Overlapping cubes light up red

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod asset;
mod config;
mod game;
mod input;
mod math;
mod scene;

use std::path::Path;
use macroquad::prelude::*;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;
use asset::FileAssetSource;
use config::{ViewerConfig, CONFIG_FILE};
use game::ViewerSession;
use input::InputState;
use scene::SceneRenderer;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("character-viewer v{}", VERSION),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        sample_count: 4,
        ..Default::default()
    }
}

/// wasm32 has no system clock; reading one for a timestamp panics
const LOG_TIMESTAMPS: bool = cfg!(not(target_arch = "wasm32"));

fn log_subscriber<W>(filter: EnvFilter, timestamps: bool, writer: W) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer);
    if timestamps {
        Box::new(builder.finish())
    } else {
        Box::new(builder.without_time().with_ansi(false).finish())
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = log_subscriber(filter, LOG_TIMESTAMPS, std::io::stdout);
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("logging already initialised: {}", e);
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    init_logging();

    let config = ViewerConfig::load_or_default(Path::new(CONFIG_FILE));
    let seed = config
        .obstacles
        .seed
        .unwrap_or_else(|| (macroquad::miniquad::date::now() * 1000.0) as u64);
    let source = FileAssetSource::from_config(&config.assets);

    let mut session = ViewerSession::new(config, Box::new(source), seed);
    session.start();

    let mut input = InputState::new();
    let mut renderer = SceneRenderer::new();

    loop {
        let now = get_time();
        let dt = get_frame_time();

        session.camera.set_aspect(screen_width(), screen_height());

        input.poll(scene::controls_hovered());
        for &action in input.actions() {
            session.handle_action(action, now);
        }
        if input.drag != Vec2::ZERO {
            session.camera.orbit(input.drag.x, input.drag.y);
        }
        if input.zoom != 1.0 {
            session.camera.zoom(input.zoom);
        }

        session.tick(now, dt);

        renderer.draw(&session);
        scene::draw_controls(&mut session.scene);

        next_frame().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    /// Log sink the test can read back
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn log_line(timestamps: bool) -> String {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = log_subscriber(EnvFilter::new("info"), timestamps, move || sink.clone());
        tracing::subscriber::with_default(subscriber, || tracing::info!("viewer ready"));
        captured.text()
    }

    #[test]
    fn test_untimed_lines_start_with_level() {
        let line = log_line(false);
        assert!(line.trim_start().starts_with("INFO"), "{}", line);
        assert!(line.contains("viewer ready"));
    }

    #[test]
    fn test_timed_lines_lead_with_timestamp() {
        let line = log_line(true);
        assert!(line.contains("INFO"), "{}", line);
        assert!(!line.trim_start().starts_with("INFO"), "{}", line);
    }

    #[cfg(target_arch = "wasm32")]
    #[test]
    fn test_no_timestamps_on_wasm() {
        assert!(!LOG_TIMESTAMPS);
    }
}
