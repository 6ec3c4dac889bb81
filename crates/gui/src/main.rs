//! Xiangqi desktop board
//!
//! Plays and analyses games against an external engine speaking the
//! Pikafish line protocol:
//! - Click-to-move input with pseudo-legal destination hints
//! - Engine replies, hints and multi-variation analysis
//! - Undo, jump to any earlier move, load a position

mod app;
mod board;
mod game;
mod settings;
mod styles;

use app::XiangqiApp;
use iced::application;
use settings::Settings;
use tracing_subscriber::EnvFilter;

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load();
    tracing::info!(engine = %settings.engine_path.display(), "starting");

    application("Xiangqi", XiangqiApp::update, XiangqiApp::view)
        .subscription(XiangqiApp::subscription)
        .theme(XiangqiApp::theme)
        .window_size((1000.0, 760.0))
        .run_with(move || XiangqiApp::new(settings))
}
