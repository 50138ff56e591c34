// ==================== Imports ====================
use config::Config;
use game::{Game, Outcome};
use sequencer::MoveCommand;
use tracing::{error, info, warn, Level};
use wasm_bindgen::prelude::*;
use web::{WebHost, WebScheduler};

mod browser;
mod engine;

pub mod config;
pub mod game;
pub mod headless;
pub mod host;
pub mod scene;
pub mod sequencer;
pub mod tween;
pub mod web;

// TABLE:
// ┌──────────────────────────────────────────────────────────────────────┐
// │                          Module Layout                               │
// ├───────────────┬──────────────────────────────────────────────────────┤
// │ lib.rs        │ wasm entry, move command list                        │
// │ game.rs       │ startup phases : loading -> transition -> moves      │
// │ sequencer.rs  │ move commands -> chain of x tweens                   │
// │ tween.rs      │ easing, tween, timeline sampling                     │
// │ scene.rs      │ display tree : two scenes of sprites and text        │
// │ host.rs       │ SceneHost + TweenScheduler capability traits         │
// │ web.rs        │ canvas / timer backed implementations                │
// │ headless.rs   │ virtual clock implementations for tests              │
// │ engine.rs     │ renderer, ticker, image + manifest loading           │
// │ browser.rs    │ thin web_sys wrappers, console logging               │
// └───────────────┴──────────────────────────────────────────────────────┘

// Read once at startup, never changed afterwards
const COMMANDS: [&str; 6] = ["R+", "R+", "L-", "R+", "L-", "L-"];

// ==================== Main Functions ====================
/// Main entry for Webassembly module
/// - installs panic hook + console logging
/// - spawns the startup sequence on the local executor
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    // better panic messages for debugging
    console_error_panic_hook::set_once();

    if let Err(err) = browser::init_logging(Level::INFO) {
        web_sys::console::warn_1(&format!("{:#}", err).into());
    }

    browser::spawn_local(async move {
        let config = Config::default();
        let host = WebHost::new(&config);
        let game = Game::new(host, WebScheduler, config, MoveCommand::parse_all(&COMMANDS));

        match game.initialize().await {
            Ok(Outcome::Animated { final_x, steps }) => {
                info!(final_x, steps, "startup finished")
            }
            Ok(Outcome::Failed { reason }) => warn!("parked on error screen : {}", reason),
            Err(err) => error!("startup failed : {:#}", err),
        }
    });

    Ok(())
}
