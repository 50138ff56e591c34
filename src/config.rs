use crate::scene::TextStyle;
use crate::sequencer::Motion;
use crate::tween::Easing;

/// Fixed tunables for the whole startup sequence. There is no runtime
/// source for these : `Config::default()` is the shipped configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    pub background: u32,

    pub manifest_url: String,
    pub bundle: String,
    pub sprite_alias: String,

    pub loading_text: String,
    pub error_text: String,
    pub label_style: TextStyle,
    pub readout_style: TextStyle,

    // seconds
    pub scene_fade: f64,
    pub label_fade: f64,
    pub fade_easing: Easing,

    // cosmetic progress ramp, in percent / seconds
    pub progress_step: u32,
    pub progress_interval: f64,
    pub progress_ceiling: u32,
    pub complete_pause: f64,

    pub transition_duration: f64,
    pub transition_overlap: f64,

    pub motion: Motion,
}

impl Config {
    /// Horizontal and vertical center of the canvas
    pub fn center(&self) -> (f64, f64) {
        (f64::from(self.width) * 0.5, f64::from(self.height) * 0.5)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: 800,
            height: 600,
            background: 0x1099bb,

            manifest_url: "assets/manifest.json".to_string(),
            bundle: "game".to_string(),
            sprite_alias: "sprite".to_string(),

            loading_text: "Loading...".to_string(),
            error_text: "Failed to load assets".to_string(),
            label_style: TextStyle::default(),
            readout_style: TextStyle {
                font_size: 24,
                ..TextStyle::default()
            },

            scene_fade: 0.5,
            label_fade: 0.3,
            fade_easing: Easing::EaseOut,

            progress_step: 5,
            progress_interval: 0.05,
            progress_ceiling: 90,
            complete_pause: 0.5,

            transition_duration: 1.0,
            transition_overlap: 0.5,

            motion: Motion {
                step_duration: 1.0,
                step_delay: 0.25,
                step_size: 100.0,
                easing: Easing::EaseInOut,
            },
        }
    }
}
