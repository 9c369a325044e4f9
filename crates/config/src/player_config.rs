//! Player configuration section

use crate::validation::{Checks, ConfigSection, ValidationError};
use serde::{Deserialize, Serialize};

/// Player behavior and transport constants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Playback rate a session starts at
    pub default_speed: f64,

    /// Rates the speed control cycles through
    pub speed_presets: Vec<f64>,

    /// Seconds skipped by fast-forward
    pub fast_forward_secs: f64,

    /// Seconds skipped back by rewind
    pub rewind_secs: f64,

    /// Interval between playback position samples in milliseconds
    pub progress_poll_ms: u64,

    /// Fraction of a chapter left at which the chapter counts as finished
    pub chapter_end_tolerance: f64,

    /// Console redraw interval in milliseconds
    pub ui_refresh_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_speed: 1.0,
            speed_presets: vec![1.0, 1.5],
            fast_forward_secs: 10.0,
            rewind_secs: 5.0,
            progress_poll_ms: 500,
            chapter_end_tolerance: 0.01,
            ui_refresh_ms: 100,
        }
    }
}

impl ConfigSection for PlayerConfig {
    const NAME: &'static str = "player";

    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut checks = Checks::new(Self::NAME);
        checks
            .positive("default_speed", self.default_speed)
            .range("default_speed", self.default_speed, 0.0, 4.0)
            .range("fast_forward_secs", self.fast_forward_secs, 1.0, 120.0)
            .range("rewind_secs", self.rewind_secs, 1.0, 120.0)
            .range("progress_poll_ms", self.progress_poll_ms, 50, 5000)
            .range("ui_refresh_ms", self.ui_refresh_ms, 16, 1000)
            .require(
                "chapter_end_tolerance",
                self.chapter_end_tolerance > 0.0 && self.chapter_end_tolerance < 0.5,
                format!(
                    "must be greater than 0 and less than 0.5 (got {})",
                    self.chapter_end_tolerance
                ),
            )
            .require(
                "speed_presets",
                !self.speed_presets.is_empty(),
                "must contain at least one rate",
            );

        for (i, preset) in self.speed_presets.iter().enumerate() {
            checks.positive(&format!("speed_presets[{}]", i), *preset);
        }

        checks.finish()
    }
}
