//! StoryStream configuration
//!
//! `config.toml` has one table per [`ConfigSection`]: `[app]`, `[player]` and
//! `[library]`. Missing tables and fields take their defaults. Saving refuses
//! invalid values and replaces the file atomically.
//!
//! ```rust,no_run
//! use storystream_config::ConfigManager;
//!
//! let manager = ConfigManager::new().expect("no config directory");
//! let config = manager.load_or_default();
//! println!("Polling every {}ms", config.player.progress_poll_ms);
//! ```

mod error;
mod file;
mod manager;
mod validation;

mod app_config;
mod library_config;
mod player_config;

pub use app_config::{AppConfig, LogLevel};
pub use error::{ConfigError, ConfigResult, ValidationError};
pub use library_config::LibraryConfig;
pub use manager::ConfigManager;
pub use player_config::PlayerConfig;
pub use validation::ConfigSection;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub app: AppConfig,
    pub player: PlayerConfig,
    pub library: LibraryConfig,
}

impl Config {
    /// Validates every section, returning all problems found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = [
            self.app.validate(),
            self.player.validate(),
            self.library.validate(),
        ]
        .into_iter()
        .filter_map(Result::err)
        .flatten()
        .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
