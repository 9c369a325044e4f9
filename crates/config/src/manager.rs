//! Entry point for loading, saving and overriding configuration

use crate::file::ConfigFile;
use crate::{Config, ConfigError, ConfigResult, LogLevel};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const FILE_NAME: &str = "config.toml";

/// Owns the location of `config.toml`
///
/// The default location is the platform config directory, e.g.
/// `~/.config/storystream/` on Linux.
pub struct ConfigManager {
    config_dir: PathBuf,
    file: ConfigFile,
}

impl ConfigManager {
    pub fn new() -> ConfigResult<Self> {
        let dirs = ProjectDirs::from("", "", "storystream").ok_or(ConfigError::NoConfigDir)?;
        Self::with_directory(dirs.config_dir().to_path_buf())
    }

    pub fn with_directory(config_dir: PathBuf) -> ConfigResult<Self> {
        let file = ConfigFile::new(config_dir.join(FILE_NAME));
        Ok(Self { config_dir, file })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }

    /// Reads the file; a missing file yields defaults, a broken one is an error
    pub fn load(&self) -> ConfigResult<Config> {
        self.file.read()
    }

    pub fn load_or_default(&self) -> Config {
        self.load().unwrap_or_else(|e| {
            log::warn!("{}; falling back to default config", e);
            Config::default()
        })
    }

    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        self.file.write(config)
    }

    /// Load, modify, save
    pub fn update(&self, change: impl FnOnce(&mut Config)) -> ConfigResult<()> {
        let mut config = self.load()?;
        change(&mut config);
        self.save(&config)
    }

    /// Writes the defaults if no file exists yet; returns whether it wrote one
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.file.exists() {
            return Ok(false);
        }
        self.save(&Config::default())?;
        Ok(true)
    }

    pub fn reset(&self) -> ConfigResult<()> {
        self.save(&Config::default())
    }

    /// Problems in the stored file, one line per field; empty when valid
    pub fn validate(&self) -> ConfigResult<Vec<String>> {
        Ok(match self.load()?.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => errors.iter().map(ToString::to_string).collect(),
        })
    }

    /// Loads the file, then applies `STORYSTREAM_<SECTION>_<FIELD>` variables
    pub fn load_with_env_overrides(&self) -> ConfigResult<Config> {
        let mut config = self.load()?;
        apply_env_overrides(&mut config, |name| std::env::var(name).ok());
        Ok(config)
    }
}

/// Unparsable values are skipped with a warning
fn apply_env_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(value) = var("STORYSTREAM_PLAYER_DEFAULT_SPEED") {
        match value.trim().parse::<f64>() {
            Ok(speed) => config.player.default_speed = speed,
            Err(_) => log::warn!("Ignoring STORYSTREAM_PLAYER_DEFAULT_SPEED={}", value),
        }
    }

    if let Some(value) = var("STORYSTREAM_APP_LOG_LEVEL") {
        match value.parse::<LogLevel>() {
            Ok(level) => config.app.log_level = level,
            Err(e) => log::warn!("Ignoring STORYSTREAM_APP_LOG_LEVEL: {}", e),
        }
    }

    if let Some(value) = var("STORYSTREAM_LIBRARY_RESOURCE_DIR") {
        config.library.resource_dir = PathBuf::from(value);
    }

    if let Some(value) = var("STORYSTREAM_LIBRARY_BOOK_IDENTIFIER") {
        config.library.book_identifier = value;
    }

    if let Err(errors) = config.validate() {
        for error in errors {
            log::warn!("After environment overrides: {}", error);
        }
    }
}
