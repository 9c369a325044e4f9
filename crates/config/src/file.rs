//! Reading and atomically writing `config.toml`

use crate::{Config, ConfigError, ConfigResult};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub(crate) struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Missing file gives the defaults. Out-of-range values are logged and kept,
    /// so a hand-edited file still loads.
    pub(crate) fn read(&self) -> ConfigResult<Config> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", self.path.display());
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if text.trim().is_empty() {
            return Err(ConfigError::Empty {
                path: self.path.clone(),
            });
        }

        let config: Config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;

        if let Err(errors) = config.validate() {
            for error in &errors {
                log::warn!("{}: {}", self.path.display(), error);
            }
        }

        Ok(config)
    }

    /// Writes through a temp file in the same directory, then renames it over
    /// the target. Invalid configs are refused and leave the file untouched.
    pub(crate) fn write(&self, config: &Config) -> ConfigResult<()> {
        config.validate().map_err(ConfigError::Invalid)?;
        let text = toml::to_string_pretty(config)?;

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let write_err = |source: std::io::Error| ConfigError::Write {
            path: self.path.clone(),
            source,
        };

        std::fs::create_dir_all(dir).map_err(write_err)?;
        let mut temp = NamedTempFile::new_in(dir).map_err(write_err)?;
        temp.write_all(text.as_bytes()).map_err(write_err)?;
        temp.as_file().sync_all().map_err(write_err)?;
        temp.persist(&self.path).map_err(|e| write_err(e.error))?;

        log::info!("Saved config to {}", self.path.display());
        Ok(())
    }
}
