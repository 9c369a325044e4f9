//! Library configuration section

use crate::validation::{Checks, ConfigSection, ValidationError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use storystream_core::BookResource;

/// Where the book record and its audio files are read from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LibraryConfig {
    /// Directory holding `<book_identifier>.json`, chapter audio and cover art
    pub resource_dir: PathBuf,

    /// Identifier of the book loaded at startup
    pub book_identifier: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            resource_dir: PathBuf::from("resources"),
            book_identifier: BookResource::default().to_string(),
        }
    }
}

impl ConfigSection for LibraryConfig {
    const NAME: &'static str = "library";

    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        // The directory may not exist yet; only an empty path is rejected.
        Checks::new(Self::NAME)
            .not_empty("book_identifier", &self.book_identifier)
            .require(
                "resource_dir",
                !self.resource_dir.as_os_str().is_empty(),
                "must not be empty",
            )
            .finish()
    }
}
