//! StoryStream Library
//!
//! Loads book records for the player. [`BookLoader`] is the interface the
//! player depends on; [`BookParser`] reads JSON records from a resource
//! directory and caches them.

pub mod error;
mod loader;
mod parser;

pub use error::{LibraryError, LibraryResult};
pub use loader::BookLoader;
#[cfg(any(test, feature = "testing"))]
pub use loader::MockBookLoader;
pub use parser::BookParser;
