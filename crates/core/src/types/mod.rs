//! Domain types for StoryStream
//!
//! - `book`: Book and Chapter records
//! - `catalog`: identifiers of bundled books
//! - `common`: shared traits and formatting helpers

mod book;
mod catalog;
mod common;

pub use book::{Book, Chapter};
pub use catalog::BookResource;
pub use common::{format_clock, Validator};
