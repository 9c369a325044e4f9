//! Core domain model for the StoryStream audiobook player

pub mod types;

pub use types::{format_clock, Book, BookResource, Chapter, Validator};
