//! Book and chapter domain models
//!
//! These mirror the bundled book record format: snake_case JSON keys, chapter
//! durations in (fractional) seconds, and an ordered chapter list.

use crate::types::Validator;
use serde::{Deserialize, Serialize};

/// A complete audiobook as loaded from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub published_in: i32,
    pub chapters: Vec<Chapter>,
    pub cover_file_name: String,
}

impl Book {
    /// Returns the chapter at `index`, if any
    pub fn chapter(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }

    /// Number of chapters in the book
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// Duration of the chapter at `index`, or 0 when the index is out of range
    pub fn chapter_duration(&self, index: usize) -> f64 {
        self.chapter(index).map(|c| c.duration).unwrap_or(0.0)
    }

    /// Sum of all chapter durations in seconds
    pub fn total_duration(&self) -> f64 {
        self.chapters.iter().map(|c| c.duration).sum()
    }
}

impl Validator for Book {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push("Title cannot be empty".to_string());
        }

        for chapter in &self.chapters {
            if let Err(chapter_errors) = chapter.validate() {
                errors.extend(
                    chapter_errors
                        .into_iter()
                        .map(|e| format!("Chapter {}: {}", chapter.chapter_number, e)),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// One chapter (key point) of a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    /// 1-based chapter number
    pub chapter_number: u32,
    pub title: String,
    pub key_point: String,
    pub audio_file_name: String,
    /// Length of the chapter audio in seconds
    pub duration: f64,
    pub content: String,
}

impl Validator for Chapter {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !self.duration.is_finite() || self.duration < 0.0 {
            errors.push(format!(
                "Duration must be a non-negative number of seconds, got {}",
                self.duration
            ));
        }

        if self.audio_file_name.trim().is_empty() {
            errors.push("Audio file name cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
