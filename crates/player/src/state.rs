// FILE: crates/player/src/state.rs

use crate::alert::AlertState;
use storystream_core::{Book, Chapter};

/// Everything the player screen shows
///
/// Owned by the store and changed only by the reducer. When a book is present
/// `selected_chapter_index` is a valid chapter index and `duration` equals that
/// chapter's duration.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub book: Option<Book>,
    pub is_loading: bool,
    pub selected_chapter_index: usize,
    pub is_playing: bool,
    /// Fraction of the current chapter elapsed, in [0, 1]
    pub playback_progress: f64,
    pub playback_speed: f64,
    /// Seconds; 0 until a book is loaded
    pub duration: f64,
    pub alert: Option<AlertState>,
}

impl PlayerState {
    pub fn new(playback_speed: f64) -> Self {
        Self {
            book: None,
            is_loading: false,
            selected_chapter_index: 0,
            is_playing: false,
            playback_progress: 0.0,
            playback_speed,
            duration: 0.0,
            alert: None,
        }
    }

    pub fn current_chapter(&self) -> Option<&Chapter> {
        self.book
            .as_ref()
            .and_then(|book| book.chapter(self.selected_chapter_index))
    }

    pub fn chapter_count(&self) -> usize {
        self.book.as_ref().map_or(0, |book| book.chapter_count())
    }

    /// Elapsed seconds in the current chapter
    pub fn current_time(&self) -> f64 {
        self.playback_progress * self.duration
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(1.0)
    }
}
