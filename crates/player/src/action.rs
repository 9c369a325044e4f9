// FILE: crates/player/src/action.rs

use storystream_core::Book;
use storystream_library::LibraryError;

/// Everything the player state machine reacts to
///
/// User intents come from the front end. `BookLoaded`, `ProgressTicked` and
/// `PlaybackErrored` are fed back by effects. `ChapterFinished` is produced by
/// the reducer itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LoadBook,
    BookLoaded(Result<Book, LibraryError>),
    PlayPauseToggled,
    FastForward,
    Rewind,
    ChangeSpeed(f64),
    SelectPreviousChapter,
    SelectNextChapter,
    /// Jump to a fraction of the current chapter
    Seek(f64),
    /// Current engine position in seconds
    ProgressTicked(f64),
    ChapterFinished,
    PlaybackErrored(String),
    AlertDismissed,
}

impl Action {
    /// Short name used in logs; avoids dumping whole book records
    pub fn name(&self) -> &'static str {
        match self {
            Action::LoadBook => "LoadBook",
            Action::BookLoaded(Ok(_)) => "BookLoaded(ok)",
            Action::BookLoaded(Err(_)) => "BookLoaded(err)",
            Action::PlayPauseToggled => "PlayPauseToggled",
            Action::FastForward => "FastForward",
            Action::Rewind => "Rewind",
            Action::ChangeSpeed(_) => "ChangeSpeed",
            Action::SelectPreviousChapter => "SelectPreviousChapter",
            Action::SelectNextChapter => "SelectNextChapter",
            Action::Seek(_) => "Seek",
            Action::ProgressTicked(_) => "ProgressTicked",
            Action::ChapterFinished => "ChapterFinished",
            Action::PlaybackErrored(_) => "PlaybackErrored",
            Action::AlertDismissed => "AlertDismissed",
        }
    }
}
