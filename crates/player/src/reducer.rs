// FILE: crates/player/src/reducer.rs

use crate::action::Action;
use crate::alert::AlertState;
use crate::effect::{Effect, EffectId, EngineCommand};
use crate::state::PlayerState;
use storystream_config::{LibraryConfig, PlayerConfig};

/// Constants the transition function depends on
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSettings {
    /// Catalog identifier requested by `LoadBook`
    pub book_identifier: String,
    pub fast_forward_secs: f64,
    pub rewind_secs: f64,
    /// A tick at or beyond `1 - chapter_end_tolerance` of the chapter finishes it
    pub chapter_end_tolerance: f64,
}

impl PlayerSettings {
    pub fn from_config(player: &PlayerConfig, library: &LibraryConfig) -> Self {
        Self {
            book_identifier: library.book_identifier.clone(),
            fast_forward_secs: player.fast_forward_secs,
            rewind_secs: player.rewind_secs,
            chapter_end_tolerance: player.chapter_end_tolerance,
        }
    }
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self::from_config(&PlayerConfig::default(), &LibraryConfig::default())
    }
}

/// The player state machine
///
/// [`PlayerFeature::reduce`] applies one action to the state and returns the
/// effects to run. It performs no I/O, so every transition can be tested by
/// inspecting the state and the returned effects.
#[derive(Debug, Clone, Default)]
pub struct PlayerFeature {
    settings: PlayerSettings,
}

impl PlayerFeature {
    pub fn new(settings: PlayerSettings) -> Self {
        Self { settings }
    }

    pub fn reduce(&self, state: &mut PlayerState, action: Action) -> Vec<Effect> {
        log::debug!("Reducing {}", action.name());

        match action {
            Action::LoadBook => {
                state.is_loading = true;
                vec![Effect::LoadBook {
                    identifier: self.settings.book_identifier.clone(),
                }]
            }

            Action::BookLoaded(Ok(book)) => {
                state.duration = book.chapter_duration(state.selected_chapter_index);
                state.book = Some(book);
                state.is_loading = false;
                Vec::new()
            }

            Action::BookLoaded(Err(error)) => {
                log::warn!("Book failed to load: {}", error);
                state.is_loading = false;
                state.alert = Some(AlertState::error(error.to_string()));
                Vec::new()
            }

            Action::PlayPauseToggled => self.toggle_playback(state),

            Action::FastForward => {
                let seconds = self.settings.fast_forward_secs;
                if state.duration > 0.0 {
                    let target = (state.current_time() + seconds).min(state.duration);
                    state.playback_progress = target / state.duration;
                }
                vec![Effect::Engine(EngineCommand::FastForward(seconds))]
            }

            Action::Rewind => {
                let seconds = self.settings.rewind_secs;
                if state.duration > 0.0 {
                    let target = (state.current_time() - seconds).max(0.0);
                    state.playback_progress = target / state.duration;
                }
                vec![Effect::Engine(EngineCommand::Rewind(seconds))]
            }

            Action::ChangeSpeed(rate) => {
                state.playback_speed = rate;
                vec![Effect::Engine(EngineCommand::ChangeSpeed(rate))]
            }

            Action::SelectPreviousChapter => {
                if state.chapter_count() == 0 {
                    return Vec::new();
                }
                let index = state.selected_chapter_index.saturating_sub(1);
                self.change_chapter(state, index)
            }

            Action::SelectNextChapter => {
                let count = state.chapter_count();
                if count == 0 {
                    return Vec::new();
                }
                let index = (state.selected_chapter_index + 1).min(count - 1);
                self.change_chapter(state, index)
            }

            Action::Seek(fraction) => {
                state.playback_progress = fraction;
                vec![Effect::Engine(EngineCommand::Seek(fraction))]
            }

            Action::ProgressTicked(seconds) => {
                if state.duration <= 0.0 {
                    return Vec::new();
                }
                let progress = seconds / state.duration;
                if progress >= 1.0 - self.settings.chapter_end_tolerance {
                    vec![Effect::Send(Action::ChapterFinished)]
                } else {
                    state.playback_progress = progress;
                    Vec::new()
                }
            }

            Action::ChapterFinished => {
                let count = state.chapter_count();
                if count == 0 {
                    return Vec::new();
                }
                // Finishing the last chapter loops back to the first.
                let index = (state.selected_chapter_index + 1) % count;
                self.change_chapter(state, index)
            }

            Action::PlaybackErrored(message) => {
                log::warn!("Playback failed: {}", message);
                state.alert = Some(AlertState::error(message));
                Vec::new()
            }

            Action::AlertDismissed => {
                state.alert = None;
                Vec::new()
            }
        }
    }

    fn toggle_playback(&self, state: &mut PlayerState) -> Vec<Effect> {
        if state.book.is_none() {
            return Vec::new();
        }

        if state.is_playing {
            state.is_playing = false;
            return vec![
                Effect::Cancel(EffectId::Progress),
                Effect::Engine(EngineCommand::Pause),
            ];
        }

        let rate = state.playback_speed;
        let command = if state.playback_progress > 0.0 {
            EngineCommand::Resume { rate }
        } else {
            match state.current_chapter() {
                Some(chapter) => EngineCommand::Play {
                    file_id: chapter.audio_file_name.clone(),
                    rate,
                },
                None => return Vec::new(),
            }
        };

        state.is_playing = true;
        vec![Effect::Engine(command), Effect::StartProgressLoop]
    }

    /// Moves to `index`, resetting progress and duration
    ///
    /// Replays only when already playing; never touches `is_playing`, so a
    /// running poll loop carries on into the new chapter.
    fn change_chapter(&self, state: &mut PlayerState, index: usize) -> Vec<Effect> {
        let (file_id, duration) = match state.book.as_ref().and_then(|b| b.chapter(index)) {
            Some(chapter) => (chapter.audio_file_name.clone(), chapter.duration),
            None => return Vec::new(),
        };

        state.selected_chapter_index = index;
        state.duration = duration;
        state.playback_progress = 0.0;

        if state.is_playing {
            vec![Effect::Engine(EngineCommand::Play {
                file_id,
                rate: state.playback_speed,
            })]
        } else {
            Vec::new()
        }
    }
}
