// FILE: crates/cli/src/keys.rs

use console::Key;
use storystream_player::Action;

/// What a key press asks the front end to do
#[derive(Debug, Clone, PartialEq)]
pub enum KeyCommand {
    Dispatch(Action),
    Quit,
}

/// Maps a key to a command. `speed` and `presets` drive the speed toggle.
pub fn map_key(key: &Key, speed: f64, presets: &[f64]) -> Option<KeyCommand> {
    let action = match key {
        Key::Char(' ') => Action::PlayPauseToggled,
        Key::ArrowLeft => Action::Rewind,
        Key::ArrowRight => Action::FastForward,
        Key::Char('p') => Action::SelectPreviousChapter,
        Key::Char('n') => Action::SelectNextChapter,
        Key::Char('s') => Action::ChangeSpeed(next_speed(presets, speed)),
        Key::Char(c) if c.is_ascii_digit() => {
            let tenths = c.to_digit(10).unwrap_or(0);
            Action::Seek(f64::from(tenths) / 10.0)
        }
        Key::Enter | Key::Escape => Action::AlertDismissed,
        Key::Char('q') => return Some(KeyCommand::Quit),
        _ => return None,
    };
    Some(KeyCommand::Dispatch(action))
}

/// The preset after `current`, wrapping; the first preset if `current` is not one
pub fn next_speed(presets: &[f64], current: f64) -> f64 {
    let Some(first) = presets.first() else {
        return current;
    };
    presets
        .iter()
        .position(|p| (p - current).abs() < 1e-6)
        .map(|i| presets[(i + 1) % presets.len()])
        .unwrap_or(*first)
}
