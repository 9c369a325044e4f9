// FILE: crates/cli/src/render.rs

//! Turns a player state snapshot into console lines

use console::style;
use storystream_core::format_clock;
use storystream_player::{PlayerState, ALERT_DISMISS_LABEL};

const BAR_WIDTH: usize = 40;

/// Speed label as shown on the speed button, e.g. `x1` or `x1.5`
pub fn speed_label(speed: f64) -> String {
    format!("x{}", speed)
}

pub fn progress_bar(progress: f64, width: usize) -> String {
    let fraction = if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = ((fraction * width as f64).round() as usize).min(width);
    format!("[{}{}]", "=".repeat(filled), " ".repeat(width - filled))
}

pub fn render(state: &PlayerState) -> Vec<String> {
    let mut lines = Vec::new();

    match &state.book {
        None if state.is_loading => lines.push(format!("  {}", style("Loading book...").dim())),
        None => lines.push(format!("  {}", style("No book loaded").dim())),
        Some(book) => {
            lines.push(format!("  {}", style(format!("[cover: {}]", book.cover_file_name)).dim()));
            lines.push(String::new());
            lines.push(format!("  {}", style(&book.title).bold().cyan()));
            lines.push(format!(
                "  by {} ({})",
                style(&book.author).dim(),
                book.published_in
            ));
            lines.push(String::new());

            if let Some(chapter) = state.current_chapter() {
                lines.push(format!(
                    "  KEY POINT {} OF {}",
                    state.selected_chapter_index + 1,
                    book.chapters.len()
                ));
                lines.push(format!("  {}", chapter.key_point));
                lines.push(String::new());
            }

            lines.push(format!(
                "  {} {} {}",
                format_clock(state.current_time()),
                progress_bar(state.playback_progress, BAR_WIDTH),
                format_clock(state.duration)
            ));
            lines.push(String::new());

            let status = if state.is_playing {
                style("⏸  Playing").green()
            } else {
                style("▶  Paused").yellow()
            };
            lines.push(format!(
                "  {}    Speed {}",
                status,
                speed_label(state.playback_speed)
            ));
        }
    }

    if let Some(alert) = &state.alert {
        lines.push(String::new());
        lines.push(format!("  {}", style(&alert.title).red().bold()));
        lines.push(format!("  {}", alert.message));
        lines.push(format!("  [Enter] {}", ALERT_DISMISS_LABEL));
    }

    lines.push(String::new());
    lines.push("  Space play/pause   ←/→ -5s/+10s   p/n chapter   s speed".to_string());
    lines.push("  0-9 seek   Enter dismiss   q quit".to_string());

    lines
}
