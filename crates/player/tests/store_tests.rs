//! Runtime tests: effect execution, the progress poll loop and shutdown

mod common;

use common::{gatsby, RecordingEngine};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use storystream_library::{BookLoader, LibraryError, MockBookLoader};
use storystream_player::{
    Action, Environment, PlayerError, PlayerFeature, PlayerState, Store, StoreHandle,
};

fn gatsby_loader() -> MockBookLoader {
    let mut loader = MockBookLoader::new();
    loader.expect_load_book().times(1).returning(|identifier| {
        assert_eq!(identifier, "the_happy_prince");
        Ok(gatsby())
    });
    loader
}

fn spawn_store(engine: Arc<RecordingEngine>, loader: MockBookLoader) -> StoreHandle {
    let loader: Arc<dyn BookLoader> = Arc::new(loader);
    Store::spawn(
        PlayerFeature::default(),
        PlayerState::default(),
        Environment::new(engine, loader),
    )
}

async fn wait_for(
    handle: &StoreHandle,
    predicate: impl Fn(&PlayerState) -> bool,
) -> PlayerState {
    let mut updates = handle.subscribe();
    let state = tokio::time::timeout(Duration::from_secs(60), updates.wait_for(|s| predicate(s)))
        .await
        .expect("timed out waiting for state")
        .expect("store closed");
    state.clone()
}

async fn loaded_store(engine: Arc<RecordingEngine>) -> StoreHandle {
    let handle = spawn_store(engine, gatsby_loader());
    handle.send(Action::LoadBook).unwrap();
    wait_for(&handle, |s| s.book.is_some()).await;
    handle
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

#[tokio::test(start_paused = true)]
async fn test_load_book() {
    let handle = loaded_store(Arc::new(RecordingEngine::default())).await;

    let state = handle.state();
    assert!(!state.is_loading);
    assert_eq!(state.duration, 300.0);
    assert_eq!(state.book.map(|b| b.title).as_deref(), Some("The Great Gatsby"));
}

#[tokio::test(start_paused = true)]
async fn test_load_failure_shows_alert() {
    let mut loader = MockBookLoader::new();
    loader.expect_load_book().returning(|identifier| {
        Err(LibraryError::NotFound {
            identifier: identifier.to_string(),
        })
    });
    let handle = spawn_store(Arc::new(RecordingEngine::default()), loader);

    handle.send(Action::LoadBook).unwrap();
    let state = wait_for(&handle, |s| s.alert.is_some()).await;

    assert!(!state.is_loading);
    assert!(state.book.is_none());
    let alert = state.alert.unwrap();
    assert_eq!(alert.title, "Something went wrong!");
    assert_eq!(alert.message, "Book not found: the_happy_prince");
}

#[tokio::test(start_paused = true)]
async fn test_play_polls_progress() {
    let engine = Arc::new(RecordingEngine::at(150.0));
    let handle = loaded_store(Arc::clone(&engine)).await;

    handle.send(Action::PlayPauseToggled).unwrap();
    let state = wait_for(&handle, |s| s.playback_progress > 0.0).await;

    assert!(state.is_playing);
    assert_eq!(state.playback_progress, 0.5);
    assert_eq!(engine.calls(), vec!["play gatsby_ch1.mp3 x1"]);
}

#[tokio::test(start_paused = true)]
async fn test_pause_stops_polling() {
    let engine = Arc::new(RecordingEngine::at(30.0));
    let handle = loaded_store(Arc::clone(&engine)).await;

    handle.send(Action::PlayPauseToggled).unwrap();
    wait_for(&handle, |s| s.playback_progress > 0.0).await;

    engine.set_position(45.0);
    handle.send(Action::PlayPauseToggled).unwrap();
    wait_for(&handle, |s| !s.is_playing).await;
    let polls = engine.polls();

    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(engine.polls(), polls);
    assert_eq!(engine.calls(), vec!["play gatsby_ch1.mp3 x1", "pause"]);

    // Progress was made, so playing again resumes instead of restarting.
    handle.send(Action::PlayPauseToggled).unwrap();
    wait_for(&handle, |s| s.is_playing).await;
    settle().await;
    assert_eq!(engine.calls().last().map(String::as_str), Some("resume x1"));
}

#[tokio::test(start_paused = true)]
async fn test_poll_interval_paces_ticks() {
    let engine = Arc::new(RecordingEngine::at(10.0));
    let loader: Arc<dyn BookLoader> = Arc::new(gatsby_loader());
    let handle = Store::spawn(
        PlayerFeature::default(),
        PlayerState::default(),
        Environment::new(engine.clone(), loader).with_poll_interval(Duration::from_secs(2)),
    );
    handle.send(Action::LoadBook).unwrap();
    wait_for(&handle, |s| s.book.is_some()).await;

    handle.send(Action::PlayPauseToggled).unwrap();
    settle().await;
    assert_eq!(engine.polls(), 0);

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(engine.polls(), 1);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(engine.polls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_chapter_end_advances_and_replays() {
    let engine = Arc::new(RecordingEngine::at(299.0));
    let handle = loaded_store(Arc::clone(&engine)).await;

    handle.send(Action::PlayPauseToggled).unwrap();
    let state = wait_for(&handle, |s| s.selected_chapter_index == 1).await;

    assert_eq!(state.duration, 320.0);
    assert!(state.is_playing);

    // 299 of 320 seconds is short of the end, so the same loop keeps ticking.
    let state = wait_for(&handle, |s| s.playback_progress > 0.0).await;
    assert_eq!(state.selected_chapter_index, 1);
    assert_eq!(state.playback_progress, 299.0 / 320.0);

    settle().await;
    assert_eq!(
        engine.calls(),
        vec!["play gatsby_ch1.mp3 x1", "play gatsby_ch2.mp3 x1"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_failed_seek_keeps_optimistic_progress() {
    let engine = Arc::new(RecordingEngine::default());
    engine.fail_seek.store(true, Ordering::SeqCst);
    let handle = loaded_store(Arc::clone(&engine)).await;

    handle.send(Action::Seek(0.5)).unwrap();
    let state = wait_for(&handle, |s| s.alert.is_some()).await;

    assert_eq!(state.playback_progress, 0.5);
    assert_eq!(state.alert.unwrap().message, "No active player");

    handle.send(Action::AlertDismissed).unwrap();
    let state = wait_for(&handle, |s| s.alert.is_none()).await;
    assert_eq!(state.playback_progress, 0.5);
}

#[tokio::test(start_paused = true)]
async fn test_engine_commands_run_in_order() {
    let engine = Arc::new(RecordingEngine::default());
    let handle = loaded_store(Arc::clone(&engine)).await;

    for action in [
        Action::ChangeSpeed(1.5),
        Action::FastForward,
        Action::Rewind,
        Action::Seek(0.25),
    ] {
        handle.send(action).unwrap();
    }
    wait_for(&handle, |s| s.playback_progress == 0.25).await;
    settle().await;

    assert_eq!(
        engine.calls(),
        vec!["change_speed 1.5", "fast_forward 10", "rewind 5", "seek 0.25"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_poll_failure_alerts_and_stops_loop() {
    let engine = Arc::new(RecordingEngine::default());
    engine.fail_current_time.store(true, Ordering::SeqCst);
    let handle = loaded_store(Arc::clone(&engine)).await;

    handle.send(Action::PlayPauseToggled).unwrap();
    let state = wait_for(&handle, |s| s.alert.is_some()).await;
    assert_eq!(
        state.alert.unwrap().message,
        "Failed to initialize player: output device lost"
    );

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(engine.polls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_play_alert_is_not_replaced_by_poll() {
    let engine = Arc::new(RecordingEngine::default());
    engine.fail_play.store(true, Ordering::SeqCst);
    let handle = loaded_store(Arc::clone(&engine)).await;

    handle.send(Action::PlayPauseToggled).unwrap();
    let state = wait_for(&handle, |s| s.alert.is_some()).await;
    assert_eq!(
        state.alert.unwrap().message,
        "Audio file not found: gatsby_ch1.mp3"
    );

    tokio::time::sleep(Duration::from_secs(5)).await;

    let state = handle.state();
    assert_eq!(
        state.alert.map(|a| a.message).as_deref(),
        Some("Audio file not found: gatsby_ch1.mp3")
    );
    // The poll found nothing loaded and ended on its first sample
    assert_eq!(engine.polls(), 1);
    assert!(state.is_playing);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_polling() {
    let engine = Arc::new(RecordingEngine::at(60.0));
    let handle = loaded_store(Arc::clone(&engine)).await;

    handle.send(Action::PlayPauseToggled).unwrap();
    wait_for(&handle, |s| s.playback_progress > 0.0).await;

    handle.shutdown().await;
    let polls = engine.polls();
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(engine.polls(), polls);
    assert_eq!(
        handle.send(Action::PlayPauseToggled),
        Err(PlayerError::StoreClosed)
    );
}
