#![allow(dead_code)]

use async_trait::async_trait;
use media_engine::{AudioPlayer, EngineError, EngineResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use storystream_core::{Book, Chapter};
use storystream_player::{Action, Effect, PlayerFeature, PlayerState};

pub fn gatsby() -> Book {
    Book {
        title: "The Great Gatsby".to_string(),
        author: "F. Scott Fitzgerald".to_string(),
        published_in: 1925,
        chapters: vec![
            Chapter {
                chapter_number: 1,
                title: "Chapter 1".to_string(),
                key_point: "The mysterious millionaire emerges.".to_string(),
                audio_file_name: "gatsby_ch1.mp3".to_string(),
                duration: 300.0,
                content: "In my younger and more vulnerable years...".to_string(),
            },
            Chapter {
                chapter_number: 2,
                title: "Chapter 2".to_string(),
                key_point: "The valley of ashes reveals its secrets.".to_string(),
                audio_file_name: "gatsby_ch2.mp3".to_string(),
                duration: 320.0,
                content: "About half way between West Egg and New York...".to_string(),
            },
        ],
        cover_file_name: "greatgatsby.jpg".to_string(),
    }
}

pub fn loaded_state() -> PlayerState {
    let mut state = PlayerState::default();
    PlayerFeature::default().reduce(&mut state, Action::BookLoaded(Ok(gatsby())));
    state
}

/// Applies an action plus any follow-ups the reducer sends to itself,
/// returning the effects meant for the outside world
pub fn run(feature: &PlayerFeature, state: &mut PlayerState, action: Action) -> Vec<Effect> {
    let mut outside = Vec::new();
    let mut pending = vec![action];
    while let Some(action) = pending.pop() {
        for effect in feature.reduce(state, action) {
            match effect {
                Effect::Send(follow_up) => pending.push(follow_up),
                other => outside.push(other),
            }
        }
    }
    outside
}

/// Engine double that records every call and reports a settable position
#[derive(Default)]
pub struct RecordingEngine {
    calls: Mutex<Vec<String>>,
    position: Mutex<f64>,
    polls: AtomicUsize,
    pub fail_play: AtomicBool,
    pub fail_seek: AtomicBool,
    pub fail_current_time: AtomicBool,
}

impl RecordingEngine {
    pub fn at(position: f64) -> Self {
        let engine = Self::default();
        engine.set_position(position);
        engine
    }

    pub fn set_position(&self, seconds: f64) {
        *self.position.lock().unwrap() = seconds;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl AudioPlayer for RecordingEngine {
    async fn play(&self, file_id: &str, rate: f64) -> EngineResult<()> {
        self.record(format!("play {} x{}", file_id, rate));
        if self.fail_play.load(Ordering::SeqCst) {
            return Err(EngineError::FileNotFound(file_id.to_string()));
        }
        Ok(())
    }

    async fn resume(&self, rate: f64) -> EngineResult<()> {
        self.record(format!("resume x{}", rate));
        Ok(())
    }

    async fn pause(&self) -> EngineResult<()> {
        self.record("pause".to_string());
        Ok(())
    }

    async fn seek(&self, fraction: f64) -> EngineResult<()> {
        self.record(format!("seek {}", fraction));
        if self.fail_seek.load(Ordering::SeqCst) {
            return Err(EngineError::NoActivePlayer);
        }
        Ok(())
    }

    async fn fast_forward(&self, seconds: f64) -> EngineResult<()> {
        self.record(format!("fast_forward {}", seconds));
        Ok(())
    }

    async fn rewind(&self, seconds: f64) -> EngineResult<()> {
        self.record(format!("rewind {}", seconds));
        Ok(())
    }

    async fn change_speed(&self, rate: f64) -> EngineResult<()> {
        self.record(format!("change_speed {}", rate));
        Ok(())
    }

    async fn current_time(&self) -> EngineResult<f64> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        // A failed play leaves nothing loaded
        if self.fail_play.load(Ordering::SeqCst) {
            return Err(EngineError::NoActivePlayer);
        }
        if self.fail_current_time.load(Ordering::SeqCst) {
            return Err(EngineError::Initialization("output device lost".to_string()));
        }
        Ok(*self.position.lock().unwrap())
    }
}
