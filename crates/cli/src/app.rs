// FILE: crates/cli/src/app.rs

//! Interactive console player

use crate::keys::{map_key, KeyCommand};
use crate::render::render;
use anyhow::{Context, Result};
use console::{Key, Term};
use std::time::Duration;
use storystream_player::{Action, StoreHandle};
use tokio::sync::mpsc;
use tokio::time::interval;

pub struct ConsolePlayer {
    term: Term,
    store: StoreHandle,
    speed_presets: Vec<f64>,
    refresh: Duration,
}

impl ConsolePlayer {
    pub fn new(store: StoreHandle, speed_presets: Vec<f64>, refresh: Duration) -> Self {
        Self {
            term: Term::stdout(),
            store,
            speed_presets,
            refresh,
        }
    }

    pub async fn run(&self) -> Result<()> {
        if self.term.hide_cursor().is_err() {
            log::warn!("Failed to hide cursor");
        }

        let result = self.event_loop().await;

        self.store.shutdown().await;
        let _ = self.term.show_cursor();
        result
    }

    async fn event_loop(&self) -> Result<()> {
        let mut keys = spawn_key_reader(self.term.clone());
        let mut ticker = interval(self.refresh);

        self.store
            .send(Action::LoadBook)
            .context("Failed to request book")?;

        loop {
            tokio::select! {
                _ = ticker.tick() => self.draw()?,
                key = keys.recv() => {
                    let Some(key) = key else { break };
                    let speed = self.store.state().playback_speed;
                    match map_key(&key, speed, &self.speed_presets) {
                        Some(KeyCommand::Quit) => break,
                        Some(KeyCommand::Dispatch(action)) => self
                            .store
                            .send(action)
                            .context("Failed to send action")?,
                        None => {}
                    }
                }
            }
        }

        Ok(())
    }

    fn draw(&self) -> Result<()> {
        self.term
            .clear_screen()
            .context("Failed to clear screen")?;
        for line in render(&self.store.state()) {
            self.term
                .write_line(&line)
                .context("Failed to write player line")?;
        }
        Ok(())
    }
}

/// Reads keys on a plain thread, since `read_key` blocks
fn spawn_key_reader(term: Term) -> mpsc::UnboundedReceiver<Key> {
    let (sender, receiver) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        while let Ok(key) = term.read_key() {
            if sender.send(key).is_err() {
                break;
            }
        }
    });
    receiver
}
