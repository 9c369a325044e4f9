// FILE: crates/player/src/store.rs

//! Effect runtime for the player state machine
//!
//! One task owns [`PlayerState`] and applies actions strictly one at a time
//! from a single-consumer queue. Engine calls run in order on a worker task,
//! book loads and the progress poll loop run as their own tasks, and all of
//! them report back by queueing actions.

use crate::action::Action;
use crate::effect::{Effect, EffectId, EngineCommand};
use crate::error::{PlayerError, PlayerResult};
use crate::reducer::PlayerFeature;
use crate::state::PlayerState;
use media_engine::{AudioPlayer, EngineError};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use storystream_library::BookLoader;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Collaborators the runtime executes effects against
#[derive(Clone)]
pub struct Environment {
    pub engine: Arc<dyn AudioPlayer>,
    pub loader: Arc<dyn BookLoader>,
    /// Pause between playback position samples
    pub poll_interval: Duration,
}

impl Environment {
    pub fn new(engine: Arc<dyn AudioPlayer>, loader: Arc<dyn BookLoader>) -> Self {
        Self {
            engine,
            loader,
            poll_interval: Duration::from_millis(500),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

enum Message {
    Action(Action),
    Shutdown,
}

/// Queues actions for effect tasks without keeping the store alive
#[derive(Clone)]
struct Feedback(mpsc::WeakUnboundedSender<Message>);

impl Feedback {
    fn send(&self, action: Action) -> bool {
        match self.0.upgrade() {
            Some(sender) => sender.send(Message::Action(action)).is_ok(),
            None => false,
        }
    }
}

/// A cancellable long-running effect
struct RunningEffect {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl RunningEffect {
    fn cancel(self) {
        self.running.store(false, Ordering::Release);
        self.handle.abort();
    }
}

pub struct Store;

impl Store {
    /// Starts the runtime and returns a handle to it
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(feature: PlayerFeature, initial: PlayerState, env: Environment) -> StoreHandle {
        let (sender, inbox) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(initial.clone());
        let feedback = Feedback(sender.downgrade());

        let engine_queue = spawn_engine_worker(Arc::clone(&env.engine), feedback.clone());

        let runtime = Runtime {
            feature,
            state: initial,
            env,
            feedback,
            engine_queue,
            running: HashMap::new(),
            state_tx,
        };
        tokio::spawn(runtime.run(inbox));

        StoreHandle {
            sender,
            state: state_rx,
        }
    }
}

/// Cloneable front door to a running store
#[derive(Clone)]
pub struct StoreHandle {
    sender: mpsc::UnboundedSender<Message>,
    state: watch::Receiver<PlayerState>,
}

impl StoreHandle {
    pub fn send(&self, action: Action) -> PlayerResult<()> {
        self.sender
            .send(Message::Action(action))
            .map_err(|_| PlayerError::StoreClosed)
    }

    /// Snapshot of the state after the most recent action
    pub fn state(&self) -> PlayerState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlayerState> {
        self.state.clone()
    }

    /// Stops the runtime and cancels the poll loop, then waits for it to finish
    pub async fn shutdown(&self) {
        let _ = self.sender.send(Message::Shutdown);
        let mut state = self.state.clone();
        while state.changed().await.is_ok() {}
    }
}

struct Runtime {
    feature: PlayerFeature,
    state: PlayerState,
    env: Environment,
    feedback: Feedback,
    engine_queue: mpsc::UnboundedSender<EngineCommand>,
    running: HashMap<EffectId, RunningEffect>,
    state_tx: watch::Sender<PlayerState>,
}

impl Runtime {
    async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<Message>) {
        log::debug!("Player store started");

        while let Some(message) = inbox.recv().await {
            match message {
                Message::Action(action) => self.dispatch(action),
                Message::Shutdown => break,
            }
        }

        for (_, effect) in self.running.drain() {
            effect.cancel();
        }
        log::debug!("Player store stopped");
    }

    fn dispatch(&mut self, action: Action) {
        let mut pending = VecDeque::from([action]);

        while let Some(action) = pending.pop_front() {
            for effect in self.feature.reduce(&mut self.state, action) {
                self.execute(effect, &mut pending);
            }
        }

        self.state_tx.send_replace(self.state.clone());
    }

    fn execute(&mut self, effect: Effect, pending: &mut VecDeque<Action>) {
        match effect {
            Effect::LoadBook { identifier } => {
                let loader = Arc::clone(&self.env.loader);
                let feedback = self.feedback.clone();
                tokio::spawn(async move {
                    let result = loader.load_book(&identifier).await;
                    feedback.send(Action::BookLoaded(result));
                });
            }
            Effect::Engine(command) => {
                log::debug!("Queueing engine command {:?}", command);
                if self.engine_queue.send(command).is_err() {
                    log::error!("Engine worker is gone");
                }
            }
            Effect::StartProgressLoop => {
                self.cancel(EffectId::Progress);
                let running = Arc::new(AtomicBool::new(true));
                let handle = tokio::spawn(poll_progress(
                    Arc::clone(&self.env.engine),
                    self.env.poll_interval,
                    Arc::clone(&running),
                    self.feedback.clone(),
                ));
                self.running
                    .insert(EffectId::Progress, RunningEffect { running, handle });
            }
            Effect::Cancel(id) => self.cancel(id),
            Effect::Send(follow_up) => pending.push_back(follow_up),
        }
    }

    fn cancel(&mut self, id: EffectId) {
        if let Some(effect) = self.running.remove(&id) {
            log::debug!("Cancelling {:?}", id);
            effect.cancel();
        }
    }
}

/// Runs engine commands in the order the reducer issued them
fn spawn_engine_worker(
    engine: Arc<dyn AudioPlayer>,
    feedback: Feedback,
) -> mpsc::UnboundedSender<EngineCommand> {
    let (sender, mut commands) = mpsc::unbounded_channel::<EngineCommand>();

    tokio::spawn(async move {
        while let Some(command) = commands.recv().await {
            if let Err(e) = command.run(engine.as_ref()).await {
                log::warn!("Engine command {:?} failed: {}", command, e);
                feedback.send(Action::PlaybackErrored(e.to_string()));
            }
        }
    });

    sender
}

async fn poll_progress(
    engine: Arc<dyn AudioPlayer>,
    interval: Duration,
    running: Arc<AtomicBool>,
    feedback: Feedback,
) {
    let active = || running.load(Ordering::Acquire);

    while active() {
        tokio::time::sleep(interval).await;
        if !active() {
            break;
        }

        match engine.current_time().await {
            Ok(seconds) => {
                if !active() || !feedback.send(Action::ProgressTicked(seconds)) {
                    break;
                }
            }
            Err(EngineError::NoActivePlayer) => {
                // The failure that left the engine empty was already reported
                log::debug!("Progress poll found no active player, stopping");
                break;
            }
            Err(e) => {
                log::warn!("Progress poll failed: {}", e);
                if active() {
                    feedback.send(Action::PlaybackErrored(e.to_string()));
                }
                break;
            }
        }
    }
}
