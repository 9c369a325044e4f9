//! StoryStream Player
//!
//! The playback state machine: a pure reducer over [`PlayerState`] and
//! [`Action`] that describes its side effects as [`Effect`] values, plus the
//! [`Store`] runtime that executes them against an audio engine and a book
//! loader.

mod action;
mod alert;
pub mod effect;
pub mod error;
mod reducer;
mod state;
pub mod store;

pub use action::Action;
pub use alert::{AlertState, ALERT_DISMISS_LABEL, ALERT_TITLE};
pub use effect::{Effect, EffectId, EngineCommand};
pub use error::{PlayerError, PlayerResult};
pub use reducer::{PlayerFeature, PlayerSettings};
pub use state::PlayerState;
pub use store::{Environment, Store, StoreHandle};
