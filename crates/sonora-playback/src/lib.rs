mod controller;
mod engine;
mod error;
mod state;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;


pub use controller::PlaybackController;
pub use engine::{AudioEngine, Decoded, EngineError};
pub use error::PlaybackError;
pub use state::{
    DEFAULT_CUTOFF_HZ, DEFAULT_VOLUME_DB, LoadOutcome, MAX_CUTOFF_HZ, MAX_VOLUME_DB,
    MIN_CUTOFF_HZ, MIN_VOLUME_DB, MixerLevels, PlaybackSnapshot, PlaybackStatus, SessionId,
};
