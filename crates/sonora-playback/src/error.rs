use crate::engine::EngineError;

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("Failed to load {locator}: {source}")]
    Load {
        locator: String,
        #[source]
        source: EngineError,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),
}
