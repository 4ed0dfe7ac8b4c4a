/// Decoded resource plus what the controller needs to know about it
#[derive(Debug)]
pub struct Decoded<R> {
    pub resource: R,
    /// Seconds
    pub duration: f64,
}

/// Audio backend the controller drives: decoding, scheduled playback and
/// realtime gain / low-pass parameters per resource
#[async_trait::async_trait]
pub trait AudioEngine: Send + Sync + 'static {
    type Resource: Send + Sync + 'static;

    /// Fetch and decode a source
    async fn decode(&self, locator: &str) -> Result<Decoded<Self::Resource>, EngineError>;

    /// Start playing from `offset` seconds, replacing any earlier start
    fn start(&self, resource: &Self::Resource, offset: f64) -> Result<(), EngineError>;

    fn stop(&self, resource: &Self::Resource);

    fn set_volume(&self, resource: &Self::Resource, db: f64);

    fn set_filter_cutoff(&self, resource: &Self::Resource, hz: f64);

    /// Free everything held for the resource
    fn release(&self, resource: Self::Resource);
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Failed to fetch {locator}: {reason}")]
    Fetch { locator: String, reason: String },

    #[error("Unsupported or corrupt audio: {0}")]
    Decode(String),

    #[error("Audio output error: {0}")]
    Output(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
