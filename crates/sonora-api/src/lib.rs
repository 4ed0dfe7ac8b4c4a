mod client;
mod sequence;
mod types;

pub use client::HttpBackend;
pub use sequence::{Operation, RequestTicket, RequestTracker};
pub use types::{
    GenerateRequest, GenerateResponse, LibraryFile, LibraryResponse, TranslateRequest,
    TranslateResponse, TranslationDetails,
};

/// Music generation backend interface
#[async_trait::async_trait]
pub trait MusicBackend: Send + Sync {
    /// Generate a clip from a prompt
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError>;

    /// Translate a prompt the way generation would
    async fn translate(&self, request: &TranslateRequest) -> Result<TranslateResponse, ApiError>;

    /// List previously generated files
    async fn library(&self) -> Result<LibraryResponse, ApiError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("{message}")]
    Backend {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Failed to parse response: {0}")]
    InvalidResponse(String),
}
