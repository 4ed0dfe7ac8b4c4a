use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationDetails {
    pub source_locale: String,
    pub target_locale: String,
    pub applied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub genre: String,
    /// Seconds
    pub duration: u32,
    pub locale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub audio_path: String,
    pub duration: f64,
    pub bpm: f64,
    pub prompt: String,
    #[serde(default)]
    pub prompt_original: Option<String>,
    #[serde(default)]
    pub prompt_used: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub translation: Option<TranslationDetails>,
    #[serde(default)]
    pub genre: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub text: String,
    pub source_locale: String,
    pub target_locale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    /// Echo of the submitted text
    #[serde(default)]
    pub text: Option<String>,
    pub translated_text: String,
    pub source_locale: String,
    pub target_locale: String,
    pub applied: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryFile {
    pub filename: String,
    pub path: String,
    /// Bytes
    pub size: u64,
    /// Unix seconds
    pub created: f64,
    /// Unix seconds
    pub modified: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LibraryResponse {
    pub files: Vec<LibraryFile>,
}

/// Body the backend sends with non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub code: Option<String>,
}
