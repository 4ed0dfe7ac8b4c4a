use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    UiEvent(UiEvent),
    SelectTab(Tab),
    SetLocale(Locale),
    SelectGenre(Genre),
    SetPrompt(String),
    SetDuration(u32),
    Generate,
    TestTranslation(String),
    RefreshLibrary,
    PlayLibraryEntry(usize),
    Player(PlayerCommand),

    // App -> UI
    BackendReady(FormView),
    LocaleChanged(Locale),
    TabChanged(Tab),
    FormUpdated(FormView),
    GenerationStarted,
    GenerationFinished(TrackDetails),
    GenerationFailed(String),
    TranslationStarted,
    ShowTranslation(TranslatorResult),
    TranslationFailed(TranslationFailure),
    LibraryLoading,
    ShowLibrary(Vec<LibraryItem>),
    LibraryFailed(String),
    NowPlaying { title: Option<String> },
    PlayerUpdate(PlayerView),
    PlayerFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Help,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerCommand {
    TogglePlay,
    Seek(f64),
    SetVolume(f64),
    SetFilterCutoff(f64),
}

/// Translation tester failures the UI can localize
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationFailure {
    /// Input was empty after trimming; no request was issued
    MissingText,
    Request(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Hi,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Hi => "hi",
        }
    }

    /// Label shown on the language toggle
    pub fn label(&self) -> &'static str {
        match self {
            Locale::En => "EN",
            Locale::Hi => "हिन्दी",
        }
    }

    pub fn all() -> &'static [Locale] {
        &[Locale::En, Locale::Hi]
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported locale: {0}")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "hi" => Ok(Locale::Hi),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    #[default]
    Bollywood,
    Afrobeat,
    Kpop,
    Global,
}

impl Genre {
    pub fn all() -> &'static [Genre] {
        &[Genre::Bollywood, Genre::Afrobeat, Genre::Kpop, Genre::Global]
    }

    /// Key sent to the backend
    pub fn key(&self) -> &'static str {
        match self {
            Genre::Bollywood => "bollywood",
            Genre::Afrobeat => "afrobeat",
            Genre::Kpop => "kpop",
            Genre::Global => "global",
        }
    }

    pub fn label_key(&self) -> String {
        format!("genres.{}.title", self.key())
    }

    pub fn mood_key(&self) -> String {
        format!("genres.{}.mood", self.key())
    }

    pub fn suggestions_key(&self) -> String {
        format!("prompt.suggestions.{}", self.key())
    }
}

impl FromStr for Genre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Genre::all()
            .iter()
            .copied()
            .find(|g| g.key() == wanted)
            .ok_or_else(|| format!("Unknown genre: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Generate,
    Library,
}

/// Generation form as shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub locale: Locale,
    pub genre: Genre,
    pub prompt: String,
    pub duration: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationStatus {
    pub source_locale: String,
    pub target_locale: String,
    pub applied: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackDetails {
    pub audio_path: String,
    pub bpm: f64,
    pub duration: f64,
    pub prompt_original: String,
    pub prompt_used: String,
    pub translation: Option<TranslationStatus>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslatorResult {
    pub text: String,
    pub status: TranslationStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LibraryItem {
    pub filename: String,
    pub path: String,
    pub size: u64,
    pub created: i64,
    pub modified: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerStatus {
    #[default]
    Empty,
    Loading,
    Paused,
    Playing,
    Disposed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerView {
    pub status: PlayerStatus,
    pub position: f64,
    pub duration: f64,
    pub volume_db: f64,
    pub cutoff_hz: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_codes_parse_case_insensitively() {
        assert_eq!("HI".parse::<Locale>().unwrap(), Locale::Hi);
        assert_eq!(" en ".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!(
            "fr".parse::<Locale>().unwrap_err(),
            UnknownLocale("fr".to_string())
        );
    }

    #[test]
    fn genre_dictionary_keys() {
        assert_eq!(Genre::Kpop.label_key(), "genres.kpop.title");
        assert_eq!(Genre::Afrobeat.mood_key(), "genres.afrobeat.mood");
        assert_eq!(
            Genre::Bollywood.suggestions_key(),
            "prompt.suggestions.bollywood"
        );
        assert_eq!(Genre::default(), Genre::all()[0]);
    }

    #[test]
    fn genre_serializes_as_backend_key() {
        let json = serde_json::to_string(&Genre::Kpop).unwrap();
        assert_eq!(json, "\"kpop\"");
        assert_eq!("Global".parse::<Genre>().unwrap(), Genre::Global);
    }
}
