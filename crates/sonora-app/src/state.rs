use std::sync::Arc;

use sonora_api::{LibraryFile, RequestTracker};
use sonora_config::Config;
use sonora_types::{FormView, Genre, Locale, Tab};
use tokio::sync::RwLock;

/// What the user has chosen so far
#[derive(Debug, Clone)]
pub struct FormState {
    pub locale: Locale,
    pub tab: Tab,
    pub genre: Genre,
    pub prompt: String,
    /// Seconds
    pub duration: u32,
}

impl FormState {
    pub fn view(&self) -> FormView {
        FormView {
            locale: self.locale,
            genre: self.genre,
            prompt: self.prompt.clone(),
            duration: self.duration,
        }
    }
}

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub form: RwLock<FormState>,
    /// Last listing, indexed by `PlayLibraryEntry`
    pub library: RwLock<Vec<LibraryFile>>,
    pub requests: RequestTracker,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let form = FormState {
            locale: config.ui.locale,
            tab: Tab::default(),
            genre: Genre::default(),
            prompt: config.generation.default_prompt.clone(),
            duration: config
                .generation
                .clamp_duration(config.generation.default_duration),
        };

        Self {
            config: Arc::new(RwLock::new(config)),
            form: RwLock::new(form),
            library: RwLock::new(Vec::new()),
            requests: RequestTracker::new(),
        }
    }
}
