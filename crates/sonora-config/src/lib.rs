use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use self::api::ApiConfig;
use self::generation::GenerationConfig;
use self::player::PlayerConfig;
use self::ui::UiConfig;

pub mod api;
pub mod generation;
pub mod player;
pub mod ui;

fn default_delta_time() -> u64 {
    100
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub player: PlayerConfig,
    pub generation: GenerationConfig,
    pub ui: UiConfig,

    /// Minimum time between two progress redraws in the UI
    #[serde(default = "default_delta_time")]
    pub delta_time: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            player: PlayerConfig::default(),
            generation: GenerationConfig::default(),
            ui: UiConfig::default(),
            delta_time: default_delta_time(),
        }
    }
}

impl Config {
    /// Defaults overridden by the environment (and `.env` if present)
    pub fn new() -> Self {
        load_dotenv();

        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Load a JSON config file, then apply environment overrides
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        load_dotenv();

        tracing::info!("Loading config from {}", path.display());
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file {}", path.display()))?;
        let mut config: Config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        self.api.apply_env();
        self.player.apply_env();
        self.ui.apply_env();

        if let Some(delta_time) = env::var("DELTA_TIME_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.delta_time = delta_time;
        }
    }
}

fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Failed to read .env: {e}"),
    }
}
