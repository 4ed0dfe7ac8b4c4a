use std::env;

use serde::{Deserialize, Serialize};

fn default_tick_ms() -> u64 {
    16
}

fn default_volume_db() -> f64 {
    -6.0
}

fn default_filter_hz() -> f64 {
    18000.0
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PlayerConfig {
    /// Position sampling interval while playing
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_volume_db")]
    pub volume_db: f64,
    /// Low-pass cutoff applied to freshly loaded clips
    #[serde(default = "default_filter_hz")]
    pub filter_hz: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            volume_db: default_volume_db(),
            filter_hz: default_filter_hz(),
        }
    }
}

impl PlayerConfig {
    pub(crate) fn apply_env(&mut self) {
        if let Some(tick) = env::var("PLAYER_TICK_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|tick: &u64| *tick > 0)
        {
            self.tick_ms = tick;
        }
    }
}
