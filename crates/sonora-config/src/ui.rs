use std::env;

use serde::{Deserialize, Serialize};
use sonora_types::Locale;

fn default_color() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    /// Locale the app starts in
    pub locale: Locale,
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            color: default_color(),
        }
    }
}

impl UiConfig {
    pub(crate) fn apply_env(&mut self) {
        match env::var("SONORA_LOCALE").map(|v| v.parse::<Locale>()) {
            Ok(Ok(locale)) => self.locale = locale,
            Ok(Err(e)) => tracing::warn!("Ignoring SONORA_LOCALE: {e}"),
            Err(_) => {}
        }
        if env::var_os("NO_COLOR").is_some() {
            self.color = false;
        }
    }
}
