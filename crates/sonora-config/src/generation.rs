use serde::{Deserialize, Serialize};

fn default_prompt() -> String {
    "Energetic Bollywood hook with sitar and modern drums".to_string()
}

fn default_duration() -> u32 {
    20
}

fn default_min_duration() -> u32 {
    15
}

fn default_max_duration() -> u32 {
    60
}

fn default_target_locale() -> String {
    "en".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GenerationConfig {
    #[serde(default = "default_prompt")]
    pub default_prompt: String,
    /// Seconds
    #[serde(default = "default_duration")]
    pub default_duration: u32,
    #[serde(default = "default_min_duration")]
    pub min_duration: u32,
    #[serde(default = "default_max_duration")]
    pub max_duration: u32,
    /// Locale the translation tester translates into
    #[serde(default = "default_target_locale")]
    pub target_locale: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_prompt: default_prompt(),
            default_duration: default_duration(),
            min_duration: default_min_duration(),
            max_duration: default_max_duration(),
            target_locale: default_target_locale(),
        }
    }
}

impl GenerationConfig {
    /// Clamp a requested clip length into the allowed range
    pub fn clamp_duration(&self, seconds: u32) -> u32 {
        let (low, high) = if self.min_duration <= self.max_duration {
            (self.min_duration, self.max_duration)
        } else {
            (self.max_duration, self.min_duration)
        };
        seconds.clamp(low, high)
    }
}
