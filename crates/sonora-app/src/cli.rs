use std::path::PathBuf;

use clap::Parser;
use sonora_config::Config;
use sonora_types::Locale;

/// Command-line arguments for sonora
#[derive(Parser, Debug)]
#[command(name = "sonora")]
#[command(about = "Terminal studio for an AI music generation backend")]
#[command(version)]
pub struct Args {
    /// JSON config file; defaults and environment are used without one
    #[arg(short, long, env = "SONORA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend base URL, e.g. http://localhost:8000/api
    #[arg(long)]
    pub api_url: Option<String>,

    /// Starting locale (en, hi)
    #[arg(long)]
    pub locale: Option<Locale>,

    /// Log filter, overrides RUST_LOG
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl Args {
    /// Flags win over file and environment
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(locale) = self.locale {
            config.ui.locale = locale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from(["sonora", "--api-url", "http://studio:9000/api", "--locale", "hi"]);
        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!(config.api.base_url, "http://studio:9000/api");
        assert_eq!(config.ui.locale, Locale::Hi);
        assert!(!args.log_json);
    }

    #[test]
    fn unknown_locale_is_rejected() {
        assert!(Args::try_parse_from(["sonora", "--locale", "fr"]).is_err());
    }
}
