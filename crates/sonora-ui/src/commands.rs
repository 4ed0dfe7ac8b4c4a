use sonora_types::{AppEvent, Genre, Locale, PlayerCommand, Tab};

/// One parsed line of user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Send(AppEvent),
    /// `suggest` lists, `suggest <n>` picks (1-based)
    Suggest(Option<usize>),
    Help,
    Quit,
    Empty,
    Invalid(String),
}

impl Command {
    fn send(event: AppEvent) -> Self {
        Command::Send(event)
    }
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let invalid = || Command::Invalid(line.to_string());

    match word.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "genre" => match rest.parse::<Genre>() {
            Ok(genre) => Command::send(AppEvent::SelectGenre(genre)),
            Err(_) => invalid(),
        },
        "prompt" if !rest.is_empty() => Command::send(AppEvent::SetPrompt(rest.to_string())),
        "suggest" if rest.is_empty() => Command::Suggest(None),
        "suggest" => match rest.parse::<usize>() {
            Ok(n) if n > 0 => Command::Suggest(Some(n)),
            _ => invalid(),
        },
        "duration" => match rest.trim_end_matches('s').parse::<u32>() {
            Ok(seconds) => Command::send(AppEvent::SetDuration(seconds)),
            Err(_) => invalid(),
        },
        "generate" | "gen" => Command::send(AppEvent::Generate),
        // empty text is allowed through, the app answers with a localized hint
        "translate" => Command::send(AppEvent::TestTranslation(rest.to_string())),
        "library" | "lib" => Command::send(AppEvent::RefreshLibrary),
        "open" => match rest.parse::<usize>() {
            Ok(n) if n > 0 => Command::send(AppEvent::PlayLibraryEntry(n - 1)),
            _ => invalid(),
        },
        "play" | "pause" | "p" => Command::send(AppEvent::Player(PlayerCommand::TogglePlay)),
        "seek" => match parse_position(rest) {
            Some(seconds) => Command::send(AppEvent::Player(PlayerCommand::Seek(seconds))),
            None => invalid(),
        },
        "volume" | "vol" => match parse_number(rest, "db") {
            Some(db) => Command::send(AppEvent::Player(PlayerCommand::SetVolume(db))),
            None => invalid(),
        },
        "filter" => match parse_number(rest, "hz") {
            Some(hz) => Command::send(AppEvent::Player(PlayerCommand::SetFilterCutoff(hz))),
            None => invalid(),
        },
        "lang" | "language" => match rest.parse::<Locale>() {
            Ok(locale) => Command::send(AppEvent::SetLocale(locale)),
            Err(_) => invalid(),
        },
        "tab" => match rest.to_ascii_lowercase().as_str() {
            "generate" => Command::send(AppEvent::SelectTab(Tab::Generate)),
            "library" => Command::send(AppEvent::SelectTab(Tab::Library)),
            _ => invalid(),
        },
        _ => invalid(),
    }
}

/// Plain seconds or `m:ss`
fn parse_position(text: &str) -> Option<f64> {
    match text.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes = minutes.trim().parse::<u32>().ok()?;
            let seconds = seconds.trim().parse::<f64>().ok()?;
            Some(minutes as f64 * 60.0 + seconds)
        }
        None => text.trim_end_matches('s').parse::<f64>().ok(),
    }
    .filter(|s| s.is_finite())
}

/// Number with an optional unit suffix, e.g. `-6dB` or `800 Hz`
fn parse_number(text: &str, unit: &str) -> Option<f64> {
    let lower = text.to_ascii_lowercase();
    let number = lower.strip_suffix(unit).unwrap_or(&lower).trim();
    number.parse::<f64>().ok().filter(|n| n.is_finite())
}
