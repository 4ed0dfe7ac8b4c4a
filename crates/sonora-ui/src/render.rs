use sonora_locale::{Localizer, TemplateArgs};
use sonora_types::{
    FormView, Genre, LibraryItem, Locale, PlayerStatus, PlayerView, Tab, TrackDetails,
    TranslationFailure, TranslatorResult,
};

use crate::format::{display_name, format_date, format_size, format_time};

pub fn header(l: &Localizer<'_>) -> Vec<String> {
    vec![
        format!("{} · {}", l.t("app.title"), l.t("app.tagline")),
        l.t("app.subtitle"),
    ]
}

/// Language toggle, active locale in brackets
pub fn languages(active: Locale) -> String {
    Locale::all()
        .iter()
        .map(|locale| {
            if *locale == active {
                format!("[{}]", locale.label())
            } else {
                format!(" {} ", locale.label())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn tabs(l: &Localizer<'_>, active: Tab) -> String {
    let mark = |tab: Tab, key: &str| {
        if tab == active {
            format!("[{}]", l.t(key))
        } else {
            format!(" {} ", l.t(key))
        }
    };
    format!(
        "{} {}",
        mark(Tab::Generate, "tabs.generate"),
        mark(Tab::Library, "tabs.library")
    )
}

pub fn form(l: &Localizer<'_>, form: &FormView) -> Vec<String> {
    let mut lines = vec![l.t("genres.sectionTitle")];
    for genre in Genre::all() {
        let marker = if *genre == form.genre { '*' } else { ' ' };
        lines.push(format!(
            " {marker} {:<14} {}",
            l.t(&genre.label_key()),
            l.t(&genre.mood_key())
        ));
    }

    lines.push(l.t("prompt.sectionTitle"));
    lines.push(format!("  {}: {}", l.t("prompt.textareaLabel"), form.prompt));
    lines.push(format!("  {}: {}s", l.t("prompt.durationLabel"), form.duration));
    lines
}

pub fn suggestions(l: &Localizer<'_>, genre: Genre) -> Vec<String> {
    let mut lines = vec![l.t("prompt.suggestionsTitle")];
    lines.extend(
        l.t_list(&genre.suggestions_key())
            .into_iter()
            .enumerate()
            .map(|(i, text)| format!("  {}. {text}", i + 1)),
    );
    lines
}

pub fn track(l: &Localizer<'_>, details: &TrackDetails) -> Vec<String> {
    let mut lines = vec![
        l.t("metadata.title"),
        format!("  {}: {:.1}", l.t("metadata.bpm"), details.bpm),
        format!("  {}: {}s", l.t("metadata.duration"), details.duration),
    ];

    if let Some(translation) = &details.translation {
        if translation.applied {
            lines.push(l.t("translation.title"));
            lines.push(format!(
                "  {}: {}",
                l.t("translation.original"),
                details.prompt_original
            ));
            lines.push(format!(
                "  {}: {}",
                l.t("translation.translated"),
                details.prompt_used
            ));
            lines.push(format!(
                "  {}",
                l.t_with(
                    "translation.note",
                    &TemplateArgs::new()
                        .with("source", &translation.source_locale)
                        .with("target", &translation.target_locale),
                )
            ));
        }
        if let Some(error) = &translation.error {
            lines.push(format!("{} ({error})", l.t("translation.error")));
        }
    }

    lines
}

pub fn translation(l: &Localizer<'_>, result: &TranslatorResult) -> Vec<String> {
    let status = if result.status.applied {
        l.t_with(
            "translationTester.statusApplied",
            &TemplateArgs::new()
                .with("source", &result.status.source_locale)
                .with("target", &result.status.target_locale),
        )
    } else {
        l.t_with(
            "translationTester.statusBypassed",
            &TemplateArgs::new().with("target", &result.status.target_locale),
        )
    };

    vec![
        format!("{}: {}", l.t("translationTester.resultLabel"), result.text),
        format!("  {status}"),
    ]
}

pub fn translation_failure(l: &Localizer<'_>, failure: &TranslationFailure) -> String {
    match failure {
        TranslationFailure::MissingText => l.t("translationTester.errorMissing"),
        TranslationFailure::Request(message) => message.clone(),
    }
}

pub fn generation_failure(l: &Localizer<'_>, error: &str) -> String {
    l.t_with("errors.generation", &TemplateArgs::new().with("error", error))
}

pub fn library(l: &Localizer<'_>, items: &[LibraryItem]) -> Vec<String> {
    let mut lines = vec![l.t_with(
        "library.title",
        &TemplateArgs::new().with("count", items.len()),
    )];

    if items.is_empty() {
        lines.push(format!("  {}", l.t("library.empty")));
        lines.push(format!("  {}", l.t("library.emptyHint")));
        return lines;
    }

    for (i, item) in items.iter().enumerate() {
        lines.push(format!(
            "  {:>2}. {:<24} {:>9}  {}",
            i + 1,
            display_name(&item.filename),
            format_size(item.size),
            format_date(item.modified)
        ));
    }
    lines
}

pub fn library_failure(l: &Localizer<'_>, error: &str) -> String {
    l.t_with("library.error", &TemplateArgs::new().with("error", error))
}

pub fn player_status(l: &Localizer<'_>, status: PlayerStatus) -> String {
    match status {
        PlayerStatus::Loading => l.t("player.loading"),
        PlayerStatus::Playing => l.t("player.playing"),
        PlayerStatus::Paused => l.t("player.paused"),
        PlayerStatus::Empty | PlayerStatus::Disposed => l.t("player.empty"),
    }
}

/// Single status line for the player and mixer
pub fn player(l: &Localizer<'_>, view: &PlayerView) -> String {
    match view.status {
        PlayerStatus::Paused | PlayerStatus::Playing => format!(
            "{} {} / {}  {} {:.1} dB  {} {:.0} Hz",
            player_status(l, view.status),
            format_time(view.position),
            format_time(view.duration),
            l.t("mixer.volume"),
            view.volume_db,
            l.t("mixer.filter"),
            view.cutoff_hz
        ),
        _ => player_status(l, view.status),
    }
}

pub fn player_failure(l: &Localizer<'_>, error: &str) -> String {
    l.t_with("player.error", &TemplateArgs::new().with("error", error))
}

pub fn now_playing(l: &Localizer<'_>, title: &str) -> String {
    format!("{}: {title}", l.t("library.nowPlaying"))
}

pub fn help(l: &Localizer<'_>) -> Vec<String> {
    let mut lines = vec![l.t("help.title")];
    lines.extend(l.t_list("help.commands").into_iter().map(|c| format!("  {c}")));
    lines
}

pub fn unknown_command(l: &Localizer<'_>, command: &str) -> String {
    l.t_with(
        "errors.unknownCommand",
        &TemplateArgs::new().with("command", command),
    )
}

#[cfg(test)]
mod tests {
    use sonora_locale::Catalog;
    use sonora_types::TranslationStatus;

    use super::*;

    fn status(applied: bool) -> TranslationStatus {
        TranslationStatus {
            source_locale: "hi".into(),
            target_locale: "en".into(),
            applied,
            error: None,
        }
    }

    #[test]
    fn language_toggle_marks_the_active_locale() {
        assert_eq!(languages(Locale::En), "[EN]  हिन्दी ");
        assert_eq!(languages(Locale::Hi), " EN  [हिन्दी]");
    }

    #[test]
    fn translation_status_lines() {
        let catalog = Catalog::bundled().unwrap();
        let l = catalog.localizer(Locale::En);

        let applied = translation(
            &l,
            &TranslatorResult {
                text: "rain song".into(),
                status: status(true),
            },
        );
        assert_eq!(applied[0], "Translated prompt: rain song");
        assert_eq!(applied[1], "  Translated from hi to en");

        let bypassed = translation(
            &l,
            &TranslatorResult {
                text: "rain song".into(),
                status: status(false),
            },
        );
        assert_eq!(bypassed[1], "  Sent as-is (en), no translation applied");
    }

    #[test]
    fn track_shows_translation_only_when_applied() {
        let catalog = Catalog::bundled().unwrap();
        let l = catalog.localizer(Locale::En);
        let mut details = TrackDetails {
            audio_path: "storage/musicgen_1.wav".into(),
            bpm: 118.24,
            duration: 20.0,
            prompt_original: "बारिश".into(),
            prompt_used: "rain".into(),
            translation: Some(status(false)),
        };

        let lines = track(&l, &details);
        assert_eq!(lines[1], "  BPM: 118.2");
        assert_eq!(lines[2], "  Duration: 20s");
        assert_eq!(lines.len(), 3);

        details.translation = Some(status(true));
        let lines = track(&l, &details);
        assert!(lines.contains(&"  Original: बारिश".to_string()));
        assert!(lines.contains(&"  Translated: rain".to_string()));
    }

    #[test]
    fn library_lists_or_explains_emptiness() {
        let catalog = Catalog::bundled().unwrap();
        let l = catalog.localizer(Locale::En);

        let empty = library(&l, &[]);
        assert_eq!(empty[0], "Your library (0)");
        assert_eq!(empty.len(), 3);

        let items = vec![LibraryItem {
            filename: "musicgen_42.wav".into(),
            path: "storage/musicgen_42.wav".into(),
            size: 2048,
            created: 0,
            modified: 0,
        }];
        let lines = library(&l, &items);
        assert_eq!(lines[0], "Your library (1)");
        assert!(lines[1].contains("1. 42"));
        assert!(lines[1].contains("2.0 KB"));
    }

    #[test]
    fn player_line_includes_mixer_levels() {
        let catalog = Catalog::bundled().unwrap();
        let l = catalog.localizer(Locale::En);

        let line = player(
            &l,
            &PlayerView {
                status: PlayerStatus::Playing,
                position: 65.4,
                duration: 120.0,
                volume_db: -6.0,
                cutoff_hz: 18000.0,
            },
        );
        assert_eq!(line, "Playing 1:05 / 2:00  Volume -6.0 dB  Filter 18000 Hz");
        assert_eq!(
            player(&l, &PlayerView::default()),
            "Nothing loaded"
        );
    }

    #[test]
    fn hindi_errors_are_templated() {
        let catalog = Catalog::bundled().unwrap();
        let l = catalog.localizer(Locale::Hi);
        let line = unknown_command(&l, "dance");
        assert!(line.contains("dance"));
        assert!(!line.contains("{command}"));
    }
}
