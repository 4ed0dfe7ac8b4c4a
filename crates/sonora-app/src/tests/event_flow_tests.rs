use std::time::Duration;

use sonora_playback::PlaybackStatus;
use sonora_playback::testing::{ClipScript, EngineCall, ScriptedEngine};
use sonora_types::{
    AppEvent, Genre, Locale, PlayerCommand, PlayerStatus, Tab, TranslationFailure, UiEvent,
};
use tokio::time::timeout;

use super::support::{FakeBackend, Harness, library_file, track};

fn is_player(status: PlayerStatus) -> impl Fn(&AppEvent) -> bool {
    move |event| matches!(event, AppEvent::PlayerUpdate(view) if view.status == status)
}

#[tokio::test(start_paused = true)]
async fn announces_the_form_on_start() {
    let harness = Harness::start(FakeBackend::default(), ScriptedEngine::new(10.0));

    let event = harness
        .expect(|e| matches!(e, AppEvent::BackendReady(_)))
        .await;
    let AppEvent::BackendReady(form) = event else {
        unreachable!()
    };
    assert_eq!(form.locale, Locale::En);
    assert_eq!(form.genre, Genre::Bollywood);
    assert_eq!(form.duration, 20);
}

#[tokio::test(start_paused = true)]
async fn generation_loads_the_new_track() {
    let backend = FakeBackend::default().replying(
        Duration::from_millis(200),
        Ok(track("storage/musicgen_1.wav", 12.0)),
    );
    let engine =
        ScriptedEngine::new(10.0).with_clip("storage/musicgen_1.wav", ClipScript::lasting(12.0));
    let harness = Harness::start(backend, engine);

    harness
        .send(AppEvent::SetPrompt("  Dhol and synth brass  ".into()))
        .await;
    harness.send(AppEvent::SelectGenre(Genre::Afrobeat)).await;
    harness.send(AppEvent::Generate).await;

    harness
        .expect(|e| matches!(e, AppEvent::GenerationStarted))
        .await;
    let AppEvent::GenerationFinished(details) = harness
        .expect(|e| matches!(e, AppEvent::GenerationFinished(_)))
        .await
    else {
        unreachable!()
    };
    assert_eq!(details.prompt_original, "  Dhol and synth brass  ");
    assert_eq!(details.prompt_used, "  Dhol and synth brass  ");

    harness
        .expect(|e| matches!(e, AppEvent::NowPlaying { title: None }))
        .await;
    let AppEvent::PlayerUpdate(view) = harness.expect(is_player(PlayerStatus::Paused)).await else {
        unreachable!()
    };
    assert_eq!(view.duration, 12.0);
    assert_eq!(view.position, 0.0);

    let requests = harness.backend.generate_requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].prompt, "Dhol and synth brass");
    assert_eq!(requests[0].genre, "afrobeat");
    assert_eq!(requests[0].locale, "en");
    assert_eq!(requests[0].duration, 20);
}

#[tokio::test(start_paused = true)]
async fn only_the_latest_generation_is_shown() {
    let backend = FakeBackend::default()
        .replying(Duration::from_millis(500), Ok(track("slow.wav", 8.0)))
        .replying(Duration::from_millis(50), Ok(track("fast.wav", 8.0)));
    let harness = Harness::start(backend, ScriptedEngine::new(8.0));

    harness.send(AppEvent::Generate).await;
    harness.send(AppEvent::Generate).await;

    let AppEvent::GenerationFinished(details) = harness
        .expect(|e| matches!(e, AppEvent::GenerationFinished(_)))
        .await
    else {
        unreachable!()
    };
    assert_eq!(details.audio_path, "fast.wav");

    // Let the slow reply arrive and be dropped
    tokio::time::sleep(Duration::from_secs(1)).await;
    let late = harness
        .drain()
        .into_iter()
        .filter(|e| matches!(e, AppEvent::GenerationFinished(_)))
        .count();
    assert_eq!(late, 0);
    assert!(
        !harness
            .engine
            .calls()
            .contains(&EngineCall::Decode("slow.wav".into()))
    );
}

#[tokio::test(start_paused = true)]
async fn backend_errors_reach_the_form() {
    let backend = FakeBackend::default()
        .replying(Duration::ZERO, Err("Prompt is required".to_string()));
    let harness = Harness::start(backend, ScriptedEngine::new(8.0));

    harness.send(AppEvent::Generate).await;

    let event = harness
        .expect(|e| matches!(e, AppEvent::GenerationFailed(_)))
        .await;
    assert_eq!(event, AppEvent::GenerationFailed("Prompt is required".into()));
    assert!(harness.engine.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn empty_translation_never_hits_the_backend() {
    let harness = Harness::start(FakeBackend::default(), ScriptedEngine::new(8.0));

    harness.send(AppEvent::TestTranslation("   \n".into())).await;

    let event = harness
        .expect(|e| matches!(e, AppEvent::TranslationFailed(_)))
        .await;
    assert_eq!(
        event,
        AppEvent::TranslationFailed(TranslationFailure::MissingText)
    );
    assert!(harness.backend.translate_requests.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn translation_goes_from_the_form_locale_to_english() {
    let harness = Harness::start(FakeBackend::default(), ScriptedEngine::new(8.0));

    harness.send(AppEvent::SetLocale(Locale::Hi)).await;
    harness
        .expect(|e| matches!(e, AppEvent::LocaleChanged(Locale::Hi)))
        .await;
    harness
        .send(AppEvent::TestTranslation(" ढोल की थाप ".into()))
        .await;

    let AppEvent::ShowTranslation(result) = harness
        .expect(|e| matches!(e, AppEvent::ShowTranslation(_)))
        .await
    else {
        unreachable!()
    };
    assert_eq!(result.text, "[en] ढोल की थाप");
    assert_eq!(result.status.source_locale, "hi");
    assert_eq!(result.status.target_locale, "en");
    assert!(result.status.applied);

    let requests = harness.backend.translate_requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].text, "ढोल की थाप");
}

#[tokio::test(start_paused = true)]
async fn only_the_latest_translation_is_shown() {
    let backend = FakeBackend::default()
        .translating_after(Duration::from_millis(500))
        .translating_after(Duration::from_millis(50));
    let harness = Harness::start(backend, ScriptedEngine::new(8.0));

    harness.send(AppEvent::TestTranslation("first".into())).await;
    harness.send(AppEvent::TestTranslation("second".into())).await;

    let AppEvent::ShowTranslation(result) = harness
        .expect(|e| matches!(e, AppEvent::ShowTranslation(_)))
        .await
    else {
        unreachable!()
    };
    assert_eq!(result.text, "[en] second");

    tokio::time::sleep(Duration::from_secs(1)).await;
    let late = harness
        .drain()
        .into_iter()
        .filter(|e| matches!(e, AppEvent::ShowTranslation(_)))
        .count();
    assert_eq!(late, 0);
    assert_eq!(harness.backend.translate_requests.lock().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn only_the_latest_library_listing_is_kept() {
    let backend = FakeBackend::default()
        .listing(
            Duration::from_millis(500),
            vec![library_file("musicgen_old.wav", 1_600_000_000.0)],
        )
        .listing(
            Duration::from_millis(50),
            vec![
                library_file("musicgen_1.wav", 1_700_000_000.0),
                library_file("musicgen_2.wav", 1_700_000_500.0),
            ],
        );
    let harness = Harness::start(backend, ScriptedEngine::new(8.0));

    harness.send(AppEvent::RefreshLibrary).await;
    harness.send(AppEvent::RefreshLibrary).await;

    let AppEvent::ShowLibrary(items) = harness
        .expect(|e| matches!(e, AppEvent::ShowLibrary(_)))
        .await
    else {
        unreachable!()
    };
    assert_eq!(items.len(), 2);

    tokio::time::sleep(Duration::from_secs(1)).await;
    let late = harness
        .drain()
        .into_iter()
        .filter(|e| matches!(e, AppEvent::ShowLibrary(_)))
        .count();
    assert_eq!(late, 0);

    let stored = harness.controller.state.library.read().await;
    let names: Vec<_> = stored.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, ["musicgen_1.wav", "musicgen_2.wav"]);
}

#[tokio::test(start_paused = true)]
async fn duration_is_clamped_to_the_configured_range() {
    let harness = Harness::start(FakeBackend::default(), ScriptedEngine::new(8.0));

    harness.send(AppEvent::SetDuration(500)).await;
    let AppEvent::FormUpdated(form) = harness
        .expect(|e| matches!(e, AppEvent::FormUpdated(_)))
        .await
    else {
        unreachable!()
    };
    assert_eq!(form.duration, 60);

    harness.send(AppEvent::SetDuration(1)).await;
    let AppEvent::FormUpdated(form) = harness
        .expect(|e| matches!(e, AppEvent::FormUpdated(_)))
        .await
    else {
        unreachable!()
    };
    assert_eq!(form.duration, 15);
}

#[tokio::test(start_paused = true)]
async fn library_tab_lists_and_plays_entries() {
    let backend = FakeBackend::default().with_library(vec![
        library_file("musicgen_1.wav", 1_700_000_000.5),
        library_file("musicgen_2.wav", 1_700_000_500.0),
    ]);
    let engine = ScriptedEngine::new(10.0)
        .with_clip("storage/musicgen_2.wav", ClipScript::lasting(30.0));
    let harness = Harness::start(backend, engine);

    harness.send(AppEvent::SelectTab(Tab::Library)).await;
    harness
        .expect(|e| matches!(e, AppEvent::TabChanged(Tab::Library)))
        .await;
    harness
        .expect(|e| matches!(e, AppEvent::LibraryLoading))
        .await;
    let AppEvent::ShowLibrary(items) = harness
        .expect(|e| matches!(e, AppEvent::ShowLibrary(_)))
        .await
    else {
        unreachable!()
    };
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].created, 1_700_000_000);

    harness.send(AppEvent::PlayLibraryEntry(1)).await;
    let event = harness
        .expect(|e| matches!(e, AppEvent::NowPlaying { .. }))
        .await;
    assert_eq!(
        event,
        AppEvent::NowPlaying {
            title: Some("musicgen_2.wav".into())
        }
    );
    let AppEvent::PlayerUpdate(view) = harness.expect(is_player(PlayerStatus::Paused)).await else {
        unreachable!()
    };
    assert_eq!(view.duration, 30.0);

    harness.send(AppEvent::PlayLibraryEntry(9)).await;
    let event = harness
        .expect(|e| matches!(e, AppEvent::PlayerFailed(_)))
        .await;
    assert_eq!(event, AppEvent::PlayerFailed("No library entry 10".into()));
}

#[tokio::test(start_paused = true)]
async fn player_commands_drive_the_controller() {
    let backend = FakeBackend::default()
        .replying(Duration::ZERO, Ok(track("clip.wav", 5.0)));
    let engine = ScriptedEngine::new(5.0);
    let harness = Harness::start(backend, engine);

    harness.send(AppEvent::Generate).await;
    harness.expect(is_player(PlayerStatus::Paused)).await;

    harness
        .send(AppEvent::Player(PlayerCommand::SetVolume(-40.0)))
        .await;
    harness
        .expect(|e| matches!(e, AppEvent::PlayerUpdate(view) if view.volume_db == -24.0))
        .await;

    harness
        .send(AppEvent::Player(PlayerCommand::TogglePlay))
        .await;
    harness.expect(is_player(PlayerStatus::Playing)).await;

    // Runs to the end and settles
    let AppEvent::PlayerUpdate(view) = harness.expect(is_player(PlayerStatus::Paused)).await else {
        unreachable!()
    };
    assert_eq!(view.position, 5.0);
    assert!(
        harness
            .engine
            .calls()
            .contains(&EngineCall::Volume { clip: 1, db: -24.0 })
    );
}

#[tokio::test(start_paused = true)]
async fn decode_failures_are_reported() {
    let backend = FakeBackend::default()
        .replying(Duration::ZERO, Ok(track("broken.wav", 5.0)));
    let engine =
        ScriptedEngine::new(5.0).with_clip("broken.wav", ClipScript::lasting(5.0).failing("bad header"));
    let harness = Harness::start(backend, engine);

    harness.send(AppEvent::Generate).await;

    let AppEvent::PlayerFailed(message) = harness
        .expect(|e| matches!(e, AppEvent::PlayerFailed(_)))
        .await
    else {
        unreachable!()
    };
    assert!(message.contains("broken.wav"), "{message}");
    assert_eq!(
        harness.controller.player.status(),
        PlaybackStatus::Empty
    );
    assert_eq!(harness.engine.live_clips(), 0);
}

#[tokio::test(start_paused = true)]
async fn closing_the_ui_stops_the_loop_and_the_player() {
    let mut harness = Harness::start(FakeBackend::default(), ScriptedEngine::new(5.0));

    harness.send(AppEvent::UiEvent(UiEvent::Close)).await;

    let finished = timeout(Duration::from_secs(5), harness.tasks.join_next())
        .await
        .expect("event loop did not stop")
        .expect("no task");
    assert!(finished.unwrap().is_ok());
    assert_eq!(
        harness.controller.player.status(),
        PlaybackStatus::Disposed
    );

    harness.controller.shutdown();
    let rest = timeout(Duration::from_secs(5), harness.tasks.join_next())
        .await
        .expect("forwarder did not stop");
    assert!(rest.is_some());
}
