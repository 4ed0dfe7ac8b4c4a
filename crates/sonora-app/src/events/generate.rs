use std::sync::Arc;

use sonora_api::{ApiError, GenerateRequest, GenerateResponse, Operation, RequestTicket};
use sonora_playback::AudioEngine;
use sonora_types::{AppEvent, TrackDetails, TranslationStatus};
use unicode_normalization::UnicodeNormalization;

use super::{Completion, EventContext, playback};

/// Trimmed and NFC-normalized so equal prompts compare equal on the backend
pub fn normalize_prompt(prompt: &str) -> String {
    prompt.trim().nfc().collect()
}

pub async fn start_generation<E: AudioEngine>(ctx: &EventContext<E>) -> anyhow::Result<()> {
    let (request, prompt) = {
        let form = ctx.state.form.read().await;
        let request = GenerateRequest {
            prompt: normalize_prompt(&form.prompt),
            genre: form.genre.key().to_string(),
            duration: form.duration,
            locale: form.locale.code().to_string(),
        };
        (request, form.prompt.clone())
    };

    let ticket = ctx.state.requests.issue(Operation::Generate);
    tracing::info!(
        "Generating {}s of {} ({})",
        request.duration,
        request.genre,
        request.locale
    );
    ctx.app_to_ui_tx.send(AppEvent::GenerationStarted).await?;

    let backend = Arc::clone(&ctx.backend);
    let completion_tx = ctx.completion_tx.clone();
    tokio::spawn(async move {
        let result = backend.generate(&request).await;
        if completion_tx
            .send(Completion::Generated {
                ticket,
                prompt,
                result,
            })
            .await
            .is_err()
        {
            tracing::debug!("Generation finished after shutdown");
        }
    });

    Ok(())
}

pub async fn finish_generation<E: AudioEngine>(
    ctx: &EventContext<E>,
    ticket: RequestTicket,
    prompt: &str,
    result: Result<GenerateResponse, ApiError>,
) -> anyhow::Result<()> {
    if !ctx.state.requests.is_current(&ticket) {
        tracing::debug!("Dropping stale generation #{}", ticket.sequence);
        return Ok(());
    }

    match result {
        Ok(response) => {
            let details = track_details(prompt, response);
            tracing::info!("Generated {} ({:.1}s)", details.audio_path, details.duration);

            let locator = details.audio_path.clone();
            ctx.app_to_ui_tx
                .send(AppEvent::GenerationFinished(details))
                .await?;
            ctx.app_to_ui_tx
                .send(AppEvent::NowPlaying { title: None })
                .await?;
            playback::load_source(ctx, locator);
        }
        Err(e) => {
            tracing::warn!("Generation failed: {e}");
            ctx.app_to_ui_tx
                .send(AppEvent::GenerationFailed(e.to_string()))
                .await?;
        }
    }

    Ok(())
}

/// Fill the prompts the backend left out from what the user typed
pub fn track_details(prompt: &str, response: GenerateResponse) -> TrackDetails {
    let prompt_original = response
        .prompt_original
        .unwrap_or_else(|| prompt.to_string());
    let prompt_used = response
        .prompt_used
        .or_else(|| Some(response.prompt).filter(|p| !p.is_empty()))
        .unwrap_or_else(|| prompt.to_string());

    TrackDetails {
        audio_path: response.audio_path,
        bpm: response.bpm,
        duration: response.duration,
        prompt_original,
        prompt_used,
        translation: response.translation.map(|t| TranslationStatus {
            source_locale: t.source_locale,
            target_locale: t.target_locale,
            applied: t.applied,
            error: t.error,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sonora_api::TranslationDetails;

    fn response() -> GenerateResponse {
        GenerateResponse {
            audio_path: "storage/musicgen_1.wav".into(),
            duration: 20.0,
            bpm: 118.24,
            prompt: String::new(),
            prompt_original: None,
            prompt_used: None,
            locale: None,
            translation: None,
            genre: None,
        }
    }

    #[test]
    fn prompts_fall_back_to_the_typed_one() {
        let details = track_details("  tabla groove ", response());
        assert_eq!(details.prompt_original, "  tabla groove ");
        assert_eq!(details.prompt_used, "  tabla groove ");
        assert!(details.translation.is_none());
    }

    #[test]
    fn backend_prompts_win() {
        let mut response = response();
        response.prompt = "tabla groove".into();
        let details = track_details("x", response.clone());
        assert_eq!(details.prompt_used, "tabla groove");

        response.prompt_original = Some("तबला".into());
        response.prompt_used = Some("tabla rhythm".into());
        response.translation = Some(TranslationDetails {
            source_locale: "hi".into(),
            target_locale: "en".into(),
            applied: true,
            error: None,
        });
        let details = track_details("तबला", response);
        assert_eq!(details.prompt_original, "तबला");
        assert_eq!(details.prompt_used, "tabla rhythm");
        assert!(details.translation.unwrap().applied);
    }

    #[test]
    fn prompts_are_trimmed_and_composed() {
        assert_eq!(normalize_prompt("  cafe\u{0301} beat \n"), "caf\u{00E9} beat");
        // Composition exclusion: nukta forms stay decomposed
        assert_eq!(normalize_prompt("\u{0958}"), "\u{0915}\u{093C}");
        assert_eq!(normalize_prompt("   "), "");
    }
}
