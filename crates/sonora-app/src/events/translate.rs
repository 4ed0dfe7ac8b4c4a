use std::sync::Arc;

use sonora_api::{ApiError, Operation, RequestTicket, TranslateRequest, TranslateResponse};
use sonora_playback::AudioEngine;
use sonora_types::{AppEvent, TranslationFailure, TranslationStatus, TranslatorResult};

use super::generate::normalize_prompt;
use super::{Completion, EventContext};

pub async fn start_translation<E: AudioEngine>(
    ctx: &EventContext<E>,
    text: String,
) -> anyhow::Result<()> {
    // Issued even for empty input so an older reply cannot land afterwards
    let ticket = ctx.state.requests.issue(Operation::Translate);

    let text = normalize_prompt(&text);
    if text.is_empty() {
        ctx.app_to_ui_tx
            .send(AppEvent::TranslationFailed(TranslationFailure::MissingText))
            .await?;
        return Ok(());
    }

    let source_locale = ctx.state.form.read().await.locale.code().to_string();
    let target_locale = ctx.state.config.read().await.generation.target_locale.clone();
    let request = TranslateRequest {
        text,
        source_locale,
        target_locale,
    };

    tracing::debug!(
        "Translating {} -> {}",
        request.source_locale,
        request.target_locale
    );
    ctx.app_to_ui_tx.send(AppEvent::TranslationStarted).await?;

    let backend = Arc::clone(&ctx.backend);
    let completion_tx = ctx.completion_tx.clone();
    tokio::spawn(async move {
        let result = backend.translate(&request).await;
        if completion_tx
            .send(Completion::Translated { ticket, result })
            .await
            .is_err()
        {
            tracing::debug!("Translation finished after shutdown");
        }
    });

    Ok(())
}

pub async fn finish_translation<E: AudioEngine>(
    ctx: &EventContext<E>,
    ticket: RequestTicket,
    result: Result<TranslateResponse, ApiError>,
) -> anyhow::Result<()> {
    if !ctx.state.requests.is_current(&ticket) {
        tracing::debug!("Dropping stale translation #{}", ticket.sequence);
        return Ok(());
    }

    let event = match result {
        Ok(response) => AppEvent::ShowTranslation(TranslatorResult {
            text: response.translated_text,
            status: TranslationStatus {
                source_locale: response.source_locale,
                target_locale: response.target_locale,
                applied: response.applied,
                error: None,
            },
        }),
        Err(e) => {
            tracing::warn!("Translation failed: {e}");
            AppEvent::TranslationFailed(TranslationFailure::Request(e.to_string()))
        }
    };

    ctx.app_to_ui_tx.send(event).await?;
    Ok(())
}
