use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use sonora_api::{
    ApiError, GenerateResponse, LibraryResponse, MusicBackend, RequestTicket, TranslateResponse,
};
use sonora_playback::{AudioEngine, PlaybackController};
use sonora_types::{AppEvent, UiEvent};
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

pub mod form;
pub mod generate;
pub mod library;
pub mod playback;
pub mod translate;

/// A backend call that finished, tagged with the ticket it was issued under
#[derive(Debug)]
pub enum Completion {
    Generated {
        ticket: RequestTicket,
        /// Form prompt as typed when the request went out
        prompt: String,
        result: Result<GenerateResponse, ApiError>,
    },
    Translated {
        ticket: RequestTicket,
        result: Result<TranslateResponse, ApiError>,
    },
    Listed {
        ticket: RequestTicket,
        result: Result<LibraryResponse, ApiError>,
    },
}

pub struct EventContext<E: AudioEngine> {
    pub state: Arc<AppState>,
    pub backend: Arc<dyn MusicBackend>,
    pub player: Arc<PlaybackController<E>>,
    pub app_to_ui_tx: AsyncSender<AppEvent>,
    pub completion_tx: AsyncSender<Completion>,
}

impl<E: AudioEngine> Clone for EventContext<E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            backend: Arc::clone(&self.backend),
            player: Arc::clone(&self.player),
            app_to_ui_tx: self.app_to_ui_tx.clone(),
            completion_tx: self.completion_tx.clone(),
        }
    }
}

pub async fn event_loop<E: AudioEngine>(
    ctx: EventContext<E>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    completion_rx: AsyncReceiver<Completion>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let ready = ctx.state.form.read().await.view();
    ctx.app_to_ui_tx.send(AppEvent::BackendReady(ready)).await?;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            event = ui_to_app_rx.recv() => {
                if !handle_events(&ctx, event?).await? {
                    tracing::info!("UI closed");
                    break;
                }
            }
            completion = completion_rx.recv() => {
                handle_completion(&ctx, completion?).await?;
            }
        }
    }

    ctx.player.dispose();
    Ok(())
}

/// Returns false once the UI asks to close
pub async fn handle_events<E: AudioEngine>(
    ctx: &EventContext<E>,
    event: AppEvent,
) -> anyhow::Result<bool> {
    match event {
        AppEvent::UiEvent(UiEvent::Close) => return Ok(false),
        AppEvent::UiEvent(UiEvent::Help) => {}
        AppEvent::SelectTab(tab) => form::handle_tab(ctx, tab).await?,
        AppEvent::SetLocale(locale) => form::handle_locale(ctx, locale).await?,
        AppEvent::SelectGenre(genre) => form::handle_genre(ctx, genre).await?,
        AppEvent::SetPrompt(prompt) => form::handle_prompt(ctx, prompt).await?,
        AppEvent::SetDuration(seconds) => form::handle_duration(ctx, seconds).await?,
        AppEvent::Generate => generate::start_generation(ctx).await?,
        AppEvent::TestTranslation(text) => translate::start_translation(ctx, text).await?,
        AppEvent::RefreshLibrary => library::refresh(ctx).await?,
        AppEvent::PlayLibraryEntry(index) => library::play_entry(ctx, index).await?,
        AppEvent::Player(command) => playback::handle_player_command(ctx, command).await?,
        other => tracing::debug!("Ignoring outbound event {:?}", other),
    }

    Ok(true)
}

async fn handle_completion<E: AudioEngine>(
    ctx: &EventContext<E>,
    completion: Completion,
) -> anyhow::Result<()> {
    match completion {
        Completion::Generated {
            ticket,
            prompt,
            result,
        } => generate::finish_generation(ctx, ticket, &prompt, result).await,
        Completion::Translated { ticket, result } => {
            translate::finish_translation(ctx, ticket, result).await
        }
        Completion::Listed { ticket, result } => library::finish_refresh(ctx, ticket, result).await,
    }
}
