use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use sonora_api::MusicBackend;
use sonora_playback::{AudioEngine, PlaybackController};
use sonora_types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::{Completion, EventContext, event_loop, playback::forward_snapshots};
use crate::state::AppState;
use crate::ui::ui_loop;

pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    /// Finished backend requests, fed back into the event loop
    pub completions: (AsyncSender<Completion>, AsyncReceiver<Completion>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_ui: kanal::bounded_async(256),
            ui_to_app: kanal::bounded_async(64),
            completions: kanal::bounded_async(32),
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

pub struct AppController<E: AudioEngine> {
    pub channels: ChannelSet,
    pub state: Arc<AppState>,
    pub backend: Arc<dyn MusicBackend>,
    pub player: Arc<PlaybackController<E>>,
    pub cancel_token: CancellationToken,
}

impl<E: AudioEngine> AppController<E> {
    pub fn new(
        state: Arc<AppState>,
        backend: Arc<dyn MusicBackend>,
        player: Arc<PlaybackController<E>>,
    ) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            backend,
            player,
            cancel_token: CancellationToken::new(),
        }
    }

    /// The UI's ends of the channels: its sender into the app and its receiver
    #[cfg(test)]
    pub fn ui_endpoints(&self) -> (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>) {
        (
            self.channels.ui_to_app.0.clone(),
            self.channels.app_to_ui.1.clone(),
        )
    }

    fn context(&self) -> EventContext<E> {
        EventContext {
            state: Arc::clone(&self.state),
            backend: Arc::clone(&self.backend),
            player: Arc::clone(&self.player),
            app_to_ui_tx: self.channels.app_to_ui.0.clone(),
            completion_tx: self.channels.completions.0.clone(),
        }
    }

    /// Event loop and player snapshot forwarding, without a terminal
    pub fn spawn_core_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        {
            let ctx = self.context();
            let ui_to_app_rx = self.channels.ui_to_app.1.clone();
            let completion_rx = self.channels.completions.1.clone();
            let cancel = self.cancel_token.clone();
            tasks.spawn(async move {
                event_loop(ctx, ui_to_app_rx, completion_rx, cancel).await
            });
        }

        {
            let player = Arc::clone(&self.player);
            let app_to_ui_tx = self.channels.app_to_ui.0.clone();
            let cancel = self.cancel_token.clone();
            tasks.spawn(async move { forward_snapshots(player, app_to_ui_tx, cancel).await });
        }

        tasks
    }

    pub fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = self.spawn_core_tasks();

        let app_to_ui_rx = self.channels.app_to_ui.1.clone();
        let ui_to_app_tx = self.channels.ui_to_app.0.clone();
        let config = Arc::clone(&self.state.config);
        tasks.spawn(async move { ui_loop(app_to_ui_rx, ui_to_app_tx, config).await });

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
        self.player.dispose();
    }
}
