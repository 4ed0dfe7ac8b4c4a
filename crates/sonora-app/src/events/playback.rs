use std::sync::Arc;

use kanal::AsyncSender;
use sonora_playback::{
    AudioEngine, LoadOutcome, PlaybackController, PlaybackSnapshot, PlaybackStatus,
};
use sonora_types::{AppEvent, PlayerCommand, PlayerStatus, PlayerView};
use tokio_util::sync::CancellationToken;

use super::EventContext;

/// Load in the background; a newer load simply discards this one
pub fn load_source<E: AudioEngine>(ctx: &EventContext<E>, locator: String) {
    let player = Arc::clone(&ctx.player);
    let app_to_ui_tx = ctx.app_to_ui_tx.clone();

    tokio::spawn(async move {
        match player.load(locator.as_str()).await {
            Ok(LoadOutcome::Ready { session, duration }) => {
                tracing::info!("Loaded {locator} as {session} ({duration:.1}s)");
            }
            Ok(LoadOutcome::Discarded) => tracing::debug!("Load of {locator} was superseded"),
            Err(e) => {
                tracing::warn!("{e}");
                let _ = app_to_ui_tx.send(AppEvent::PlayerFailed(e.to_string())).await;
            }
        }
    });
}

pub async fn handle_player_command<E: AudioEngine>(
    ctx: &EventContext<E>,
    command: PlayerCommand,
) -> anyhow::Result<()> {
    let result = match command {
        PlayerCommand::TogglePlay => ctx.player.toggle_play().map(|_| ()),
        PlayerCommand::Seek(seconds) => ctx.player.seek(seconds).map(|_| ()),
        PlayerCommand::SetVolume(db) => {
            ctx.player.set_volume(db);
            Ok(())
        }
        PlayerCommand::SetFilterCutoff(hz) => {
            ctx.player.set_filter_cutoff(hz);
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::warn!("Player command {command:?} failed: {e}");
        ctx.app_to_ui_tx
            .send(AppEvent::PlayerFailed(e.to_string()))
            .await?;
    }

    Ok(())
}

/// Mirror every published snapshot to the UI
pub async fn forward_snapshots<E: AudioEngine>(
    player: Arc<PlaybackController<E>>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut updates = player.subscribe();
    drop(player);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = player_view(&updates.borrow_and_update());
                app_to_ui_tx.send(AppEvent::PlayerUpdate(view)).await?;
            }
        }
    }

    Ok(())
}

pub fn player_view(snapshot: &PlaybackSnapshot) -> PlayerView {
    PlayerView {
        status: match snapshot.status {
            PlaybackStatus::Empty => PlayerStatus::Empty,
            PlaybackStatus::Loading => PlayerStatus::Loading,
            PlaybackStatus::Paused => PlayerStatus::Paused,
            PlaybackStatus::Playing => PlayerStatus::Playing,
            PlaybackStatus::Disposed => PlayerStatus::Disposed,
        },
        position: snapshot.position,
        duration: snapshot.duration,
        volume_db: snapshot.volume_db,
        cutoff_hz: snapshot.cutoff_hz,
    }
}
