use std::sync::Arc;

use sonora_api::{ApiError, LibraryFile, LibraryResponse, Operation, RequestTicket};
use sonora_playback::AudioEngine;
use sonora_types::{AppEvent, LibraryItem};

use super::{Completion, EventContext, playback};

pub async fn refresh<E: AudioEngine>(ctx: &EventContext<E>) -> anyhow::Result<()> {
    let ticket = ctx.state.requests.issue(Operation::Library);
    ctx.app_to_ui_tx.send(AppEvent::LibraryLoading).await?;

    let backend = Arc::clone(&ctx.backend);
    let completion_tx = ctx.completion_tx.clone();
    tokio::spawn(async move {
        let result = backend.library().await;
        if completion_tx
            .send(Completion::Listed { ticket, result })
            .await
            .is_err()
        {
            tracing::debug!("Library listing finished after shutdown");
        }
    });

    Ok(())
}

pub async fn finish_refresh<E: AudioEngine>(
    ctx: &EventContext<E>,
    ticket: RequestTicket,
    result: Result<LibraryResponse, ApiError>,
) -> anyhow::Result<()> {
    if !ctx.state.requests.is_current(&ticket) {
        tracing::debug!("Dropping stale library listing #{}", ticket.sequence);
        return Ok(());
    }

    match result {
        Ok(response) => {
            let items = response.files.iter().map(library_item).collect();
            tracing::debug!("Library has {} files", response.files.len());
            *ctx.state.library.write().await = response.files;
            ctx.app_to_ui_tx.send(AppEvent::ShowLibrary(items)).await?;
        }
        Err(e) => {
            tracing::warn!("Library listing failed: {e}");
            ctx.app_to_ui_tx
                .send(AppEvent::LibraryFailed(e.to_string()))
                .await?;
        }
    }

    Ok(())
}

pub async fn play_entry<E: AudioEngine>(
    ctx: &EventContext<E>,
    index: usize,
) -> anyhow::Result<()> {
    let entry = ctx.state.library.read().await.get(index).cloned();
    let Some(entry) = entry else {
        ctx.app_to_ui_tx
            .send(AppEvent::PlayerFailed(format!(
                "No library entry {}",
                index + 1
            )))
            .await?;
        return Ok(());
    };

    ctx.app_to_ui_tx
        .send(AppEvent::NowPlaying {
            title: Some(entry.filename),
        })
        .await?;
    playback::load_source(ctx, entry.path);
    Ok(())
}

fn library_item(file: &LibraryFile) -> LibraryItem {
    LibraryItem {
        filename: file.filename.clone(),
        path: file.path.clone(),
        size: file.size,
        created: file.created.trunc() as i64,
        modified: file.modified.trunc() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_drop_fractions() {
        let item = library_item(&LibraryFile {
            filename: "musicgen_7.wav".into(),
            path: "storage/musicgen_7.wav".into(),
            size: 512,
            created: 1_700_000_000.75,
            modified: 1_700_000_100.0,
        });

        assert_eq!(item.created, 1_700_000_000);
        assert_eq!(item.modified, 1_700_000_100);
        assert_eq!(item.size, 512);
    }
}
