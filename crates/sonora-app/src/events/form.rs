use sonora_playback::AudioEngine;
use sonora_types::{AppEvent, Genre, Locale, Tab};

use super::{EventContext, library};

pub async fn handle_tab<E: AudioEngine>(ctx: &EventContext<E>, tab: Tab) -> anyhow::Result<()> {
    let previous = std::mem::replace(&mut ctx.state.form.write().await.tab, tab);
    tracing::debug!("Tab {previous:?} -> {tab:?}");
    ctx.app_to_ui_tx.send(AppEvent::TabChanged(tab)).await?;

    // Opening the library always lists afresh
    if tab == Tab::Library {
        library::refresh(ctx).await?;
    }

    Ok(())
}

pub async fn handle_locale<E: AudioEngine>(
    ctx: &EventContext<E>,
    locale: Locale,
) -> anyhow::Result<()> {
    ctx.state.form.write().await.locale = locale;
    ctx.state.config.write().await.ui.locale = locale;
    tracing::info!("Locale set to {locale}");

    ctx.app_to_ui_tx.send(AppEvent::LocaleChanged(locale)).await?;
    Ok(())
}

pub async fn handle_genre<E: AudioEngine>(
    ctx: &EventContext<E>,
    genre: Genre,
) -> anyhow::Result<()> {
    let view = {
        let mut form = ctx.state.form.write().await;
        form.genre = genre;
        form.view()
    };

    ctx.app_to_ui_tx.send(AppEvent::FormUpdated(view)).await?;
    Ok(())
}

pub async fn handle_prompt<E: AudioEngine>(
    ctx: &EventContext<E>,
    prompt: String,
) -> anyhow::Result<()> {
    let view = {
        let mut form = ctx.state.form.write().await;
        form.prompt = prompt;
        form.view()
    };

    ctx.app_to_ui_tx.send(AppEvent::FormUpdated(view)).await?;
    Ok(())
}

pub async fn handle_duration<E: AudioEngine>(
    ctx: &EventContext<E>,
    seconds: u32,
) -> anyhow::Result<()> {
    let seconds = ctx.state.config.read().await.generation.clamp_duration(seconds);
    let view = {
        let mut form = ctx.state.form.write().await;
        form.duration = seconds;
        form.view()
    };

    ctx.app_to_ui_tx.send(AppEvent::FormUpdated(view)).await?;
    Ok(())
}
