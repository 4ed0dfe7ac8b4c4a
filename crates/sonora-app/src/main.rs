use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use sonora_api::HttpBackend;
use sonora_audio::CpalEngine;
use sonora_config::Config;
use sonora_playback::{AudioEngine, MixerLevels, PlaybackController};
use tokio::signal;

pub mod cli;
pub mod controller;
pub mod events;
pub mod logging;
pub mod state;
pub mod ui;

#[cfg(test)]
mod tests;

use self::cli::Args;
use self::controller::AppController;
use self::state::AppState;

const FALLBACK_SAMPLE_RATE: u32 = 48_000;
const FALLBACK_CHANNELS: usize = 2;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_tracing(args.log_level.as_deref(), args.log_json)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(start(args));

    // The stdin reader may still be parked on a blocking read
    runtime.shutdown_timeout(Duration::from_millis(250));
    result
}

async fn start(args: Args) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::new(),
    };
    args.apply(&mut config);
    tracing::info!("Starting sonora against {}", config.api.base_url);

    let backend = HttpBackend::new(
        config.api.base_url.clone(),
        Duration::from_secs(config.api.timeout_seconds),
    )
    .context("Failed to build HTTP client")?;

    let engine = match CpalEngine::new() {
        Ok(engine) => engine,
        Err(e) => {
            tracing::warn!("Audio output unavailable, playing silently: {e}");
            CpalEngine::silent(FALLBACK_SAMPLE_RATE, FALLBACK_CHANNELS)
        }
    };

    let player = Arc::new(PlaybackController::with_levels(
        Arc::new(engine),
        Duration::from_millis(config.player.tick_ms),
        MixerLevels::new(config.player.volume_db, config.player.filter_hz),
    ));

    let state = Arc::new(AppState::new(config));
    let controller = AppController::new(state, Arc::new(backend), player);

    run(controller, shutdown_signal()).await;
    Ok(())
}

pub async fn run<E: AudioEngine>(
    controller: AppController<E>,
    shutdown: impl Future<Output = ()>,
) {
    let mut tasks = controller.spawn_tasks();

    tokio::select! {
        _ = shutdown => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::info!("Task finished, shutting down"),
                Ok(Err(e)) => tracing::error!("Task exited: {e:#}"),
                Err(e) => tracing::error!("Task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    tasks.abort_all();
    while tasks.join_next().await.is_some() {}
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
