use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use sonora_config::Config;
use sonora_locale::Catalog;
use sonora_types::{AppEvent, UiEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::RwLock;

pub mod commands;
pub mod format;
pub mod render;
pub mod view;

pub use view::{Input, Screen, Ui};

/// Terminal front end: reads commands from stdin, renders app events to stdout
pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    config: Arc<RwLock<Config>>,
) -> anyhow::Result<()> {
    let catalog = Catalog::bundled()?;

    let (locale, ansi, redraw_every) = {
        let config = config.read().await;
        (
            config.ui.locale,
            config.ui.color && atty::is(atty::Stream::Stdout),
            Duration::from_millis(config.delta_time),
        )
    };

    let mut ui = Ui::new(
        &catalog,
        Screen::new(std::io::stdout(), ansi),
        locale,
        redraw_every,
    );
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = app_to_ui_rx.recv() => {
                let Ok(event) = event else {
                    tracing::debug!("App channel closed");
                    break;
                };
                if !ui.handle_event(event)? {
                    break;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("stdin closed");
                    let _ = ui_to_app_tx.send(AppEvent::UiEvent(UiEvent::Close)).await;
                    break;
                };

                match ui.handle_line(&line)? {
                    Input::Send(event) => ui_to_app_tx.send(event).await?,
                    Input::Quit => {
                        ui_to_app_tx.send(AppEvent::UiEvent(UiEvent::Close)).await?;
                        break;
                    }
                    Input::Handled => {}
                }
            }
        }
    }

    Ok(())
}
