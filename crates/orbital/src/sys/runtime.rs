use crate::config;
use crate::events::AppEvent;
use crate::gui::app::AppModel;
use async_channel::{Receiver, Sender};
use std::path::PathBuf;
use std::time::Instant;

/// Spawns the control socket and the config watcher onto the current runtime.
pub fn start_background_services(tx: Sender<AppEvent>, socket: PathBuf) {
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            crate::sys::server::run_server(tx, socket).await;
        });
    }

    tokio::spawn(async move {
        config::run_async_watcher(tx).await;
    });
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => std::future::pending().await,
    }
}

/// Drives the model until interrupted. Every state change happens on this task, one
/// event at a time; timers are the model's own deadlines.
pub async fn run_event_loop(mut app: AppModel, rx: Receiver<AppEvent>) -> anyhow::Result<()> {
    loop {
        let redraw = tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => app.update(event, Instant::now()),
                Err(_) => break,
            },
            _ = sleep_until(app.next_deadline()) => app.tick(Instant::now()),
            signal = tokio::signal::ctrl_c() => {
                signal?;
                log::info!("Interrupted, shutting down");
                break;
            }
        };

        if redraw {
            let state = app.input().state();
            log::debug!(
                "Frame: scale {:.3} translate ({:.1}, {:.1}) active {:?} manual {}",
                state.scale,
                state.translate.x,
                state.translate.y,
                state.active,
                state.manual
            );
        }
    }
    Ok(())
}
