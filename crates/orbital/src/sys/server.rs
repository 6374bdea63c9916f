use crate::events::AppEvent;
use crate::sys::protocol::ControlCommand;
use async_channel::Sender;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;

pub async fn run_server(tx: Sender<AppEvent>, socket: PathBuf) {
    // Cleanup old socket if it exists
    if fs_err::metadata(&socket).is_ok() {
        let _ = fs_err::remove_file(&socket);
    }

    let listener = match UnixListener::bind(&socket) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket {}: {}", socket.display(), e);
            return;
        }
    };
    log::info!("Listening on {}", socket.display());

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let (reader, mut writer) = stream.into_split();
                    let mut lines = BufReader::new(reader).lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        let command = match line.parse::<ControlCommand>() {
                            Ok(c) => c,
                            Err(e) => {
                                log::warn!("Bad control command '{}': {}", line.trim(), e);
                                let reply = format!("error: {}\n", e);
                                let _ = writer.write_all(reply.as_bytes()).await;
                                continue;
                            }
                        };

                        if let Some(query) = command.query() {
                            let (reply_tx, reply_rx) = async_channel::bounded(1);
                            if tx.send(AppEvent::Query(query, reply_tx)).await.is_err() {
                                return;
                            }
                            if let Ok(mut reply) = reply_rx.recv().await {
                                reply.push('\n');
                                let _ = writer.write_all(reply.as_bytes()).await;
                            }
                            continue;
                        }

                        for event in command.into_events() {
                            if tx.send(event).await.is_err() {
                                return;
                            }
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}
