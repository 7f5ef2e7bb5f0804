//! SIGINT/SIGTERM → `Message::Quit`

use tokio::sync::mpsc;

use svcdbg_core::prelude::*;

use crate::message::Message;

/// Forward the first termination signal to the engine as `Quit`
pub fn spawn_signal_handler(tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        match next_signal().await {
            Ok(name) => {
                info!("{} received, shutting down", name);
                let _ = tx.send(Message::Quit).await;
            }
            Err(e) => error!("Signal handler error: {}", e),
        }
    });
}

#[cfg(unix)]
async fn next_signal() -> Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let listen = |kind: SignalKind, name: &str| {
        signal(kind).map_err(|e| Error::terminal(format!("Cannot listen for {name}: {e}")))
    };
    let mut interrupt = listen(SignalKind::interrupt(), "SIGINT")?;
    let mut terminate = listen(SignalKind::terminate(), "SIGTERM")?;

    Ok(tokio::select! {
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
    })
}

#[cfg(not(unix))]
async fn next_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| Error::terminal(format!("Cannot listen for Ctrl+C: {e}")))?;
    Ok("Ctrl+C")
}
