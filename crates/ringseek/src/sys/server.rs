use crate::events::AppEvent;
use async_channel::{Receiver, Sender};
use parking_lot::Mutex;
use ringctl::proto::{Command, Notification, SocketPath};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::OwnedWriteHalf;
use tokio::net::{UnixListener, UnixStream};

/// Notifications a `watch` connection may fall behind by before it is dropped.
pub const SUBSCRIBER_BACKLOG: usize = 64;

/// Connections that asked to `watch`.
#[derive(Clone, Default)]
pub struct Subscribers(Arc<Mutex<Vec<Sender<Notification>>>>);

impl Subscribers {
    pub fn subscribe(&self) -> Receiver<Notification> {
        let (tx, rx) = async_channel::bounded(SUBSCRIBER_BACKLOG);
        self.0.lock().push(tx);
        rx
    }

    /// Delivers to every live subscriber and forgets the ones that hung up or
    /// stopped reading.
    pub fn broadcast(&self, notification: &Notification) {
        self.0
            .lock()
            .retain(|tx| tx.try_send(notification.clone()).is_ok());
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub async fn broadcast_notifications(rx: Receiver<Notification>, subscribers: Subscribers) {
    while let Ok(notification) = rx.recv().await {
        log::debug!("Notify: {}", notification);
        subscribers.broadcast(&notification);
    }
}

pub async fn run_server(socket_path: SocketPath, tx: Sender<AppEvent>, subscribers: Subscribers) {
    // Cleanup old socket if it exists
    if std::fs::metadata(socket_path.as_str()).is_ok() {
        let _ = std::fs::remove_file(socket_path.as_str());
    }

    let listener = match UnixListener::bind(socket_path.as_str()) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket {}: {}", socket_path, e);
            return;
        }
    };
    log::info!("Listening on {}", socket_path);

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let tx = tx.clone();
                let subscribers = subscribers.clone();
                tokio::spawn(handle_client(stream, tx, subscribers));
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

async fn handle_client(stream: UnixStream, tx: Sender<AppEvent>, subscribers: Subscribers) {
    let (read, write) = stream.into_split();
    let mut write = Some(write);
    let mut forwarder = None;
    let mut lines = BufReader::new(read).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Watch) => {
                if let Some(write) = write.take() {
                    let rx = subscribers.subscribe();
                    forwarder = Some(tokio::spawn(forward_notifications(write, rx)));
                }
            }
            Ok(command) => {
                if let Some(event) = AppEvent::from_command(command)
                    && tx.send(event).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::warn!("Ignoring '{}': {}", line, e),
        }
    }

    // the subscriber entry goes away on the next broadcast
    if let Some(forwarder) = forwarder {
        forwarder.abort();
    }
}

async fn forward_notifications(mut write: OwnedWriteHalf, rx: Receiver<Notification>) {
    while let Ok(notification) = rx.recv().await {
        let line = format!("{}\n", notification);
        if write.write_all(line.as_bytes()).await.is_err() {
            break;
        }
    }
}
