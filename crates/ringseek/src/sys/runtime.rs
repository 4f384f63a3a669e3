use crate::events::AppEvent;
use crate::sys::server::{self, Subscribers};
use async_channel::{Receiver, Sender};
use ringctl::proto::{Notification, SocketPath};
use std::thread;
use tokio::runtime::Runtime;

pub fn start_background_services(
    tx: Sender<AppEvent>,
    notifications: Receiver<Notification>,
    socket_path: SocketPath,
) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime: {}", e);
                return;
            }
        };

        rt.block_on(async {
            let subscribers = Subscribers::default();

            {
                let tx = tx.clone();
                let subscribers = subscribers.clone();
                tokio::spawn(async move {
                    server::run_server(socket_path, tx, subscribers).await;
                });
            }

            {
                let subscribers = subscribers.clone();
                tokio::spawn(async move {
                    server::broadcast_notifications(notifications, subscribers).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(tx).await;
                });
            }

            std::future::pending::<()>().await;
        });
    });
}
