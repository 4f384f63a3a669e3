use ringseek::config;
use ringseek::host::Host;
use ringseek::seek::SeekBar;
use ringseek::sys::runtime;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    if let Err(e) = config::write_default_config() {
        log::warn!("Could not write default config: {}", e);
    }
    let config = config::load_or_default();

    let (tx, rx) = async_channel::bounded(32);
    let (notify_tx, notify_rx) = async_channel::unbounded();

    let mut seek_bar = SeekBar::new(&config.seek);
    seek_bar.set_change_listener(Some(Box::new(notify_tx.clone())));
    seek_bar.set_center_click_listener(Some(Box::new(notify_tx)));

    let mut host = Host::new(seek_bar);
    host.apply_config(&config);

    // Start Background Services
    runtime::start_background_services(tx, notify_rx, config.socket_path.clone());

    while let Ok(event) = rx.recv_blocking() {
        host.update(event);
    }

    anyhow::bail!("Event channel closed")
}
