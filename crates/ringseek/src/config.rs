use crate::events::AppEvent;
use crate::seek::{DEFAULT_TAP_SLOP, ProgressText, TextFormat};
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use ringctl::proto::SocketPath;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Behaviour of the control itself.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SeekConfig {
    pub min: f64,
    pub max: f64,
    pub progress: f64,
    pub speed_multiplier: f64,
    pub ring_width_factor: f64,
    pub enabled: bool,
    pub show_indicator: bool,
    pub show_text: bool,
    pub show_inner_circle: bool,
    pub progress_text: Option<ProgressText>,
    pub text_format: TextFormat,
    pub tap_slop: f64,
}

impl Default for SeekConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            progress: 0.0,
            speed_multiplier: 1.0,
            ring_width_factor: 0.5,
            enabled: true,
            show_indicator: true,
            show_text: true,
            show_inner_circle: true,
            progress_text: None,
            text_format: TextFormat::default(),
            tap_slop: DEFAULT_TAP_SLOP,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct GeometryConfig {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub seek: SeekConfig,
    #[serde(default)]
    pub geometry: Option<GeometryConfig>,
    #[serde(default)]
    pub socket_path: SocketPath,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No home directory to keep ringseek's config.toml in")]
    NoConfigDir,
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Failed to watch configuration: {0}")]
    Watch(#[from] notify::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Events arriving this soon after a change are folded into one reload.
const RELOAD_SETTLE: Duration = Duration::from_millis(100);

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// `config.toml` in the platform config directory, e.g.
/// `~/.config/ringseek/config.toml` on Linux.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("org", "ringseek", "ringseek")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Reads `config.toml` if there is one, then applies `RINGSEEK_*` overrides such
/// as `RINGSEEK_SEEK__MAX=200`.
pub fn load_config() -> Result<Config, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(config_path()?).required(false))
        .add_source(
            config::Environment::with_prefix("RINGSEEK")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_or_default() -> Config {
    load_config().unwrap_or_else(|e| {
        log::warn!("Starting with the built-in configuration: {}", e);
        Config::default()
    })
}

/// Seeds the documented defaults on first run. An existing file is left alone.
pub fn write_default_config() -> Result<PathBuf, ConfigError> {
    let path = config_path()?;
    if path.exists() {
        return Ok(path);
    }
    if let Some(dir) = path.parent() {
        fs_err::create_dir_all(dir)?;
    }
    fs_err::write(&path, DEFAULT_CONFIG)?;
    log::info!("Wrote default configuration to {}", path.display());
    Ok(path)
}

fn touches_config(event: &notify::Event, path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == path)
}

fn watch_dir(
    dir: &Path,
    bridge: Sender<notify::Result<notify::Event>>,
) -> Result<RecommendedWatcher, ConfigError> {
    fs_err::create_dir_all(dir)?;
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

/// Sends [`AppEvent::ConfigReload`] whenever `config.toml` changes. Editors
/// tend to write a file in several steps, so bursts collapse into one reload.
pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let path = match config_path() {
        Ok(path) => path,
        Err(e) => {
            log::error!("Not watching configuration: {}", e);
            return;
        }
    };
    let Some(dir) = path.parent() else {
        return;
    };

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    // dropping the watcher stops the notifications
    let _watcher = match watch_dir(dir, bridge_tx) {
        Ok(watcher) => watcher,
        Err(e) => {
            log::error!("Not watching {}: {}", dir.display(), e);
            return;
        }
    };
    log::debug!("Watching {}", path.display());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) if touches_config(&event, &path) => {
                tokio::time::sleep(RELOAD_SETTLE).await;
                while bridge_rx.try_recv().is_ok() {}

                log::info!("{} changed, reloading", path.display());
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::error!("Error watching {}: {}", path.display(), e),
        }
    }
}
