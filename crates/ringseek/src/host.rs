use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::seek::SeekBar;
use ringctl::proto::Setting;

/// Owns the control and applies events to it in the order they arrive.
pub struct Host {
    seek_bar: SeekBar,
}

impl Host {
    pub fn new(seek_bar: SeekBar) -> Self {
        Self { seek_bar }
    }

    pub fn seek_bar(&self) -> &SeekBar {
        &self.seek_bar
    }

    pub fn apply_config(&mut self, config: &Config) {
        self.seek_bar.apply_config(&config.seek);
        if let Some(geometry) = config.geometry {
            self.seek_bar
                .configure_geometry(geometry.width, geometry.height);
        }
    }

    pub fn update(&mut self, event: AppEvent) {
        match event {
            AppEvent::Pointer(pointer) => {
                if let Some(outcome) = self.seek_bar.on_pointer_event(pointer)
                    && outcome.should_redraw
                {
                    log::trace!("Redraw: {:?}", self.seek_bar.frame());
                }
            }
            AppEvent::Resize { width, height } => {
                self.seek_bar.configure_geometry(width, height);
            }
            AppEvent::Set(setting, value) => match setting {
                Setting::Progress => self.seek_bar.set_progress(value),
                Setting::Min => self.seek_bar.set_min_value(value),
                Setting::Max => self.seek_bar.set_max_value(value),
                Setting::Speed => self.seek_bar.set_speed_multiplier(value),
                Setting::Ring => self.seek_bar.set_ring_width_factor(value),
            },
            AppEvent::Enable(enabled) => self.seek_bar.set_enabled(enabled),
            AppEvent::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.apply_config(&new_config);
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}
