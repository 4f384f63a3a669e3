use ringctl::proto::{Command, PointerEvent, Setting};

#[derive(Debug, Clone)]
pub enum AppEvent {
    Pointer(PointerEvent),
    Resize { width: f64, height: f64 },
    Set(Setting, f64),
    Enable(bool),
    ConfigReload,
}

impl AppEvent {
    /// `watch` concerns the connection, not the control, so it has no event.
    pub fn from_command(command: Command) -> Option<Self> {
        match command {
            Command::Pointer(e) => Some(AppEvent::Pointer(e)),
            Command::Resize { width, height } => Some(AppEvent::Resize { width, height }),
            Command::Set(setting, value) => Some(AppEvent::Set(setting, value)),
            Command::Enable(enabled) => Some(AppEvent::Enable(enabled)),
            Command::Watch => None,
        }
    }
}
