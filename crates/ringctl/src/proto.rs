//! Line protocol spoken between `ringseek` and its clients.
//!
//! Every message is a single line of whitespace separated tokens. Clients send
//! [`Command`]s; connections that asked to `watch` receive [`Notification`]s back.

use crate::geom::Point;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

pub const DEFAULT_SOCKET_PATH: &str = "/tmp/ringseek.sock";

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct SocketPath(String);

crate::impl_string_newtype!(SocketPath);

impl Default for SocketPath {
    fn default() -> Self {
        Self::new(DEFAULT_SOCKET_PATH)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Point,
    pub timestamp: i64,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, x: f64, y: f64, timestamp: i64) -> Self {
        Self {
            phase,
            position: Point::new(x, y),
            timestamp,
        }
    }
}

/// Single-valued settings that can be changed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Setting {
    Progress,
    Min,
    Max,
    Speed,
    Ring,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Pointer(PointerEvent),
    Resize { width: f64, height: f64 },
    Set(Setting, f64),
    Enable(bool),
    Watch,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    ProgressChanged { progress: f64, from_user: bool },
    StartTracking,
    StopTracking,
    CenterClicked { progress: f64 },
}

#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    #[error("Empty message")]
    Empty,
    #[error("Unknown verb '{0}'")]
    UnknownVerb(String),
    #[error("'{verb}' expects {expected} argument(s), got {got}")]
    Arity {
        verb: String,
        expected: usize,
        got: usize,
    },
    #[error("Invalid argument '{0}'")]
    InvalidArgument(String),
}

fn expect_args<'a>(
    verb: &str,
    args: &[&'a str],
    expected: usize,
) -> Result<Vec<&'a str>, ProtocolError> {
    if args.len() != expected {
        return Err(ProtocolError::Arity {
            verb: verb.to_string(),
            expected,
            got: args.len(),
        });
    }
    Ok(args.to_vec())
}

fn parse_arg<T: FromStr>(s: &str) -> Result<T, ProtocolError> {
    s.parse()
        .map_err(|_| ProtocolError::InvalidArgument(s.to_string()))
}

/// Like [`parse_arg`], but `NaN` and infinities are rejected.
fn parse_number(s: &str) -> Result<f64, ProtocolError> {
    let value: f64 = parse_arg(s)?;
    if !value.is_finite() {
        return Err(ProtocolError::InvalidArgument(s.to_string()));
    }
    Ok(value)
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let verb = tokens.next().ok_or(ProtocolError::Empty)?;
        let args: Vec<&str> = tokens.collect();

        if let Ok(phase) = verb.parse::<PointerPhase>() {
            let a = expect_args(verb, &args, 3)?;
            return Ok(Command::Pointer(PointerEvent::new(
                phase,
                parse_number(a[0])?,
                parse_number(a[1])?,
                parse_arg(a[2])?,
            )));
        }

        if let Ok(setting) = verb.parse::<Setting>() {
            let a = expect_args(verb, &args, 1)?;
            return Ok(Command::Set(setting, parse_number(a[0])?));
        }

        match verb.to_ascii_lowercase().as_str() {
            "resize" => {
                let a = expect_args(verb, &args, 2)?;
                Ok(Command::Resize {
                    width: parse_number(a[0])?,
                    height: parse_number(a[1])?,
                })
            }
            "enable" => expect_args(verb, &args, 0).map(|_| Command::Enable(true)),
            "disable" => expect_args(verb, &args, 0).map(|_| Command::Enable(false)),
            "watch" => expect_args(verb, &args, 0).map(|_| Command::Watch),
            _ => Err(ProtocolError::UnknownVerb(verb.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Pointer(e) => write!(
                f,
                "{} {} {} {}",
                e.phase, e.position.x, e.position.y, e.timestamp
            ),
            Command::Resize { width, height } => write!(f, "resize {} {}", width, height),
            Command::Set(setting, value) => write!(f, "{} {}", setting, value),
            Command::Enable(true) => write!(f, "enable"),
            Command::Enable(false) => write!(f, "disable"),
            Command::Watch => write!(f, "watch"),
        }
    }
}

impl FromStr for Notification {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let verb = tokens.next().ok_or(ProtocolError::Empty)?;
        let args: Vec<&str> = tokens.collect();

        match verb {
            "progress" => {
                let a = expect_args(verb, &args, 2)?;
                let from_user = match a[1] {
                    "user" => true,
                    "host" => false,
                    other => return Err(ProtocolError::InvalidArgument(other.to_string())),
                };
                Ok(Notification::ProgressChanged {
                    progress: parse_arg(a[0])?,
                    from_user,
                })
            }
            "start" => expect_args(verb, &args, 0).map(|_| Notification::StartTracking),
            "stop" => expect_args(verb, &args, 0).map(|_| Notification::StopTracking),
            "center" => {
                let a = expect_args(verb, &args, 1)?;
                Ok(Notification::CenterClicked {
                    progress: parse_arg(a[0])?,
                })
            }
            _ => Err(ProtocolError::UnknownVerb(verb.to_string())),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::ProgressChanged {
                progress,
                from_user,
            } => write!(
                f,
                "progress {} {}",
                progress,
                if *from_user { "user" } else { "host" }
            ),
            Notification::StartTracking => write!(f, "start"),
            Notification::StopTracking => write!(f, "stop"),
            Notification::CenterClicked { progress } => write!(f, "center {}", progress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        let cases = vec![
            (
                "down 110 100 0",
                Command::Pointer(PointerEvent::new(PointerPhase::Down, 110.0, 100.0, 0)),
            ),
            (
                "MOVE -4.5 90 16",
                Command::Pointer(PointerEvent::new(PointerPhase::Move, -4.5, 90.0, 16)),
            ),
            (
                "  cancel 1 2 3  ",
                Command::Pointer(PointerEvent::new(PointerPhase::Cancel, 1.0, 2.0, 3)),
            ),
            (
                "resize 200 120",
                Command::Resize {
                    width: 200.0,
                    height: 120.0,
                },
            ),
            ("min 60", Command::Set(Setting::Min, 60.0)),
            ("Speed 2.5", Command::Set(Setting::Speed, 2.5)),
            ("disable", Command::Enable(false)),
            ("watch", Command::Watch),
        ];

        for (line, expected) in cases {
            assert_eq!(line.parse::<Command>().unwrap(), expected, "{line}");
        }
    }

    #[test]
    fn test_command_errors() {
        assert_eq!("".parse::<Command>(), Err(ProtocolError::Empty));
        assert_eq!(
            "spin 1".parse::<Command>(),
            Err(ProtocolError::UnknownVerb("spin".to_string()))
        );
        assert_eq!(
            "up 1 2".parse::<Command>(),
            Err(ProtocolError::Arity {
                verb: "up".to_string(),
                expected: 3,
                got: 2,
            })
        );
        // timestamps are integral
        assert_eq!(
            "move 1 2 3.5".parse::<Command>(),
            Err(ProtocolError::InvalidArgument("3.5".to_string()))
        );
        assert!("watch now".parse::<Command>().is_err());

        let cases = vec![
            ("move NaN 1 2", "NaN"),
            ("down 1 inf 2", "inf"),
            ("resize -inf 100", "-inf"),
            ("progress nan", "nan"),
        ];
        for (line, bad) in cases {
            assert_eq!(
                line.parse::<Command>(),
                Err(ProtocolError::InvalidArgument(bad.to_string())),
                "{line}"
            );
        }
    }

    #[test]
    fn test_command_display_parses_back() {
        let command = Command::Pointer(PointerEvent::new(PointerPhase::Up, 12.25, -3.0, 40));
        assert_eq!(command.to_string(), "up 12.25 -3 40");
        assert_eq!(command.to_string().parse::<Command>().unwrap(), command);
    }

    #[test]
    fn test_notification_lines() {
        let progress = Notification::ProgressChanged {
            progress: 42.5,
            from_user: true,
        };
        assert_eq!(progress.to_string(), "progress 42.5 user");
        assert_eq!(
            "progress 10 host".parse::<Notification>().unwrap(),
            Notification::ProgressChanged {
                progress: 10.0,
                from_user: false,
            }
        );
        assert_eq!(
            "center 7".parse::<Notification>().unwrap(),
            Notification::CenterClicked { progress: 7.0 }
        );
        assert_eq!(
            "start".parse::<Notification>().unwrap(),
            Notification::StartTracking
        );
        assert!("progress 1 maybe".parse::<Notification>().is_err());
    }

    #[test]
    fn test_socket_path_is_transparent() {
        let path: SocketPath = serde_json::from_str("\"/run/ring.sock\"").unwrap();
        assert_eq!(path, SocketPath::new("/run/ring.sock"));
        assert_eq!(SocketPath::default().as_str(), DEFAULT_SOCKET_PATH);
    }
}
