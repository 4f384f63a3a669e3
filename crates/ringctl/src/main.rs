use clap::{Parser, Subcommand};
use ringctl::proto::{
    Command, DEFAULT_SOCKET_PATH, Notification, PointerEvent, PointerPhase, Setting,
};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "ringctl", version, about, long_about = None)]
struct Cli {
    /// Path of the ringseek daemon socket
    #[arg(short = 's', long, default_value = DEFAULT_SOCKET_PATH)]
    socket: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Send a single pointer sample (down, move, up or cancel)
    Pointer {
        phase: PointerPhase,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(default_value_t = 0)]
        timestamp: i64,
    },
    /// Report a new view size
    Resize { width: f64, height: f64 },
    /// Change a setting (progress, min, max, speed, ring)
    Set {
        setting: Setting,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Accept pointer input
    Enable,
    /// Ignore pointer input
    Disable,
    /// Stream change notifications until the daemon goes away
    Watch,
    /// Send every command line of a recorded gesture file
    Replay { file: PathBuf },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Pointer {
            phase,
            x,
            y,
            timestamp,
        } => send_commands(
            &cli.socket,
            &[Command::Pointer(PointerEvent::new(phase, x, y, timestamp))],
        ),
        Commands::Resize { width, height } => {
            send_commands(&cli.socket, &[Command::Resize { width, height }])
        }
        Commands::Set { setting, value } => {
            send_commands(&cli.socket, &[Command::Set(setting, value)])
        }
        Commands::Enable => send_commands(&cli.socket, &[Command::Enable(true)]),
        Commands::Disable => send_commands(&cli.socket, &[Command::Enable(false)]),
        Commands::Watch => watch(&cli.socket),
        Commands::Replay { file } => replay(&cli.socket, &file),
    }
}

fn connect(socket: &str) -> anyhow::Result<UnixStream> {
    UnixStream::connect(socket).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to ringseek daemon at {}: {}. Is ringseek running?",
            socket,
            e
        )
    })
}

fn send_commands(socket: &str, commands: &[Command]) -> anyhow::Result<()> {
    let mut stream = connect(socket)?;
    for command in commands {
        writeln!(stream, "{}", command)?;
    }
    Ok(())
}

fn replay(socket: &str, file: &Path) -> anyhow::Result<()> {
    let script = fs_err::read_to_string(file)?;
    let commands = parse_script(&script, file)?;

    log::info!("Replaying {} command(s)", commands.len());
    send_commands(socket, &commands)
}

/// Commands of a gesture script, one per line. Blank lines and `#` comments are
/// skipped, and so is `watch`, which would leave the replay waiting forever.
fn parse_script(script: &str, file: &Path) -> anyhow::Result<Vec<Command>> {
    let mut commands = Vec::new();

    for (number, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.parse::<Command>() {
            Ok(Command::Watch) => log::warn!("Skipping 'watch' on line {}", number + 1),
            Ok(command) => commands.push(command),
            Err(e) => anyhow::bail!("{}:{}: {}", file.display(), number + 1, e),
        }
    }
    Ok(commands)
}

fn watch(socket: &str) -> anyhow::Result<()> {
    let mut stream = connect(socket)?;
    writeln!(stream, "{}", Command::Watch)?;

    for line in BufReader::new(stream).lines() {
        let line = line?;
        match line.parse::<Notification>() {
            Ok(Notification::ProgressChanged {
                progress,
                from_user,
            }) => println!(
                "progress {} ({})",
                progress,
                if from_user { "user" } else { "host" }
            ),
            Ok(Notification::StartTracking) => println!("tracking started"),
            Ok(Notification::StopTracking) => println!("tracking stopped"),
            Ok(Notification::CenterClicked { progress }) => {
                println!("center clicked at {}", progress)
            }
            Err(e) => log::warn!("Unrecognised notification '{}': {}", line, e),
        }
    }
    Ok(())
}
