use clap::{Parser, Subcommand};
use orbital::config::SOCKET_PATH;
use orbital::deck::{ImageRef, SlideDraft, SlideId};
use orbital::events::Query;
use orbital::gui::input::Key;
use orbital::gui::ring::{Direction, Point};
use orbital::sys::protocol::ControlCommand;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "orbitalctl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Control socket of the running orbital daemon
    #[arg(short, long, default_value = SOCKET_PATH)]
    socket: PathBuf,

    /// Pretty-print JSON replies
    #[arg(short, long)]
    pretty: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Focus the next slide on the ring.
    Next,
    /// Focus the previous slide on the ring.
    Prev,
    /// Zoom back out to the whole ring.
    Overview,
    /// Focus a slide by id.
    Select { id: u64 },
    /// Press a key, e.g. ArrowRight, Space or Escape.
    Key { key: Key },
    /// Wheel-pan by a pixel delta.
    Pan {
        #[arg(allow_negative_numbers = true)]
        dx: f64,
        #[arg(allow_negative_numbers = true)]
        dy: f64,
    },
    /// Modifier-wheel zoom; negative deltas zoom in.
    Zoom {
        #[arg(allow_negative_numbers = true)]
        delta: f64,
        /// Pointer position in view pixels
        #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
        at: Option<Vec<f64>>,
    },
    /// Click at a view position.
    Click { x: f64, y: f64 },
    /// Double-click at a view position.
    Dblclick { x: f64, y: f64 },
    /// Open the context menu, which returns to the overview.
    Menu,
    /// Drag the pointer from one view position to another.
    Drag {
        #[arg(allow_negative_numbers = true)]
        from_x: f64,
        #[arg(allow_negative_numbers = true)]
        from_y: f64,
        #[arg(allow_negative_numbers = true)]
        to_x: f64,
        #[arg(allow_negative_numbers = true)]
        to_y: f64,
    },
    /// Tell the daemon the view size changed.
    Resize { width: f64, height: f64 },
    /// Add a slide. Without --title the summarizer names it.
    Add {
        content: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        image: Option<String>,
    },
    /// Delete a slide by id.
    Delete { id: u64 },
    /// Print the current scene as JSON.
    Scene,
    /// Print the slides as JSON.
    List,
    /// Print what lies under a view position.
    Hit { x: f64, y: f64 },
}

impl From<Commands> for ControlCommand {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Next => Self::Navigate(Direction::Next),
            Commands::Prev => Self::Navigate(Direction::Previous),
            Commands::Overview => Self::Overview,
            Commands::Select { id } => Self::Select(SlideId::from(id)),
            Commands::Key { key } => Self::Key(key),
            Commands::Pan { dx, dy } => Self::Pan(Point::new(dx, dy)),
            Commands::Zoom { delta, at } => Self::Zoom {
                delta_y: delta,
                at: at.and_then(|xy| match xy.as_slice() {
                    [x, y] => Some(Point::new(*x, *y)),
                    _ => None,
                }),
            },
            Commands::Click { x, y } => Self::Click(Point::new(x, y)),
            Commands::Dblclick { x, y } => Self::DoubleClick(Point::new(x, y)),
            Commands::Menu => Self::ContextMenu,
            Commands::Drag {
                from_x,
                from_y,
                to_x,
                to_y,
            } => Self::Drag {
                from: Point::new(from_x, from_y),
                to: Point::new(to_x, to_y),
            },
            Commands::Resize { width, height } => Self::Resize(Point::new(width, height)),
            Commands::Add {
                content,
                title,
                image,
            } => {
                let mut draft = SlideDraft::new(content);
                if let Some(title) = title {
                    draft = draft.with_title(title);
                }
                if let Some(image) = image {
                    draft = draft.with_image(ImageRef::new(image));
                }
                Self::Add(draft)
            }
            Commands::Delete { id } => Self::Delete(SlideId::from(id)),
            Commands::Scene => Self::Query(Query::Scene),
            Commands::List => Self::Query(Query::Slides),
            Commands::Hit { x, y } => Self::Query(Query::Hit(Point::new(x, y))),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let command = ControlCommand::from(cli.command);
    match send_command(&cli.socket, &command)? {
        Some(reply) => print_reply(&reply, cli.pretty),
        None => Ok(()),
    }
}

/// Writes one command line. Queries wait for the single reply line.
fn send_command(socket: &PathBuf, command: &ControlCommand) -> anyhow::Result<Option<String>> {
    let mut stream = UnixStream::connect(socket).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to orbital daemon at {}: {}. Is orbital running?",
            socket.display(),
            e
        )
    })?;

    log::debug!("Sending '{}'", command);
    writeln!(stream, "{}", command)?;

    if command.query().is_none() {
        return Ok(None);
    }
    let mut reply = String::new();
    BufReader::new(stream).read_line(&mut reply)?;
    Ok(Some(reply.trim_end().to_string()))
}

fn print_reply(reply: &str, pretty: bool) -> anyhow::Result<()> {
    if let Some(message) = reply.strip_prefix("error: ") {
        anyhow::bail!("orbital rejected the command: {}", message);
    }
    if pretty {
        let value: serde_json::Value = serde_json::from_str(reply)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", reply);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ControlCommand {
        let cli = Cli::try_parse_from(std::iter::once("orbitalctl").chain(args.iter().copied()))
            .unwrap();
        ControlCommand::from(cli.command)
    }

    #[test]
    fn test_cli_matches_wire_protocol() {
        for (args, line) in [
            (&["next"][..], "next"),
            (&["prev"][..], "prev"),
            (&["pan", "-10", "25"][..], "pan -10 25"),
            (&["zoom", "-30", "--at", "5", "6"][..], "zoom -30 5 6"),
            (&["drag", "0", "0", "-40", "12.5"][..], "drag 0 0 -40 12.5"),
            (&["key", "Escape"][..], "key Escape"),
            (&["select", "3"][..], "select 3"),
            (&["list"][..], "list"),
            (&["hit", "640", "360"][..], "hit 640 360"),
        ] {
            assert_eq!(parse(args).to_string(), line);
        }
    }

    #[test]
    fn test_add_round_trips_through_protocol() {
        let command = parse(&["add", "Some body text", "--title", "Hello"]);
        let reparsed: ControlCommand = command.to_string().parse().unwrap();
        assert_eq!(reparsed, command);
    }

    #[test]
    fn test_socket_defaults_to_daemon_path() {
        let cli = Cli::try_parse_from(["orbitalctl", "scene"]).unwrap();
        assert_eq!(cli.socket, PathBuf::from(SOCKET_PATH));
        assert!(ControlCommand::from(cli.command).query().is_some());
    }
}
