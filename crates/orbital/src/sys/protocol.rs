//! Line protocol spoken over the control socket. One command per line; `scene`,
//! `list` and `hit` get a single JSON line back.

use crate::deck::{SlideDraft, SlideId};
use crate::events::{AppEvent, Query};
use crate::gui::input::{InputEvent, Key, PointerButton};
use crate::gui::ring::{Direction, Point};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    Navigate(Direction),
    Overview,
    Select(SlideId),
    Key(Key),
    Pan(Point),
    Zoom { delta_y: f64, at: Option<Point> },
    Click(Point),
    DoubleClick(Point),
    ContextMenu,
    Drag { from: Point, to: Point },
    Resize(Point),
    Add(SlideDraft),
    Delete(SlideId),
    Query(Query),
}

#[derive(Error, Debug)]
pub enum CommandParseError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}'")]
    Unknown(String),
    #[error("Missing argument for '{0}'")]
    MissingArgument(String),
    #[error("Invalid number '{0}'")]
    Number(String),
    #[error("Invalid key: {0}")]
    Key(#[from] strum::ParseError),
    #[error("Invalid slide draft: {0}")]
    Draft(#[from] serde_json::Error),
}

struct Args<'a> {
    command: &'a str,
    words: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn word(&mut self) -> Result<&'a str, CommandParseError> {
        self.words
            .next()
            .ok_or_else(|| CommandParseError::MissingArgument(self.command.to_string()))
    }

    fn number(&mut self) -> Result<f64, CommandParseError> {
        let word = self.word()?;
        word.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| CommandParseError::Number(word.to_string()))
    }

    fn point(&mut self) -> Result<Point, CommandParseError> {
        Ok(Point::new(self.number()?, self.number()?))
    }

    fn id(&mut self) -> Result<SlideId, CommandParseError> {
        let word = self.word()?;
        word.parse::<u64>()
            .map(SlideId::from)
            .map_err(|_| CommandParseError::Number(word.to_string()))
    }
}

impl FromStr for ControlCommand {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let mut args = Args {
            command,
            words: rest.split_whitespace(),
        };

        Ok(match command {
            "" => return Err(CommandParseError::Empty),
            "next" => Self::Navigate(Direction::Next),
            "prev" | "previous" => Self::Navigate(Direction::Previous),
            "overview" => Self::Overview,
            "select" => Self::Select(args.id()?),
            "key" => Self::Key(args.word()?.parse()?),
            "pan" => Self::Pan(args.point()?),
            "zoom" => {
                let delta_y = args.number()?;
                let at = match args.words.clone().next() {
                    Some(_) => Some(args.point()?),
                    None => None,
                };
                Self::Zoom { delta_y, at }
            }
            "click" => Self::Click(args.point()?),
            "dblclick" => Self::DoubleClick(args.point()?),
            "menu" => Self::ContextMenu,
            "drag" => Self::Drag {
                from: args.point()?,
                to: args.point()?,
            },
            "resize" => Self::Resize(args.point()?),
            "add" => Self::Add(serde_json::from_str(rest.trim())?),
            "delete" => Self::Delete(args.id()?),
            "scene" => Self::Query(Query::Scene),
            "list" => Self::Query(Query::Slides),
            "hit" => Self::Query(Query::Hit(args.point()?)),
            other => return Err(CommandParseError::Unknown(other.to_string())),
        })
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Navigate(direction) => write!(f, "{}", direction),
            Self::Overview => write!(f, "overview"),
            Self::Select(id) => write!(f, "select {}", id),
            Self::Key(key) => write!(f, "key {}", key),
            Self::Pan(d) => write!(f, "pan {} {}", d.x, d.y),
            Self::Zoom { delta_y, at: None } => write!(f, "zoom {}", delta_y),
            Self::Zoom {
                delta_y,
                at: Some(p),
            } => write!(f, "zoom {} {} {}", delta_y, p.x, p.y),
            Self::Click(p) => write!(f, "click {} {}", p.x, p.y),
            Self::DoubleClick(p) => write!(f, "dblclick {} {}", p.x, p.y),
            Self::ContextMenu => write!(f, "menu"),
            Self::Drag { from, to } => {
                write!(f, "drag {} {} {} {}", from.x, from.y, to.x, to.y)
            }
            Self::Resize(size) => write!(f, "resize {} {}", size.x, size.y),
            Self::Add(draft) => {
                let json = serde_json::to_string(draft).map_err(|_| fmt::Error)?;
                write!(f, "add {}", json)
            }
            Self::Delete(id) => write!(f, "delete {}", id),
            Self::Query(Query::Scene) => write!(f, "scene"),
            Self::Query(Query::Slides) => write!(f, "list"),
            Self::Query(Query::Hit(p)) => write!(f, "hit {} {}", p.x, p.y),
        }
    }
}

impl ControlCommand {
    pub fn query(&self) -> Option<Query> {
        match self {
            Self::Query(q) => Some(*q),
            _ => None,
        }
    }

    /// Events this command stands for. Pointer gestures expand into the device events a
    /// real pointer would produce. Queries need a reply channel and map to nothing here.
    pub fn into_events(self) -> Vec<AppEvent> {
        let press = |position| {
            AppEvent::Input(InputEvent::PointerDown {
                position,
                button: PointerButton::Primary,
            })
        };
        let release = |position| AppEvent::Input(InputEvent::PointerUp { position });

        match self {
            Self::Navigate(direction) => vec![AppEvent::Navigate(direction)],
            Self::Overview => vec![AppEvent::Select(None)],
            Self::Select(id) => vec![AppEvent::Select(Some(id))],
            Self::Key(key) => vec![AppEvent::Input(InputEvent::Key(key))],
            Self::Pan(delta) => vec![AppEvent::Input(InputEvent::Wheel {
                delta,
                modifier: false,
                position: None,
            })],
            Self::Zoom { delta_y, at } => vec![AppEvent::Input(InputEvent::Wheel {
                delta: Point::new(0.0, delta_y),
                modifier: true,
                position: at,
            })],
            Self::Click(p) => vec![press(p), release(p)],
            Self::DoubleClick(position) => {
                vec![AppEvent::Input(InputEvent::DoubleClick { position })]
            }
            Self::ContextMenu => vec![AppEvent::Input(InputEvent::ContextMenu)],
            Self::Drag { from, to } => vec![
                press(from),
                AppEvent::Input(InputEvent::PointerMove { position: to }),
                release(to),
            ],
            Self::Resize(size) => vec![AppEvent::Resize(size)],
            Self::Add(draft) => vec![AppEvent::Submit(draft)],
            Self::Delete(id) => vec![AppEvent::Delete(id)],
            Self::Query(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::ImageRef;

    #[test]
    fn test_parse_commands() {
        let cases = vec![
            ("next", ControlCommand::Navigate(Direction::Next)),
            ("  prev ", ControlCommand::Navigate(Direction::Previous)),
            ("select 7", ControlCommand::Select(SlideId::from(7))),
            ("key esc", ControlCommand::Key(Key::Escape)),
            ("pan 10 -4.5", ControlCommand::Pan(Point::new(10.0, -4.5))),
            (
                "zoom -120",
                ControlCommand::Zoom {
                    delta_y: -120.0,
                    at: None,
                },
            ),
            (
                "zoom 30 100 200",
                ControlCommand::Zoom {
                    delta_y: 30.0,
                    at: Some(Point::new(100.0, 200.0)),
                },
            ),
            (
                "drag 0 0 50 60",
                ControlCommand::Drag {
                    from: Point::ZERO,
                    to: Point::new(50.0, 60.0),
                },
            ),
            ("scene", ControlCommand::Query(Query::Scene)),
            ("list", ControlCommand::Query(Query::Slides)),
            (
                "hit 12 -3",
                ControlCommand::Query(Query::Hit(Point::new(12.0, -3.0))),
            ),
        ];

        for (line, expected) in cases {
            assert_eq!(line.parse::<ControlCommand>().unwrap(), expected);
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "".parse::<ControlCommand>(),
            Err(CommandParseError::Empty)
        ));
        assert!(matches!(
            "spin".parse::<ControlCommand>(),
            Err(CommandParseError::Unknown(_))
        ));
        assert!(matches!(
            "select".parse::<ControlCommand>(),
            Err(CommandParseError::MissingArgument(_))
        ));
        assert!(matches!(
            "pan 1 NaN".parse::<ControlCommand>(),
            Err(CommandParseError::Number(_))
        ));
        assert!(matches!(
            "key F13".parse::<ControlCommand>(),
            Err(CommandParseError::Key(_))
        ));
        assert!(matches!(
            "add {oops".parse::<ControlCommand>(),
            Err(CommandParseError::Draft(_))
        ));
    }

    #[test]
    fn test_add_carries_draft() {
        let draft = SlideDraft::new("Some body text with spaces")
            .with_image(ImageRef::new("https://example.org/a.png"));
        let line = ControlCommand::Add(draft.clone()).to_string();
        assert_eq!(
            line.parse::<ControlCommand>().unwrap(),
            ControlCommand::Add(draft)
        );
    }

    #[test]
    fn test_click_expands_to_press_and_release() {
        let events = ControlCommand::Click(Point::new(3.0, 4.0)).into_events();
        assert!(matches!(
            events.as_slice(),
            [
                AppEvent::Input(InputEvent::PointerDown { .. }),
                AppEvent::Input(InputEvent::PointerUp { .. })
            ]
        ));
        assert!(ControlCommand::Query(Query::Scene).into_events().is_empty());
    }
}
