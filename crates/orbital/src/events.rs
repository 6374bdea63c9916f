use crate::deck::{SlideDraft, SlideId};
use crate::gui::input::InputEvent;
use crate::gui::ring::{Direction, Point};
use async_channel::Sender;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Query {
    Scene,
    Slides,
    /// What lies under a view position.
    Hit(Point),
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    Input(InputEvent),
    Navigate(Direction),
    Select(Option<SlideId>),
    Resize(Point),
    Submit(SlideDraft),
    SlideReady { draft: SlideDraft, title: String },
    Delete(SlideId),
    Query(Query, Sender<String>),
    ConfigReload,
}
