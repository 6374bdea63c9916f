//! Turns raw pointer, wheel and keyboard events into viewport transitions.
//!
//! The controller owns the one [`ViewportState`] of a running view together with the
//! gesture bookkeeping around it: the drag in progress and two deadlines, the wheel
//! "settle" debounce and the post-drag release that re-enables easing. Deadlines are
//! polled through [`InputController::tick`]; the event loop sleeps until
//! [`InputController::next_deadline`].

pub mod drag;
pub mod keys;
pub mod timer;

pub use drag::DragState;
pub use keys::{Key, KeyAction, KeyBindings};
pub use timer::Debounce;

use crate::deck::{Deck, Slide, SlideId};
use crate::gui::ring::scene::hit_test_deck;
use crate::gui::ring::{Direction, HitTarget, Point, RingPosition, ViewportState, ViewportTuning};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { position: Point, button: PointerButton },
    PointerMove { position: Point },
    PointerUp { position: Point },
    PointerLeave { position: Point },
    DoubleClick { position: Point },
    ContextMenu,
    /// `position` is the pointer on screen, `None` for the viewport center.
    Wheel {
        delta: Point,
        modifier: bool,
        position: Option<Point>,
    },
    Key(Key),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputResponse {
    pub changed: bool,
    /// The host should suppress its default handling (page scroll, context menu).
    pub prevent_default: bool,
}

impl InputResponse {
    pub fn new(changed: bool, prevent_default: bool) -> Self {
        Self {
            changed,
            prevent_default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputController {
    state: ViewportState,
    tuning: ViewportTuning,
    keys: KeyBindings,
    view_size: Point,
    drag: DragState,
    settle: Debounce,
    release: Debounce,
}

impl InputController {
    pub fn new(tuning: ViewportTuning, keys: KeyBindings, view_size: Point) -> Self {
        let tuning = tuning.sanitized();
        Self {
            state: ViewportState::overview(&tuning),
            settle: Debounce::new(Duration::from_millis(tuning.settle_delay_ms)),
            release: Debounce::new(Duration::from_millis(tuning.release_delay_ms)),
            tuning,
            keys,
            view_size,
            drag: DragState::default(),
        }
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn tuning(&self) -> &ViewportTuning {
        &self.tuning
    }

    pub fn view_size(&self) -> Point {
        self.view_size
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn resize(&mut self, view_size: Point) {
        self.view_size = view_size;
    }

    pub fn reconfigure(&mut self, tuning: ViewportTuning, keys: KeyBindings) {
        let tuning = tuning.sanitized();
        self.settle
            .set_delay(Duration::from_millis(tuning.settle_delay_ms));
        self.release
            .set_delay(Duration::from_millis(tuning.release_delay_ms));
        self.tuning = tuning;
        self.keys = keys;
        self.apply(self.state.clamped(&self.tuning));
    }

    /// The selected slide, looked up afresh in `deck`.
    pub fn active_slide<'a>(&self, deck: &'a Deck) -> Option<&'a Slide> {
        self.state.active.and_then(|id| deck.get(id))
    }

    pub fn active_index(&self, deck: &Deck) -> Option<usize> {
        self.state.active.and_then(|id| deck.index_of(id))
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        [self.settle.deadline(), self.release.deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    fn apply(&mut self, next: ViewportState) -> bool {
        if next == self.state {
            return false;
        }
        log::trace!("Viewport {:?} -> {:?}", self.state, next);
        self.state = next;
        true
    }

    fn view_center(&self) -> Point {
        self.view_size * 0.5
    }

    pub fn hit_test(&self, deck: &Deck, screen: Point) -> HitTarget {
        hit_test_deck(deck, &self.state, &self.tuning, self.view_size, screen)
    }

    /// Focuses `id`, or returns to the overview pose for `None`. Unknown ids are ignored.
    pub fn select_slide(&mut self, deck: &Deck, id: Option<SlideId>) -> bool {
        let Some(id) = id else {
            return self.apply(ViewportState::overview(&self.tuning));
        };
        let position = deck
            .index_of(id)
            .and_then(|index| RingPosition::of(index, deck.len(), self.tuning.ring_radius));
        match position {
            Some(position) => self.apply(self.state.focused(id, position, &self.tuning)),
            None => {
                log::debug!("Ignoring selection of unknown slide {}", id);
                false
            }
        }
    }

    pub fn navigate(&mut self, deck: &Deck, direction: Direction) -> bool {
        direction
            .target_index(self.active_index(deck), deck.len())
            .and_then(|index| deck.id_at(index))
            .is_some_and(|id| self.select_slide(deck, Some(id)))
    }

    /// Re-validates the selection after the deck changed. A removed slide drops the
    /// camera back to the overview; a surviving one is re-focused since its ring slot
    /// may have moved.
    pub fn reconcile(&mut self, deck: &Deck) -> bool {
        match self.state.active {
            None => false,
            Some(id) if !deck.contains(id) => self.select_slide(deck, None),
            Some(_) if self.drag.is_dragging() => false,
            Some(id) => self.select_slide(deck, Some(id)),
        }
    }

    pub fn handle(&mut self, event: InputEvent, deck: &Deck, now: Instant) -> InputResponse {
        match event {
            InputEvent::PointerDown {
                position,
                button: PointerButton::Primary,
            } => self.begin_drag(position),
            InputEvent::PointerDown { .. } => InputResponse::default(),
            InputEvent::PointerMove { position } => self.drag_to(position),
            InputEvent::PointerUp { position } => {
                let target = self.hit_test(deck, position);
                self.end_drag(position, target, deck, now)
            }
            InputEvent::PointerLeave { .. } => self.abandon_drag(now),
            InputEvent::DoubleClick { position } => {
                let target = self.hit_test(deck, position);
                self.double_click(position, target, deck)
            }
            InputEvent::ContextMenu => InputResponse::new(self.select_slide(deck, None), true),
            InputEvent::Wheel {
                delta,
                modifier,
                position,
            } => {
                let position = position.unwrap_or_else(|| self.view_center());
                self.wheel(delta, modifier, position, now)
            }
            InputEvent::Key(key) => InputResponse::new(self.key(key, deck), false),
        }
    }

    pub fn begin_drag(&mut self, position: Point) -> InputResponse {
        self.drag.start(position);
        self.release.cancel();
        InputResponse::new(self.apply(self.state.with_manual(true)), false)
    }

    pub fn drag_to(&mut self, position: Point) -> InputResponse {
        let changed = self
            .drag
            .update(position)
            .is_some_and(|delta| self.apply(self.state.dragged_by(delta, &self.tuning)));
        InputResponse::new(changed, false)
    }

    /// Ends a drag. A release that barely moved is a click: on the background it
    /// deselects, on a card it selects that card.
    pub fn end_drag(
        &mut self,
        position: Point,
        target: HitTarget,
        deck: &Deck,
        now: Instant,
    ) -> InputResponse {
        let Some(offset) = self.drag.total_offset(position) else {
            return InputResponse::default();
        };
        self.drag.end();

        let mut changed = false;
        if offset.length() < self.tuning.click_threshold {
            changed = match target {
                HitTarget::Background => self.select_slide(deck, None),
                HitTarget::Card(id) => self.select_slide(deck, Some(id)),
            };
        }
        self.release.schedule(now);
        InputResponse::new(changed, false)
    }

    /// Pointer left the view: the drag ends without click semantics.
    pub fn abandon_drag(&mut self, now: Instant) -> InputResponse {
        if self.drag.is_dragging() {
            self.drag.end();
            self.release.schedule(now);
        }
        InputResponse::default()
    }

    pub fn double_click(&mut self, position: Point, target: HitTarget, deck: &Deck) -> InputResponse {
        let changed = match target {
            HitTarget::Card(id) => self.select_slide(deck, Some(id)),
            HitTarget::Background => {
                let offset = position - self.view_center();
                self.apply(self.state.double_click_zoomed(offset, &self.tuning))
            }
        };
        InputResponse::new(changed, false)
    }

    /// Modifier-held wheel zooms (and claims the event), plain wheel pans unless a drag
    /// is in progress. Either way the settle debounce restarts.
    pub fn wheel(
        &mut self,
        delta: Point,
        modifier: bool,
        position: Point,
        now: Instant,
    ) -> InputResponse {
        self.release.cancel();
        let response = if modifier {
            let cursor = position - self.view_center();
            let next = self.state.wheel_zoomed(delta.y, cursor, &self.tuning);
            InputResponse::new(self.apply(next), true)
        } else if !self.drag.is_dragging() {
            let next = self.state.wheel_panned(delta, &self.tuning);
            InputResponse::new(self.apply(next), false)
        } else {
            InputResponse::default()
        };
        self.settle.schedule(now);
        response
    }

    pub fn key(&mut self, key: Key, deck: &Deck) -> bool {
        match self.keys.action(key) {
            Some(KeyAction::Next) => self.navigate(deck, Direction::Next),
            Some(KeyAction::Previous) => self.navigate(deck, Direction::Previous),
            Some(KeyAction::Overview) => self.select_slide(deck, None),
            None => false,
        }
    }

    /// Runs the deadlines that have passed. Returns whether the viewport changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if self.release.take_due(now) {
            changed |= self.apply(self.state.with_manual(false));
        }
        if self.settle.take_due(now) {
            let settled = self.state.settled(self.drag.is_dragging(), &self.tuning);
            changed |= self.apply(settled);
        }
        changed
    }
}
