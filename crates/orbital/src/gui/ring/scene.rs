//! Renderer-facing layout. A [`Scene`] is a pure function of the deck, the camera and the
//! theme; whatever draws it keeps no state of its own.

use super::geometry::{Point, RingPosition};
use super::viewport::{ViewportState, ViewportTuning};
use super::{
    ACTIVE_CARD_CORNER, ACTIVE_CARD_HEIGHT, ACTIVE_CARD_WIDTH, CARD_DIAMETER, LABEL_MAX_SCALE,
    OVERVIEW_HINT_MAX_SCALE,
};
use crate::deck::{Deck, ImageRef, SlideId, SlideKind};
use crate::gui::theme::{self, ThemeColors};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    CubicBezier { points: [f64; 4] },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transition {
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Transition {
    pub const INSTANT: Self = Self {
        duration_ms: 0,
        easing: Easing::Linear,
    };

    /// Camera transition: instant under manual control, eased otherwise.
    pub fn camera(manual: bool) -> Self {
        if manual {
            Self::INSTANT
        } else {
            Self {
                duration_ms: 1000,
                easing: Easing::CubicBezier {
                    points: [0.2, 1.0, 0.3, 1.0],
                },
            }
        }
    }

    pub fn card(manual: bool) -> Self {
        if manual {
            Self::INSTANT
        } else {
            Self {
                duration_ms: 800,
                easing: Easing::CubicBezier {
                    points: [0.2, 0.8, 0.2, 1.0],
                },
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CardShape {
    Circle { diameter: f64 },
    RoundedRect { width: f64, height: f64, corner: f64 },
}

impl CardShape {
    fn for_card(active: bool) -> Self {
        if active {
            Self::RoundedRect {
                width: ACTIVE_CARD_WIDTH,
                height: ACTIVE_CARD_HEIGHT,
                corner: ACTIVE_CARD_CORNER,
            }
        } else {
            Self::Circle {
                diameter: CARD_DIAMETER,
            }
        }
    }

    /// `offset` is relative to the card center, in ring space.
    pub fn contains(&self, offset: Point) -> bool {
        match *self {
            Self::Circle { diameter } => offset.length() <= diameter / 2.0,
            Self::RoundedRect { width, height, .. } => {
                offset.x.abs() <= width / 2.0 && offset.y.abs() <= height / 2.0
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub id: SlideId,
    pub index: usize,
    pub title: String,
    pub kind: SlideKind,
    pub image: Option<ImageRef>,
    pub position: RingPosition,
    pub active: bool,
    pub shape: CardShape,
    pub border: [f64; 4],
    /// Hover label under an idle card; hidden once zoomed in close.
    pub show_label: bool,
    /// Body text, only laid out on the expanded card.
    pub body: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum HitTarget {
    Background,
    Card(SlideId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
    pub translate: Point,
    pub transition: Transition,
    pub card_transition: Transition,
    pub ring_radius: f64,
    pub ring_color: [f64; 4],
    pub cards: Vec<Card>,
    pub active: Option<SlideId>,
    pub overview_hint: bool,
    pub capacity_advisory: bool,
    pub processing: bool,
}

impl Scene {
    pub fn layout(
        deck: &Deck,
        state: &ViewportState,
        tuning: &ViewportTuning,
        colors: &ThemeColors,
        view_size: Point,
    ) -> Self {
        let total = deck.len();
        let cards = deck
            .iter()
            .enumerate()
            .filter_map(|(index, slide)| {
                let position = RingPosition::of(index, total, tuning.ring_radius)?;
                let active = state.active == Some(slide.id);
                Some(Card {
                    id: slide.id,
                    index,
                    title: slide.title.clone(),
                    kind: slide.kind,
                    image: slide.image.clone(),
                    position,
                    active,
                    shape: CardShape::for_card(active),
                    border: theme::rgba(if active {
                        colors.active_border
                    } else {
                        colors.idle_border
                    }),
                    show_label: !active && state.scale < LABEL_MAX_SCALE,
                    body: active.then(|| slide.content.clone()),
                })
            })
            .collect::<Vec<_>>();

        // a dangling selection is rendered as no selection
        let active = state.active.filter(|id| deck.contains(*id));

        Self {
            width: view_size.x,
            height: view_size.y,
            scale: state.scale,
            translate: state.translate,
            transition: Transition::camera(state.manual),
            card_transition: Transition::card(state.manual),
            ring_radius: tuning.ring_radius,
            ring_color: theme::rgba(colors.ring),
            cards,
            active,
            overview_hint: active.is_none() && state.scale < OVERVIEW_HINT_MAX_SCALE,
            capacity_advisory: deck.is_crowded(tuning.soft_capacity),
            processing: false,
        }
    }

    pub fn hit_test(&self, screen: Point) -> HitTarget {
        hit_test(
            self.cards.iter().map(|c| (c.id, c.position, c.shape)),
            self.cards.len(),
            self.scale,
            self.translate,
            Point::new(self.width, self.height),
            screen,
        )
    }
}

/// Finds the card under `screen` without building a full scene. The expanded card is
/// on top; idle cards are found by their angle on the ring.
pub fn hit_test_deck(
    deck: &Deck,
    state: &ViewportState,
    tuning: &ViewportTuning,
    view_size: Point,
    screen: Point,
) -> HitTarget {
    let total = deck.len();
    let cards = deck.iter().enumerate().filter_map(|(index, slide)| {
        let position = RingPosition::of(index, total, tuning.ring_radius)?;
        Some((
            slide.id,
            position,
            CardShape::for_card(state.active == Some(slide.id)),
        ))
    });
    hit_test(cards, total, state.scale, state.translate, view_size, screen)
}

fn hit_test(
    cards: impl Iterator<Item = (SlideId, RingPosition, CardShape)>,
    total: usize,
    scale: f64,
    translate: Point,
    view_size: Point,
    screen: Point,
) -> HitTarget {
    if scale <= 0.0 {
        return HitTarget::Background;
    }
    // inverse of screen = center + translate + scale * ring
    let center = view_size * 0.5;
    let ring = (screen - center - translate) * (1.0 / scale);
    let nearest = RingPosition::nearest_index(ring, total);

    let mut hit = HitTarget::Background;
    for (index, (id, position, shape)) in cards.enumerate() {
        let expanded = matches!(shape, CardShape::RoundedRect { .. });
        if !expanded && Some(index) != nearest {
            continue;
        }
        if shape.contains(ring - position.point()) {
            if expanded {
                return HitTarget::Card(id);
            }
            hit = HitTarget::Card(id);
        }
    }
    hit
}
