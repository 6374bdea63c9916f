use std::f64::consts::PI;

pub mod geometry;
pub mod navigation;
pub mod scene;
pub mod viewport;

pub use geometry::{Point, RingPosition};
pub use navigation::Direction;
pub use scene::{Card, CardShape, Easing, HitTarget, Scene, Transition};
pub use viewport::{ViewportState, ViewportTuning};

pub const RING_RADIUS: f64 = 1200.0;
pub const START_OFFSET: f64 = -PI / 2.0; // index 0 sits at the top
pub const FOCUS_SCALE: f64 = 1.0;
pub const OVERVIEW_SCALE: f64 = 0.4;
pub const MIN_SCALE: f64 = 0.04;
pub const MAX_SCALE: f64 = 12.0;

// Card footprint in ring space
pub const CARD_DIAMETER: f64 = 140.0;
pub const ACTIVE_CARD_WIDTH: f64 = 780.0;
pub const ACTIVE_CARD_HEIGHT: f64 = 520.0;
pub const ACTIVE_CARD_CORNER: f64 = 32.0;

pub const LABEL_MAX_SCALE: f64 = 2.5; // hover labels hidden when zoomed in further
pub const OVERVIEW_HINT_MAX_SCALE: f64 = 0.6;
