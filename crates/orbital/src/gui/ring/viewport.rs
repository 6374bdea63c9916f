use super::geometry::{Point, RingPosition};
use super::{FOCUS_SCALE, MAX_SCALE, MIN_SCALE, OVERVIEW_SCALE, RING_RADIUS};
use crate::deck::SlideId;
use serde::{Deserialize, Serialize};

/// Tuned constants of the camera. All of them can be overridden from the config file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewportTuning {
    pub ring_radius: f64,
    pub focus_scale: f64,
    pub overview_scale: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Drag pan limit, in ring radii at the current (or overview) scale.
    pub pan_limit_factor: f64,
    /// Pointer travel below which a press/release pair counts as a click.
    pub click_threshold: f64,
    /// How far a background double-click pulls the clicked point toward the center.
    pub double_click_damping: f64,
    pub wheel_pan_sensitivity: f64,
    pub wheel_zoom_sensitivity: f64,
    /// Per-event translation contraction applied while zooming out below `convergence_threshold`.
    pub zoom_out_convergence: f64,
    pub convergence_threshold: f64,
    pub settle_threshold: f64,
    pub settle_delay_ms: u64,
    pub release_delay_ms: u64,
    pub soft_capacity: usize,
    pub zoom_about_cursor: bool,
}

impl Default for ViewportTuning {
    fn default() -> Self {
        Self {
            ring_radius: RING_RADIUS,
            focus_scale: FOCUS_SCALE,
            overview_scale: OVERVIEW_SCALE,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            pan_limit_factor: 3.0,
            click_threshold: 5.0,
            double_click_damping: 0.5,
            wheel_pan_sensitivity: 0.8,
            wheel_zoom_sensitivity: 0.007,
            zoom_out_convergence: 0.96,
            convergence_threshold: 0.7,
            settle_threshold: 0.45,
            settle_delay_ms: 300,
            release_delay_ms: 50,
            soft_capacity: 24,
            zoom_about_cursor: false,
        }
    }
}

impl ViewportTuning {
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        // max() then min() so an inverted config still yields a finite scale
        scale.max(self.min_scale).min(self.max_scale)
    }

    /// Replaces values the camera cannot work with by their defaults, logging each one.
    /// Sizes, scales and factors must be finite and positive; thresholds finite and
    /// non-negative; the scale bounds must not be inverted.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;

        let mut t = Self {
            ring_radius: checked("ring_radius", self.ring_radius, d.ring_radius, positive),
            focus_scale: checked("focus_scale", self.focus_scale, d.focus_scale, positive),
            overview_scale: checked(
                "overview_scale",
                self.overview_scale,
                d.overview_scale,
                positive,
            ),
            min_scale: checked("min_scale", self.min_scale, d.min_scale, positive),
            max_scale: checked("max_scale", self.max_scale, d.max_scale, positive),
            pan_limit_factor: checked(
                "pan_limit_factor",
                self.pan_limit_factor,
                d.pan_limit_factor,
                positive,
            ),
            click_threshold: checked(
                "click_threshold",
                self.click_threshold,
                d.click_threshold,
                non_negative,
            ),
            double_click_damping: checked(
                "double_click_damping",
                self.double_click_damping,
                d.double_click_damping,
                non_negative,
            ),
            wheel_pan_sensitivity: checked(
                "wheel_pan_sensitivity",
                self.wheel_pan_sensitivity,
                d.wheel_pan_sensitivity,
                non_negative,
            ),
            wheel_zoom_sensitivity: checked(
                "wheel_zoom_sensitivity",
                self.wheel_zoom_sensitivity,
                d.wheel_zoom_sensitivity,
                non_negative,
            ),
            zoom_out_convergence: checked(
                "zoom_out_convergence",
                self.zoom_out_convergence,
                d.zoom_out_convergence,
                |v| positive(v) && v <= 1.0,
            ),
            convergence_threshold: checked(
                "convergence_threshold",
                self.convergence_threshold,
                d.convergence_threshold,
                non_negative,
            ),
            settle_threshold: checked(
                "settle_threshold",
                self.settle_threshold,
                d.settle_threshold,
                non_negative,
            ),
            ..self
        };

        if t.min_scale > t.max_scale {
            log::warn!(
                "Ignoring inverted viewport scale bounds {}..{}, using {}..{}",
                t.min_scale,
                t.max_scale,
                d.min_scale,
                d.max_scale
            );
            t.min_scale = d.min_scale;
            t.max_scale = d.max_scale;
        }
        t
    }
}

fn checked(name: &str, value: f64, fallback: f64, valid: impl Fn(f64) -> bool) -> f64 {
    if valid(value) {
        value
    } else {
        log::warn!("Ignoring viewport.{} = {}, using {}", name, value, fallback);
        fallback
    }
}

/// The camera. Every transition consumes the current record and returns the next one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportState {
    pub scale: f64,
    /// Screen-space offset of the ring center from the viewport center.
    pub translate: Point,
    /// Lookup key into the deck; re-validated on every read.
    pub active: Option<SlideId>,
    /// Under direct user control: no easing on the next frame.
    pub manual: bool,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::overview(&ViewportTuning::default())
    }
}

impl ViewportState {
    pub fn overview(tuning: &ViewportTuning) -> Self {
        Self {
            scale: tuning.clamp_scale(tuning.overview_scale),
            translate: Point::ZERO,
            active: None,
            manual: false,
        }
    }

    pub fn is_overview(&self, tuning: &ViewportTuning) -> bool {
        *self == Self::overview(tuning)
    }

    /// Focused pose: `position` lands at the viewport center.
    pub fn focused(self, id: SlideId, position: RingPosition, tuning: &ViewportTuning) -> Self {
        let scale = tuning.clamp_scale(tuning.focus_scale);
        Self {
            scale,
            translate: position.point() * -scale,
            active: Some(id),
            manual: false,
        }
    }

    pub fn with_manual(self, manual: bool) -> Self {
        Self { manual, ..self }
    }

    pub fn pan_limit(&self, tuning: &ViewportTuning) -> f64 {
        tuning.ring_radius * self.scale.max(tuning.overview_scale) * tuning.pan_limit_factor
    }

    /// Drag pan. Selection is kept so a focused view can be fine-tuned.
    pub fn dragged_by(self, delta: Point, tuning: &ViewportTuning) -> Self {
        let limit = self.pan_limit(tuning);
        let next = self.translate + delta;
        Self {
            translate: Point::new(
                next.x.max(-limit).min(limit),
                next.y.max(-limit).min(limit),
            ),
            ..self
        }
    }

    pub fn wheel_panned(self, delta: Point, tuning: &ViewportTuning) -> Self {
        Self {
            translate: self.translate - delta * tuning.wheel_pan_sensitivity,
            manual: true,
            ..self
        }
    }

    /// Exponential zoom. `cursor` is the pointer offset from the viewport center and only
    /// anchors the zoom when `zoom_about_cursor` is set.
    pub fn wheel_zoomed(self, delta_y: f64, cursor: Point, tuning: &ViewportTuning) -> Self {
        let old_scale = self.scale;
        let scale = tuning.clamp_scale(old_scale * (1.0 - delta_y * tuning.wheel_zoom_sensitivity));

        let mut translate = self.translate;
        if tuning.zoom_about_cursor && old_scale > 0.0 {
            translate = cursor - (cursor - translate) * (scale / old_scale);
        }
        if scale < old_scale && scale < tuning.convergence_threshold {
            translate = translate * tuning.zoom_out_convergence;
        }

        Self {
            scale,
            translate,
            manual: true,
            ..self
        }
    }

    /// Background double-click: zoom in and pull the clicked point part way to the center.
    pub fn double_click_zoomed(self, offset: Point, tuning: &ViewportTuning) -> Self {
        Self {
            scale: tuning.clamp_scale(self.scale * 2.0),
            translate: self.translate - offset * tuning.double_click_damping,
            active: None,
            manual: false,
        }
    }

    /// Debounced reconciliation after wheel input stops.
    pub fn settled(self, dragging: bool, tuning: &ViewportTuning) -> Self {
        if self.scale < tuning.settle_threshold && self.active.is_none() && !dragging {
            Self::overview(tuning)
        } else {
            self.with_manual(false)
        }
    }

    /// Re-applies scale bounds, e.g. after the tuning changed underneath.
    pub fn clamped(self, tuning: &ViewportTuning) -> Self {
        Self {
            scale: tuning.clamp_scale(self.scale),
            ..self
        }
    }
}
