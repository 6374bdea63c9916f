use super::START_OFFSET;
use serde::Serialize;
use std::f64::consts::{PI, TAU};
use std::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Resting place of a slide on the ring, relative to the ring center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RingPosition {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

impl RingPosition {
    /// Index 0 sits at the top, following indices proceed clockwise.
    pub fn angle(index: usize, total: usize) -> f64 {
        TAU * index as f64 / total as f64 + START_OFFSET
    }

    /// Position of slide `index` among `total` slides. An empty ring has no positions.
    pub fn of(index: usize, total: usize, radius: f64) -> Option<Self> {
        if total == 0 {
            return None;
        }
        let angle = Self::angle(index, total);
        Some(Self {
            x: radius * angle.cos(),
            y: radius * angle.sin(),
            angle,
        })
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn angle_difference(a: f64, b: f64) -> f64 {
        // Normalize the difference to [-PI, PI] to find the shortest path around the circle
        ((a - b + PI).rem_euclid(TAU) - PI).abs()
    }

    /// Inverse of [`RingPosition::of`]: the slot whose angle is closest to `point`.
    pub fn nearest_index(point: Point, total: usize) -> Option<usize> {
        if total == 0 {
            return None;
        }
        let angle = point.y.atan2(point.x);
        (0..total).min_by(|&a, &b| {
            Self::angle_difference(angle, Self::angle(a, total))
                .total_cmp(&Self::angle_difference(angle, Self::angle(b, total)))
        })
    }
}
