// File: crates/datechart-core/src/types.rs
// Summary: Shared types and constants (samples, margins, bucketing defaults).

use serde::{Deserialize, Serialize};

/// Similarity threshold used when the chart buckets its data.
pub const DEFAULT_THRESHOLD: f64 = 0.015;
/// Upper bound on the number of bars the chart draws.
pub const DEFAULT_MAX_BUCKETS: usize = 20;
/// Extra pixels added to every bar so zero-valued buckets stay visible.
pub const MIN_HEIGHT: f32 = 5.0;

/// One input point: `x` is a UTC timestamp in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

impl Sample {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Sample {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Screen margins around the plot area, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margin {
    /// Create new margins; negative or non-finite values clamp to zero.
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top: non_negative(top),
            right: non_negative(right),
            bottom: non_negative(bottom),
            left: non_negative(left),
        }
    }
    /// Total horizontal margin (left + right).
    pub fn hsum(&self) -> f32 { self.left + self.right }
    /// Total vertical margin (top + bottom).
    pub fn vsum(&self) -> f32 { self.top + self.bottom }
}

impl Default for Margin {
    fn default() -> Self {
        Self::new(10.0, 10.0, 55.0, 10.0)
    }
}

/// Clamp a pixel length to `[0, +inf)`, mapping NaN/inf to zero.
#[inline]
pub fn non_negative(v: f32) -> f32 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}
