// File: crates/datechart-core/src/scale.rs
// Summary: Linear value-to-pixel scales and range normalization for bar layout.

/// Linear map from a data domain to a pixel range. The range may be inverted
/// (e.g. `[height, 0]` so larger values sit higher on screen).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    pub d0: f64,
    pub d1: f64,
    pub r0: f32,
    pub r1: f32,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { d0: domain.0, d1: domain.1, r0: range.0, r1: range.1 }
    }

    /// Map `v` into the pixel range. A zero-width domain maps every value to
    /// the start of the range.
    #[inline]
    pub fn to_px(&self, v: f64) -> f32 {
        let span = self.d1 - self.d0;
        if span == 0.0 || !span.is_finite() {
            return self.r0;
        }
        let t = (v - self.d0) / span;
        self.r0 + (t as f32) * (self.r1 - self.r0)
    }

    #[inline]
    pub fn from_px(&self, px: f32) -> f64 {
        let span = self.r1 - self.r0;
        if span == 0.0 {
            return self.d0;
        }
        self.d0 + ((px - self.r0) / span) as f64 * (self.d1 - self.d0)
    }
}

/// Position of `v` inside `[min, min + range]`, clamped to `[0, 1]`.
/// A zero or non-finite range maps everything to 0.
#[inline]
pub fn normalize(v: f64, min: f64, range: f64) -> f64 {
    if range == 0.0 || !range.is_finite() {
        return 0.0;
    }
    let t = (v - min) / range;
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}
