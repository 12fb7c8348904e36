//! Pinch-to-zoom state.

use super::types::CapabilitySnapshot;

/// Current zoom ratio, always inside the device's `[min, max]` range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    ratio: f32,
    min: f32,
    max: f32,
}

impl ZoomState {
    /// Start at 1.0 clamped into `[min, max]`. Bounds are reordered if swapped;
    /// a NaN or infinite bound collapses the range to `(1.0, 1.0)`.
    pub fn new(min: f32, max: f32) -> Self {
        let (min, max) = if !min.is_finite() || !max.is_finite() {
            log::debug!("Ignoring invalid zoom range [{}, {}]", min, max);
            (1.0, 1.0)
        } else if min <= max {
            (min, max)
        } else {
            (max, min)
        };
        Self {
            ratio: 1.0_f32.clamp(min, max),
            min,
            max,
        }
    }

    pub fn from_snapshot(caps: &CapabilitySnapshot) -> Self {
        let (min, max) = caps.zoom_range();
        Self::new(min, max)
    }

    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    pub fn range(&self) -> (f32, f32) {
        (self.min, self.max)
    }

    /// Multiply by a gesture scale factor and clamp.
    ///
    /// Non-finite and non-positive factors are ignored.
    pub fn apply_scale(&mut self, factor: f32) -> f32 {
        if factor.is_finite() && factor > 0.0 {
            self.ratio = (self.ratio * factor).clamp(self.min, self.max);
        }
        self.ratio
    }

    pub fn reset(&mut self) {
        self.ratio = 1.0_f32.clamp(self.min, self.max);
    }
}

impl Default for ZoomState {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}
