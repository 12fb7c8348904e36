//! Mapping between preview coordinates and the sensor active array.
//!
//! The mapping is linear per axis. Points are normalized to the unit square,
//! the axes are swapped when the sensor sits at 90 or 270 degrees, then the
//! point is scaled into the active array. Each corner of a rectangle maps
//! independently and the result is normalized.

use super::types::{
    CameraError, CapabilitySnapshot, MeteringRectangle, Rotation, SensorRect, ViewportRect,
    METERING_WEIGHT,
};

/// Focus areas are a fifth of the preview width on each side.
pub const AF_AREA_SCALE: u32 = 5;
/// Exposure areas are a quarter of the preview width on each side.
pub const AE_AREA_SCALE: u32 = 4;

/// Which metering region a tap is being converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapArea {
    Focus,
    Exposure,
}

impl TapArea {
    /// Side length of the square area for a preview of the given width.
    pub fn side(self, preview_width: u32) -> u32 {
        match self {
            TapArea::Focus => preview_width / AF_AREA_SCALE,
            TapArea::Exposure => preview_width / AE_AREA_SCALE,
        }
    }
}

/// Converts rectangles between preview space and sensor space for one device.
#[derive(Debug, Clone)]
pub struct CoordinateTransformer {
    preview: ViewportRect,
    active_array: SensorRect,
    orientation: Rotation,
}

impl CoordinateTransformer {
    /// Build a transformer for `snapshot` and the preview rectangle.
    ///
    /// Fails if the device reported no active array or the preview has no area.
    pub fn new(snapshot: &CapabilitySnapshot, preview: ViewportRect) -> Result<Self, CameraError> {
        let active_array = snapshot
            .active_array
            .ok_or_else(|| CameraError::MissingActiveArray(snapshot.id.clone()))?;
        if preview.width() <= 0.0 || preview.height() <= 0.0 {
            return Err(CameraError::EmptyPreview {
                width: preview.width().max(0.0) as u32,
                height: preview.height().max(0.0) as u32,
            });
        }
        if active_array.width() <= 0 || active_array.height() <= 0 {
            return Err(CameraError::MissingActiveArray(snapshot.id.clone()));
        }
        Ok(Self {
            preview,
            active_array,
            orientation: snapshot.sensor_orientation,
        })
    }

    pub fn preview(&self) -> ViewportRect {
        self.preview
    }

    pub fn active_array(&self) -> SensorRect {
        self.active_array
    }

    /// Map a preview rectangle into the active array.
    ///
    /// The result is always contained in the active array; inputs outside the
    /// preview are clamped to its edges.
    pub fn to_sensor_space(&self, rect: &ViewportRect) -> SensorRect {
        let (l, t) = self.point_to_sensor(rect.left, rect.top);
        let (r, b) = self.point_to_sensor(rect.right, rect.bottom);
        SensorRect::new(
            l.round() as i32,
            t.round() as i32,
            r.round() as i32,
            b.round() as i32,
        )
    }

    /// Inverse of [`to_sensor_space`](Self::to_sensor_space).
    pub fn to_preview_space(&self, rect: &SensorRect) -> ViewportRect {
        let (l, t) = self.point_to_preview(rect.left as f32, rect.top as f32);
        let (r, b) = self.point_to_preview(rect.right as f32, rect.bottom as f32);
        ViewportRect::new(l, t, r, b)
    }

    /// Metering region for a tap at preview point `(x, y)`.
    ///
    /// The tap area is built relative to the preview origin, then moved back
    /// into preview coordinates before mapping.
    pub fn metering_rectangle(&self, x: f32, y: f32, kind: TapArea) -> MeteringRectangle {
        let (ox, oy) = (self.preview.left, self.preview.top);
        let local = tap_area(
            x - ox,
            y - oy,
            self.preview.width() as u32,
            self.preview.height() as u32,
            kind,
        );
        let area = ViewportRect::new(
            local.left + ox,
            local.top + oy,
            local.right + ox,
            local.bottom + oy,
        );
        MeteringRectangle {
            rect: self.to_sensor_space(&area),
            weight: METERING_WEIGHT,
        }
    }

    fn point_to_sensor(&self, x: f32, y: f32) -> (f32, f32) {
        let u = ((x - self.preview.left) / self.preview.width()).clamp(0.0, 1.0);
        let v = ((y - self.preview.top) / self.preview.height()).clamp(0.0, 1.0);
        let (s, t) = if self.orientation.swaps_axes() {
            (v, u)
        } else {
            (u, v)
        };
        let a = &self.active_array;
        (
            a.left as f32 + s * a.width() as f32,
            a.top as f32 + t * a.height() as f32,
        )
    }

    fn point_to_preview(&self, x: f32, y: f32) -> (f32, f32) {
        let a = &self.active_array;
        let s = ((x - a.left as f32) / a.width() as f32).clamp(0.0, 1.0);
        let t = ((y - a.top as f32) / a.height() as f32).clamp(0.0, 1.0);
        let (u, v) = if self.orientation.swaps_axes() {
            (t, s)
        } else {
            (s, t)
        };
        (
            self.preview.left + u * self.preview.width(),
            self.preview.top + v * self.preview.height(),
        )
    }
}

/// Square area around a tap, kept inside a preview of `width` x `height`.
///
/// The side is derived from the preview width. When the preview is smaller
/// than the side in either direction the area is cut at the preview edge.
pub fn tap_area(x: f32, y: f32, width: u32, height: u32, kind: TapArea) -> ViewportRect {
    let side = kind.side(width) as i64;
    let (w, h) = (width as i64, height as i64);

    let left = (x as i64 - side / 2).clamp(0, (w - side).max(0));
    let top = (y as i64 - side / 2).clamp(0, (h - side).max(0));
    let right = (left + side).min(w);
    let bottom = (top + side).min(h);

    ViewportRect::new(left as f32, top as f32, right as f32, bottom as f32)
}
