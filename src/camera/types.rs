//! Camera types and data structures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight given to every metering rectangle produced by a tap.
pub const METERING_WEIGHT: i32 = 1000;

/// Axis-aligned rectangle in sensor-native (active array) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl SensorRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
        .normalized()
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Integer center, truncated toward the origin corner.
    pub fn center(&self) -> (i32, i32) {
        (self.left + self.width() / 2, self.top + self.height() / 2)
    }

    /// True if `other` lies entirely within this rectangle.
    pub fn contains(&self, other: &SensorRect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    /// Swap edges so that left <= right and top <= bottom.
    pub fn normalized(self) -> Self {
        Self {
            left: self.left.min(self.right),
            top: self.top.min(self.bottom),
            right: self.left.max(self.right),
            bottom: self.top.max(self.bottom),
        }
    }
}

impl fmt::Display for SensorRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Axis-aligned rectangle in preview (UI pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl ViewportRect {
    /// Build a rectangle; edges are reordered so width and height are never negative.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    /// Rectangle anchored at the origin with the given preview size.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> (f32, f32) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }
}

/// Output resolution reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// Returned when no supported size matches the requested aspect ratio.
    pub const FALLBACK: Size = Size {
        width: 480,
        height: 640,
    };

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Quarter-turn rotation of the display or sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Normalize any angle to the nearest quarter turn.
    pub fn from_degrees(degrees: i32) -> Self {
        let snapped = ((degrees.rem_euclid(360) + 45) / 90) % 4;
        match snapped {
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            3 => Rotation::Deg270,
            _ => Rotation::Deg0,
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// 90 and 270 degree rotations exchange the width and height axes.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl TryFrom<i32> for Rotation {
    type Error = String;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        match degrees {
            0 | 90 | 180 | 270 => Ok(Rotation::from_degrees(degrees)),
            other => Err(format!(
                "rotation must be one of 0, 90, 180, 270 (got {})",
                other
            )),
        }
    }
}

impl From<Rotation> for i32 {
    fn from(r: Rotation) -> Self {
        r.degrees()
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Which way the lens points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Front,
    #[default]
    Back,
}

impl Facing {
    pub fn toggled(self) -> Self {
        match self {
            Facing::Front => Facing::Back,
            Facing::Back => Facing::Front,
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facing::Front => write!(f, "front"),
            Facing::Back => write!(f, "back"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    Off,
    Auto,
}

/// Autofocus modes a device may advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AfMode {
    Off,
    Auto,
    Macro,
    ContinuousVideo,
    ContinuousPicture,
    Edof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AfTrigger {
    Idle,
    Start,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AeMode {
    Off,
    On,
    OnAutoFlash,
    OnAlwaysFlash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AePrecaptureTrigger {
    Idle,
    Start,
}

/// Compensation for mains-frequency lighting flicker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AntiBandingMode {
    Off,
    Hz50,
    Hz60,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashMode {
    Off,
    Single,
    Torch,
}

/// Semantic flash request coming from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashState {
    On,
    Off,
    Auto,
    Torch,
}

/// Exposure compensation range in device steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationRange {
    pub lower: i32,
    pub upper: i32,
}

/// How a device implements digital zoom.
///
/// Ratio-based zoom and crop-region zoom are mutually exclusive per device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ZoomCapability {
    Ratio { min: f32, max: f32 },
    Crop { max_digital_zoom: f32 },
}

/// Capabilities read from a camera device when it is opened.
///
/// `None` fields mean the device did not report the value; builders leave the
/// matching parameter unset in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilitySnapshot {
    pub id: String,
    #[serde(default)]
    pub facing: Facing,
    #[serde(default)]
    pub sensor_orientation: Rotation,
    #[serde(default)]
    pub af_modes: Option<Vec<AfMode>>,
    #[serde(default)]
    pub antibanding_modes: Option<Vec<AntiBandingMode>>,
    #[serde(default)]
    pub zoom: Option<ZoomCapability>,
    #[serde(default)]
    pub exposure_compensation: Option<CompensationRange>,
    #[serde(default)]
    pub flash_supported: bool,
    #[serde(default)]
    pub active_array: Option<SensorRect>,
    #[serde(default)]
    pub output_sizes: Vec<Size>,
}

impl CapabilitySnapshot {
    /// Snapshot with nothing reported beyond identity.
    pub fn bare(id: impl Into<String>, facing: Facing) -> Self {
        Self {
            id: id.into(),
            facing,
            sensor_orientation: Rotation::Deg0,
            af_modes: None,
            antibanding_modes: None,
            zoom: None,
            exposure_compensation: None,
            flash_supported: false,
            active_array: None,
            output_sizes: Vec::new(),
        }
    }

    /// Zoom ratio bounds: the ratio range, `1.0..=max_digital_zoom` on crop
    /// devices, or `1.0..=1.0` when nothing usable was reported.
    pub fn zoom_range(&self) -> (f32, f32) {
        let range = match self.zoom {
            Some(ZoomCapability::Ratio { min, max }) => (min, max.max(min)),
            Some(ZoomCapability::Crop { max_digital_zoom }) => (1.0, max_digital_zoom.max(1.0)),
            None => (1.0, 1.0),
        };
        if range.0.is_finite() && range.1.is_finite() {
            range
        } else {
            (1.0, 1.0)
        }
    }
}

impl fmt::Display for CapabilitySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} camera, sensor {}",
            self.id, self.facing, self.sensor_orientation
        )
    }
}

/// Weighted region used by the AF/AE algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeteringRectangle {
    pub rect: SensorRect,
    pub weight: i32,
}

/// Errors raised by the camera controller around the computational core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CameraError {
    #[error("No {0} camera found")]
    NoDeviceForFacing(Facing),

    #[error("Camera device '{0}' not found")]
    DeviceNotFound(String),

    #[error("Failed to open camera: {0}")]
    OpenFailed(String),

    #[error("Capture session configuration failed: {0}")]
    ConfigureFailed(String),

    #[error("Camera device disconnected")]
    Disconnected,

    #[error("Camera '{0}' does not report a sensor active array")]
    MissingActiveArray(String),

    #[error("Preview size is empty ({width}x{height})")]
    EmptyPreview { width: u32, height: u32 },

    #[error("No capture session is running")]
    NoSession,
}
