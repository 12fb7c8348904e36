//! Camera control core: coordinate transforms, capture parameters, sizes.
//!
//! - Preview to sensor mapping via [`CoordinateTransformer`]
//! - Capture parameters via [`RequestBuilder`] and [`CaptureParameters`]
//! - Output size selection via [`choose_size`]
//! - Pinch zoom via [`ZoomState`]

mod request;
mod size;
mod transform;
mod types;
mod zoom;

pub use request::{crop_region, select_mode, CaptureParameters, FocusSequence, RequestBuilder};
pub use size::{
    camera_orientation, choose_size, ratio_matches, AspectPreset, DEFAULT_ASPECT_RATIO,
};
pub use transform::{tap_area, CoordinateTransformer, TapArea, AE_AREA_SCALE, AF_AREA_SCALE};
pub use types::{
    AeMode, AePrecaptureTrigger, AfMode, AfTrigger, AntiBandingMode, CameraError,
    CapabilitySnapshot, CompensationRange, ControlMode, Facing, FlashMode, FlashState,
    MeteringRectangle, Rotation, SensorRect, Size, ViewportRect, ZoomCapability,
    METERING_WEIGHT,
};
pub use zoom::ZoomState;
