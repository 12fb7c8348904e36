//! Session seam and lifecycle events.

use crate::camera::{CameraError, CapabilitySnapshot, CaptureParameters, Size};

/// Lifecycle notifications sent from the controller to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraEvent {
    /// Device opened; carries the device id.
    DeviceOpened(String),
    /// Preview request accepted; carries the output size in use.
    SessionConfigured(Size),
    SessionConfigureFailed(CameraError),
    DeviceDisconnected,
    DeviceError(CameraError),
}

/// A running capture session on an opened device.
pub trait CaptureSession {
    /// Replace the repeating (preview) request.
    fn set_repeating(&mut self, params: &CaptureParameters) -> Result<(), CameraError>;

    /// Submit a single one-shot request.
    fn capture(&mut self, params: &CaptureParameters) -> Result<(), CameraError>;
}

/// Source of camera devices and sessions.
pub trait CameraProvider {
    fn camera_ids(&self) -> Vec<String>;

    fn characteristics(&self, id: &str) -> Option<CapabilitySnapshot>;

    /// Open device `id` with a stream of `output` size.
    fn open(&mut self, id: &str, output: Size) -> Result<Box<dyn CaptureSession>, CameraError>;
}
