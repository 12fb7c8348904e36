//! Camera controller and the seams it drives.
//!
//! The platform camera stack sits behind [`CameraProvider`] and
//! [`CaptureSession`]; lifecycle changes arrive as [`CameraEvent`]s on a
//! channel returned by [`CameraController::new`].

mod controller;
mod events;
mod memory;

pub use controller::CameraController;
pub use events::{CameraEvent, CameraProvider, CaptureSession};
pub use memory::{InMemorySession, SessionLog, SessionRequest, StaticProvider};
