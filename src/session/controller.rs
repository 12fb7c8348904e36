//! Camera controller: owns the open device and turns gestures into requests.

use std::sync::mpsc::{channel, Receiver, Sender};

use super::events::{CameraEvent, CameraProvider, CaptureSession};
use crate::camera::{
    camera_orientation, choose_size, AspectPreset, CameraError, CapabilitySnapshot,
    CaptureParameters, CoordinateTransformer, Facing, FlashState, RequestBuilder, Rotation, Size,
    TapArea, ViewportRect, ZoomState,
};

/// Drives one camera at a time through a [`CameraProvider`].
///
/// Every request starts from the last repeating parameters so focus, zoom,
/// exposure and flash settings accumulate.
pub struct CameraController<P: CameraProvider> {
    provider: P,
    events: Sender<CameraEvent>,
    facing: Facing,
    display_rotation: Rotation,
    aspect: AspectPreset,
    preview_width: u32,
    preview_height: u32,
    caps: Option<CapabilitySnapshot>,
    session: Option<Box<dyn CaptureSession>>,
    zoom: ZoomState,
    last: Option<CaptureParameters>,
    output_size: Option<Size>,
    flash_on: bool,
}

impl<P: CameraProvider> CameraController<P> {
    /// Create a controller and the receiver for its lifecycle events.
    pub fn new(provider: P, facing: Facing) -> (Self, Receiver<CameraEvent>) {
        let (tx, rx) = channel();
        let controller = Self {
            provider,
            events: tx,
            facing,
            display_rotation: Rotation::Deg0,
            aspect: AspectPreset::default(),
            preview_width: 0,
            preview_height: 0,
            caps: None,
            session: None,
            zoom: ZoomState::default(),
            last: None,
            output_size: None,
            flash_on: false,
        };
        (controller, rx)
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn is_front_camera(&self) -> bool {
        self.facing == Facing::Front
    }

    pub fn aspect(&self) -> AspectPreset {
        self.aspect
    }

    pub fn zoom_ratio(&self) -> f32 {
        self.zoom.ratio()
    }

    pub fn is_flash_on(&self) -> bool {
        self.flash_on
    }

    pub fn capabilities(&self) -> Option<&CapabilitySnapshot> {
        self.caps.as_ref()
    }

    pub fn output_size(&self) -> Option<Size> {
        self.output_size
    }

    pub fn last_parameters(&self) -> Option<&CaptureParameters> {
        self.last.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Set the aspect preset used the next time the camera opens.
    pub fn set_aspect(&mut self, preset: AspectPreset) {
        self.aspect = preset;
    }

    pub fn set_display_rotation(&mut self, rotation: Rotation) {
        self.display_rotation = rotation;
    }

    pub fn update_preview_size(&mut self, width: u32, height: u32) {
        self.preview_width = width;
        self.preview_height = height;
    }

    /// Rotation from the sensor image to the current display.
    pub fn camera_orientation(&self) -> Rotation {
        let sensor = self
            .caps
            .as_ref()
            .map(|c| c.sensor_orientation)
            .unwrap_or_default();
        camera_orientation(self.display_rotation, sensor, self.facing)
    }

    /// Open the camera for the current facing with a preview of the given size.
    pub fn resume(&mut self, width: u32, height: u32) -> Result<(), CameraError> {
        self.update_preview_size(width, height);
        self.set_up_camera()
    }

    /// Close the device and drop everything tied to it.
    pub fn pause(&mut self) {
        self.release_camera();
    }

    /// Swap between front and back cameras and reopen.
    pub fn switch_camera(&mut self) -> Result<(), CameraError> {
        self.facing = self.facing.toggled();
        log::info!("Switching to {} camera", self.facing);
        self.release_camera();
        self.set_up_camera()
    }

    /// Apply a new aspect preset; the session is rebuilt with a matching size.
    pub fn change_aspect(&mut self, preset: AspectPreset) -> Result<(), CameraError> {
        self.aspect = preset;
        self.release_camera();
        self.set_up_camera()
    }

    /// Advance to the next aspect preset.
    pub fn cycle_aspect(&mut self) -> Result<AspectPreset, CameraError> {
        let next = self.aspect.next();
        self.change_aspect(next)?;
        Ok(next)
    }

    /// Turn the torch on. Returns false if nothing was applied.
    pub fn open_flash(&mut self) -> Result<bool, CameraError> {
        self.set_flash(true)
    }

    pub fn close_flash(&mut self) -> Result<bool, CameraError> {
        self.set_flash(false)
    }

    /// Multiply the zoom by a pinch scale factor.
    pub fn change_zoom(&mut self, scale: f32) -> Result<f32, CameraError> {
        if self.session.is_none() {
            return Err(CameraError::NoSession);
        }
        let ratio = self.zoom.apply_scale(scale);
        let params = {
            let caps = self.caps.as_ref().ok_or(CameraError::NoSession)?;
            RequestBuilder::new(caps).zoom_parameters(self.base_parameters()?, ratio)
        };
        self.push_repeating(params)?;
        Ok(ratio)
    }

    /// Tap-to-focus at preview point `(x, y)`.
    ///
    /// Sends the AF trigger as a single capture, then installs the settled
    /// request as the repeating one.
    pub fn change_focus(&mut self, x: f32, y: f32) -> Result<(), CameraError> {
        let sequence = {
            let caps = self.caps.as_ref().ok_or(CameraError::NoSession)?;
            let transformer = CoordinateTransformer::new(
                caps,
                ViewportRect::from_size(self.preview_width, self.preview_height),
            )?;
            let focus = transformer.metering_rectangle(x, y, TapArea::Focus);
            let exposure = transformer.metering_rectangle(x, y, TapArea::Exposure);
            log::debug!("Focus at ({}, {}) -> AF {} AE {}", x, y, focus.rect, exposure.rect);
            RequestBuilder::new(caps).focus_parameters(self.base_parameters()?, focus, exposure)
        };
        self.capture(&sequence.trigger)?;
        self.push_repeating(sequence.settle)
    }

    /// Exposure compensation from a slider value in `[-1, 1]`.
    pub fn change_exposure(&mut self, scale: f32) -> Result<(), CameraError> {
        let params = {
            let caps = self.caps.as_ref().ok_or(CameraError::NoSession)?;
            RequestBuilder::new(caps).exposure_parameters(self.base_parameters()?, scale)
        };
        self.push_repeating(params)
    }

    /// Report a lost device: drop the session and notify the owner.
    pub fn handle_disconnect(&mut self) {
        log::warn!("Camera device disconnected");
        self.release_camera();
        let _ = self.events.send(CameraEvent::DeviceDisconnected);
    }

    fn set_flash(&mut self, on: bool) -> Result<bool, CameraError> {
        if self.is_front_camera() {
            log::warn!("Flash is not available on the front camera");
            return Ok(false);
        }
        let state = if on { FlashState::Torch } else { FlashState::Off };
        let params = {
            let caps = self.caps.as_ref().ok_or(CameraError::NoSession)?;
            if !caps.flash_supported {
                log::warn!("Camera {} has no flash", caps.id);
                return Ok(false);
            }
            RequestBuilder::new(caps).flash_parameters(self.base_parameters()?, state)
        };
        self.push_repeating(params)?;
        self.flash_on = on;
        Ok(true)
    }

    fn set_up_camera(&mut self) -> Result<(), CameraError> {
        let id = self.camera_id(self.facing)?;
        let caps = self
            .provider
            .characteristics(&id)
            .ok_or_else(|| CameraError::DeviceNotFound(id.clone()))?;

        if self.preview_width == 0 || self.preview_height == 0 {
            return Err(CameraError::EmptyPreview {
                width: self.preview_width,
                height: self.preview_height,
            });
        }

        self.zoom = ZoomState::from_snapshot(&caps);
        let orientation = camera_orientation(self.display_rotation, caps.sensor_orientation, self.facing);
        let size = choose_size(
            &caps.output_sizes,
            self.aspect.value(),
            self.preview_width,
            self.preview_height,
            orientation,
        );
        log::info!("Opening camera {} ({}) at {}", id, self.facing, size);

        let session = match self.provider.open(&id, size) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Failed to open camera {}: {}", id, e);
                let _ = self.events.send(CameraEvent::DeviceError(e.clone()));
                return Err(e);
            }
        };
        self.session = Some(session);
        self.caps = Some(caps);
        self.output_size = Some(size);
        let _ = self.events.send(CameraEvent::DeviceOpened(id));

        self.start_preview(size)
    }

    fn start_preview(&mut self, size: Size) -> Result<(), CameraError> {
        let preview = match self.caps.as_ref() {
            Some(caps) => RequestBuilder::new(caps).preview_parameters(CaptureParameters::default()),
            None => return Err(CameraError::NoSession),
        };
        if let Err(e) = self.push_repeating(preview) {
            log::error!("Capture session configuration failed: {}", e);
            let _ = self.events.send(CameraEvent::SessionConfigureFailed(e.clone()));
            return Err(e);
        }
        let _ = self.events.send(CameraEvent::SessionConfigured(size));

        if self.flash_on && !self.is_front_camera() {
            self.set_flash(true)?;
        }
        Ok(())
    }

    fn release_camera(&mut self) {
        if self.session.take().is_some() {
            log::debug!("Released camera session");
        }
        self.caps = None;
        self.last = None;
        self.output_size = None;
    }

    fn camera_id(&self, facing: Facing) -> Result<String, CameraError> {
        self.provider
            .camera_ids()
            .into_iter()
            .find(|id| {
                self.provider
                    .characteristics(id)
                    .is_some_and(|c| c.facing == facing)
            })
            .ok_or(CameraError::NoDeviceForFacing(facing))
    }

    fn base_parameters(&self) -> Result<CaptureParameters, CameraError> {
        if let Some(last) = &self.last {
            return Ok(last.clone());
        }
        let caps = self.caps.as_ref().ok_or(CameraError::NoSession)?;
        Ok(RequestBuilder::new(caps).preview_parameters(CaptureParameters::default()))
    }

    fn session_mut(&mut self) -> Result<&mut Box<dyn CaptureSession>, CameraError> {
        self.session.as_mut().ok_or(CameraError::NoSession)
    }

    fn push_repeating(&mut self, params: CaptureParameters) -> Result<(), CameraError> {
        let result = self.session_mut()?.set_repeating(&params);
        self.check_session(result, "Repeating")?;
        self.last = Some(params);
        Ok(())
    }

    fn capture(&mut self, params: &CaptureParameters) -> Result<(), CameraError> {
        let result = self.session_mut()?.capture(params);
        self.check_session(result, "Capture")
    }

    /// A disconnect from any request releases the session.
    fn check_session(
        &mut self,
        result: Result<(), CameraError>,
        kind: &str,
    ) -> Result<(), CameraError> {
        match result {
            Ok(()) => Ok(()),
            Err(CameraError::Disconnected) => {
                self.handle_disconnect();
                Err(CameraError::Disconnected)
            }
            Err(e) => {
                log::warn!("{} request rejected: {}", kind, e);
                Err(e)
            }
        }
    }
}
