//! In-memory provider that records every request it receives.

use std::sync::{Arc, Mutex};

use super::events::{CameraProvider, CaptureSession};
use crate::camera::{CameraError, CapabilitySnapshot, CaptureParameters, Size};

/// A request as seen by a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionRequest {
    Opened { id: String, output: Size },
    Repeating(CaptureParameters),
    Capture(CaptureParameters),
}

/// Shared request log.
pub type SessionLog = Arc<Mutex<Vec<SessionRequest>>>;

/// Session that appends to a [`SessionLog`].
pub struct InMemorySession {
    log: SessionLog,
    reject_repeating: bool,
}

impl InMemorySession {
    fn record(&self, request: SessionRequest) {
        if let Ok(mut log) = self.log.lock() {
            log.push(request);
        }
    }
}

impl CaptureSession for InMemorySession {
    fn set_repeating(&mut self, params: &CaptureParameters) -> Result<(), CameraError> {
        if self.reject_repeating {
            return Err(CameraError::ConfigureFailed(
                "session rejected repeating request".to_string(),
            ));
        }
        self.record(SessionRequest::Repeating(params.clone()));
        Ok(())
    }

    fn capture(&mut self, params: &CaptureParameters) -> Result<(), CameraError> {
        self.record(SessionRequest::Capture(params.clone()));
        Ok(())
    }
}

/// Provider backed by a fixed list of capability snapshots.
pub struct StaticProvider {
    cameras: Vec<CapabilitySnapshot>,
    log: SessionLog,
    reject_sessions: bool,
}

impl StaticProvider {
    pub fn new(cameras: Vec<CapabilitySnapshot>) -> Self {
        Self {
            cameras,
            log: Arc::new(Mutex::new(Vec::new())),
            reject_sessions: false,
        }
    }

    /// Sessions opened from now on refuse every repeating request.
    pub fn reject_sessions(mut self) -> Self {
        self.reject_sessions = true;
        self
    }

    pub fn log(&self) -> SessionLog {
        self.log.clone()
    }

    /// Copy of everything recorded so far.
    pub fn requests(&self) -> Vec<SessionRequest> {
        self.log.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl CameraProvider for StaticProvider {
    fn camera_ids(&self) -> Vec<String> {
        self.cameras.iter().map(|c| c.id.clone()).collect()
    }

    fn characteristics(&self, id: &str) -> Option<CapabilitySnapshot> {
        self.cameras.iter().find(|c| c.id == id).cloned()
    }

    fn open(&mut self, id: &str, output: Size) -> Result<Box<dyn CaptureSession>, CameraError> {
        if !self.cameras.iter().any(|c| c.id == id) {
            return Err(CameraError::DeviceNotFound(id.to_string()));
        }
        let session = InMemorySession {
            log: self.log.clone(),
            reject_repeating: self.reject_sessions,
        };
        session.record(SessionRequest::Opened {
            id: id.to_string(),
            output,
        });
        Ok(Box::new(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Facing;

    #[test]
    fn test_static_provider_lists_and_opens() {
        let mut provider = StaticProvider::new(vec![
            CapabilitySnapshot::bare("0", Facing::Back),
            CapabilitySnapshot::bare("1", Facing::Front),
        ]);
        assert_eq!(provider.camera_ids(), vec!["0", "1"]);
        assert_eq!(
            provider.characteristics("1").map(|c| c.facing),
            Some(Facing::Front)
        );

        let mut session = provider.open("0", Size::FALLBACK).unwrap();
        session.capture(&CaptureParameters::default()).unwrap();
        assert_eq!(
            provider.requests(),
            vec![
                SessionRequest::Opened {
                    id: "0".to_string(),
                    output: Size::FALLBACK
                },
                SessionRequest::Capture(CaptureParameters::default()),
            ]
        );
    }

    #[test]
    fn test_open_unknown_device() {
        let mut provider = StaticProvider::new(vec![]);
        let err = provider.open("9", Size::FALLBACK).err();
        assert_eq!(err, Some(CameraError::DeviceNotFound("9".to_string())));
    }

    #[test]
    fn test_rejecting_session() {
        let mut provider =
            StaticProvider::new(vec![CapabilitySnapshot::bare("0", Facing::Back)]).reject_sessions();
        let mut session = provider.open("0", Size::FALLBACK).unwrap();
        assert!(matches!(
            session.set_repeating(&CaptureParameters::default()),
            Err(CameraError::ConfigureFailed(_))
        ));
    }
}
