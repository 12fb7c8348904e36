//! End-to-end tests for the camera controller against the in-memory provider.

use camera_control::camera::{
    AfTrigger, AspectPreset, CameraError, Facing, FlashMode, Rotation, Size,
};
use camera_control::config::{builtin_cameras, Config};
use camera_control::session::{CameraController, CameraEvent, SessionRequest, StaticProvider};
use std::io::Write;
use tempfile::NamedTempFile;

fn controller() -> (
    CameraController<StaticProvider>,
    std::sync::mpsc::Receiver<CameraEvent>,
) {
    CameraController::new(StaticProvider::new(builtin_cameras()), Facing::Back)
}

#[test]
fn test_full_session_lifecycle() {
    let (mut camera, events) = controller();
    camera.resume(1080, 1920).unwrap();
    camera.change_focus(540.0, 960.0).unwrap();
    camera.change_zoom(2.0).unwrap();
    camera.change_exposure(-0.5).unwrap();
    camera.open_flash().unwrap();
    camera.pause();

    let received: Vec<CameraEvent> = events.try_iter().collect();
    assert_eq!(
        received,
        vec![
            CameraEvent::DeviceOpened("0".to_string()),
            CameraEvent::SessionConfigured(Size::new(1440, 1080)),
        ]
    );

    let requests = camera.provider().requests();
    assert!(matches!(&requests[0], SessionRequest::Opened { id, .. } if id == "0"));
    let captures: Vec<_> = requests
        .iter()
        .filter_map(|r| match r {
            SessionRequest::Capture(p) => Some(p),
            _ => None,
        })
        .collect();
    assert_eq!(captures.len(), 1);
    assert_eq!(captures[0].af_trigger, Some(AfTrigger::Start));

    match requests.last() {
        Some(SessionRequest::Repeating(last)) => {
            assert_eq!(last.af_trigger, Some(AfTrigger::Idle));
            assert_eq!(last.zoom_ratio, Some(2.0));
            assert_eq!(last.ae_exposure_compensation, Some(-6));
            assert_eq!(last.flash_mode, Some(FlashMode::Torch));
            assert_eq!(last.af_regions.len(), 1);
        }
        other => panic!("expected repeating request, got {:?}", other),
    }

    assert!(!camera.is_open());
    assert_eq!(camera.change_zoom(2.0), Err(CameraError::NoSession));
}

#[test]
fn test_front_camera_uses_crop_zoom() {
    let (mut camera, _events) = controller();
    camera.resume(1080, 1920).unwrap();
    camera.switch_camera().unwrap();
    assert_eq!(camera.facing(), Facing::Front);

    camera.change_zoom(2.0).unwrap();
    let last = camera.last_parameters().unwrap();
    assert_eq!(last.zoom_ratio, None);
    let crop = last.crop_region.expect("crop region");
    assert_eq!((crop.width(), crop.height()), (1632, 1224));
}

#[test]
fn test_display_rotation_changes_output_size() {
    let (mut camera, _events) = controller();
    camera.set_aspect(AspectPreset::NineToSixteen);
    camera.resume(1080, 1920).unwrap();
    assert_eq!(camera.output_size(), Some(Size::new(1920, 1080)));

    camera.pause();
    camera.set_display_rotation(Rotation::Deg90);
    camera.resume(1920, 1080).unwrap();
    assert_eq!(camera.camera_orientation(), Rotation::Deg0);
    assert_eq!(camera.output_size(), Some(Size::new(1920, 1080)));
}

#[test]
fn test_controller_from_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[camera]
facing = "front"

[[devices]]
id = "selfie"
facing = "front"
sensor_orientation = 270
active_array = {{ left = 0, top = 0, right = 2000, bottom = 1500 }}
output_sizes = [{{ width = 1600, height = 1200 }}]
"#
    )
    .unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    let (mut camera, _events) =
        CameraController::new(StaticProvider::new(config.cameras()), config.camera.facing);
    camera.resume(720, 960).unwrap();
    assert_eq!(camera.capabilities().unwrap().id, "selfie");
    assert_eq!(camera.output_size(), Some(Size::new(1600, 1200)));

    // no flash on the front camera, no zoom capability: both are no-ops
    assert_eq!(camera.open_flash(), Ok(false));
    assert_eq!(camera.change_zoom(3.0), Ok(1.0));

    assert_eq!(
        camera.switch_camera(),
        Err(CameraError::NoDeviceForFacing(Facing::Back))
    );
}
