//! Subcommand handlers. Each returns the text to print on stdout.

use serde_json::json;
use std::path::{Path, PathBuf};

use super::args::{ConfigAction, DeviceArgs};
use super::gesture::Gesture;
use camera_control::camera::{
    camera_orientation, choose_size, AspectPreset, CameraError, CapabilitySnapshot,
    CaptureParameters, CoordinateTransformer, Facing, FlashState, RequestBuilder, Rotation,
    TapArea, ViewportRect, ZoomState,
};
use camera_control::config::{default_path, Config, ConfigError, DEFAULT_CONFIG};
use camera_control::session::{CameraController, CameraEvent, SessionRequest, StaticProvider};

/// Errors reported by subcommands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error("Camera '{0}' not found. Run 'camera-control list-cameras' to see configured cameras")]
    CameraNotFound(String),

    #[error("No {0} camera configured")]
    NoCameraForFacing(Facing),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config file already exists: {}", .0.display())]
    ConfigExists(PathBuf),

    #[error("Failed to write config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Camera and preview after merging CLI options over the config file.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub caps: CapabilitySnapshot,
    pub width: u32,
    pub height: u32,
    pub rotation: Rotation,
}

impl Resolved {
    fn preview(&self) -> ViewportRect {
        ViewportRect::from_size(self.width, self.height)
    }

    fn baseline(&self) -> CaptureParameters {
        RequestBuilder::new(&self.caps).preview_parameters(CaptureParameters::default())
    }
}

/// Pick the camera and preview geometry for a command.
pub fn resolve(config: &Config, device: &DeviceArgs) -> Result<Resolved, CommandError> {
    let facing = device.facing.map(Facing::from).unwrap_or(config.camera.facing);
    let caps = match device.camera.as_deref() {
        Some(id) => config
            .camera(Some(id), facing)
            .ok_or_else(|| CommandError::CameraNotFound(id.to_string()))?,
        None => config
            .camera(None, facing)
            .ok_or(CommandError::NoCameraForFacing(facing))?,
    };
    Ok(Resolved {
        caps,
        width: device.width.unwrap_or(config.preview.width),
        height: device.height.unwrap_or(config.preview.height),
        rotation: device.rotation.map(Rotation::from).unwrap_or(config.preview.rotation),
    })
}

/// List configured cameras.
pub fn list_cameras(config: &Config) -> String {
    let cameras = config.cameras();
    let mut out = String::from("Available cameras:\n");
    for camera in &cameras {
        let (min, max) = camera.zoom_range();
        out.push_str(&format!(
            "  {} - zoom {:.1}x-{:.1}x, flash {}, {} output sizes\n",
            camera,
            min,
            max,
            if camera.flash_supported { "yes" } else { "no" },
            camera.output_sizes.len()
        ));
    }
    out.push_str("\nUse --camera <id> or --facing <back|front> to select a camera.");
    out
}

/// Capability snapshot as JSON.
pub fn caps(config: &Config, device: &DeviceArgs) -> Result<String, CommandError> {
    let resolved = resolve(config, device)?;
    Ok(serde_json::to_string_pretty(&resolved.caps)?)
}

/// Metering regions and the trigger/settle pair for a tap.
pub fn focus(config: &Config, device: &DeviceArgs, x: f32, y: f32) -> Result<String, CommandError> {
    let resolved = resolve(config, device)?;
    let transformer = CoordinateTransformer::new(&resolved.caps, resolved.preview())?;
    let af = transformer.metering_rectangle(x, y, TapArea::Focus);
    let ae = transformer.metering_rectangle(x, y, TapArea::Exposure);
    let sequence =
        RequestBuilder::new(&resolved.caps).focus_parameters(resolved.baseline(), af, ae);

    let report = json!({
        "camera": resolved.caps.id,
        "tap": { "x": x, "y": y },
        "af_region": af,
        "ae_region": ae,
        "trigger": sequence.trigger,
        "settle": sequence.settle,
    });
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Apply pinch scales in order and report the resulting zoom request.
pub fn zoom(config: &Config, device: &DeviceArgs, scales: &[f32]) -> Result<String, CommandError> {
    let resolved = resolve(config, device)?;
    let mut state = ZoomState::from_snapshot(&resolved.caps);
    let steps: Vec<f32> = scales.iter().map(|s| state.apply_scale(*s)).collect();
    let params =
        RequestBuilder::new(&resolved.caps).zoom_parameters(resolved.baseline(), state.ratio());

    let (min, max) = state.range();
    let report = json!({
        "camera": resolved.caps.id,
        "range": [min, max],
        "steps": steps,
        "ratio": state.ratio(),
        "parameters": params,
    });
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn exposure(config: &Config, device: &DeviceArgs, scale: f32) -> Result<String, CommandError> {
    let resolved = resolve(config, device)?;
    if !(-1.0..=1.0).contains(&scale) {
        log::warn!("Exposure scale {} is outside [-1, 1] and will extrapolate", scale);
    }
    let params = RequestBuilder::new(&resolved.caps).exposure_parameters(resolved.baseline(), scale);
    Ok(serde_json::to_string_pretty(&params)?)
}

pub fn flash(config: &Config, device: &DeviceArgs, state: FlashState) -> Result<String, CommandError> {
    let resolved = resolve(config, device)?;
    if !resolved.caps.flash_supported {
        log::warn!("Camera {} has no flash; request left unchanged", resolved.caps.id);
    }
    let params = RequestBuilder::new(&resolved.caps).flash_parameters(resolved.baseline(), state);
    Ok(serde_json::to_string_pretty(&params)?)
}

/// Output size for an aspect preset.
pub fn size(
    config: &Config,
    device: &DeviceArgs,
    aspect: Option<AspectPreset>,
) -> Result<String, CommandError> {
    let resolved = resolve(config, device)?;
    let aspect = aspect.unwrap_or(config.camera.aspect);
    let orientation = camera_orientation(
        resolved.rotation,
        resolved.caps.sensor_orientation,
        resolved.caps.facing,
    );
    let chosen = choose_size(
        &resolved.caps.output_sizes,
        aspect.value(),
        resolved.width,
        resolved.height,
        orientation,
    );
    Ok(format!(
        "Camera {}: aspect {}, preview {}x{}, orientation {} -> {}",
        resolved.caps.id, aspect, resolved.width, resolved.height, orientation, chosen
    ))
}

/// Replay gestures through a controller backed by the configured cameras.
pub fn simulate(
    config: &Config,
    device: &DeviceArgs,
    gestures: &[Gesture],
) -> Result<String, CommandError> {
    let resolved = resolve(config, device)?;
    let provider = StaticProvider::new(config.cameras());
    let (mut controller, events) = CameraController::new(provider, resolved.caps.facing);
    controller.set_display_rotation(resolved.rotation);
    controller.set_aspect(config.camera.aspect);
    controller.resume(resolved.width, resolved.height)?;

    for gesture in gestures {
        log::info!("Gesture {}", gesture);
        let result = match *gesture {
            Gesture::Focus { x, y } => controller.change_focus(x, y),
            Gesture::Zoom(scale) => controller.change_zoom(scale).map(|_| ()),
            Gesture::Exposure(scale) => controller.change_exposure(scale),
            Gesture::Flash(true) => controller.open_flash().map(|_| ()),
            Gesture::Flash(false) => controller.close_flash().map(|_| ()),
            Gesture::CycleAspect => controller.cycle_aspect().map(|_| ()),
            Gesture::SwitchCamera => controller.switch_camera(),
        };
        if let Err(e) = result {
            log::warn!("Gesture {} failed: {}", gesture, e);
        }
    }

    let mut out = String::new();
    for event in events.try_iter() {
        out.push_str(&format!("event: {}\n", describe_event(&event)));
    }
    for request in controller.provider().requests() {
        out.push_str(&describe_request(&request)?);
        out.push('\n');
    }
    out.push_str(&format!(
        "final: {} camera, zoom {:.2}x, aspect {}, flash {}",
        controller.facing(),
        controller.zoom_ratio(),
        controller.aspect(),
        if controller.is_flash_on() { "on" } else { "off" }
    ));
    Ok(out)
}

fn describe_event(event: &CameraEvent) -> String {
    match event {
        CameraEvent::DeviceOpened(id) => format!("device {} opened", id),
        CameraEvent::SessionConfigured(size) => format!("session configured at {}", size),
        CameraEvent::SessionConfigureFailed(e) => format!("session configure failed: {}", e),
        CameraEvent::DeviceDisconnected => "device disconnected".to_string(),
        CameraEvent::DeviceError(e) => format!("device error: {}", e),
    }
}

fn describe_request(request: &SessionRequest) -> Result<String, CommandError> {
    Ok(match request {
        SessionRequest::Opened { id, output } => format!("open {} {}", id, output),
        SessionRequest::Repeating(params) => {
            format!("repeating {}", serde_json::to_string(params)?)
        }
        SessionRequest::Capture(params) => format!("capture {}", serde_json::to_string(params)?),
    })
}

/// Handle config subcommand actions.
pub fn handle_config_action(
    action: ConfigAction,
    config_path: Option<&Path>,
) -> Result<String, CommandError> {
    let config_path = config_path.map(PathBuf::from).unwrap_or_else(default_path);
    match action {
        ConfigAction::Show => {
            let config = Config::load(Some(&config_path))?;
            let mut out = String::from("Current configuration:\n");
            out.push_str(&format!(
                "  Preview: {}x{} at {}\n",
                config.preview.width, config.preview.height, config.preview.rotation
            ));
            out.push_str(&format!("  Facing: {}\n", config.camera.facing));
            out.push_str(&format!("  Aspect: {}\n", config.camera.aspect));
            out.push_str(&format!(
                "  Devices: {}{}\n\n",
                config.cameras().len(),
                if config.devices.is_empty() {
                    " (built-in)"
                } else {
                    ""
                }
            ));
            if config_path.exists() {
                out.push_str(&format!("Config file: {} (exists)", config_path.display()));
            } else {
                out.push_str(&format!("Config file: {} (not found)", config_path.display()));
            }
            Ok(out)
        }
        ConfigAction::Init => {
            if config_path.exists() {
                return Err(CommandError::ConfigExists(config_path));
            }

            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| CommandError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }

            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| CommandError::Io {
                path: config_path.clone(),
                source: e,
            })?;

            Ok(format!("Created config file: {}", config_path.display()))
        }
    }
}
