//! Configuration file handling for camera-control.
//!
//! Loads configuration from `~/.config/camera-control/config.toml` or a custom path.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::camera::{
    AfMode, AntiBandingMode, AspectPreset, CapabilitySnapshot, CompensationRange, Facing,
    Rotation, SensorRect, Size, ZoomCapability,
};

/// Configuration file structure for camera-control.
/// Loaded from ~/.config/camera-control/config.toml (or custom path via --config).
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    /// Device capability profiles; built-in profiles are used when empty.
    #[serde(default)]
    pub devices: Vec<CapabilitySnapshot>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_preview_width")]
    pub width: u32,
    #[serde(default = "default_preview_height")]
    pub height: u32,
    /// Display rotation in degrees (0, 90, 180, 270)
    #[serde(default)]
    pub rotation: Rotation,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: default_preview_width(),
            height: default_preview_height(),
            rotation: Rotation::Deg0,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct CameraConfig {
    #[serde(default)]
    pub facing: Facing,
    #[serde(default)]
    pub aspect: AspectPreset,
}

fn default_preview_width() -> u32 {
    1080
}

fn default_preview_height() -> u32 {
    1920
}

/// Template written by `config init`.
pub const DEFAULT_CONFIG: &str = r#"# camera-control configuration

[preview]
# Preview surface size in pixels
width = 1080
height = 1920
# Display rotation: 0, 90, 180, 270
rotation = 0

[camera]
# Initial camera: back or front
facing = "back"
# Aspect preset: full, three_to_four, nine_to_sixteen, one_to_one
aspect = "full"

# Device capability profiles. Remove these to use the built-in profiles.
[[devices]]
id = "0"
facing = "back"
sensor_orientation = 90
af_modes = ["off", "auto", "macro", "continuous_video", "continuous_picture"]
antibanding_modes = ["off", "hz50", "hz60", "auto"]
exposure_compensation = { lower = -12, upper = 12 }
flash_supported = true
active_array = { left = 0, top = 0, right = 4032, bottom = 3024 }
zoom = { kind = "ratio", min = 1.0, max = 8.0 }
output_sizes = [
    { width = 4032, height = 3024 },
    { width = 1920, height = 1080 },
    { width = 1440, height = 1080 },
    { width = 1280, height = 720 },
    { width = 640, height = 480 },
]

[[devices]]
id = "1"
facing = "front"
sensor_orientation = 270
af_modes = ["off"]
antibanding_modes = ["auto"]
exposure_compensation = { lower = -8, upper = 8 }
flash_supported = false
active_array = { left = 0, top = 0, right = 3264, bottom = 2448 }
zoom = { kind = "crop", max_digital_zoom = 4.0 }
output_sizes = [
    { width = 3264, height = 2448 },
    { width = 1920, height = 1080 },
    { width = 1280, height = 960 },
    { width = 640, height = 480 },
]
"#;

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed or is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config = Self::parse(&content).map_err(|e| match e {
                ConfigError::ParseError { source, .. } => ConfigError::ParseError {
                    path: path.clone(),
                    source,
                },
                ConfigError::Invalid { message, .. } => ConfigError::Invalid {
                    path: path.clone(),
                    message,
                },
                other => other,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    /// Parse and validate TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::new(),
            source: e,
        })?;
        config.validate().map_err(|message| ConfigError::Invalid {
            path: PathBuf::new(),
            message,
        })?;
        Ok(config)
    }

    /// Configured device profiles, or the built-in ones when none are set.
    pub fn cameras(&self) -> Vec<CapabilitySnapshot> {
        if self.devices.is_empty() {
            builtin_cameras()
        } else {
            self.devices.clone()
        }
    }

    /// Look up a profile by id, or the first one with the given facing.
    pub fn camera(&self, id: Option<&str>, facing: Facing) -> Option<CapabilitySnapshot> {
        let cameras = self.cameras();
        match id {
            Some(id) => cameras.into_iter().find(|c| c.id == id),
            None => cameras.into_iter().find(|c| c.facing == facing),
        }
    }

    fn validate(&self) -> Result<(), String> {
        let mut ids = HashSet::new();
        for device in &self.devices {
            if !ids.insert(device.id.as_str()) {
                return Err(format!("duplicate device id '{}'", device.id));
            }
            if let Some(range) = device.exposure_compensation {
                if range.lower > range.upper {
                    return Err(format!(
                        "device '{}': exposure_compensation lower {} exceeds upper {}",
                        device.id, range.lower, range.upper
                    ));
                }
            }
            match device.zoom {
                Some(ZoomCapability::Ratio { min, max }) if !(min > 0.0 && min <= max) => {
                    return Err(format!(
                        "device '{}': zoom range {}..{} is invalid",
                        device.id, min, max
                    ));
                }
                Some(ZoomCapability::Crop { max_digital_zoom }) if max_digital_zoom < 1.0 => {
                    return Err(format!(
                        "device '{}': max_digital_zoom {} is below 1.0",
                        device.id, max_digital_zoom
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Back and front profiles used when the config names no devices.
pub fn builtin_cameras() -> Vec<CapabilitySnapshot> {
    let back = CapabilitySnapshot {
        id: "0".to_string(),
        facing: Facing::Back,
        sensor_orientation: Rotation::Deg90,
        af_modes: Some(vec![
            AfMode::Off,
            AfMode::Auto,
            AfMode::Macro,
            AfMode::ContinuousVideo,
            AfMode::ContinuousPicture,
        ]),
        antibanding_modes: Some(vec![
            AntiBandingMode::Off,
            AntiBandingMode::Hz50,
            AntiBandingMode::Hz60,
            AntiBandingMode::Auto,
        ]),
        zoom: Some(ZoomCapability::Ratio { min: 1.0, max: 8.0 }),
        exposure_compensation: Some(CompensationRange {
            lower: -12,
            upper: 12,
        }),
        flash_supported: true,
        active_array: Some(SensorRect::new(0, 0, 4032, 3024)),
        output_sizes: vec![
            Size::new(4032, 3024),
            Size::new(1920, 1080),
            Size::new(1440, 1080),
            Size::new(1280, 720),
            Size::new(640, 480),
        ],
    };
    let front = CapabilitySnapshot {
        id: "1".to_string(),
        facing: Facing::Front,
        sensor_orientation: Rotation::Deg270,
        af_modes: Some(vec![AfMode::Off]),
        antibanding_modes: Some(vec![AntiBandingMode::Auto]),
        zoom: Some(ZoomCapability::Crop {
            max_digital_zoom: 4.0,
        }),
        exposure_compensation: Some(CompensationRange { lower: -8, upper: 8 }),
        flash_supported: false,
        active_array: Some(SensorRect::new(0, 0, 3264, 2448)),
        output_sizes: vec![
            Size::new(3264, 2448),
            Size::new(1920, 1080),
            Size::new(1280, 960),
            Size::new(640, 480),
        ],
    };
    vec![back, front]
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    Invalid {
        path: PathBuf,
        message: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::Invalid { path, message } => {
                write!(f, "Invalid config file '{}': {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::Invalid { .. } => None,
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("camera-control").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/camera-control/config.toml")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_template_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.preview.width, 1080);
        assert_eq!(config.preview.height, 1920);
        assert_eq!(config.preview.rotation, Rotation::Deg0);
        assert_eq!(config.camera.facing, Facing::Back);
        assert_eq!(config.camera.aspect, AspectPreset::Full);
        assert_eq!(config.devices.len(), 2);
    }

    #[test]
    fn test_template_matches_builtin_profiles() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.devices, builtin_cameras());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.preview.width, 1080);
        assert!(config.devices.is_empty());
        assert_eq!(config.cameras().len(), 2);
    }

    #[test]
    fn test_camera_lookup() {
        let config = Config::default();
        assert_eq!(config.camera(Some("1"), Facing::Back).unwrap().id, "1");
        assert_eq!(config.camera(None, Facing::Front).unwrap().id, "1");
        assert!(config.camera(Some("9"), Facing::Back).is_none());
    }

    #[test]
    fn test_partial_device_profile() {
        let config = Config::parse(
            r#"
            [[devices]]
            id = "usb"
            "#,
        )
        .unwrap();
        let device = &config.devices[0];
        assert_eq!(device.facing, Facing::Back);
        assert!(device.af_modes.is_none());
        assert!(device.zoom.is_none());
        assert!(!device.flash_supported);
    }

    #[test]
    fn test_rejects_bad_rotation() {
        let err = Config::parse("[preview]\nrotation = 45\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = Config::parse("[[devices]]\nid = \"0\"\n[[devices]]\nid = \"0\"\n").unwrap_err();
        assert!(format!("{}", err).contains("duplicate device id '0'"));
    }

    #[test]
    fn test_rejects_inverted_compensation() {
        let err = Config::parse(
            "[[devices]]\nid = \"0\"\nexposure_compensation = { lower = 4, upper = -4 }\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_rejects_bad_zoom() {
        let err = Config::parse(
            "[[devices]]\nid = \"0\"\nzoom = { kind = \"ratio\", min = 4.0, max = 2.0 }\n",
        )
        .unwrap_err();
        assert!(format!("{}", err).contains("zoom range"));
    }

    #[test]
    fn test_default_path_ends_with_config_toml() {
        let path = default_path();
        assert!(path.ends_with("camera-control/config.toml"));
    }
}
