//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{AspectArg, FacingArg, FlashArg, RotationArg};

/// Camera control planner: focus regions, zoom, exposure, flash and output sizes
#[derive(Parser, Debug)]
#[command(name = "camera-control")]
#[command(version, about = "Compute camera capture parameters from device capabilities", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Camera and preview selection shared by most subcommands.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct DeviceArgs {
    /// Camera id (from list-cameras)
    #[arg(long)]
    pub camera: Option<String>,

    /// Camera facing (used when --camera is not given)
    #[arg(long)]
    pub facing: Option<FacingArg>,

    /// Preview width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Preview height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Display rotation in degrees
    #[arg(long)]
    pub rotation: Option<RotationArg>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List configured cameras
    ListCameras,
    /// Show the capability snapshot of a camera
    Caps {
        #[command(flatten)]
        device: DeviceArgs,
    },
    /// Tap-to-focus: metering regions and the two-phase request
    Focus {
        #[command(flatten)]
        device: DeviceArgs,
        /// Tap x in preview pixels
        #[arg(long)]
        x: f32,
        /// Tap y in preview pixels
        #[arg(long)]
        y: f32,
    },
    /// Apply a sequence of pinch scale factors
    Zoom {
        #[command(flatten)]
        device: DeviceArgs,
        /// Scale factors applied in order
        #[arg(required = true, allow_negative_numbers = true)]
        scales: Vec<f32>,
    },
    /// Exposure compensation from a slider value in [-1, 1]
    Exposure {
        #[command(flatten)]
        device: DeviceArgs,
        #[arg(allow_negative_numbers = true)]
        scale: f32,
    },
    /// Flash request
    Flash {
        #[command(flatten)]
        device: DeviceArgs,
        state: FlashArg,
    },
    /// Choose the output size for an aspect preset
    Size {
        #[command(flatten)]
        device: DeviceArgs,
        /// Aspect preset (default from config)
        #[arg(long)]
        aspect: Option<AspectArg>,
    },
    /// Run gestures through a simulated camera session
    Simulate {
        #[command(flatten)]
        device: DeviceArgs,
        /// Gestures: focus:X,Y zoom:S exposure:S flash:on|off aspect switch
        #[arg(required = true, value_parser = super::gesture::parse_gesture)]
        gestures: Vec<super::gesture::Gesture>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
