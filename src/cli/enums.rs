//! CLI enum types for facing, aspect, flash and rotation options.

use clap::ValueEnum;

use camera_control::camera::{AspectPreset, Facing, FlashState, Rotation};

/// Which camera to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FacingArg {
    Back,
    Front,
}

impl From<FacingArg> for Facing {
    fn from(f: FacingArg) -> Self {
        match f {
            FacingArg::Back => Facing::Back,
            FacingArg::Front => Facing::Front,
        }
    }
}

/// Output aspect preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AspectArg {
    Full,
    #[value(name = "3:4")]
    ThreeToFour,
    #[value(name = "9:16")]
    NineToSixteen,
    #[value(name = "1:1")]
    OneToOne,
}

impl From<AspectArg> for AspectPreset {
    fn from(a: AspectArg) -> Self {
        match a {
            AspectArg::Full => AspectPreset::Full,
            AspectArg::ThreeToFour => AspectPreset::ThreeToFour,
            AspectArg::NineToSixteen => AspectPreset::NineToSixteen,
            AspectArg::OneToOne => AspectPreset::OneToOne,
        }
    }
}

/// Flash request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FlashArg {
    On,
    Off,
    Auto,
    Torch,
}

impl From<FlashArg> for FlashState {
    fn from(f: FlashArg) -> Self {
        match f {
            FlashArg::On => FlashState::On,
            FlashArg::Off => FlashState::Off,
            FlashArg::Auto => FlashState::Auto,
            FlashArg::Torch => FlashState::Torch,
        }
    }
}

/// Display rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RotationArg {
    #[value(name = "0")]
    Deg0,
    #[value(name = "90")]
    Deg90,
    #[value(name = "180")]
    Deg180,
    #[value(name = "270")]
    Deg270,
}

impl From<RotationArg> for Rotation {
    fn from(r: RotationArg) -> Self {
        match r {
            RotationArg::Deg0 => Rotation::Deg0,
            RotationArg::Deg90 => Rotation::Deg90,
            RotationArg::Deg180 => Rotation::Deg180,
            RotationArg::Deg270 => Rotation::Deg270,
        }
    }
}
