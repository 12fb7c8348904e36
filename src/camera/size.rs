//! Output size selection and orientation helpers.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::{Facing, Rotation, Size};

/// Ratio used when the user has not picked one (portrait 3:4).
pub const DEFAULT_ASPECT_RATIO: f32 = 3.0 / 4.0;

/// Aspect ratio presets, cycled in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectPreset {
    #[default]
    Full,
    ThreeToFour,
    NineToSixteen,
    OneToOne,
}

impl AspectPreset {
    pub const ALL: [AspectPreset; 4] = [
        AspectPreset::Full,
        AspectPreset::ThreeToFour,
        AspectPreset::NineToSixteen,
        AspectPreset::OneToOne,
    ];

    /// Height over width; `0.0` means "no preference".
    pub fn value(self) -> f32 {
        match self {
            AspectPreset::Full => 0.0,
            AspectPreset::ThreeToFour => 3.0 / 4.0,
            AspectPreset::NineToSixteen => 9.0 / 16.0,
            AspectPreset::OneToOne => 1.0,
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for AspectPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AspectPreset::Full => write!(f, "full"),
            AspectPreset::ThreeToFour => write!(f, "3:4"),
            AspectPreset::NineToSixteen => write!(f, "9:16"),
            AspectPreset::OneToOne => write!(f, "1:1"),
        }
    }
}

/// Rotation between the sensor image and the current display.
///
/// Front cameras add the display rotation, back cameras subtract it.
pub fn camera_orientation(display: Rotation, sensor: Rotation, facing: Facing) -> Rotation {
    let degrees = match facing {
        Facing::Front => sensor.degrees() + display.degrees(),
        Facing::Back => sensor.degrees() - display.degrees(),
    };
    Rotation::from_degrees(degrees)
}

/// True if `size.width * ratio` equals `size.height`.
///
/// The comparison allows a few ulps of error so ratios such as 4/3 that have
/// no exact binary representation still match.
pub fn ratio_matches(size: Size, ratio: f32) -> bool {
    let expected = size.width as f32 * ratio;
    let height = size.height as f32;
    (expected - height).abs() <= height.max(1.0) * f32::EPSILON * 4.0
}

/// Pick the supported size closest in width to the target at `ratio`.
///
/// `ratio <= 0` means 3:4. Sizes are reported in sensor orientation, so the
/// target is swapped when `rotation` is 90 or 270. Ties keep the first size
/// in input order. Without any size at the ratio, [`Size::FALLBACK`] is used.
pub fn choose_size(
    sizes: &[Size],
    ratio: f32,
    target_width: u32,
    target_height: u32,
    rotation: Rotation,
) -> Size {
    let ratio = if ratio <= 0.0 {
        DEFAULT_ASPECT_RATIO
    } else {
        ratio
    };
    let (target_width, _target_height) = if rotation.swaps_axes() {
        (target_height, target_width)
    } else {
        (target_width, target_height)
    };

    let mut best: Option<(u32, Size)> = None;
    for &size in sizes.iter().filter(|s| ratio_matches(**s, ratio)) {
        let delta = target_width.abs_diff(size.width);
        if delta == 0 {
            return size;
        }
        if best.map_or(true, |(min, _)| delta < min) {
            best = Some((delta, size));
        }
    }

    match best {
        Some((_, size)) => size,
        None => {
            log::debug!(
                "No output size matches ratio {:.4} among {} sizes, using {}",
                ratio,
                sizes.len(),
                Size::FALLBACK
            );
            Size::FALLBACK
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_preset_values() {
        assert_eq!(AspectPreset::Full.value(), 0.0);
        assert_eq!(AspectPreset::ThreeToFour.value(), 0.75);
        assert_eq!(AspectPreset::NineToSixteen.value(), 0.5625);
        assert_eq!(AspectPreset::OneToOne.value(), 1.0);
    }

    #[test]
    fn test_aspect_preset_cycles() {
        let mut preset = AspectPreset::default();
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(preset);
            preset = preset.next();
        }
        assert_eq!(
            seen,
            vec![
                AspectPreset::Full,
                AspectPreset::ThreeToFour,
                AspectPreset::NineToSixteen,
                AspectPreset::OneToOne,
                AspectPreset::Full,
            ]
        );
    }

    #[test]
    fn test_camera_orientation() {
        use Rotation::*;
        assert_eq!(camera_orientation(Deg0, Deg90, Facing::Back), Deg90);
        assert_eq!(camera_orientation(Deg90, Deg90, Facing::Back), Deg0);
        assert_eq!(camera_orientation(Deg180, Deg90, Facing::Back), Deg270);
        assert_eq!(camera_orientation(Deg90, Deg270, Facing::Front), Deg0);
        assert_eq!(camera_orientation(Deg270, Deg270, Facing::Front), Deg180);
    }

    #[test]
    fn test_ratio_matches_inexact_fraction() {
        assert!(ratio_matches(Size::new(480, 640), 4.0 / 3.0));
        assert!(ratio_matches(Size::new(1920, 1080), 9.0 / 16.0));
        assert!(!ratio_matches(Size::new(640, 480), 4.0 / 3.0));
        assert!(!ratio_matches(Size::new(1280, 721), 9.0 / 16.0));
    }

    #[test]
    fn test_choose_size_picks_matching_ratio() {
        let sizes = [Size::new(640, 480), Size::new(480, 640), Size::new(800, 600)];
        assert_eq!(
            choose_size(&sizes, 4.0 / 3.0, 480, 800, Rotation::Deg0),
            Size::new(480, 640)
        );
    }

    #[test]
    fn test_choose_size_closest_width() {
        let sizes = [
            Size::new(320, 240),
            Size::new(1280, 960),
            Size::new(1920, 1080),
            Size::new(1440, 1080),
        ];
        assert_eq!(
            choose_size(&sizes, 0.75, 1300, 2000, Rotation::Deg0),
            Size::new(1280, 960)
        );
        assert_eq!(
            choose_size(&sizes, 0.75, 1400, 2000, Rotation::Deg0),
            Size::new(1440, 1080)
        );
    }

    #[test]
    fn test_choose_size_ties_keep_first() {
        let sizes = [Size::new(800, 600), Size::new(1200, 900)];
        assert_eq!(
            choose_size(&sizes, 0.75, 1000, 0, Rotation::Deg0),
            Size::new(800, 600)
        );
    }

    #[test]
    fn test_choose_size_default_ratio() {
        let sizes = [Size::new(1920, 1080), Size::new(1440, 1080)];
        assert_eq!(
            choose_size(&sizes, 0.0, 1440, 1920, Rotation::Deg0),
            Size::new(1440, 1080)
        );
        assert_eq!(
            choose_size(&sizes, -1.0, 1440, 1920, Rotation::Deg0),
            Size::new(1440, 1080)
        );
    }

    #[test]
    fn test_choose_size_rotation_swaps_target() {
        let sizes = [Size::new(1280, 720), Size::new(1920, 1080)];
        // portrait preview 1080x1920 on a sensor rotated by 90
        assert_eq!(
            choose_size(&sizes, 9.0 / 16.0, 1080, 1920, Rotation::Deg90),
            Size::new(1920, 1080)
        );
        assert_eq!(
            choose_size(&sizes, 9.0 / 16.0, 1080, 1920, Rotation::Deg0),
            Size::new(1280, 720)
        );
    }

    #[test]
    fn test_choose_size_fallback() {
        let sizes = [Size::new(640, 480), Size::new(800, 600)];
        assert_eq!(
            choose_size(&sizes, 4.0 / 3.0, 480, 640, Rotation::Deg0),
            Size::FALLBACK
        );
        assert_eq!(choose_size(&[], 1.0, 480, 640, Rotation::Deg0), Size::FALLBACK);
    }
}
