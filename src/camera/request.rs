//! Capture parameter selection against a device's reported capabilities.
//!
//! Every builder takes the current [`CaptureParameters`] by value and returns
//! the updated set. Nothing here fails: unsupported requests fall back to the
//! first supported value, and missing capability data leaves the parameter
//! untouched.

use serde::Serialize;

use super::types::{
    AeMode, AePrecaptureTrigger, AfMode, AfTrigger, AntiBandingMode, CapabilitySnapshot,
    ControlMode, FlashMode, FlashState, MeteringRectangle, SensorRect, ZoomCapability,
};

/// Parameters to merge into the next capture request. `None` leaves a key unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CaptureParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_mode: Option<ControlMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub af_mode: Option<AfMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub af_trigger: Option<AfTrigger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ae_mode: Option<AeMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ae_antibanding_mode: Option<AntiBandingMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ae_exposure_compensation: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ae_precapture_trigger: Option<AePrecaptureTrigger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash_mode: Option<FlashMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_ratio: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_region: Option<SensorRect>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub af_regions: Vec<MeteringRectangle>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ae_regions: Vec<MeteringRectangle>,
}

/// The two requests that make up a tap-to-focus.
///
/// `trigger` must be sent once as a single capture to start the AF scan;
/// `settle` then replaces the repeating request so the trigger returns to
/// idle while the new regions stay in effect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusSequence {
    pub trigger: CaptureParameters,
    pub settle: CaptureParameters,
}

/// Pick `requested` if the device lists it, otherwise the first listed mode.
///
/// Returns `None` when the device reported no modes at all, which callers
/// treat as "do not set this parameter".
pub fn select_mode<T: Copy + PartialEq>(requested: T, supported: Option<&[T]>) -> Option<T> {
    let supported = supported?;
    if supported.contains(&requested) {
        Some(requested)
    } else {
        supported.first().copied()
    }
}

/// Builds parameter sets for one opened device.
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    caps: &'a CapabilitySnapshot,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(caps: &'a CapabilitySnapshot) -> Self {
        Self { caps }
    }

    pub fn capabilities(&self) -> &'a CapabilitySnapshot {
        self.caps
    }

    pub fn select_af_mode(&self, requested: AfMode) -> Option<AfMode> {
        let mode = select_mode(requested, self.caps.af_modes.as_deref());
        if mode.is_some() && mode != Some(requested) {
            log::debug!(
                "AF mode {:?} unsupported on camera {}, using {:?}",
                requested,
                self.caps.id,
                mode
            );
        }
        mode
    }

    pub fn select_antibanding_mode(&self, requested: AntiBandingMode) -> Option<AntiBandingMode> {
        let mode = select_mode(requested, self.caps.antibanding_modes.as_deref());
        if mode.is_some() && mode != Some(requested) {
            log::debug!(
                "Anti-banding mode {:?} unsupported on camera {}, using {:?}",
                requested,
                self.caps.id,
                mode
            );
        }
        mode
    }

    /// Baseline for the continuous preview request.
    pub fn preview_parameters(&self, mut params: CaptureParameters) -> CaptureParameters {
        params.af_mode = self.select_af_mode(AfMode::ContinuousPicture);
        params.ae_antibanding_mode = self.select_antibanding_mode(AntiBandingMode::Auto);
        params.control_mode = Some(ControlMode::Auto);
        params.af_trigger = Some(AfTrigger::Idle);
        params
    }

    /// Map a flash request to AE/flash modes.
    ///
    /// Devices without a flash get `params` back unchanged.
    pub fn flash_parameters(
        &self,
        mut params: CaptureParameters,
        state: FlashState,
    ) -> CaptureParameters {
        if !self.caps.flash_supported {
            log::debug!("Camera {} has no flash, ignoring {:?}", self.caps.id, state);
            return params;
        }
        let (ae_mode, flash_mode) = match state {
            FlashState::On => (AeMode::OnAlwaysFlash, FlashMode::Single),
            FlashState::Off => (AeMode::On, FlashMode::Off),
            FlashState::Auto => (AeMode::OnAutoFlash, FlashMode::Single),
            FlashState::Torch => (AeMode::On, FlashMode::Torch),
        };
        params.ae_mode = Some(ae_mode);
        params.flash_mode = Some(flash_mode);
        params.af_trigger = Some(AfTrigger::Idle);
        params
    }

    /// Apply a zoom ratio the caller has already clamped into range.
    ///
    /// Ratio devices take the value directly. Crop devices get a crop region
    /// centered in the active array.
    pub fn zoom_parameters(&self, mut params: CaptureParameters, ratio: f32) -> CaptureParameters {
        if !ratio.is_finite() || ratio <= 0.0 {
            log::debug!("Ignoring invalid zoom ratio {}", ratio);
            return params;
        }
        match self.caps.zoom {
            Some(ZoomCapability::Ratio { .. }) => {
                params.zoom_ratio = Some(ratio);
            }
            Some(ZoomCapability::Crop { .. }) => {
                let Some(array) = self.caps.active_array else {
                    log::debug!("Camera {} has no active array, cannot crop", self.caps.id);
                    return params;
                };
                params.crop_region = Some(crop_region(&array, ratio));
            }
            None => {
                log::debug!("Camera {} reports no zoom capability", self.caps.id);
            }
        }
        params
    }

    /// Two-phase tap-to-focus: trigger the scan, then settle back to idle.
    pub fn focus_parameters(
        &self,
        mut params: CaptureParameters,
        focus: MeteringRectangle,
        exposure: MeteringRectangle,
    ) -> FocusSequence {
        params.af_regions = vec![focus];
        params.ae_regions = vec![exposure];
        params.af_mode = self.select_af_mode(AfMode::Auto);
        params.ae_exposure_compensation = Some(0);
        params.control_mode = Some(ControlMode::Auto);
        params.ae_precapture_trigger = Some(AePrecaptureTrigger::Start);
        params.af_trigger = Some(AfTrigger::Start);

        let mut settle = params.clone();
        settle.af_trigger = Some(AfTrigger::Idle);
        settle.ae_precapture_trigger = Some(AePrecaptureTrigger::Idle);

        FocusSequence {
            trigger: params,
            settle,
        }
    }

    /// Exposure compensation from a slider value in `[-1, 1]`.
    ///
    /// Negative values scale toward the lower bound, positive toward the
    /// upper bound; the result is truncated toward zero. Values outside
    /// `[-1, 1]` extrapolate.
    pub fn exposure_parameters(&self, mut params: CaptureParameters, scale: f32) -> CaptureParameters {
        params.ae_mode = Some(AeMode::On);
        let Some(range) = self.caps.exposure_compensation else {
            log::debug!("Camera {} reports no compensation range", self.caps.id);
            return params;
        };
        let compensation = if scale < 0.0 {
            -(range.lower as f32) * scale
        } else {
            range.upper as f32 * scale
        };
        params.ae_exposure_compensation = Some(compensation as i32);
        params
    }
}

/// Crop region for `ratio` centered in `array`.
///
/// Ratios below 1 would reach past the array, so each half extent is capped
/// at half the array.
pub fn crop_region(array: &SensorRect, ratio: f32) -> SensorRect {
    let (cx, cy) = array.center();
    let half = |extent: i32| {
        let wanted = extent as f64 / (2.0 * ratio as f64);
        wanted.min((extent / 2) as f64) as i32
    };
    let half_width = half(array.width());
    let half_height = half(array.height());
    SensorRect::new(
        cx - half_width,
        cy - half_height,
        cx + half_width,
        cy + half_height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::types::{CompensationRange, Facing};

    fn caps() -> CapabilitySnapshot {
        let mut caps = CapabilitySnapshot::bare("0", Facing::Back);
        caps.af_modes = Some(vec![AfMode::ContinuousPicture, AfMode::Auto]);
        caps.antibanding_modes = Some(vec![AntiBandingMode::Hz50, AntiBandingMode::Auto]);
        caps.zoom = Some(ZoomCapability::Ratio { min: 1.0, max: 8.0 });
        caps.exposure_compensation = Some(CompensationRange {
            lower: -12,
            upper: 12,
        });
        caps.flash_supported = true;
        caps.active_array = Some(SensorRect::new(0, 0, 4000, 3000));
        caps
    }

    fn region(left: i32) -> MeteringRectangle {
        MeteringRectangle {
            rect: SensorRect::new(left, 0, left + 100, 100),
            weight: 1000,
        }
    }

    #[test]
    fn test_select_mode_prefers_requested() {
        assert_eq!(
            select_mode(AfMode::Auto, Some(&[AfMode::Off, AfMode::Auto][..])),
            Some(AfMode::Auto)
        );
    }

    #[test]
    fn test_select_mode_falls_back_to_first() {
        assert_eq!(
            select_mode(AfMode::Macro, Some(&[AfMode::Off, AfMode::Auto][..])),
            Some(AfMode::Off)
        );
    }

    #[test]
    fn test_select_mode_unsupported() {
        assert_eq!(select_mode(AfMode::Auto, Some(&[][..])), None);
        assert_eq!(select_mode::<AfMode>(AfMode::Auto, None), None);
    }

    #[test]
    fn test_preview_parameters() {
        let caps = caps();
        let p = RequestBuilder::new(&caps).preview_parameters(CaptureParameters::default());
        assert_eq!(p.af_mode, Some(AfMode::ContinuousPicture));
        assert_eq!(p.ae_antibanding_mode, Some(AntiBandingMode::Auto));
        assert_eq!(p.control_mode, Some(ControlMode::Auto));
        assert_eq!(p.af_trigger, Some(AfTrigger::Idle));
    }

    #[test]
    fn test_preview_parameters_without_mode_lists() {
        let caps = CapabilitySnapshot::bare("0", Facing::Back);
        let p = RequestBuilder::new(&caps).preview_parameters(CaptureParameters::default());
        assert_eq!(p.af_mode, None);
        assert_eq!(p.ae_antibanding_mode, None);
    }

    #[test]
    fn test_flash_states() {
        let caps = caps();
        let b = RequestBuilder::new(&caps);
        let cases = [
            (FlashState::On, AeMode::OnAlwaysFlash, FlashMode::Single),
            (FlashState::Off, AeMode::On, FlashMode::Off),
            (FlashState::Auto, AeMode::OnAutoFlash, FlashMode::Single),
            (FlashState::Torch, AeMode::On, FlashMode::Torch),
        ];
        for (state, ae, flash) in cases {
            let p = b.flash_parameters(CaptureParameters::default(), state);
            assert_eq!(p.ae_mode, Some(ae));
            assert_eq!(p.flash_mode, Some(flash));
            assert_eq!(p.af_trigger, Some(AfTrigger::Idle));
        }
    }

    #[test]
    fn test_flash_unsupported_returns_input_unchanged() {
        let mut caps = caps();
        caps.flash_supported = false;
        let b = RequestBuilder::new(&caps);
        let input = b.preview_parameters(CaptureParameters {
            af_trigger: Some(AfTrigger::Start),
            ..Default::default()
        });
        for state in [
            FlashState::On,
            FlashState::Off,
            FlashState::Auto,
            FlashState::Torch,
        ] {
            assert_eq!(b.flash_parameters(input.clone(), state), input);
        }
    }

    #[test]
    fn test_zoom_ratio_passthrough() {
        let caps = caps();
        let p = RequestBuilder::new(&caps).zoom_parameters(CaptureParameters::default(), 2.5);
        assert_eq!(p.zoom_ratio, Some(2.5));
        assert_eq!(p.crop_region, None);
    }

    #[test]
    fn test_zoom_crop_region() {
        let mut caps = caps();
        caps.zoom = Some(ZoomCapability::Crop {
            max_digital_zoom: 4.0,
        });
        let p = RequestBuilder::new(&caps).zoom_parameters(CaptureParameters::default(), 2.0);
        assert_eq!(p.zoom_ratio, None);
        assert_eq!(p.crop_region, Some(SensorRect::new(1000, 750, 3000, 2250)));
    }

    #[test]
    fn test_zoom_crop_region_offset_array() {
        let array = SensorRect::new(8, 8, 4008, 3008);
        assert_eq!(crop_region(&array, 1.0), array);
        assert_eq!(crop_region(&array, 4.0), SensorRect::new(1508, 1133, 2508, 1883));
    }

    #[test]
    fn test_zoom_tiny_ratio_crops_to_full_array() {
        let mut caps = caps();
        caps.zoom = Some(ZoomCapability::Crop {
            max_digital_zoom: 4.0,
        });
        let b = RequestBuilder::new(&caps);
        let p = b.zoom_parameters(CaptureParameters::default(), 1e-7);
        assert_eq!(p.crop_region, Some(SensorRect::new(0, 0, 4000, 3000)));

        let p = b.zoom_parameters(CaptureParameters::default(), 0.5);
        assert_eq!(p.crop_region, caps.active_array);
    }

    #[test]
    fn test_zoom_non_positive_is_noop() {
        let caps = caps();
        let b = RequestBuilder::new(&caps);
        let input = b.preview_parameters(CaptureParameters::default());
        assert_eq!(b.zoom_parameters(input.clone(), 0.0), input);
        assert_eq!(b.zoom_parameters(input.clone(), -1.5), input);
        assert_eq!(b.zoom_parameters(input.clone(), f32::NAN), input);
    }

    #[test]
    fn test_zoom_crop_without_active_array_is_noop() {
        let mut caps = caps();
        caps.zoom = Some(ZoomCapability::Crop {
            max_digital_zoom: 4.0,
        });
        caps.active_array = None;
        let p = RequestBuilder::new(&caps).zoom_parameters(CaptureParameters::default(), 2.0);
        assert_eq!(p, CaptureParameters::default());
    }

    #[test]
    fn test_focus_sequence_two_phase() {
        let caps = caps();
        let seq = RequestBuilder::new(&caps).focus_parameters(
            CaptureParameters {
                ae_exposure_compensation: Some(6),
                ..Default::default()
            },
            region(10),
            region(20),
        );

        assert_eq!(seq.trigger.af_trigger, Some(AfTrigger::Start));
        assert_eq!(
            seq.trigger.ae_precapture_trigger,
            Some(AePrecaptureTrigger::Start)
        );
        assert_eq!(seq.trigger.af_mode, Some(AfMode::Auto));
        assert_eq!(seq.trigger.ae_exposure_compensation, Some(0));
        assert_eq!(seq.trigger.control_mode, Some(ControlMode::Auto));

        assert_eq!(seq.settle.af_trigger, Some(AfTrigger::Idle));
        assert_eq!(seq.settle.af_regions, vec![region(10)]);
        assert_eq!(seq.settle.ae_regions, vec![region(20)]);
        assert_eq!(seq.settle.af_mode, Some(AfMode::Auto));
    }

    #[test]
    fn test_focus_af_mode_fallback() {
        let mut caps = caps();
        caps.af_modes = Some(vec![AfMode::Edof]);
        let seq = RequestBuilder::new(&caps).focus_parameters(
            CaptureParameters::default(),
            region(0),
            region(0),
        );
        assert_eq!(seq.trigger.af_mode, Some(AfMode::Edof));
    }

    #[test]
    fn test_exposure_scale_endpoints() {
        let mut caps = caps();
        caps.exposure_compensation = Some(CompensationRange {
            lower: -9,
            upper: 6,
        });
        let b = RequestBuilder::new(&caps);
        let at = |scale| {
            b.exposure_parameters(CaptureParameters::default(), scale)
                .ae_exposure_compensation
        };
        assert_eq!(at(0.0), Some(0));
        assert_eq!(at(1.0), Some(6));
        assert_eq!(at(-1.0), Some(-9));
        assert_eq!(at(0.5), Some(3));
        // truncated toward zero
        assert_eq!(at(-0.5), Some(-4));
        assert_eq!(at(2.0), Some(12));
    }

    #[test]
    fn test_exposure_without_range_sets_only_ae_mode() {
        let mut caps = caps();
        caps.exposure_compensation = None;
        let p = RequestBuilder::new(&caps).exposure_parameters(CaptureParameters::default(), 0.7);
        assert_eq!(p.ae_mode, Some(AeMode::On));
        assert_eq!(p.ae_exposure_compensation, None);
    }

    #[test]
    fn test_parameters_serialize_skip_unset() {
        let p = CaptureParameters {
            zoom_ratio: Some(2.0),
            ..Default::default()
        };
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"zoom_ratio":2.0}"#);
    }
}
