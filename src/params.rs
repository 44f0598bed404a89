//! # Plugin Parameters
//!
//! Parameters are the knobs and sliders the user sees in the DAW. Each
//! parameter has:
//!
//! - A **unique string ID** (`#[id = "..."]`) that the host uses to
//!   save and recall presets. Once published, never change these IDs
//!   or existing presets will break.
//! - A **human-readable name** shown in the DAW's UI.
//! - A **range** and a **default value**, both taken from
//!   [`crate::settings`] so the host and the DSP core agree on them.
//!
//! ## No Parameter Smoothers
//!
//! Unlike most plugins, none of these parameters carries an nih-plug
//! smoother. The audio thread reads the raw value every sample with a
//! single atomic load, and the one value that would click if it jumped,
//! the delay time, is smoothed inside the DSP core after the LFO.

use nih_plug::prelude::*;

use crate::settings::{
    FlangerSettings, ParamRange, ParamSource, AMPLITUDE, DEPTH, DRY_WET, FEEDBACK,
    PHASE_OFFSET, RATE_HZ,
};

/// All user-facing parameters for the Loveless Flanger plugin.
///
/// The `#[derive(Params)]` macro registers these parameters with the host
/// DAW and handles serialization for presets and project state.
#[derive(Params)]
pub struct FlangerParams {
    /// **Dry/Wet**: balance between the original and the flanged signal.
    ///
    /// The classic flanger sound comes from the *sum* of the two, so the
    /// notches are deepest at 50%. At 100% you hear only the swept delay,
    /// which sounds like gentle vibrato.
    #[id = "drywet"]
    pub dry_wet: FloatParam,

    /// **Depth**: how far the LFO swings the delay time.
    #[id = "depth"]
    pub depth: FloatParam,

    /// **Rate**: LFO speed in Hz. Slow rates (under 1 Hz) give the
    /// classic jet sweep; fast rates turn into a warble.
    #[id = "rate"]
    pub rate: FloatParam,

    /// **Feedback**: how much of the delayed signal is fed back into the
    /// delay line. More feedback means sharper, more metallic resonances.
    ///
    /// Capped at 99%. At 100% the loop would never decay.
    #[id = "feedback"]
    pub feedback: FloatParam,

    /// **Phase Offset**: where in its cycle the LFO sine starts, in
    /// radians.
    #[id = "phaseoffset"]
    pub phase_offset: FloatParam,

    /// **Amplitude**: scales the LFO before depth. Above 1.0 the sweep
    /// overshoots the usual 1-5 ms window.
    #[id = "amplitude"]
    pub amplitude: FloatParam,
}

fn linear(range: ParamRange) -> FloatRange {
    FloatRange::Linear {
        min: range.min,
        max: range.max,
    }
}

fn percentage_param(name: &str, range: ParamRange) -> FloatParam {
    FloatParam::new(name, range.default, linear(range))
        .with_unit("%")
        .with_value_to_string(formatters::v2s_f32_percentage(1))
        .with_string_to_value(formatters::s2v_f32_percentage())
}

impl Default for FlangerParams {
    fn default() -> Self {
        Self {
            dry_wet: percentage_param("Dry/Wet", DRY_WET),
            depth: percentage_param("Depth", DEPTH),
            feedback: percentage_param("Feedback", FEEDBACK),

            rate: FloatParam::new("Rate", RATE_HZ.default, linear(RATE_HZ))
                .with_unit(" Hz")
                .with_step_size(0.01)
                .with_value_to_string(formatters::v2s_f32_rounded(2)),

            phase_offset: FloatParam::new("Phase Offset", PHASE_OFFSET.default, linear(PHASE_OFFSET))
                .with_unit(" rad")
                .with_value_to_string(formatters::v2s_f32_rounded(2)),

            amplitude: FloatParam::new("Amplitude", AMPLITUDE.default, linear(AMPLITUDE))
                .with_value_to_string(formatters::v2s_f32_rounded(2)),
        }
    }
}

impl FlangerParams {
    /// The current value of every parameter, e.g. for saving a preset.
    pub fn snapshot(&self) -> FlangerSettings {
        FlangerSettings {
            dry_wet: self.dry_wet.value(),
            depth: self.depth.value(),
            rate_hz: self.rate.value(),
            feedback: self.feedback.value(),
            phase_offset: self.phase_offset.value(),
            amplitude: self.amplitude.value(),
        }
    }
}

/// Each `value()` is a relaxed atomic load, so this is safe to call from
/// the audio thread while the host or GUI writes new values. The six
/// loads are independent; a snapshot may mix values from different
/// moments, which is fine for knob movements.
impl ParamSource for FlangerParams {
    fn settings(&self) -> FlangerSettings {
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_core() {
        let params = FlangerParams::default();
        assert_eq!(params.snapshot(), FlangerSettings::default());
    }

    #[test]
    fn test_ids_are_stable() {
        let params = FlangerParams::default();
        let ids: Vec<String> = params.param_map().into_iter().map(|(id, _, _)| id).collect();
        for id in ["drywet", "depth", "rate", "feedback", "phaseoffset", "amplitude"] {
            assert!(ids.iter().any(|i| i == id), "missing parameter id {id}");
        }
        assert_eq!(ids.len(), 6);
    }
}
