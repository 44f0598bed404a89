//! # Flanger Settings
//!
//! The six control values the DSP core reads every sample, as a plain
//! `Copy` record. The host-facing [`FlangerParams`](crate::params::FlangerParams)
//! turns its atomics into one of these via [`ParamSource`]; tests and
//! offline rendering hand the core a fixed `FlangerSettings` directly.
//!
//! This is also the shape of the saved state: [`FlangerSettings::to_bytes`]
//! and [`FlangerSettings::from_bytes`] convert to and from an opaque byte
//! block (JSON under the hood, keyed by the same ids the host sees).

use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Bounds and default of one control value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl ParamRange {
    const fn new(min: f32, max: f32, default: f32) -> Self {
        Self { min, max, default }
    }

    /// Clamp into `[min, max]`. Non-finite values fall back to the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_finite() {
            value.clamp(self.min, self.max)
        } else {
            self.default
        }
    }
}

pub const DRY_WET: ParamRange = ParamRange::new(0.0, 1.0, 0.3);
pub const DEPTH: ParamRange = ParamRange::new(0.0, 1.0, 0.3);
pub const RATE_HZ: ParamRange = ParamRange::new(0.1, 20.0, 0.5);
pub const FEEDBACK: ParamRange = ParamRange::new(0.01, 0.99, 0.2);
/// Radians. The range stops at 5 rather than 2π, so the knob covers a
/// little less than a full cycle.
pub const PHASE_OFFSET: ParamRange = ParamRange::new(0.0, 5.0, 0.0);
pub const AMPLITUDE: ParamRange = ParamRange::new(0.01, 3.0, 1.0);

/// A snapshot of every control value.
///
/// The core never clamps these on read (apart from feedback, see
/// [`MAX_STABLE_FEEDBACK`](crate::flanger::MAX_STABLE_FEEDBACK)). Whoever
/// publishes them is responsible for staying in range; use
/// [`clamped()`](Self::clamped) for that.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlangerSettings {
    #[serde(rename = "drywet")]
    pub dry_wet: f32,
    pub depth: f32,
    #[serde(rename = "rate")]
    pub rate_hz: f32,
    pub feedback: f32,
    #[serde(rename = "phaseoffset")]
    pub phase_offset: f32,
    pub amplitude: f32,
}

impl Default for FlangerSettings {
    fn default() -> Self {
        Self {
            dry_wet: DRY_WET.default,
            depth: DEPTH.default,
            rate_hz: RATE_HZ.default,
            feedback: FEEDBACK.default,
            phase_offset: PHASE_OFFSET.default,
            amplitude: AMPLITUDE.default,
        }
    }
}

impl FlangerSettings {
    /// A copy with every value forced into its range.
    pub fn clamped(&self) -> Self {
        Self {
            dry_wet: DRY_WET.clamp(self.dry_wet),
            depth: DEPTH.clamp(self.depth),
            rate_hz: RATE_HZ.clamp(self.rate_hz),
            feedback: FEEDBACK.clamp(self.feedback),
            phase_offset: PHASE_OFFSET.clamp(self.phase_offset),
            amplitude: AMPLITUDE.clamp(self.amplitude),
        }
    }

    /// Serialize to an opaque byte block for the host to store.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StateError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Restore from a block produced by [`to_bytes()`](Self::to_bytes).
    ///
    /// Missing values take their defaults and out-of-range values are
    /// clamped, so a block from an older or hand-edited preset still
    /// loads.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StateError> {
        let settings: Self = serde_json::from_slice(bytes)?;
        Ok(settings.clamped())
    }
}

/// Where the core gets its control values from, once per sample.
///
/// Implementations must be cheap and must not block or allocate: this is
/// called on the audio thread.
pub trait ParamSource {
    fn settings(&self) -> FlangerSettings;
}

impl ParamSource for FlangerSettings {
    fn settings(&self) -> FlangerSettings {
        *self
    }
}
