//! # Delay-Time Smoother
//!
//! The LFO hands us a new target delay every sample. Jumping the read head
//! straight to each target would be fine for a smooth sine, but the target
//! also jumps whenever the user moves the depth, amplitude or phase-offset
//! knobs, and a read head that leaps across the buffer produces a click.
//! So the delay time chases its target through a one-pole lowpass:
//!
//! ```text
//! delay[n] = delay[n-1] - c * (delay[n-1] - target[n])
//! ```
//!
//! which is the same equation as `y[n] = (1 - c) * y[n-1] + c * x[n]`,
//! the classic one-pole filter, written as "move a fraction `c` of the
//! remaining distance".
//!
//! ## Why a Fixed Per-Sample Coefficient?
//!
//! `c = 0.001` per sample. That is a time constant of 1000 samples, so the
//! glide takes about 21 ms at 48 kHz and about 10 ms at 96 kHz. The sound
//! therefore shifts slightly with the sample rate. The coefficient lives
//! in [`FlangerConfig`](crate::FlangerConfig) for callers who want to
//! change that.
//!
//! A coefficient of 0 freezes the delay at its current value.

/// Fraction of the remaining distance covered each sample.
pub const DEFAULT_SMOOTHING_COEFFICIENT: f32 = 0.001;

/// Delay time the smoother starts from after a reset, in seconds.
pub const INITIAL_DELAY_SECONDS: f32 = 1.0;

/// One-pole lowpass over the flanger's delay time, in seconds.
#[derive(Debug, Clone)]
pub struct DelayTimeSmoother {
    coefficient: f32,

    /// The smoothed delay time. This is the filter's only state.
    current: f32,
}

impl DelayTimeSmoother {
    pub fn new(coefficient: f32) -> Self {
        Self {
            coefficient: coefficient.clamp(0.0, 1.0),
            current: INITIAL_DELAY_SECONDS,
        }
    }

    /// Move one sample's worth toward `target` and return the new delay
    /// time in seconds.
    pub fn next(&mut self, target: f32) -> f32 {
        self.current -= self.coefficient * (self.current - target);
        self.current
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// Jump straight to `seconds`, skipping the glide.
    pub fn set_current(&mut self, seconds: f32) {
        self.current = seconds;
    }

    pub fn reset(&mut self) {
        self.current = INITIAL_DELAY_SECONDS;
    }
}

impl Default for DelayTimeSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_COEFFICIENT)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
