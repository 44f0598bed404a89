//! # Low-Frequency Oscillator
//!
//! The LFO is what turns a plain short delay into a flanger. It produces a
//! slow sine wave (0.1 to 20 Hz) that sweeps the delay time between 1 and
//! 5 ms. As the delay moves, the comb-filter notches it creates slide up
//! and down the spectrum, giving the familiar "jet plane" whoosh.
//!
//! ## Phase Accumulator
//!
//! Rather than tracking time in seconds, the oscillator keeps a *phase*
//! in `[0, 1)`: the fraction of one cycle completed so far. Every sample
//! it moves forward by
//!
//! ```text
//! increment = rate_hz / sample_rate
//! ```
//!
//! so at 1 Hz and 48 kHz the phase takes exactly 48000 samples to go
//! around once. When the phase passes 1.0 we drop the whole cycles and
//! keep the fraction.
//!
//! ## From LFO to Delay Time
//!
//! ```text
//! lfo   = amplitude * sin(2π * phase + phase_offset) * depth
//! delay = map(lfo, [-1, 1] → [1 ms, 5 ms])
//! ```
//!
//! The mapping domain is fixed at `[-1, 1]`. With amplitude above 1 the
//! LFO can leave that domain, and the delay is extrapolated past the
//! 1-5 ms window rather than clamped.

use std::f32::consts::TAU;

/// Shortest delay of the flanger sweep, in seconds.
pub const MIN_SWEEP_SECONDS: f32 = 0.001;

/// Longest delay of the flanger sweep, in seconds.
pub const MAX_SWEEP_SECONDS: f32 = 0.005;

/// A sine LFO driven by a phase accumulator.
#[derive(Debug, Clone, Default)]
pub struct Lfo {
    /// Fraction of the current cycle, always in `[0, 1)`.
    phase: f32,
}

impl Lfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Move the phase forward by one sample and return the new phase.
    ///
    /// The wrap keeps only the fractional part, so the phase stays in
    /// `[0, 1)` even if `rate_hz / sample_rate` is 1 or more (which a
    /// single "subtract one" wrap would not survive).
    pub fn advance(&mut self, rate_hz: f32, sample_rate: f32) -> f32 {
        let phase = self.phase + rate_hz / sample_rate;
        self.phase = phase - phase.floor();
        self.phase
    }

    /// The modulation value at the current phase.
    pub fn output(&self, amplitude: f32, depth: f32, phase_offset: f32) -> f32 {
        amplitude * (TAU * self.phase + phase_offset).sin() * depth
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Map an LFO value from `[-1, 1]` onto the 1-5 ms sweep window.
///
/// Values outside `[-1, 1]` extrapolate linearly.
#[inline]
pub fn lfo_to_delay_seconds(lfo: f32) -> f32 {
    MIN_SWEEP_SECONDS + (lfo + 1.0) * 0.5 * (MAX_SWEEP_SECONDS - MIN_SWEEP_SECONDS)
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
