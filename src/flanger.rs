//! # The Flanger Core
//!
//! Everything that happens to a sample between the host handing it to us
//! and us handing it back. This module knows nothing about nih-plug: it
//! works on two plain `&mut [f32]` channel slices and reads its control
//! values through [`ParamSource`], which keeps it testable without a host.
//!
//! ## Per-Sample Pipeline
//!
//! ```text
//!            ┌────────────── shared by both channels ───────────────┐
//!            │ LFO ──► map to 1-5 ms ──► smoother ──► delay (samples)│
//!            └──────────────────────────────┬───────────────────────┘
//!                                           │
//! Input ──┬──►(+)──► [Delay Line] ──read────┴──► wet ──┬── × dry_wet ──►(+)──► Output
//!         │    ▲                                       │                 ▲
//!         │    └────────────── × feedback ◄────────────┘                 │
//!         └──────────────────────────────────────── × (1 - dry_wet) ─────┘
//! ```
//!
//! One LFO and one smoothed delay time drive both channels, so left and
//! right sweep together. Each channel has its own delay line and its own
//! feedback memory.
//!
//! ## Lifecycle
//!
//! ```text
//! Unconfigured ──prepare()──► Prepared ──process_block()──► Processing
//!      ▲                         │                              │
//!      └────────release()────────┴──────────────────────────────┘
//! ```
//!
//! `prepare()` is the only place that allocates. `process_block()` refuses
//! to run in the `Unconfigured` state instead of touching buffers that do
//! not exist.

use std::num::NonZeroUsize;

use crate::dsp::delay_line::DelayLine;
use crate::dsp::lfo::{lfo_to_delay_seconds, Lfo, MAX_SWEEP_SECONDS};
use crate::dsp::smoother::{DelayTimeSmoother, DEFAULT_SMOOTHING_COEFFICIENT};
use crate::error::{PrepareError, ProcessError};
use crate::settings::{FlangerSettings, ParamSource};

/// Longest delay the buffers can hold, in seconds.
pub const MAX_DELAY_SECONDS: f32 = 2.0;

/// Feedback is clamped to this inside the core. At 1.0 the loop would
/// never decay; above it the signal grows without bound.
pub const MAX_STABLE_FEEDBACK: f32 = 0.99;

/// Fixed configuration, chosen when the effect is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlangerConfig {
    /// Buffer length per channel, in seconds.
    pub max_delay_seconds: f32,

    /// Per-sample coefficient of the delay-time smoother. 0 holds the
    /// delay time where it is.
    pub smoothing_coefficient: f32,
}

impl Default for FlangerConfig {
    fn default() -> Self {
        Self {
            max_delay_seconds: MAX_DELAY_SECONDS,
            smoothing_coefficient: DEFAULT_SMOOTHING_COEFFICIENT,
        }
    }
}

/// Where the effect is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectPhase {
    Unconfigured,
    Prepared,
    Processing,
}

/// Output = dry × (1 - dry_wet) + wet × dry_wet.
///
/// At `dry_wet = 0` this is exactly the dry input; at `dry_wet = 1`
/// exactly the wet signal.
#[inline]
pub fn mix(dry: f32, wet: f32, dry_wet: f32) -> f32 {
    dry * (1.0 - dry_wet) + wet * dry_wet
}

/// Samples it takes the feedback loop to fall to -60 dB, assuming the
/// longest delay of the sweep.
///
/// Each pass through the loop scales the signal by `feedback`, so after N
/// passes the level is `feedback^N`. Solving `feedback^N = 0.001` gives
/// `N = -3 / log10(feedback)`.
pub fn tail_samples(feedback: f32, sample_rate: f32) -> u32 {
    let delay_samps = MAX_SWEEP_SECONDS * sample_rate;
    let feedback = feedback.clamp(0.0, MAX_STABLE_FEEDBACK);

    if feedback > 0.001 {
        let repeats = -3.0 / feedback.log10(); // log10(0.001) = -3
        (repeats * delay_samps).ceil() as u32
    } else {
        delay_samps.ceil() as u32
    }
}

/// One channel's private state.
struct Channel {
    delay_line: DelayLine,

    /// Last interpolated read × feedback gain. Added to the *next* input
    /// before it is written.
    feedback: f32,
}

impl Channel {
    fn new(capacity: NonZeroUsize) -> Self {
        Self {
            delay_line: DelayLine::new(capacity),
            feedback: 0.0,
        }
    }

    fn clear(&mut self) {
        self.delay_line.clear();
        self.feedback = 0.0;
    }
}

/// Everything that exists only between `prepare()` and `release()`.
struct Prepared {
    sample_rate: f32,
    max_block_size: Option<NonZeroUsize>,
    channels: [Channel; 2],
    lfo: Lfo,
    smoother: DelayTimeSmoother,
    processing: bool,
}

impl Prepared {
    /// Run one stereo frame through the pipeline.
    #[inline]
    fn tick(&mut self, frame: [f32; 2], settings: &FlangerSettings) -> [f32; 2] {
        // The LFO is sampled at its current phase, then moved on.
        let lfo = self
            .lfo
            .output(settings.amplitude, settings.depth, settings.phase_offset);
        self.lfo.advance(settings.rate_hz, self.sample_rate);

        let delay_seconds = self.smoother.next(lfo_to_delay_seconds(lfo));
        let delay_samples = self.sample_rate * delay_seconds;

        let feedback_gain = settings.feedback.clamp(0.0, MAX_STABLE_FEEDBACK);

        let mut out = frame;
        for (channel, sample) in self.channels.iter_mut().zip(out.iter_mut()) {
            let input = *sample;

            // Write first, then read: with a zero delay the read returns
            // the sample just written.
            channel.delay_line.write(input + channel.feedback);
            let wet = channel.delay_line.read(delay_samples);
            channel.feedback = wet * feedback_gain;

            *sample = mix(input, wet, settings.dry_wet);

            channel.delay_line.advance();
        }
        out
    }

    fn reset(&mut self) {
        for channel in &mut self.channels {
            channel.clear();
        }
        self.lfo.reset();
        self.smoother.reset();
        self.processing = false;
    }
}

/// A stereo flanger.
pub struct Flanger {
    config: FlangerConfig,
    state: Option<Prepared>,
}

impl Default for Flanger {
    fn default() -> Self {
        Self::new(FlangerConfig::default())
    }
}

impl Flanger {
    /// Create an unconfigured flanger. Nothing is allocated until
    /// [`prepare()`](Self::prepare).
    pub fn new(config: FlangerConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    pub fn config(&self) -> &FlangerConfig {
        &self.config
    }

    pub fn phase(&self) -> EffectPhase {
        match &self.state {
            None => EffectPhase::Unconfigured,
            Some(prepared) if prepared.processing => EffectPhase::Processing,
            Some(_) => EffectPhase::Prepared,
        }
    }

    pub fn is_prepared(&self) -> bool {
        self.state.is_some()
    }

    /// Samples per channel of the delay buffers, if allocated.
    pub fn capacity(&self) -> Option<usize> {
        self.state
            .as_ref()
            .map(|prepared| prepared.channels[0].delay_line.capacity())
    }

    pub fn sample_rate(&self) -> Option<f32> {
        self.state.as_ref().map(|prepared| prepared.sample_rate)
    }

    /// The current smoothed delay time in seconds, if prepared.
    pub fn delay_time(&self) -> Option<f32> {
        self.state.as_ref().map(|prepared| prepared.smoother.current())
    }

    /// Allocate zero-filled buffers of `floor(sample_rate × max_delay)`
    /// samples per channel and reset all runtime state.
    ///
    /// Calling this again (e.g., after a sample-rate change) replaces the
    /// old buffers. On error the effect is left unconfigured.
    ///
    /// `max_block_size` is the largest block `process_block()` will
    /// accept; 0 means no limit.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize) -> Result<(), PrepareError> {
        self.state = None;

        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(PrepareError::InvalidSampleRate(sample_rate));
        }
        let max_delay_seconds = self.config.max_delay_seconds;
        if !max_delay_seconds.is_finite() || max_delay_seconds <= 0.0 {
            return Err(PrepareError::InvalidMaxDelay(max_delay_seconds));
        }

        let capacity = (f64::from(sample_rate) * f64::from(max_delay_seconds)).floor() as usize;
        let capacity = NonZeroUsize::new(capacity).ok_or(PrepareError::ZeroCapacity {
            sample_rate,
            max_delay_seconds,
        })?;

        self.state = Some(Prepared {
            sample_rate,
            max_block_size: NonZeroUsize::new(max_block_size),
            channels: [Channel::new(capacity), Channel::new(capacity)],
            lfo: Lfo::new(),
            smoother: DelayTimeSmoother::new(self.config.smoothing_coefficient),
            processing: false,
        });
        Ok(())
    }

    /// Free the buffers. Safe to call any number of times.
    pub fn release(&mut self) {
        self.state = None;
    }

    /// Silence the buffers and restart the LFO and smoother without
    /// reallocating. Does nothing when unconfigured.
    pub fn reset(&mut self) {
        if let Some(prepared) = &mut self.state {
            prepared.reset();
        }
    }

    /// Jump the smoothed delay time to `seconds`, skipping the glide.
    pub fn set_delay_time(&mut self, seconds: f32) -> Result<(), ProcessError> {
        let prepared = self.state.as_mut().ok_or(ProcessError::NotPrepared)?;
        prepared.smoother.set_current(seconds);
        Ok(())
    }

    /// Process one stereo frame and return the output frame.
    pub fn process_frame(
        &mut self,
        left: f32,
        right: f32,
        settings: &FlangerSettings,
    ) -> Result<(f32, f32), ProcessError> {
        let prepared = self.state.as_mut().ok_or(ProcessError::NotPrepared)?;
        prepared.processing = true;
        let [left, right] = prepared.tick([left, right], settings);
        Ok((left, right))
    }

    /// Process a block in place.
    ///
    /// `params` is asked for fresh settings before every frame, so a knob
    /// turned mid-block takes effect on the next sample. The block is
    /// checked up front; once the loop starts it runs to the end without
    /// allocating, locking or failing.
    pub fn process_block(
        &mut self,
        left: &mut [f32],
        right: &mut [f32],
        params: &impl ParamSource,
    ) -> Result<(), ProcessError> {
        let prepared = self.state.as_mut().ok_or(ProcessError::NotPrepared)?;

        if left.len() != right.len() {
            return Err(ProcessError::ChannelLengthMismatch {
                left: left.len(),
                right: right.len(),
            });
        }
        if let Some(max) = prepared.max_block_size {
            if left.len() > max.get() {
                return Err(ProcessError::BlockTooLarge {
                    len: left.len(),
                    max: max.get(),
                });
            }
        }

        prepared.processing = true;
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let settings = params.settings();
            [*l, *r] = prepared.tick([*l, *r], &settings);
        }
        Ok(())
    }

    /// Tail length for the host at the given feedback, or 0 when
    /// unconfigured.
    pub fn tail_samples(&self, feedback: f32) -> u32 {
        self.state
            .as_ref()
            .map_or(0, |prepared| tail_samples(feedback, prepared.sample_rate))
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
