//! # Loveless Flanger: An AU/VST3/CLAP Stereo Flanger Plugin
//!
//! A flanger effect plugin built with [nih-plug](https://github.com/robbert-vdh/nih-plug)
//! for learning DSP fundamentals. Outputs Audio Unit (AUv2), VST3, and CLAP
//! formats from a single codebase.
//!
//! A flanger mixes a signal with a copy of itself delayed by a few
//! milliseconds, and keeps that delay moving. The sum has a row of notches
//! in its spectrum (a comb filter); as the delay sweeps, the notches slide
//! up and down and you hear the characteristic whoosh.
//!
//! ## Signal Flow
//!
//! ```text
//!             LFO ──► 1-5 ms ──► smoother ──┐
//!                                           │ delay time
//! Input ──┬──►(+)──► [Ring Buffer] ──read───┴──► wet ──┬── × dry_wet ──►(+)──► Output
//!         │    ▲                                       │                 ▲
//!         │    └──────────── × feedback ◄──────────────┘                 │
//!         └───────────────────────────────────────── × (1 - dry_wet) ────┘
//! ```
//!
//! The DSP lives in [`flanger`] and [`dsp`] and knows nothing about the
//! host. This file only adapts it to nih-plug.

pub mod dsp;
pub mod error;
pub mod flanger;
pub mod params;
pub mod settings;

use std::num::NonZeroU32;
use std::sync::Arc;

use nih_plug::prelude::*;

pub use error::{PrepareError, ProcessError, StateError};
pub use flanger::{EffectPhase, Flanger, FlangerConfig, MAX_DELAY_SECONDS, MAX_STABLE_FEEDBACK};
pub use params::FlangerParams;
pub use settings::{FlangerSettings, ParamRange, ParamSource};

/// The main plugin struct.
///
/// ## Why separate state from parameters?
///
/// Parameters (`FlangerParams`) are shared with the host via `Arc` and can
/// be read from any thread (the audio thread, the UI thread, the host's
/// automation thread). The flanger's buffers and oscillator are owned
/// exclusively by the audio thread and only touched in `process()`.
/// This separation makes the design thread-safe without locks.
pub struct LovelessFlanger {
    params: Arc<FlangerParams>,

    /// The DSP core. Unconfigured until `initialize()` gives it a sample
    /// rate.
    flanger: Flanger,
}

impl Default for LovelessFlanger {
    fn default() -> Self {
        Self {
            params: Arc::new(FlangerParams::default()),
            flanger: Flanger::default(),
        }
    }
}

impl Plugin for LovelessFlanger {
    const NAME: &'static str = "Loveless Flanger";
    const VENDOR: &'static str = "Loveless Audio";
    const URL: &'static str = "";
    const EMAIL: &'static str = "steve.loveless@gmail.com";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // The flanger is strictly stereo: one LFO sweeps a left and a right
    // delay line together.
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[AudioIOLayout {
        main_input_channels: NonZeroU32::new(2),
        main_output_channels: NonZeroU32::new(2),
        aux_input_ports: &[],
        aux_output_ports: &[],
        names: PortNames::const_default(),
    }];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;

    // The core reads every parameter once per sample anyway, so
    // sample-accurate automation costs nothing extra.
    const SAMPLE_ACCURATE_AUTOMATION: bool = true;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    /// Called when the plugin is first loaded, or when the audio
    /// configuration changes. This is where the delay buffers are
    /// allocated: two seconds of audio per channel at the host's rate.
    ///
    /// Returning `false` tells the host the plugin can't work with this
    /// configuration.
    fn initialize(
        &mut self,
        _audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let sample_rate = buffer_config.sample_rate;
        let max_block_size = buffer_config.max_buffer_size as usize;

        match self.flanger.prepare(sample_rate, max_block_size) {
            Ok(()) => {
                nih_log!(
                    "flanger prepared: {} samples per channel at {sample_rate} Hz",
                    self.flanger.capacity().unwrap_or_default()
                );
                true
            }
            Err(err) => {
                nih_error!("cannot initialize flanger: {err}");
                false
            }
        }
    }

    /// Called when playback stops or the plugin is bypassed. Clears the
    /// buffers so old audio doesn't bleed into the next playback.
    fn reset(&mut self) {
        self.flanger.reset();
    }

    /// Called when the host is done with the plugin for now. The buffers
    /// are freed; `initialize()` allocates them again if needed.
    fn deactivate(&mut self) {
        self.flanger.release();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        let result = match buffer.as_slice() {
            [left, right] => self
                .flanger
                .process_block(left, right, self.params.as_ref()),
            _ => {
                nih_debug_assert_failure!("flanger expects exactly two channels");
                return ProcessStatus::Normal;
            }
        };

        if let Err(err) = result {
            nih_debug_assert_failure!("flanger refused a block: {err}");
            for channel in buffer.as_slice() {
                channel.fill(0.0);
            }
            return ProcessStatus::Normal;
        }

        // Keep the host calling process() after the input goes silent so
        // the feedback loop can ring out.
        ProcessStatus::Tail(self.flanger.tail_samples(self.params.feedback.value()))
    }
}

// ─────────────────────────────────────────────────────────────────────
// Plugin format trait implementations
// ─────────────────────────────────────────────────────────────────────

impl ClapPlugin for LovelessFlanger {
    const CLAP_ID: &'static str = "com.loveless-audio.loveless-flanger";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("A stereo flanger with LFO-swept delay and feedback, built for learning DSP");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Flanger,
    ];
}

impl Vst3Plugin for LovelessFlanger {
    const VST3_CLASS_ID: [u8; 16] = *b"LvlssFlanger_v01";

    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Modulation];
}

// ─────────────────────────────────────────────────────────────────────
// Export macros
// ─────────────────────────────────────────────────────────────────────
//
// nih_export_clap! exports the `clap_entry` symbol for CLAP hosts.
// nih_export_vst3! exports `GetPluginFactory` for VST3 hosts.
// clap_wrapper re-exports the CLAP entry point as AUv2 so Logic Pro
// (Audio Units only) can load it.

nih_export_clap!(LovelessFlanger);
nih_export_vst3!(LovelessFlanger);

clap_wrapper::export_auv2!();
