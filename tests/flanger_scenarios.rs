//! End-to-end tests that drive the flanger the way a host would:
//! prepare once, then feed it blocks.

use loveless_flanger::{
    EffectPhase, Flanger, FlangerConfig, FlangerParams, FlangerSettings, LovelessFlanger,
};
use nih_plug::prelude::*;

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK: usize = 512;

/// Feedback, modulation and dry signal all off: only the pure delay.
fn pure_delay() -> FlangerSettings {
    FlangerSettings {
        dry_wet: 1.0,
        depth: 0.0,
        feedback: 0.0,
        ..FlangerSettings::default()
    }
}

/// A delay held at exactly one second (48000 samples) turns a single
/// impulse into a single echo 48000 samples later, and nothing else.
#[test]
fn test_impulse_echoes_after_one_second() {
    // A zero smoothing coefficient pins the delay at its reset value of
    // one second.
    let mut flanger = Flanger::new(FlangerConfig {
        smoothing_coefficient: 0.0,
        ..FlangerConfig::default()
    });
    flanger.prepare(SAMPLE_RATE, BLOCK).unwrap();
    assert_eq!(flanger.capacity(), Some(96000));
    assert_eq!(flanger.delay_time(), Some(1.0));

    let total = 100_000;
    let mut output = Vec::with_capacity(total);
    let settings = pure_delay();

    let mut n = 0;
    while n < total {
        let len = BLOCK.min(total - n);
        let mut left: Vec<f32> = (n..n + len).map(|i| if i == 0 { 1.0 } else { 0.0 }).collect();
        let mut right = left.clone();
        flanger.process_block(&mut left, &mut right, &settings).unwrap();

        for (l, r) in left.iter().zip(right.iter()) {
            assert_eq!(l, r, "channels diverged at sample {}", output.len());
            output.push(*l);
        }
        n += len;
    }

    for (i, &sample) in output.iter().enumerate() {
        if i == 48000 {
            assert!((sample - 1.0).abs() < 1e-3, "Expected the echo, got {sample}");
        } else {
            assert!(sample.abs() < 1e-6, "Expected silence at {i}, got {sample}");
        }
    }
    assert_eq!(flanger.phase(), EffectPhase::Processing);
}

/// Variable block sizes are just a way of slicing the same stream.
#[test]
fn test_block_size_does_not_change_output() {
    let input: Vec<f32> = (0..6000)
        .map(|i| ((i * 7919) % 2001) as f32 / 1000.0 - 1.0)
        .collect();
    let settings = FlangerSettings {
        dry_wet: 0.5,
        depth: 0.8,
        rate_hz: 2.0,
        feedback: 0.7,
        phase_offset: 0.4,
        amplitude: 1.0,
    };

    let render = |block_sizes: &[usize]| {
        let mut flanger = Flanger::default();
        flanger.prepare(SAMPLE_RATE, BLOCK).unwrap();
        let mut left = input.clone();
        let mut right = input.clone();
        let mut start = 0;
        let mut sizes = block_sizes.iter().cycle();
        while start < input.len() {
            let len = (*sizes.next().unwrap()).min(input.len() - start);
            flanger
                .process_block(
                    &mut left[start..start + len],
                    &mut right[start..start + len],
                    &settings,
                )
                .unwrap();
            start += len;
        }
        left
    };

    let whole = render(&[BLOCK]);
    let ragged = render(&[1, 64, 13, 512, 100]);
    assert_eq!(whole, ragged);
}

/// A sample-rate change reallocates the buffers and starts over.
#[test]
fn test_reprepare_at_new_sample_rate() {
    let mut flanger = Flanger::default();
    flanger.prepare(44100.0, BLOCK).unwrap();
    assert_eq!(flanger.capacity(), Some(88200));

    let mut left = vec![0.5; BLOCK];
    let mut right = vec![0.5; BLOCK];
    flanger
        .process_block(&mut left, &mut right, &FlangerSettings::default())
        .unwrap();

    flanger.prepare(96000.0, BLOCK).unwrap();
    assert_eq!(flanger.capacity(), Some(192000));
    assert_eq!(flanger.phase(), EffectPhase::Prepared);
    assert_eq!(flanger.delay_time(), Some(1.0));
    assert_eq!(flanger.sample_rate(), Some(96000.0));
}

/// The host-facing parameters feed the core directly.
#[test]
fn test_params_drive_the_core() {
    let params = FlangerParams::default();
    let mut flanger = Flanger::default();
    flanger.prepare(SAMPLE_RATE, BLOCK).unwrap();

    let mut left = vec![0.25; BLOCK];
    let mut right = vec![0.25; BLOCK];
    flanger.process_block(&mut left, &mut right, &params).unwrap();

    // Default dry/wet is 0.3, and the wet path is still reading silence
    // about a second back.
    for &s in &left {
        assert!((s - 0.25 * 0.7).abs() < 1e-6);
    }
}

#[test]
fn test_saved_state_restores_snapshot() {
    let params = FlangerParams::default();
    let bytes = params.snapshot().to_bytes().unwrap();
    let restored = FlangerSettings::from_bytes(&bytes).unwrap();
    assert_eq!(restored, FlangerSettings::default());
}

#[test]
fn test_plugin_constants() {
    assert_eq!(LovelessFlanger::NAME, "Loveless Flanger");
    assert!(!LovelessFlanger::CLAP_ID.is_empty());
    assert_eq!(LovelessFlanger::VST3_CLASS_ID.len(), 16);

    let layout = &LovelessFlanger::AUDIO_IO_LAYOUTS[0];
    assert_eq!(layout.main_input_channels.map(|c| c.get()), Some(2));
    assert_eq!(layout.main_output_channels.map(|c| c.get()), Some(2));

    let plugin = LovelessFlanger::default();
    assert_eq!(plugin.params().param_map().len(), 6);
}
