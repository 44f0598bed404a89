//! # Delay Line (Ring Buffer)
//!
//! A delay line stores audio samples and lets you read them back after a
//! specified time delay. In a flanger the delay is tiny (1-5 ms) and it
//! never stands still: the LFO sweeps it back and forth, so almost every
//! read lands *between* two stored samples.
//!
//! ## How a Ring Buffer Works
//!
//! Imagine a circular tape loop. A "write head" records incoming audio
//! onto the tape, and a "read head" plays it back from a position further
//! behind on the tape. The distance between the two heads determines the
//! delay time.
//!
//! Each time we process one audio sample:
//!
//! 1. Write the new sample (input + feedback) at `write_pos`.
//! 2. Read the delayed sample from `write_pos - delay_in_samples`,
//!    wrapping around to the end of the buffer if we go past the start.
//! 3. Advance `write_pos` by 1, wrapping back to 0 at the end.
//!
//! Note the order: the flanger writes *before* it reads, so a delay of
//! zero samples returns the sample that was just written.
//!
//! ## Linear Interpolation
//!
//! For a read head at position 441.3:
//! - `sample_x` is at position 441 (weight 0.7)
//! - `sample_x1` is at position 442 (weight 0.3)
//! - `result = sample_x * 0.7 + sample_x1 * 0.3`
//!
//! Both positions are wrapped into the buffer. Position 442 may well be
//! "one past the end", in which case it is really position 0.

use std::num::NonZeroUsize;

/// Blend two neighbouring samples at fractional position `frac`.
///
/// `frac = 0.0` gives `sample_x`, `frac = 1.0` gives `sample_x1`, and
/// `frac = 0.5` gives their average.
#[inline]
pub fn linear_interp(sample_x: f32, sample_x1: f32, frac: f32) -> f32 {
    (1.0 - frac) * sample_x + frac * sample_x1
}

/// Where an interpolated read lands in the buffer.
///
/// Both indices are always `< capacity`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadPosition {
    pub index: usize,
    pub next: usize,
    pub frac: f32,
}

/// A fixed-capacity ring buffer that functions as an audio delay line.
///
/// The buffer is allocated once, when the host tells us the sample rate,
/// and never resized afterwards. A boxed slice rather than a `Vec` makes
/// that explicit: there is no `push` to call by accident on the audio
/// thread.
pub struct DelayLine {
    /// All values start at 0.0 (silence).
    buffer: Box<[f32]>,

    /// Where the next incoming sample will be stored. Always `< capacity`.
    write_pos: usize,

    capacity: NonZeroUsize,
}

impl DelayLine {
    /// Create a zero-filled delay line holding `capacity` samples.
    ///
    /// `NonZeroUsize` rules out the zero-length buffer, which would make
    /// every index computation below meaningless.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            buffer: vec![0.0; capacity.get()].into_boxed_slice(),
            write_pos: 0,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// Store `sample` at the current write position.
    ///
    /// This does NOT advance the write position. Call
    /// [`advance()`](Self::advance) once the read for this sample is done.
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
    }

    /// Work out which two slots a read `delay_samples` behind the write
    /// head touches, and how far between them it falls.
    ///
    /// The read head is wrapped with a Euclidean remainder rather than a
    /// single "add the length if negative" step, so a delay longer than
    /// the buffer, or a negative delay produced by an extreme LFO setting,
    /// still resolves to valid indices.
    pub fn read_position(&self, delay_samples: f32) -> ReadPosition {
        let len = self.capacity.get();
        let read_head = (self.write_pos as f32 - delay_samples).rem_euclid(len as f32);

        // `read_head` is non-negative, so the cast truncates toward zero,
        // which is the same as `floor`.
        let mut index = read_head as usize;
        let frac = read_head - index as f32;

        // `rem_euclid` can round up to exactly `len` when the true result
        // is a hair below it.
        if index >= len {
            index -= len;
        }

        ReadPosition {
            index,
            next: (index + 1) % len,
            frac,
        }
    }

    /// Read a delayed sample using linear interpolation.
    ///
    /// `delay_samples` may be fractional (e.g., 96.37), which is the
    /// normal case for a swept flanger delay.
    pub fn read(&self, delay_samples: f32) -> f32 {
        let pos = self.read_position(delay_samples);
        linear_interp(self.buffer[pos.index], self.buffer[pos.next], pos.frac)
    }

    /// Advance the write position by one sample, wrapping to 0 at the end.
    pub fn advance(&mut self) {
        self.write_pos += 1;
        if self.write_pos >= self.capacity.get() {
            self.write_pos = 0;
        }
    }

    /// Clear the entire buffer to silence and reset the write position.
    ///
    /// This reuses the existing allocation, so it is safe to call from
    /// the host's `reset()`.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn delay_line(len: usize) -> DelayLine {
        DelayLine::new(NonZeroUsize::new(len).unwrap())
    }

    #[test]
    fn test_interp_identities() {
        for (a, b) in [(0.0, 1.0), (-0.25, 0.75), (3.5, -2.0), (1e-3, 1e3)] {
            assert_eq!(linear_interp(a, b, 0.0), a);
            assert_eq!(linear_interp(a, b, 1.0), b);
            let mid = linear_interp(a, b, 0.5);
            assert!(
                (mid - (a + b) / 2.0).abs() < 1e-4,
                "Expected midpoint of {a} and {b}, got {mid}"
            );
        }
    }

    /// Write-then-read: a zero-sample delay returns what was just written.
    #[test]
    fn test_zero_delay_reads_current_write() {
        let mut dl = delay_line(16);
        dl.write(0.75);
        assert!((dl.read(0.0) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_fifo_sequence() {
        let mut dl = delay_line(10);

        // Write 1, 2, 3, 4, 5 and leave the write head on the next slot.
        for i in 1..=5 {
            dl.write(i as f32);
            dl.advance();
        }

        // 1 sample back = 5.0 (most recently written), 5 back = 1.0.
        assert!((dl.read(1.0) - 5.0).abs() < 1e-6);
        assert!((dl.read(2.0) - 4.0).abs() < 1e-6);
        assert!((dl.read(5.0) - 1.0).abs() < 1e-6);
    }

    /// Reading 1.5 samples back from write_pos 2 lands halfway between
    /// slot 0 (value 0.0) and slot 1 (value 1.0).
    #[test]
    fn test_fractional_read() {
        let mut dl = delay_line(100);
        dl.write(0.0);
        dl.advance();
        dl.write(1.0);
        dl.advance();

        let result = dl.read(1.5);
        assert!((result - 0.5).abs() < 1e-6, "Expected 0.5, got {result}");
    }

    /// With the read head between the last slot and the first, the
    /// second interpolation index must wrap to 0 rather than run off the
    /// end of the buffer.
    #[test]
    fn test_secondary_index_wraps() {
        let mut dl = delay_line(4);
        // Buffer: [10, 0, 0, 40], write head back at 0.
        dl.write(10.0);
        for _ in 0..3 {
            dl.advance();
        }
        dl.write(40.0);
        dl.advance();
        assert_eq!(dl.write_pos(), 0);

        // 0 - 0.5 wraps to 3.5: between slot 3 and slot 0.
        let pos = dl.read_position(0.5);
        assert_eq!(pos.index, 3);
        assert_eq!(pos.next, 0);
        assert!((pos.frac - 0.5).abs() < 1e-6);
        assert!((dl.read(0.5) - 25.0).abs() < 1e-5);
    }

    #[test]
    fn test_indices_stay_in_bounds() {
        let mut dl = delay_line(37);
        let delays = [
            0.0, 1e-7, 0.5, 1.0, 17.25, 36.0, 36.999, 37.0, 40.5, 100.0, -0.3, -50.0,
        ];
        for _ in 0..(37 * 3) {
            for delay in delays {
                let pos = dl.read_position(delay);
                assert!(pos.index < 37, "index {} out of bounds for delay {delay}", pos.index);
                assert!(pos.next < 37, "next {} out of bounds for delay {delay}", pos.next);
                assert!((0.0..1.0).contains(&pos.frac));
            }
            dl.advance();
            assert!(dl.write_pos() < 37);
        }
    }

    #[test]
    fn test_write_head_wraparound() {
        let capacity = 25;
        let mut dl = delay_line(capacity);
        for _ in 0..capacity {
            dl.advance();
        }
        assert_eq!(dl.write_pos(), 0);

        for k in 0..capacity {
            let mut dl = delay_line(capacity);
            for _ in 0..(capacity + k) {
                dl.advance();
            }
            assert_eq!(dl.write_pos(), k);
        }
    }

    #[test]
    fn test_clear() {
        let mut dl = delay_line(10);
        dl.write(0.5);
        dl.advance();
        dl.clear();

        assert_eq!(dl.write_pos(), 0);
        let result = dl.read(1.0);
        assert!(result.abs() < 1e-6, "Expected 0.0 after clear, got {result}");
    }

    #[test]
    fn test_silence_in_silence_out() {
        let dl = delay_line(100);
        for delay in [1.0, 10.0, 50.5, 99.0] {
            let result = dl.read(delay);
            assert!(
                result.abs() < 1e-6,
                "Expected silence at delay {delay}, got {result}"
            );
        }
    }
}
