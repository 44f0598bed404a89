//! # DSP (Digital Signal Processing) Primitives
//!
//! The building blocks of the flanger:
//!
//! - **`delay_line`**: A fixed-capacity ring buffer with fractional,
//!   linearly interpolated reads. One per channel.
//!
//! - **`lfo`**: A sine oscillator with a phase accumulator, plus the
//!   mapping from its output onto the 1-5 ms flanger window.
//!
//! - **`smoother`**: A one-pole lowpass that glides the delay time toward
//!   the LFO's target so the read head never jumps.

pub mod delay_line;
pub mod lfo;
pub mod smoother;
