//! Error types for the flanger core.
//!
//! None of these are ever constructed inside the per-sample loop. They are
//! returned from `prepare()`, at the top of `process_block()` before any
//! sample is touched, and from state restore.

use thiserror::Error;

/// The host asked for a configuration the flanger cannot run in.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrepareError {
    #[error("sample rate must be a positive, finite number of Hz (got {0})")]
    InvalidSampleRate(f32),

    #[error("maximum delay must be a positive, finite number of seconds (got {0})")]
    InvalidMaxDelay(f32),

    #[error("a {max_delay_seconds} s delay at {sample_rate} Hz rounds down to an empty buffer")]
    ZeroCapacity {
        sample_rate: f32,
        max_delay_seconds: f32,
    },
}

/// A block was refused before any sample was processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    #[error("process() called before prepare()")]
    NotPrepared,

    #[error("block of {len} samples exceeds the prepared maximum of {max}")]
    BlockTooLarge { len: usize, max: usize },

    #[error("left and right channels differ in length ({left} vs {right})")]
    ChannelLengthMismatch { left: usize, right: usize },
}

/// Saved parameter state could not be restored.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("malformed flanger state: {0}")]
    Malformed(#[from] serde_json::Error),
}
