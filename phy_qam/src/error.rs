//! Error type for the modulation engine
//!
//! Two families: configuration errors (operating on a modulator or
//! demodulator with no mapper bound) and bounds errors (bad buffer
//! lengths, sample indices, bit positions). All are synchronous and
//! final; nothing here is retried.

use thiserror::Error;

use crate::mapper::ModulationOrder;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhyError {
    /// Buffer capacity must be even and non-zero ([I…|Q…] split halves).
    #[error("I/Q buffer length must be even and non-zero, got {0}")]
    InvalidBufferLength(usize),

    /// Sample index at or past the buffer's sample count.
    #[error("sample index {index} out of range for buffer of {samples} samples")]
    SampleIndexOutOfRange { index: usize, samples: usize },

    /// Modulate/demodulate called before a mapper was bound.
    #[error("no constellation mapper bound")]
    MapperNotBound,

    /// A constellation generator returned the wrong number of points.
    #[error("constellation for {order} must have {expected} points, generator produced {actual}")]
    ConstellationSizeMismatch {
        order: ModulationOrder,
        expected: usize,
        actual: usize,
    },

    /// Soft-decision bit position at or past bits-per-symbol.
    #[error("bit position {position} out of range for {order} ({bits} bits per symbol)")]
    BitPositionOutOfRange {
        position: u32,
        order: ModulationOrder,
        bits: u32,
    },
}
