//! QAM physical layer - bit streams to I/Q symbols and back
//!
//! This crate implements the modulation engine of a QAM link simulator:
//! Gray-coded constellation mapping for QPSK/16-QAM/64-QAM, a packed
//! I/Q sample buffer, MSB-first bit-group modulation, and hard- or
//! soft-decision (LLR) demodulation. Channel modeling lives in the
//! `channel_sim` crate; this crate only consumes the channel's noise
//! quality through the [`ChannelQuality`] seam.

pub mod bits;
pub mod demodulator;
pub mod error;
pub mod iq;
pub mod mapper;
pub mod modulator;

// Re-export core types for convenience
pub use demodulator::{ChannelQuality, Demodulator};
pub use error::PhyError;
pub use iq::{IqBuffer, IqSample};
pub use mapper::{ConstellationFn, Mapper, ModulationOrder};
pub use modulator::Modulator;
