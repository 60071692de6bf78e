//! Additive-noise channel model
//!
//! A [`NoiseSource`] caches a fixed-length Gaussian sequence and hands
//! it out cyclically; a [`Channel`] injects that noise into transmitted
//! I/Q samples and reports its quality as sigma or as SNR in dB.

pub mod channel;
pub mod error;
pub mod noise;

pub use channel::Channel;
pub use error::ChannelError;
pub use noise::NoiseSource;
