//! Additive channel
//!
//! Wraps a [`NoiseSource`] and injects its draws into transmitted
//! samples: one independent value for the in-phase component, one for
//! the quadrature component. Quality is reported as sigma directly or
//! as SNR in dB under a unit-signal-power assumption.

use phy_qam::{ChannelQuality, IqBuffer, IqSample};

use crate::error::ChannelError;
use crate::noise::{NoiseSource, DEFAULT_SEQUENCE_LEN};

/// Noisy transmission medium for I/Q symbols.
#[derive(Debug, Clone)]
pub struct Channel {
    noise: NoiseSource,
}

impl Channel {
    /// Channel with the default noise sequence length.
    pub fn new(sigma: f64, seed: u64) -> Result<Self, ChannelError> {
        Self::with_sequence_len(sigma, DEFAULT_SEQUENCE_LEN, seed)
    }

    /// Channel with an explicit cached-sequence length. Keep the
    /// length above the samples consumed per trial to avoid noise
    /// periodicity artifacts in long measurements.
    pub fn with_sequence_len(
        sigma: f64,
        sequence_len: usize,
        seed: u64,
    ) -> Result<Self, ChannelError> {
        Ok(Self {
            noise: NoiseSource::new(sigma, sequence_len, seed)?,
        })
    }

    /// Channel built around an existing noise source.
    pub fn with_noise(noise: NoiseSource) -> Self {
        Self { noise }
    }

    /// Change the noise level; regenerates the cached sequence.
    pub fn set_sigma(&mut self, sigma: f64) -> Result<(), ChannelError> {
        self.noise.set_sigma(sigma)
    }

    /// Noise standard deviation (sigma).
    pub fn quality(&self) -> f64 {
        self.noise.sigma()
    }

    /// SNR in dB assuming unit signal power; +inf for sigma = 0.
    pub fn log_quality(&self) -> f64 {
        let sigma = self.noise.sigma();
        if sigma <= 0.0 {
            return f64::INFINITY;
        }
        10.0 * (1.0 / (sigma * sigma)).log10()
    }

    /// Pass one sample through the channel.
    pub fn transmit_sample(&mut self, sample: IqSample) -> IqSample {
        self.noise.add_noise_iq(sample)
    }

    /// Pass a whole buffer through the channel. The input is left
    /// untouched; a fresh buffer of the same capacity is returned.
    pub fn transmit(&mut self, symbols: &IqBuffer) -> IqBuffer {
        symbols.map(|s| self.noise.add_noise_iq(s))
    }
}

impl ChannelQuality for Channel {
    fn quality(&self) -> f64 {
        Channel::quality(self)
    }
}
