//! Cached AWGN source
//!
//! Gaussian samples come from a Box-Muller transform over a seeded
//! ChaCha8 stream. The sequence is generated once per (sigma, length)
//! configuration and reused cyclically: the cursor wraps to 0 when the
//! cache is exhausted, so draws repeat with period equal to the
//! sequence length. Size the sequence above the samples consumed per
//! trial, or long runs will see correlated noise.

use std::f64::consts::PI;

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use phy_qam::IqSample;

use crate::error::ChannelError;

/// Default cached sequence length.
pub const DEFAULT_SEQUENCE_LEN: usize = 1000;

/// AWGN generator with a cyclically reused cached sequence.
#[derive(Debug, Clone)]
pub struct NoiseSource {
    /// Standard deviation of the generated noise
    sigma: f64,
    /// Cached sequence, regenerated when sigma or the length changes
    sequence: Vec<f64>,
    /// Next read position; wraps at the sequence length
    cursor: usize,
    rng: ChaCha8Rng,
}

impl NoiseSource {
    /// Seeded source; deterministic for a given (seed, sigma, length).
    pub fn new(sigma: f64, sequence_len: usize, seed: u64) -> Result<Self, ChannelError> {
        if sigma < 0.0 {
            return Err(ChannelError::NegativeSigma(sigma));
        }
        if sequence_len == 0 {
            return Err(ChannelError::EmptySequence);
        }

        let mut source = Self {
            sigma,
            sequence: Vec::new(),
            cursor: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        source.regenerate(sequence_len);
        Ok(source)
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn sequence_len(&self) -> usize {
        self.sequence.len()
    }

    /// Change sigma, regenerating the cache and resetting the cursor.
    /// Setting the current value again is a no-op.
    pub fn set_sigma(&mut self, sigma: f64) -> Result<(), ChannelError> {
        if sigma < 0.0 {
            return Err(ChannelError::NegativeSigma(sigma));
        }
        if sigma == self.sigma {
            return Ok(());
        }
        self.sigma = sigma;
        let len = self.sequence.len();
        self.regenerate(len);
        Ok(())
    }

    /// Change the cache length and regenerate.
    pub fn set_sequence_len(&mut self, sequence_len: usize) -> Result<(), ChannelError> {
        if sequence_len == 0 {
            return Err(ChannelError::EmptySequence);
        }
        self.regenerate(sequence_len);
        Ok(())
    }

    /// Next cached noise value, wrapping cyclically.
    pub fn next_noise(&mut self) -> f64 {
        if self.cursor >= self.sequence.len() {
            self.cursor = 0;
        }
        let value = self.sequence[self.cursor];
        self.cursor += 1;
        value
    }

    /// Add one noise draw to a scalar.
    pub fn add_noise(&mut self, value: f64) -> f64 {
        value + self.next_noise()
    }

    /// Add independent noise draws to both components.
    pub fn add_noise_iq(&mut self, value: IqSample) -> IqSample {
        IqSample::new(value.i + self.next_noise(), value.q + self.next_noise())
    }

    fn regenerate(&mut self, sequence_len: usize) {
        debug!(
            "regenerating noise sequence: sigma={} len={}",
            self.sigma, sequence_len
        );
        self.cursor = 0;
        self.sequence.clear();
        self.sequence.reserve(sequence_len);

        // Box-Muller produces samples in pairs.
        while self.sequence.len() < sequence_len {
            let u1: f64 = self.rng.gen::<f64>().max(1e-10);
            let u2: f64 = self.rng.gen();

            let r = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * PI * u2;

            self.sequence.push(r * theta.cos() * self.sigma);
            if self.sequence.len() < sequence_len {
                self.sequence.push(r * theta.sin() * self.sigma);
            }
        }
    }
}
