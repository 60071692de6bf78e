//! Monte-Carlo BER measurement
//!
//! One [`run_sweep`] call owns a complete, freshly constructed
//! pipeline (mapper, modulator, demodulator, channel), so callers can
//! run one sweep per worker thread without sharing any mutable state.

use std::sync::Arc;

use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use channel_sim::{Channel, ChannelError};
use phy_qam::{Demodulator, Mapper, ModulationOrder, Modulator, PhyError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Phy(#[from] PhyError),
    #[error(transparent)]
    Channel(#[from] ChannelError),
    /// A zero or negative step would never advance the sweep.
    #[error("sigma step must be positive, got {0}")]
    NonPositiveStep(f64),
    /// Zero trials per point would divide zero bits by zero.
    #[error("iteration count must be non-zero")]
    NoIterations,
}

/// Parameters of one sigma-swept measurement.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub sigma_start: f64,
    pub sigma_end: f64,
    pub sigma_step: f64,
    /// Monte-Carlo iterations per sigma value.
    pub iterations: usize,
    pub seed: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        // Matches the historical sweep: sigma 0..10 by 0.02.
        Self {
            sigma_start: 0.0,
            sigma_end: 10.0,
            sigma_step: 0.02,
            iterations: 100_000,
            seed: 0,
        }
    }
}

/// Random payload length per trial, in bytes.
pub fn payload_len(order: ModulationOrder) -> usize {
    match order {
        ModulationOrder::Qpsk | ModulationOrder::Qam16 => 64,
        ModulationOrder::Qam64 => 128,
    }
}

/// Bit errors between two equal-length byte sequences.
pub fn count_bit_errors(sent: &[u8], received: &[u8]) -> usize {
    sent.iter()
        .zip(received)
        .map(|(a, b)| (a ^ b).count_ones() as usize)
        .sum()
}

/// Measured BER at one noise level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BerPoint {
    pub sigma: f64,
    pub ber: f64,
}

/// Sweep sigma for one modulation order, returning one BER point per
/// noise level. The channel's cached noise sequence is sized above the
/// per-trial sample count to keep draws uncorrelated within a trial.
pub fn run_sweep(order: ModulationOrder, config: &SweepConfig) -> Result<Vec<BerPoint>, SimError> {
    if config.sigma_step <= 0.0 {
        return Err(SimError::NonPositiveStep(config.sigma_step));
    }
    if config.iterations == 0 {
        return Err(SimError::NoIterations);
    }

    let mapper = Arc::new(Mapper::new(order));
    let modulator = Modulator::with_mapper(mapper.clone());
    let demodulator = Demodulator::with_mapper(mapper);

    let bytes_per_trial = payload_len(order);
    let samples_per_trial = (bytes_per_trial * 8).div_ceil(order.bits_per_symbol() as usize);
    // Two draws per sample, rounded up to the next power of two.
    let sequence_len = (samples_per_trial * 2).next_power_of_two();

    let mut channel = Channel::with_sequence_len(config.sigma_start, sequence_len, config.seed)?;
    let mut payload_rng = ChaCha8Rng::seed_from_u64(config.seed ^ 0x5DEE_CE66);
    let mut payload = vec![0u8; bytes_per_trial];

    let mut points = Vec::new();
    let mut sigma = config.sigma_start;
    while sigma < config.sigma_end {
        channel.set_sigma(sigma)?;

        let mut total_errors = 0usize;
        let mut total_bits = 0usize;
        for _ in 0..config.iterations {
            payload_rng.fill(payload.as_mut_slice());

            let symbols = modulator.modulate(&payload)?;
            let received = channel.transmit(&symbols);
            let decoded = demodulator.demodulate(&received)?;

            total_errors += count_bit_errors(&payload, &decoded);
            total_bits += bytes_per_trial * 8;
        }

        let ber = total_errors as f64 / total_bits as f64;
        info!("{order}: sigma={sigma:.2} ber={ber:.15}");
        points.push(BerPoint { sigma, ber });

        sigma += config.sigma_step;
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config(sigmas: (f64, f64, f64), iterations: usize) -> SweepConfig {
        SweepConfig {
            sigma_start: sigmas.0,
            sigma_end: sigmas.1,
            sigma_step: sigmas.2,
            iterations,
            seed: 42,
        }
    }

    #[test]
    fn test_count_bit_errors() {
        assert_eq!(count_bit_errors(&[0xFF], &[0xFF]), 0);
        assert_eq!(count_bit_errors(&[0xFF], &[0x00]), 8);
        assert_eq!(count_bit_errors(&[0b1010_0001], &[0b1010_1001]), 1);
        assert_eq!(count_bit_errors(&[0xAA, 0x55], &[0x55, 0xAA]), 16);
    }

    #[test]
    fn test_zero_sigma_has_zero_ber() {
        for order in ModulationOrder::ALL {
            let points = run_sweep(order, &quick_config((0.0, 0.01, 0.02), 3)).unwrap();
            assert_eq!(points.len(), 1);
            assert_eq!(points[0].ber, 0.0, "{order}");
        }
    }

    #[test]
    fn test_ber_grows_with_sigma() {
        // Widely spaced sigmas so the ordering is statistically safe
        // even with few iterations.
        let config = quick_config((0.0, 1.3, 0.6), 40);
        let points = run_sweep(ModulationOrder::Qam16, &config).unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].ber, 0.0);
        assert!(points[1].ber > points[0].ber);
        assert!(points[2].ber > points[1].ber);
    }

    #[test]
    fn test_rejects_non_positive_step() {
        // A zero step would otherwise loop at sigma_start forever.
        let zero = quick_config((0.0, 1.0, 0.0), 10);
        assert!(matches!(
            run_sweep(ModulationOrder::Qpsk, &zero),
            Err(SimError::NonPositiveStep(s)) if s == 0.0
        ));

        let negative = quick_config((0.0, 1.0, -0.5), 10);
        assert!(matches!(
            run_sweep(ModulationOrder::Qpsk, &negative),
            Err(SimError::NonPositiveStep(_))
        ));
    }

    #[test]
    fn test_rejects_zero_iterations() {
        let config = quick_config((0.0, 1.0, 0.5), 0);
        assert!(matches!(
            run_sweep(ModulationOrder::Qpsk, &config),
            Err(SimError::NoIterations)
        ));
    }

    #[test]
    fn test_sweep_is_reproducible() {
        let config = quick_config((0.4, 0.9, 0.2), 20);
        let a = run_sweep(ModulationOrder::Qpsk, &config).unwrap();
        let b = run_sweep(ModulationOrder::Qpsk, &config).unwrap();
        assert_eq!(a, b);
    }
}
