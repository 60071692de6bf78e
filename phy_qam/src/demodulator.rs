//! I/Q symbols back to bits
//!
//! Hard decisions use a full nearest-point scan over the bound
//! mapper's table; ties go to the lowest symbol index. Soft decisions
//! compute a max-log LLR per bit from the two constellation subsets
//! that have the bit clear or set.

use std::sync::Arc;

use log::trace;

use crate::bits;
use crate::error::PhyError;
use crate::iq::{IqBuffer, IqSample};
use crate::mapper::{Mapper, ModulationOrder};

/// Floor for the noise variance in LLR scaling, so a noiseless channel
/// yields saturated rather than undefined ratios.
const MIN_NOISE_VARIANCE: f64 = 1e-10;

/// Read access to a channel's noise quality, as needed for soft
/// decisions. Implemented by `channel_sim::Channel`.
pub trait ChannelQuality {
    /// Noise standard deviation (sigma).
    fn quality(&self) -> f64;
}

/// QAM demodulator. Unusable until a mapper is bound.
#[derive(Debug, Default)]
pub struct Demodulator {
    mapper: Option<Arc<Mapper>>,
}

impl Demodulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Demodulator with a mapper already bound.
    pub fn with_mapper(mapper: Arc<Mapper>) -> Self {
        Self {
            mapper: Some(mapper),
        }
    }

    /// Bind (or replace) the constellation mapper.
    pub fn bind_mapper(&mut self, mapper: Arc<Mapper>) {
        self.mapper = Some(mapper);
    }

    pub fn order(&self) -> Result<ModulationOrder, PhyError> {
        Ok(self.mapper()?.order())
    }

    pub fn bits_per_symbol(&self) -> Result<u32, PhyError> {
        Ok(self.mapper()?.bits_per_symbol())
    }

    /// Hard-decision demodulation: nearest constellation point per
    /// sample, indices packed MSB-first. Output length is
    /// `ceil(samples * bps / 8)` bytes, so a stream whose bit count is
    /// not byte-aligned carries trailing zero bits.
    pub fn demodulate(&self, symbols: &IqBuffer) -> Result<Vec<u8>, PhyError> {
        let mapper = self.mapper()?;
        let bps = mapper.bits_per_symbol();

        let num_symbols = symbols.num_samples();
        let mut data = vec![0u8; (num_symbols * bps as usize).div_ceil(8)];
        trace!(
            "demodulating {} {} symbols into {} bytes",
            num_symbols,
            mapper.order(),
            data.len()
        );

        for (sym_idx, sample) in symbols.samples().enumerate() {
            let nearest = nearest_index(mapper, sample);
            bits::write_group(&mut data, sym_idx * bps as usize, bps, nearest);
        }
        Ok(data)
    }

    /// Soft-decision demodulation.
    ///
    /// Per output bit the LLR is `(d0 - d1) / (2 * sigma^2)` where
    /// `d0`/`d1` are the minimum squared distances to the subsets with
    /// the bit clear/set, and sigma comes from the channel. A positive
    /// LLR decides bit = 1; the same convention holds for every order.
    pub fn demodulate_llr<C: ChannelQuality>(
        &self,
        symbols: &IqBuffer,
        channel: &C,
    ) -> Result<Vec<u8>, PhyError> {
        let mapper = self.mapper()?;
        let bps = mapper.bits_per_symbol();
        let sigma = channel.quality();

        let num_symbols = symbols.num_samples();
        let mut data = vec![0u8; (num_symbols * bps as usize).div_ceil(8)];

        for (sym_idx, sample) in symbols.samples().enumerate() {
            for position in 0..bps {
                let llr = bit_llr(mapper, sample, position, sigma)?;
                if llr > 0.0 {
                    let bit_pos = sym_idx * bps as usize + position as usize;
                    data[bit_pos / 8] |= 1 << (7 - bit_pos % 8);
                }
            }
        }
        Ok(data)
    }

    /// LLR for one bit of one received sample. `position` counts from
    /// the most significant bit of the symbol's group, matching the
    /// packing order of [`Self::demodulate`].
    pub fn bit_llr(
        &self,
        sample: IqSample,
        position: u32,
        sigma: f64,
    ) -> Result<f64, PhyError> {
        bit_llr(self.mapper()?, sample, position, sigma)
    }

    fn mapper(&self) -> Result<&Mapper, PhyError> {
        self.mapper.as_deref().ok_or(PhyError::MapperNotBound)
    }
}

/// Index of the closest constellation point; ties keep the first
/// (lowest) index because the scan is index-ordered with a strict
/// comparison.
fn nearest_index(mapper: &Mapper, sample: IqSample) -> u32 {
    let mut nearest = 0u32;
    let mut min_dist = f64::MAX;
    for (index, &point) in mapper.constellation().iter().enumerate() {
        let dist = sample.dist_sq(point);
        if dist < min_dist {
            min_dist = dist;
            nearest = index as u32;
        }
    }
    nearest
}

fn bit_llr(
    mapper: &Mapper,
    sample: IqSample,
    position: u32,
    sigma: f64,
) -> Result<f64, PhyError> {
    let bps = mapper.bits_per_symbol();
    if position >= bps {
        return Err(PhyError::BitPositionOutOfRange {
            position,
            order: mapper.order(),
            bits: bps,
        });
    }

    // Position 0 is the group's MSB, which is the high bit of the
    // symbol index.
    let value_bit = bps - 1 - position;

    let mut min_dist_0 = f64::MAX;
    let mut min_dist_1 = f64::MAX;
    for (index, &point) in mapper.constellation().iter().enumerate() {
        let dist = sample.dist_sq(point);
        if (index >> value_bit) & 1 == 1 {
            min_dist_1 = min_dist_1.min(dist);
        } else {
            min_dist_0 = min_dist_0.min(dist);
        }
    }

    let variance = (sigma * sigma).max(MIN_NOISE_VARIANCE);
    Ok((min_dist_0 - min_dist_1) / (2.0 * variance))
}
