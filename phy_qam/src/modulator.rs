//! Bit stream to I/Q symbols
//!
//! Consumes bytes as one MSB-first bit stream, slices it into
//! bits-per-symbol groups (padding the last group with zeros on its
//! low-order side) and looks each group up in the bound mapper.

use std::sync::Arc;

use log::trace;

use crate::bits;
use crate::error::PhyError;
use crate::iq::IqBuffer;
use crate::mapper::{Mapper, ModulationOrder};

/// QAM modulator. Unusable until a mapper is bound.
#[derive(Debug, Default)]
pub struct Modulator {
    mapper: Option<Arc<Mapper>>,
}

impl Modulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Modulator with a mapper already bound.
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

    /// Map a byte sequence to symbols.
    ///
    /// The output buffer holds exactly one sample per
    /// bits-per-symbol-sized group, i.e. `ceil(8 * data.len() / bps)`
    /// samples. Fails when no mapper is bound or `data` is empty.
    pub fn modulate(&self, data: &[u8]) -> Result<IqBuffer, PhyError> {
        let mapper = self.mapper()?;
        let bps = mapper.bits_per_symbol();

        let total_bits = data.len() * 8;
        let num_symbols = total_bits.div_ceil(bps as usize);
        trace!(
            "modulating {} bytes as {} {} symbols",
            data.len(),
            num_symbols,
            mapper.order()
        );

        let mut symbols = IqBuffer::make(num_symbols * 2)?;
        for sym_idx in 0..num_symbols {
            let group = bits::extract_group(data, sym_idx * bps as usize, bps);
            symbols.store(mapper.point(group), sym_idx)?;
        }
        Ok(symbols)
    }

    fn mapper(&self) -> Result<&Mapper, PhyError> {
        self.mapper.as_deref().ok_or(PhyError::MapperNotBound)
    }
}
