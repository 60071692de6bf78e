//! MSB-first bit-group packing
//!
//! A byte slice is treated as one continuous big-endian bit stream, so
//! symbol groups may straddle byte boundaries. Bits past the end of the
//! stream read as zero, which gives the low-order zero padding of a
//! final incomplete group.

/// Extract `num_bits` bits starting at absolute bit offset `start_bit`.
///
/// The result is right-aligned; the first extracted bit lands in the
/// most significant position of the group.
pub fn extract_group(data: &[u8], start_bit: usize, num_bits: u32) -> u32 {
    let mut group = 0u32;
    for offset in 0..num_bits as usize {
        let bit_pos = start_bit + offset;
        let byte_pos = bit_pos / 8;
        let bit = if byte_pos < data.len() {
            (data[byte_pos] >> (7 - bit_pos % 8)) & 0x1
        } else {
            0
        };
        group = (group << 1) | u32::from(bit);
    }
    group
}

/// Write the low `num_bits` bits of `value` at absolute bit offset
/// `start_bit`, most significant bit first. Bits past the end of the
/// output slice are dropped.
pub fn write_group(data: &mut [u8], start_bit: usize, num_bits: u32, value: u32) {
    for offset in 0..num_bits as usize {
        let bit_pos = start_bit + offset;
        let byte_pos = bit_pos / 8;
        if byte_pos >= data.len() {
            break;
        }
        let mask = 1u8 << (7 - bit_pos % 8);
        if (value >> (num_bits as usize - 1 - offset)) & 0x1 == 1 {
            data[byte_pos] |= mask;
        } else {
            data[byte_pos] &= !mask;
        }
    }
}
