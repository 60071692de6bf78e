//! Packed I/Q sample storage
//!
//! An [`IqBuffer`] holds N/2 complex samples in a single allocation of
//! length N, split into two contiguous halves: all in-phase components
//! first, then all quadrature components (`[I1..In|Q1..Qn]`), never
//! interleaved. The capacity is fixed at construction and must be even
//! and non-zero.

use crate::error::PhyError;

/// One complex baseband sample.
///
/// Equality is exact field-wise comparison; tolerance-based checks
/// belong to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IqSample {
    /// In-phase component
    pub i: f64,
    /// Quadrature component
    pub q: f64,
}

impl IqSample {
    pub fn new(i: f64, q: f64) -> Self {
        Self { i, q }
    }

    /// Squared Euclidean distance to another sample.
    pub fn dist_sq(self, other: IqSample) -> f64 {
        let di = self.i - other.i;
        let dq = self.q - other.q;
        di * di + dq * dq
    }
}

/// Fixed-capacity container for complex samples, stored as split halves.
///
/// Cloning duplicates the underlying storage.
#[derive(Debug, Clone)]
pub struct IqBuffer {
    // [I1,I2,...,In|Q1,Q2,...,Qn]
    data: Vec<f64>,
    // Index of the first quadrature component (= sample count)
    center: usize,
}

impl IqBuffer {
    /// Allocate a zeroed buffer of total capacity `length`.
    ///
    /// `length` counts scalar components, so a buffer for n samples
    /// needs `length = 2 * n`. Zero or odd lengths are rejected.
    pub fn make(length: usize) -> Result<Self, PhyError> {
        if length == 0 || length % 2 != 0 {
            return Err(PhyError::InvalidBufferLength(length));
        }
        Ok(Self {
            data: vec![0.0; length],
            center: length / 2,
        })
    }

    /// Build a buffer from a slice of samples. Fails on an empty slice.
    pub fn from_samples(samples: &[IqSample]) -> Result<Self, PhyError> {
        let mut buf = Self::make(samples.len() * 2)?;
        for (idx, &s) in samples.iter().enumerate() {
            buf.data[idx] = s.i;
            buf.data[idx + buf.center] = s.q;
        }
        Ok(buf)
    }

    /// Total scalar capacity (twice the sample count).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of complex samples held.
    pub fn num_samples(&self) -> usize {
        self.center
    }

    /// Store a sample at `index` (must be below the sample count).
    pub fn store(&mut self, val: IqSample, index: usize) -> Result<(), PhyError> {
        if index >= self.center {
            return Err(PhyError::SampleIndexOutOfRange {
                index,
                samples: self.center,
            });
        }
        self.data[index] = val.i;
        self.data[index + self.center] = val.q;
        Ok(())
    }

    /// Read back the sample at `index`.
    pub fn get(&self, index: usize) -> Result<IqSample, PhyError> {
        if index >= self.center {
            return Err(PhyError::SampleIndexOutOfRange {
                index,
                samples: self.center,
            });
        }
        Ok(IqSample {
            i: self.data[index],
            q: self.data[index + self.center],
        })
    }

    /// The two contiguous halves: (`[I…]`, `[Q…]`).
    pub fn decompose(&self) -> (&[f64], &[f64]) {
        self.data.split_at(self.center)
    }

    /// Iterate over the samples in index order.
    pub fn samples(&self) -> impl Iterator<Item = IqSample> + '_ {
        (0..self.center).map(move |idx| IqSample {
            i: self.data[idx],
            q: self.data[idx + self.center],
        })
    }

    /// Per-sample transformed copy; the source buffer is untouched.
    pub fn map<F>(&self, mut f: F) -> IqBuffer
    where
        F: FnMut(IqSample) -> IqSample,
    {
        let mut out = self.clone();
        for idx in 0..self.center {
            let mapped = f(IqSample {
                i: self.data[idx],
                q: self.data[idx + self.center],
            });
            out.data[idx] = mapped.i;
            out.data[idx + self.center] = mapped.q;
        }
        out
    }
}
