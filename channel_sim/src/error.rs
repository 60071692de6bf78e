//! Channel configuration errors

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ChannelError {
    /// Sigma must be >= 0; zero is the valid no-noise channel.
    #[error("noise standard deviation must be non-negative, got {0}")]
    NegativeSigma(f64),

    /// The cached sequence must hold at least one sample.
    #[error("noise sequence length must be non-zero")]
    EmptySequence,
}
