//! Error types for the eris-codec crate
//!
//! The crate uses a two-level error hierarchy: [`ErisError`] is the
//! top-level type returned by the public entry points, wrapping the more
//! detailed component errors ([`CapabilityError`], [`CryptoError`],
//! [`EncodeError`], [`DecodeError`]) along with I/O failures from
//! caller-provided sources, sinks, and storage oracles.
//!
//! [`CapabilityError`]: crate::capability::error::CapabilityError
//! [`CryptoError`]: crate::crypto::CryptoError
//! [`EncodeError`]: crate::encode::error::EncodeError
//! [`DecodeError`]: crate::decode::error::DecodeError

use thiserror::Error;

/// Result type for operations in this crate
pub type Result<T> = std::result::Result<T, ErisError>;

/// Main error type for the eris-codec crate
#[derive(Error, Debug)]
pub enum ErisError {
    /// Errors from read-capability and URN handling
    #[error(transparent)]
    Capability(#[from] crate::capability::error::CapabilityError),

    /// Errors from hash or cipher construction
    #[error(transparent)]
    Crypto(#[from] crate::crypto::CryptoError),

    /// Errors from the streaming encoder
    #[error(transparent)]
    Encode(#[from] crate::encode::error::EncodeError),

    /// Errors from the verifying decoder
    #[error(transparent)]
    Decode(#[from] crate::decode::error::DecodeError),

    /// Input/output errors from a caller-provided source, sink, or store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Array conversion errors
    #[error("Array conversion error: {0}")]
    ArrayConversion(#[from] std::array::TryFromSliceError),
}
