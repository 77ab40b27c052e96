use thiserror::Error;

use crate::padding::PaddingError;
use crate::reference::Reference;

/// Errors specific to the verifying decoder
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Storage returned a block of the wrong size
    #[error("storage returned a {actual}-byte block, expected {expected}")]
    BlockLength { expected: usize, actual: usize },

    /// Fetched bytes do not hash to the requested reference
    #[error("fetched block hashes to {actual}, not its reference {expected}")]
    ReferenceMismatch {
        expected: Reference,
        actual: Reference,
    },

    /// Plaintext handed to the padding sink was not block-sized
    #[error("content writer expected a {expected}-byte block, got {actual}")]
    SinkBlockLength { expected: usize, actual: usize },

    /// The final content block's padding did not verify
    #[error(transparent)]
    Padding(#[from] PaddingError),
}
