use thiserror::Error;

/// Errors specific to read capabilities and their URN form
#[derive(Error, Debug)]
pub enum CapabilityError {
    /// Block size is not one of the two admissible values
    #[error("unsupported block size: {0} bytes (expected 1024 or 32768)")]
    UnsupportedBlockSize(usize),

    /// Serialized capability carries an unknown block-size tag
    #[error("unknown block size tag: {0:#04x}")]
    UnknownBlockSizeTag(u8),

    /// Tree level does not fit the one-byte field
    #[error("level {level} exceeds the one-byte depth limit")]
    LevelOverflow { level: usize },

    /// Serialized capability has the wrong length
    #[error("invalid capability length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// URN does not start with `urn:erisx2:`
    #[error("URN is missing the `urn:erisx2:` prefix")]
    MissingUrnPrefix,

    /// URN payload is not valid unpadded base32
    #[error("URN payload is not valid unpadded base32")]
    MalformedBase32,
}
