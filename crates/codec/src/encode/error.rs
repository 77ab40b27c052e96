use thiserror::Error;

/// Errors specific to the streaming encoder
///
/// Both variants indicate a bug in the tree construction rather than bad
/// caller input.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// A level buffer would grow past one block
    #[error("level buffer holds {len} bytes, exceeding the {capacity}-byte node")]
    BufferOverflow { capacity: usize, len: usize },

    /// A level was flushed before receiving any reference-key pair
    #[error("flushed a node level with an empty buffer")]
    EmptyLevelBuffer,
}
