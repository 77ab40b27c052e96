//! Block references, read keys, and their 64-byte pairing
//!
//! A [`Reference`] is the content address of an encrypted block: the
//! BLAKE2b-256 hash of its ciphertext. A [`Key`] is the symmetric key that
//! decrypts it: the BLAKE2b-256 hash of its plaintext, keyed by the
//! convergence secret when one is used. A [`RefKeyPair`] is the 64-byte
//! `reference || key` record that names and unlocks one block; inner tree
//! nodes are packed sequences of these, with the all-zero pair reserved as
//! the trailing padding sentinel.

use std::fmt;
use std::ops::Deref;

use alloy_primitives::{hex, B256};

use crate::error::Result;

/// The 32-byte content address of an encrypted block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Reference(pub B256);

impl Reference {
    /// Width of a reference in bytes
    pub const SIZE: usize = 32;

    /// Creates a new reference from raw bytes
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(B256::from(bytes))
    }

    /// Returns the underlying bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Creates a reference from a slice, checking the length
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        Ok(Self(B256::try_from(slice)?))
    }

    /// Checks if this reference is all zeros
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0.as_slice()))
    }
}

impl Deref for Reference {
    type Target = B256;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<B256> for Reference {
    fn from(value: B256) -> Self {
        Self(value)
    }
}

impl From<[u8; 32]> for Reference {
    fn from(bytes: [u8; 32]) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for Reference {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// The 32-byte symmetric key that decrypts one block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Key(pub B256);

impl Key {
    /// Width of a key in bytes
    pub const SIZE: usize = 32;

    /// Creates a new key from raw bytes
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(B256::from(bytes))
    }

    /// Returns the underlying bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Creates a key from a slice, checking the length
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        Ok(Self(B256::try_from(slice)?))
    }

    /// Checks if this key is all zeros
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0.as_slice()))
    }
}

impl Deref for Key {
    type Target = B256;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<B256> for Key {
    fn from(value: B256) -> Self {
        Self(value)
    }
}

impl From<[u8; 32]> for Key {
    fn from(bytes: [u8; 32]) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for Key {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// The 64-byte record naming and unlocking one block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefKeyPair {
    /// Content address of the block
    pub reference: Reference,
    /// Key that decrypts the block
    pub key: Key,
}

impl RefKeyPair {
    /// Width of a serialized pair in bytes
    pub const SIZE: usize = Reference::SIZE + Key::SIZE;

    /// Creates a new pair
    pub fn new(reference: Reference, key: Key) -> Self {
        Self { reference, key }
    }

    /// Reads a pair out of an exactly 64-byte array
    pub fn from_array(bytes: &[u8; 64]) -> Self {
        Self {
            reference: Reference(B256::from_slice(&bytes[..Reference::SIZE])),
            key: Key(B256::from_slice(&bytes[Reference::SIZE..])),
        }
    }

    /// Serializes the pair as `reference || key`
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut bytes = [0u8; Self::SIZE];
        self.write_to(&mut bytes);
        bytes
    }

    /// Writes the pair into an exactly 64-byte slice
    pub(crate) fn write_to(&self, slot: &mut [u8]) {
        slot[..Reference::SIZE].copy_from_slice(self.reference.as_bytes());
        slot[Reference::SIZE..Self::SIZE].copy_from_slice(self.key.as_bytes());
    }

    /// Checks for the all-zero sentinel that pads partially filled nodes
    pub fn is_zero(&self) -> bool {
        self.reference.is_zero() && self.key.is_zero()
    }
}

impl TryFrom<&[u8]> for RefKeyPair {
    type Error = crate::error::ErisError;

    fn try_from(slice: &[u8]) -> Result<Self> {
        let bytes: &[u8; 64] = slice.try_into()?;
        Ok(Self::from_array(bytes))
    }
}

impl fmt::Display for RefKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RefKeyPair[{}]",
            hex::encode(&self.reference.as_bytes()[..8])
        )
    }
}

#[cfg(any(test, feature = "arbitrary"))]
impl<'a> arbitrary::Arbitrary<'a> for Reference {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self::new(u.arbitrary()?))
    }
}

#[cfg(any(test, feature = "arbitrary"))]
impl<'a> arbitrary::Arbitrary<'a> for Key {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self::new(u.arbitrary()?))
    }
}

#[cfg(any(test, feature = "arbitrary"))]
impl<'a> arbitrary::Arbitrary<'a> for RefKeyPair {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self::new(u.arbitrary()?, u.arbitrary()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use proptest_arbitrary_interop::arb;

    #[test]
    fn test_zero_pair_sentinel() {
        assert!(RefKeyPair::default().is_zero());

        let mut bytes = [0u8; RefKeyPair::SIZE];
        bytes[63] = 1;
        assert!(!RefKeyPair::from_array(&bytes).is_zero());

        bytes[63] = 0;
        bytes[0] = 1;
        assert!(!RefKeyPair::from_array(&bytes).is_zero());
    }

    #[test]
    fn test_pair_from_short_slice() {
        let result = RefKeyPair::try_from(&[0u8; 63][..]);
        assert!(matches!(
            result,
            Err(crate::error::ErisError::ArrayConversion(_))
        ));
    }

    proptest! {
        #[test]
        fn test_pair_roundtrip(pair in arb::<RefKeyPair>()) {
            let bytes = pair.to_bytes();
            prop_assert_eq!(RefKeyPair::from_array(&bytes), pair);
            prop_assert_eq!(RefKeyPair::try_from(&bytes[..]).unwrap(), pair);
        }

        #[test]
        fn test_reference_slice_roundtrip(reference in arb::<Reference>()) {
            let parsed = Reference::from_slice(reference.as_bytes()).unwrap();
            prop_assert_eq!(parsed, reference);
        }
    }
}
