//! Cryptographic primitives: content hashing and the block keystream
//!
//! References are unkeyed BLAKE2b-256 over ciphertext; read keys are
//! BLAKE2b-256 over plaintext, keyed by the convergence secret when one is
//! present. Blocks are encrypted with an unauthenticated ChaCha20 keystream
//! under an all-zero nonce: the key is unique per plaintext, and integrity
//! comes from verifying fetched ciphertext against its reference, not from
//! an AEAD tag.

use alloy_primitives::B256;
use blake2::digest::consts::U32;
use blake2::digest::{Digest, FixedOutput, KeyInit, Update};
use blake2::{Blake2b, Blake2bMac};
use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::ChaCha20;
use thiserror::Error;

use crate::reference::{Key, Reference};

type Blake2b256 = Blake2b<U32>;
type Blake2bMac256 = Blake2bMac<U32>;

/// Longest convergence secret the keyed hash accepts
pub const MAX_SECRET_LEN: usize = 64;

const ZERO_NONCE: [u8; 12] = [0u8; 12];

/// Errors from hash or cipher construction
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Convergence secret exceeds the BLAKE2b key limit
    #[error("convergence secret is {0} bytes, the keyed hash accepts at most {MAX_SECRET_LEN}")]
    SecretTooLong(usize),
}

/// Hash of an encrypted block: its content address.
pub(crate) fn ref_hash(block: &[u8]) -> Reference {
    Reference(B256::from_slice(&Blake2b256::digest(block)))
}

/// Hash of an unencrypted block under the convergence secret: its read key.
///
/// An empty secret selects the unkeyed hash.
pub(crate) fn key_hash(block: &[u8], secret: &[u8]) -> Result<Key, CryptoError> {
    if secret.is_empty() {
        return Ok(Key(B256::from_slice(&Blake2b256::digest(block))));
    }
    let mut mac = Blake2bMac256::new_from_slice(secret)
        .map_err(|_| CryptoError::SecretTooLong(secret.len()))?;
    Update::update(&mut mac, block);
    Ok(Key(B256::from_slice(&mac.finalize_fixed())))
}

/// XOR `block` in place with the ChaCha20 keystream for `key`.
///
/// Encryption and decryption are the same operation.
pub(crate) fn keystream_xor(key: &Key, block: &mut [u8]) {
    let key_bytes: [u8; 32] = key.0.into();
    let mut cipher = ChaCha20::new(&key_bytes.into(), &ZERO_NONCE.into());
    cipher.apply_keystream(block);
}
