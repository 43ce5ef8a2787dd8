//! Salted License Hash
//!
//! Turns human-entered license text into the 40-bit message representative
//! signed by the curve layer. The derivation is deterministic given the same
//! salt and text, and case-insensitive in the text.
//!
//! The 40-bit width matches the order size of the mini license curve; it is
//! a deliberate short-code/collision-resistance trade-off, not a defect.

use rand::{CryptoRng, Rng};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Number of salt entries, and of accumulator slots.
pub const SALT_LEN: usize = 64;

/// Accumulator modulus, 2^31 - 1.
pub const SALT_MODULUS: u32 = 2_147_483_647;

/// Width of the derived hash in bits.
pub const HASH_BITS: u32 = 40;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaltError {
    #[error("salt has wrong length: expected {SALT_LEN} entries, found {found}")]
    WrongLength { found: usize },
}

// MARK: - Salt

/// Fixed-length secret salt mixed into every hash computation.
///
/// Generated once at key-generation time and read-only thereafter. Entries
/// are reduced modulo 2^31 - 1.
#[derive(Clone, PartialEq, Eq)]
pub struct Salt {
    entries: [u32; SALT_LEN],
}

impl Salt {
    /// Draw a fresh salt from a secure random source, entries in
    /// `[1, 2^31 - 1)`.
    pub fn generate<R: Rng + CryptoRng>(rng: &mut R) -> Salt {
        let mut entries = [0u32; SALT_LEN];
        for slot in entries.iter_mut() {
            *slot = rng.gen_range(1..SALT_MODULUS);
        }
        Salt { entries }
    }

    /// Build a salt from persisted integers, reducing each modulo 2^31 - 1.
    /// Fails unless exactly [`SALT_LEN`] values are supplied.
    pub fn from_entries(values: &[i64]) -> Result<Salt, SaltError> {
        if values.len() != SALT_LEN {
            return Err(SaltError::WrongLength { found: values.len() });
        }
        let mut entries = [0u32; SALT_LEN];
        for (slot, value) in entries.iter_mut().zip(values) {
            *slot = value.rem_euclid(i64::from(SALT_MODULUS)) as u32;
        }
        Ok(Salt { entries })
    }

    pub fn entries(&self) -> &[u32; SALT_LEN] {
        &self.entries
    }
}

// Debug omits the entries; the salt is secret material.
impl std::fmt::Debug for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Salt").finish_non_exhaustive()
    }
}

// MARK: - Hash Derivation

/// Derive the 40-bit message representative for `text` under `salt`.
///
/// Stages:
/// 1. lowercase the text and take its UTF-8 bytes;
/// 2. fold the bytes into a 64-slot accumulator seeded with the salt, each
///    slot reduced modulo 2^31 - 1 after every addition;
/// 3. serialize the slots little-endian, 4 bytes each, into a 256-byte
///    buffer;
/// 4. SHA-256 the buffer;
/// 5. read the first 5 digest bytes as a little-endian integer, reduced
///    modulo 2^40.
pub fn compute_hash(text: &str, salt: &Salt) -> u64 {
    let lowered = text.to_lowercase();
    let bytes = lowered.as_bytes();

    let mut mash = [0u64; SALT_LEN];
    let scan_len = bytes.len().max(SALT_LEN);
    for i in 0..scan_len {
        let j = i % SALT_LEN;
        if i < SALT_LEN {
            mash[j] = u64::from(salt.entries[j]);
        }
        if i < bytes.len() {
            mash[j] += u64::from(bytes[i]);
        }
        mash[j] %= u64::from(SALT_MODULUS);
    }

    let mut buffer = [0u8; SALT_LEN * 4];
    for (i, value) in mash.iter().enumerate() {
        buffer[i * 4..i * 4 + 4].copy_from_slice(&(*value as u32).to_le_bytes());
    }

    let digest = Sha256::digest(buffer);
    let mut hash: u64 = 0;
    for (i, byte) in digest[..5].iter().enumerate() {
        hash |= u64::from(*byte) << (8 * i);
    }
    hash % (1u64 << HASH_BITS)
}

// MARK: - Tests
