//! Ed25519 key management for the NEM network
//!
//! NEM signs with Ed25519 but replaces SHA-512 with Keccak-512 everywhere the
//! scheme hashes (seed expansion, nonce derivation and the challenge). Keys
//! produced here are therefore not interchangeable with RFC 8032 keys.
//!
//! Private keys are written by wallets as the hex of the *reversed* seed. This
//! is a fixed network convention: loading a key reverses the bytes, exporting
//! it reverses them back.

use std::fmt;

use ed25519_dalek::hazmat::{raw_sign, raw_verify, ExpandedSecretKey};
use ed25519_dalek::{Signature, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha3::Keccak512;
use thiserror::Error;
use zeroize::{Zeroize, Zeroizing};

use super::hash::{keccak256, keccak512};

/// Length of a private key, public key or hash in bytes
pub const KEY_LENGTH: usize = 32;

/// Length of a signature in bytes
pub const SIGNATURE_LENGTH: usize = 64;

/// Errors that can occur during key operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Invalid private key: expected 64 hex characters")]
    InvalidPrivateKey,
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
    #[error("Invalid signature")]
    InvalidSignature,
}

/// A 32-byte public key
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PublicKey([u8; KEY_LENGTH]);

impl PublicKey {
    /// Wrap raw key bytes
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parse a public key from a 64 character hex string (any case)
    pub fn from_hex(hex_key: &str) -> Result<Self, KeyError> {
        let bytes =
            hex::decode(hex_key.trim()).map_err(|e| KeyError::InvalidPublicKey(e.to_string()))?;
        let bytes: [u8; KEY_LENGTH] = bytes.try_into().map_err(|v: Vec<u8>| {
            KeyError::InvalidPublicKey(format!("expected 32 bytes, got {}", v.len()))
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }

    /// Lowercase hex form
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Verify a signature produced by [`KeyPair::sign`]
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(signature) = <[u8; SIGNATURE_LENGTH]>::try_from(signature) else {
            return false;
        };
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let signature = Signature::from_bytes(&signature);
        raw_verify::<Keccak512>(&verifying_key, message, &signature).is_ok()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl From<PublicKey> for String {
    fn from(key: PublicKey) -> Self {
        key.to_hex()
    }
}

impl TryFrom<String> for PublicKey {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

/// A key pair: the private seed and the public key derived from it
#[derive(Clone)]
pub struct KeyPair {
    /// Seed in signing byte order (reversed from the text form)
    private_key: Zeroizing<[u8; KEY_LENGTH]>,
    public_key: PublicKey,
    verifying_key: VerifyingKey,
}

impl KeyPair {
    /// Generate a new random key pair
    ///
    /// Random bytes are run through Keccak-256 before use, matching how NEM
    /// wallets create fresh accounts.
    pub fn generate() -> Self {
        let mut entropy = Zeroizing::new([0u8; KEY_LENGTH]);
        OsRng.fill_bytes(&mut entropy[..]);
        let seed = Zeroizing::new(keccak256(&entropy[..]));
        Self::from_seed(*seed)
    }

    /// Create a key pair from a hex-encoded private key as shown by wallets
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        if hex_key.len() != 2 * KEY_LENGTH {
            return Err(KeyError::InvalidPrivateKey);
        }
        let bytes = Zeroizing::new(hex::decode(hex_key).map_err(|_| KeyError::InvalidPrivateKey)?);
        let mut seed = [0u8; KEY_LENGTH];
        seed.copy_from_slice(&bytes);
        seed.reverse();
        let key_pair = Self::from_seed(seed);
        seed.zeroize();
        Ok(key_pair)
    }

    /// Create a key pair from a seed already in signing byte order
    fn from_seed(seed: [u8; KEY_LENGTH]) -> Self {
        let expanded = expand_seed(&seed);
        let verifying_key = VerifyingKey::from(&expanded);
        Self {
            private_key: Zeroizing::new(seed),
            public_key: PublicKey(verifying_key.to_bytes()),
            verifying_key,
        }
    }

    /// Get the private key as hex, in the same byte order it was loaded from
    pub fn private_key_hex(&self) -> String {
        let mut text_order = Zeroizing::new(*self.private_key);
        text_order.reverse();
        hex::encode(&text_order[..])
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Get the public key as a lowercase hex string
    pub fn public_key_hex(&self) -> String {
        self.public_key.to_hex()
    }

    /// Sign a message
    ///
    /// Signing is deterministic: the same key and message always give the
    /// same signature.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        // private || public, wiped on drop
        let mut secret = Zeroizing::new([0u8; 2 * KEY_LENGTH]);
        secret[..KEY_LENGTH].copy_from_slice(&self.private_key[..]);
        secret[KEY_LENGTH..].copy_from_slice(self.public_key.as_bytes());

        let mut seed = [0u8; KEY_LENGTH];
        seed.copy_from_slice(&secret[..KEY_LENGTH]);
        let expanded = expand_seed(&seed);
        seed.zeroize();

        let signature = raw_sign::<Keccak512>(&expanded, message, &self.verifying_key);
        secret.zeroize();
        signature.to_bytes()
    }

    /// Verify a signature against this key pair's public key
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        self.public_key.verify(message, signature)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// Expand a seed with Keccak-512 into the clamped scalar and nonce prefix
fn expand_seed(seed: &[u8; KEY_LENGTH]) -> ExpandedSecretKey {
    let mut hash = Zeroizing::new(keccak512(seed));
    hash[0] &= 248;
    hash[31] &= 127;
    hash[31] |= 64;
    ExpandedSecretKey::from_bytes(&hash)
}
