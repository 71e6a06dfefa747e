//! Cryptographic utilities for the NEM network
//!
//! This module provides:
//! - Keccak-256/512 and RIPEMD-160 hashing
//! - Ed25519 (Keccak-512 variant) key management and signing

pub mod hash;
pub mod keys;

pub use hash::{keccak256, keccak256_hex, keccak512, ripemd160};
pub use keys::{KeyError, KeyPair, PublicKey, KEY_LENGTH, SIGNATURE_LENGTH};
