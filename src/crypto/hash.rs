//! Hashing utilities for the NEM network
//!
//! NEM documents its hashes as "SHA3", but the network predates the final
//! FIPS-202 padding and uses the original Keccak sponge. Every digest in
//! this crate (addresses, transaction hashes, signature expansion) is Keccak.

use ripemd::Ripemd160;
use sha3::{Digest, Keccak256, Keccak512};

/// Computes Keccak-256 of the input data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Keccak256::digest(data));
    out
}

/// Computes Keccak-256 and returns it as a lowercase hex string
pub fn keccak256_hex(data: &[u8]) -> String {
    hex::encode(keccak256(data))
}

/// Computes Keccak-512 of the input data
pub fn keccak512(data: &[u8]) -> [u8; 64] {
    let mut out = [0u8; 64];
    out.copy_from_slice(&Keccak512::digest(data));
    out
}

/// Computes RIPEMD-160 of the input data
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    let mut out = [0u8; 20];
    out.copy_from_slice(&Ripemd160::digest(data));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        // Keccak-256 differs from FIPS SHA3-256 (a7ffc6f8...) on the empty input
        assert_eq!(
            keccak256_hex(b""),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_keccak512_length() {
        assert_eq!(keccak512(b"nem").len(), 64);
        assert_eq!(keccak512(b"nem"), keccak512(b"nem"));
    }

    #[test]
    fn test_ripemd160() {
        assert_eq!(
            hex::encode(ripemd160(b"")),
            "9c1185a5c5e9fc54612808977ee8f548b2258d31"
        );
    }
}
