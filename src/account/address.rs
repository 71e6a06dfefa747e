//! NEM account addresses
//!
//! An address is 25 bytes: the network byte, the RIPEMD-160 of the Keccak-256
//! of the public key, and a 4-byte Keccak-256 checksum. It is written as 40
//! base32 characters ("plain") or the same split into dash-separated groups of
//! six ("pretty").

use std::fmt;
use std::str::FromStr;

use data_encoding::BASE32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::network_type::NetworkType;
use crate::crypto::{keccak256, ripemd160, PublicKey};

/// Length of the RIPEMD-160 digest inside an address
pub const ADDRESS_DIGEST_LENGTH: usize = 20;

/// Length of the checksum at the end of an address
pub const ADDRESS_CHECKSUM_LENGTH: usize = 4;

/// Length of a decoded address in bytes
pub const ADDRESS_DECODED_LENGTH: usize = 1 + ADDRESS_DIGEST_LENGTH + ADDRESS_CHECKSUM_LENGTH;

/// Length of a plain address in characters
pub const ADDRESS_ENCODED_LENGTH: usize = 40;

/// Errors raised while parsing addresses and networks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address {0} has to be 40 characters long")]
    InvalidLength(String),
    #[error("Address {0} network unsupported")]
    UnsupportedNetwork(String),
    #[error("Address {0} is not valid base32")]
    InvalidEncoding(String),
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),
}

/// An account address in plain form
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Address {
    plain: String,
}

impl Address {
    /// Derive the address of a public key on a network
    pub fn from_public_key(public_key: &PublicKey, network: NetworkType) -> Self {
        let digest = ripemd160(&keccak256(public_key.as_bytes()));

        let mut decoded = [0u8; ADDRESS_DECODED_LENGTH];
        decoded[0] = network.byte();
        decoded[1..=ADDRESS_DIGEST_LENGTH].copy_from_slice(&digest);

        let checksum = keccak256(&decoded[..=ADDRESS_DIGEST_LENGTH]);
        decoded[ADDRESS_DIGEST_LENGTH + 1..].copy_from_slice(&checksum[..ADDRESS_CHECKSUM_LENGTH]);

        Self {
            plain: BASE32.encode(&decoded),
        }
    }

    /// Parse an address in plain or pretty form
    ///
    /// Dashes and whitespace are ignored and letters are uppercased.
    pub fn from_text(text: &str) -> Result<Self, AddressError> {
        let plain: String = text
            .chars()
            .filter(|c| *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();

        if plain.chars().count() != ADDRESS_ENCODED_LENGTH {
            return Err(AddressError::InvalidLength(plain));
        }
        if !matches!(plain.chars().next(), Some('N' | 'T' | 'M' | 'S')) {
            return Err(AddressError::UnsupportedNetwork(plain));
        }
        if BASE32.decode(plain.as_bytes()).is_err() {
            return Err(AddressError::InvalidEncoding(plain));
        }

        Ok(Self { plain })
    }

    /// Create an address from its decoded bytes in hex
    pub fn from_hex(address_hex: &str) -> Result<Self, AddressError> {
        let bytes = hex::decode(address_hex)
            .map_err(|_| AddressError::InvalidEncoding(address_hex.to_string()))?;
        Self::from_text(&BASE32.encode(&bytes))
    }

    /// The address as 40 uppercase characters
    pub fn plain(&self) -> &str {
        &self.plain
    }

    /// The address split into dash-separated groups of six characters
    pub fn pretty(&self) -> String {
        self.plain
            .as_bytes()
            .chunks(6)
            .map(|chunk| String::from_utf8_lossy(chunk))
            .collect::<Vec<_>>()
            .join("-")
    }

    /// The network, inferred from the leading character
    pub fn network_type(&self) -> NetworkType {
        self.plain
            .chars()
            .next()
            .map(NetworkType::from_address_marker)
            .unwrap_or(NetworkType::Undetermined)
    }

    /// The 25 decoded bytes
    pub fn decoded(&self) -> Vec<u8> {
        // from_text has already checked the encoding
        BASE32.decode(self.plain.as_bytes()).unwrap_or_default()
    }

    /// Check the trailing checksum against the network byte and digest
    pub fn is_valid_checksum(&self) -> bool {
        let decoded = self.decoded();
        if decoded.len() != ADDRESS_DECODED_LENGTH {
            return false;
        }
        let checksum = keccak256(&decoded[..=ADDRESS_DIGEST_LENGTH]);
        decoded[ADDRESS_DIGEST_LENGTH + 1..] == checksum[..ADDRESS_CHECKSUM_LENGTH]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.plain)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.plain
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_text(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;

    const PLAIN: &str = "TACOPEXRLZTUWBQA3UXV66R455L76ENWK6OYITBJ";
    const PRETTY: &str = "TACOPE-XRLZTU-WBQA3U-XV66R4-55L76E-NWK6OY-ITBJ";

    #[test]
    fn test_plain_and_pretty_normalize() {
        let from_pretty = Address::from_text(PRETTY).unwrap();
        let from_plain = Address::from_text(PLAIN).unwrap();
        assert_eq!(from_pretty.plain(), PLAIN);
        assert_eq!(from_plain.plain(), PLAIN);
        assert_eq!(from_plain.pretty(), PRETTY);
        assert_eq!(from_pretty, from_plain);
    }

    #[test]
    fn test_lowercase_and_whitespace_accepted() {
        let address = Address::from_text(" tacope-xrlztu wbqa3u-xv66r4-55l76e-nwk6oy-itbj\n").unwrap();
        assert_eq!(address.plain(), PLAIN);
    }

    #[test]
    fn test_invalid_length() {
        assert!(matches!(
            Address::from_text(&PLAIN[..39]),
            Err(AddressError::InvalidLength(_))
        ));
        assert!(matches!(
            Address::from_text(&format!("{}A", PLAIN)),
            Err(AddressError::InvalidLength(_))
        ));
    }

    #[test]
    fn test_unsupported_leading_character() {
        let bad = format!("X{}", &PLAIN[1..]);
        assert!(matches!(
            Address::from_text(&bad),
            Err(AddressError::UnsupportedNetwork(_))
        ));
    }

    #[test]
    fn test_invalid_base32() {
        let bad = format!("{}1", &PLAIN[..39]);
        assert!(matches!(
            Address::from_text(&bad),
            Err(AddressError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_known_vector() {
        let public_key = PublicKey::from_hex(
            "c5f54ba980fcbb657dbaaa42700539b207873e134d2375efeab5f1ab52f87844",
        )
        .unwrap();
        let address = Address::from_public_key(&public_key, NetworkType::Main);
        assert_eq!(address.plain(), "NDD2CT6LQLIYQ56KIXI3ENTM6EK3D44P5JFXJ4R4");
    }

    #[test]
    fn test_derived_marker_and_network_for_all_networks() {
        let networks = [
            NetworkType::Main,
            NetworkType::Test,
            NetworkType::Mijin,
            NetworkType::MijinTest,
        ];
        for _ in 0..8 {
            let kp = KeyPair::generate();
            for network in networks {
                let address = Address::from_public_key(kp.public_key(), network);
                assert_eq!(address.plain().len(), ADDRESS_ENCODED_LENGTH);
                assert_eq!(
                    address.plain().chars().next(),
                    Some(network.address_marker())
                );
                assert_eq!(address.network_type(), network);
                assert!(address.is_valid_checksum());
                // Leading character and embedded network byte agree
                assert_eq!(address.decoded()[0], network.byte());
                assert_eq!(Address::from_text(address.plain()).unwrap(), address);
            }
        }
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let kp = KeyPair::generate();
        let a = Address::from_public_key(kp.public_key(), NetworkType::Test);
        let b = Address::from_public_key(kp.public_key(), NetworkType::Test);
        assert_eq!(a, b);
        assert_ne!(a, Address::from_public_key(kp.public_key(), NetworkType::Main));
    }

    #[test]
    fn test_from_hex() {
        let address = Address::from_text(PLAIN).unwrap();
        let hex = hex::encode(address.decoded());
        assert_eq!(Address::from_hex(&hex).unwrap(), address);
    }

    #[test]
    fn test_corrupted_checksum_detected() {
        let kp = KeyPair::generate();
        let address = Address::from_public_key(kp.public_key(), NetworkType::Test);
        let mut decoded = address.decoded();
        decoded[24] ^= 0xff;
        let corrupted = Address::from_hex(&hex::encode(decoded)).unwrap();
        assert!(!corrupted.is_valid_checksum());
    }
}
