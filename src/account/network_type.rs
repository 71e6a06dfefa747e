//! Network identifiers
//!
//! Each NEM network is identified by a single byte. The byte is the first
//! byte of every address decoded on that network and the high byte of the
//! version word of every transaction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::address::AddressError;

/// The networks a client can talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NetworkType {
    /// Public main network
    Main = 0x68,
    /// Public test network
    Test = 0x98,
    /// Private mijin network
    Mijin = 0x60,
    /// Private mijin test network
    MijinTest = 0x90,
    /// Reported by some test net nodes that do not fill in their network id
    Undetermined = 0x00,
}

impl NetworkType {
    /// The network byte
    pub fn byte(self) -> u8 {
        self as u8
    }

    /// Map a raw network byte back to a network
    pub fn from_byte(byte: u8) -> Result<Self, AddressError> {
        match byte {
            0x68 => Ok(NetworkType::Main),
            0x98 => Ok(NetworkType::Test),
            0x60 => Ok(NetworkType::Mijin),
            0x90 => Ok(NetworkType::MijinTest),
            0x00 => Ok(NetworkType::Undetermined),
            other => Err(AddressError::UnknownNetwork(format!("0x{:02x}", other))),
        }
    }

    /// Leading character of addresses on this network
    pub fn address_marker(self) -> char {
        match self {
            NetworkType::Main => 'N',
            NetworkType::Test => 'T',
            NetworkType::Mijin => 'M',
            NetworkType::MijinTest => 'S',
            NetworkType::Undetermined => 'A',
        }
    }

    /// Map a leading address character back to a network
    pub fn from_address_marker(marker: char) -> Self {
        match marker {
            'N' => NetworkType::Main,
            'T' => NetworkType::Test,
            'M' => NetworkType::Mijin,
            'S' => NetworkType::MijinTest,
            _ => NetworkType::Undetermined,
        }
    }

    /// Name used by NIS in its node info
    pub fn name(self) -> &'static str {
        match self {
            NetworkType::Main => "mainnet",
            NetworkType::Test => "testnet",
            NetworkType::Mijin => "mijin",
            NetworkType::MijinTest => "mijinTest",
            NetworkType::Undetermined => "",
        }
    }
}

impl FromStr for NetworkType {
    type Err = AddressError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "mainnet" => Ok(NetworkType::Main),
            "testnet" => Ok(NetworkType::Test),
            "mijin" => Ok(NetworkType::Mijin),
            "mijinTest" => Ok(NetworkType::MijinTest),
            "" => Ok(NetworkType::Undetermined),
            other => Err(AddressError::UnknownNetwork(other.to_string())),
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [NetworkType; 5] = [
        NetworkType::Main,
        NetworkType::Test,
        NetworkType::Mijin,
        NetworkType::MijinTest,
        NetworkType::Undetermined,
    ];

    #[test]
    fn test_byte_round_trip() {
        for network in ALL {
            assert_eq!(NetworkType::from_byte(network.byte()).unwrap(), network);
        }
        assert!(NetworkType::from_byte(0x42).is_err());
    }

    #[test]
    fn test_name_round_trip() {
        for network in ALL {
            assert_eq!(network.name().parse::<NetworkType>().unwrap(), network);
        }
        assert!("privatenet".parse::<NetworkType>().is_err());
    }

    #[test]
    fn test_marker_round_trip() {
        for network in ALL {
            assert_eq!(
                NetworkType::from_address_marker(network.address_marker()),
                network
            );
        }
        assert_eq!(
            NetworkType::from_address_marker('X'),
            NetworkType::Undetermined
        );
    }

    #[test]
    fn test_marker_matches_leading_base32_digit() {
        // The first base32 digit is the top five bits of the network byte
        const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
        for network in ALL {
            let digit = ALPHABET[(network.byte() >> 3) as usize] as char;
            assert_eq!(digit, network.address_marker());
        }
    }
}
