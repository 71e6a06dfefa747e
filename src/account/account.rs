//! Public and private accounts
//!
//! An account pairs an address with the key material it was derived from.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::address::{Address, AddressError};
use super::network_type::NetworkType;
use crate::crypto::{KeyError, KeyPair, PublicKey};

/// Errors related to accounts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Key error: {0}")]
    Key(#[from] KeyError),
    #[error("Address error: {0}")]
    Address(#[from] AddressError),
    #[error("Address {address} does not belong to public key {public_key}")]
    AddressMismatch { address: String, public_key: String },
}

/// An account known by its public key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicAccount {
    public_key: PublicKey,
    address: Address,
}

impl PublicAccount {
    /// Create an account from a public key on a network
    pub fn new(public_key: PublicKey, network: NetworkType) -> Self {
        Self {
            address: Address::from_public_key(&public_key, network),
            public_key,
        }
    }

    /// Create an account from a hex public key
    pub fn from_public_key_hex(public_key: &str, network: NetworkType) -> Result<Self, AccountError> {
        Ok(Self::new(PublicKey::from_hex(public_key)?, network))
    }

    /// Pair a public key with an address it is claimed to derive
    pub fn with_address(public_key: PublicKey, address: Address) -> Result<Self, AccountError> {
        let account = Self::new(public_key, address.network_type());
        if account.address != address {
            return Err(AccountError::AddressMismatch {
                address: address.plain().to_string(),
                public_key: public_key.to_hex(),
            });
        }
        Ok(account)
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn network_type(&self) -> NetworkType {
        self.address.network_type()
    }

    /// Verify a signature made by this account
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        self.public_key.verify(message, signature)
    }
}

/// An account whose private key is held locally
#[derive(Debug, Clone)]
pub struct PrivateAccount {
    key_pair: KeyPair,
    public_account: PublicAccount,
}

impl PrivateAccount {
    /// Load an account from a hex private key
    pub fn from_private_key(private_key: &str, network: NetworkType) -> Result<Self, AccountError> {
        Ok(Self::from_key_pair(
            KeyPair::from_private_key_hex(private_key)?,
            network,
        ))
    }

    /// Wrap an existing key pair
    pub fn from_key_pair(key_pair: KeyPair, network: NetworkType) -> Self {
        let public_account = PublicAccount::new(*key_pair.public_key(), network);
        Self {
            key_pair,
            public_account,
        }
    }

    /// Generate a fresh random account
    pub fn generate(network: NetworkType) -> Self {
        let account = Self::from_key_pair(KeyPair::generate(), network);
        log::debug!("Generated account {}", account.address());
        account
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    pub fn public_account(&self) -> &PublicAccount {
        &self.public_account
    }

    pub fn address(&self) -> &Address {
        self.public_account.address()
    }

    pub fn public_key(&self) -> &PublicKey {
        self.key_pair.public_key()
    }

    pub fn private_key_hex(&self) -> String {
        self.key_pair.private_key_hex()
    }
}

/// Harvesting lock status of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    Locked,
    Unlocked,
    Unknown,
}

/// Delegated harvesting status of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemoteStatus {
    Inactive,
    Active,
    Activating,
    Deactivating,
    Remote,
}

/// Account state as reported by a node
///
/// Built by the JSON mapping collaborator from already parsed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub address: Address,
    pub public_key: Option<PublicKey>,
    pub balance: u64,
    pub vested_balance: u64,
    pub importance: f64,
    pub harvested_blocks: u64,
    pub status: AccountStatus,
    pub remote_status: RemoteStatus,
    pub min_cosigners: u32,
    pub cosigners: Vec<AccountInfo>,
    pub cosignatory_of: Vec<AccountInfo>,
}

impl AccountInfo {
    /// Whether the account is a multisig account
    pub fn is_multisig(&self) -> bool {
        !self.cosigners.is_empty()
    }

    /// Whether `address` is one of this account's cosigners
    pub fn has_cosigner(&self, address: &Address) -> bool {
        self.cosigners.iter().any(|c| &c.address == address)
    }
}
