//! Accounts and addresses
//!
//! This module provides:
//! - Network identifiers
//! - Address derivation and parsing (plain and pretty forms)
//! - Public and private accounts

pub mod account;
pub mod address;
pub mod network_type;

pub use account::{
    AccountError, AccountInfo, AccountStatus, PrivateAccount, PublicAccount, RemoteStatus,
};
pub use address::{
    Address, AddressError, ADDRESS_DECODED_LENGTH, ADDRESS_ENCODED_LENGTH,
};
pub use network_type::NetworkType;
