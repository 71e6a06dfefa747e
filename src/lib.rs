//! NEM client: a client library for the NEM (NIS1) network
//!
//! This crate provides:
//! - Account identities and address derivation for every network
//! - Binary encoding, fees and signing for all transaction types
//! - Multisig wrapping, cosigning and cosignatory management
//! - Namespace and mosaic definitions
//! - A real-time listener for blocks, accounts and transactions
//!
//! # Example
//!
//! ```rust
//! use nem_client::account::{Address, NetworkType, PrivateAccount};
//! use nem_client::core::{Deadline, Message, TransferTransaction};
//! use nem_client::mosaic::MosaicAmount;
//!
//! let sender = PrivateAccount::generate(NetworkType::Test);
//! let recipient = Address::from_text("TACOPEXRLZTUWBQA3UXV66R455L76ENWK6OYITBJ").unwrap();
//!
//! // Transfer 1000 XEM as a mosaic, with a computed fee
//! let transfer = TransferTransaction::create(
//!     NetworkType::Test,
//!     Deadline::create_hours(2),
//!     0,
//!     recipient,
//!     vec![MosaicAmount::new("nem:xem", 1000).unwrap()],
//!     Message::Empty,
//! )
//! .unwrap();
//!
//! let signed = transfer.sign_with(sender.key_pair()).unwrap();
//! println!("Announce {} with hash {}", signed.payload(), signed.hash());
//! ```

pub mod account;
pub mod core;
pub mod crypto;
pub mod mosaic;
pub mod multisig;
pub mod network;

// Re-export commonly used types
pub use account::{Address, NetworkType, PrivateAccount, PublicAccount};
pub use crate::core::{
    Deadline, Message, SignedMultisigTransaction, SignedTransaction, Transaction,
    TransactionError, TransactionType, TransferTransaction,
};
pub use crypto::{KeyPair, PublicKey};
pub use mosaic::{MosaicAmount, MosaicId};
pub use multisig::{CosignatureTransaction, MultisigError, MultisigTransaction};
pub use network::{Listener, ListenerConfig};
