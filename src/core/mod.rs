//! Transaction encoding and signing
//!
//! This module contains:
//! - Network time and deadlines
//! - The fee schedule and rental fees
//! - The binary wire writer
//! - Transactions of every type and their payloads
//! - Signed transactions ready to announce

pub mod fee;
pub mod importance;
pub mod mosaic;
pub mod namespace;
pub mod signed;
pub mod time;
pub mod transaction;
pub mod transfer;
pub mod wire;

pub use fee::{transfer_fee, RentalFees, DEFAULT_FEE, FEE_FACTOR, MULTISIG_MODIFICATION_FEE};
pub use importance::{ImportanceTransferMode, ImportanceTransferTransaction};
pub use mosaic::{MosaicDefinitionTransaction, MosaicSupplyChangeTransaction, SupplyType};
pub use namespace::ProvisionNamespaceTransaction;
pub use signed::{SignedMultisigTransaction, SignedTransaction, TransactionResponse};
pub use time::{Deadline, NetworkTime};
pub use transaction::{
    Transaction, TransactionBody, TransactionError, TransactionInfo, TransactionType,
};
pub use transfer::{Message, TransferTransaction, MOSAIC_MULTIPLIER};
pub use wire::WireWriter;
