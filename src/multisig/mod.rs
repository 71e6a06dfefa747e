//! Multisig accounts
//!
//! A multisig account is controlled by its cosignatories:
//! - An aggregate modification sets up the cosignatories and the minimum
//!   number of cosignatures
//! - One cosigner wraps and signs each transaction the account performs
//! - The remaining cosigners sign the inner hash with cosignature transactions
//!
//! # Example
//!
//! ```ignore
//! use nem_client::core::{Deadline, Message, TransferTransaction};
//! use nem_client::multisig::MultisigTransaction;
//!
//! let transfer = TransferTransaction::create_xem(network, Deadline::create_hours(2), 0, recipient, 1_000_000, Message::Empty)?;
//! let wrapped = MultisigTransaction::wrap(network, Deadline::create_hours(2), 0, transfer)?;
//! let signed = wrapped.sign_multisig_with(cosigner.key_pair(), &multisig_account)?;
//!
//! // announce `signed`, then other cosigners cosign `signed.inner_transaction_hash()`
//! ```

pub mod cosignature;
pub mod modification;
pub mod transaction;

pub use cosignature::CosignatureTransaction;
pub use modification::{
    MultisigAggregateModificationTransaction, MultisigModification, MultisigModificationType,
};
pub use transaction::{MultisigError, MultisigTransaction};
