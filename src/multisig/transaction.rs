//! Multisig wrapper transactions
//!
//! A multisig account never signs for itself. One of its cosigners wraps the
//! transaction the account should perform and signs the wrapper; the inner
//! transaction is encoded with the multisig account as its signer. The inner
//! hash is what the other cosigners later cosign.

use thiserror::Error;

use crate::account::{NetworkType, PublicAccount};
use crate::core::transaction::hash_hex;
use crate::core::{
    Deadline, SignedMultisigTransaction, SignedTransaction, Transaction, TransactionBody,
    TransactionError, TransactionType, WireWriter,
};
use crate::crypto::KeyPair;

/// Errors related to multisig operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MultisigError {
    #[error("Modification transaction needs at least one modification")]
    NoModifications,
    #[error("Duplicate cosignatory: {0}")]
    DuplicateCosignatory(String),
    #[error("Invalid transaction hash: {0}")]
    InvalidHash(String),
    #[error("Multisig account is on {actual}, transaction is for {expected}")]
    NetworkMismatch {
        expected: NetworkType,
        actual: NetworkType,
    },
    #[error("Cosigner cannot be the multisig account itself")]
    CosignerIsMultisig,
    #[error("Inner transaction was signed by {0}, not the multisig account")]
    SignerMismatch(String),
    #[error("Multisig transactions cannot be nested")]
    NestedMultisig,
    #[error("Transaction is not a multisig wrapper")]
    NotMultisig,
    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),
}

/// Payload of a multisig wrapper: the transaction it carries
#[derive(Debug, Clone, PartialEq)]
pub struct MultisigTransaction {
    inner: Box<Transaction>,
}

impl MultisigTransaction {
    /// Wrap `inner` for a cosigner to sign
    pub fn wrap(
        network: NetworkType,
        deadline: Deadline,
        fee: u64,
        inner: Transaction,
    ) -> Result<Transaction, MultisigError> {
        if inner.transaction_type() == TransactionType::Multisig {
            return Err(MultisigError::NestedMultisig);
        }
        if inner.network_type() != network {
            return Err(MultisigError::NetworkMismatch {
                expected: network,
                actual: inner.network_type(),
            });
        }
        let body = Self {
            inner: Box::new(inner),
        };
        Ok(Transaction::new(
            network,
            deadline,
            fee,
            TransactionBody::Multisig(body),
        )?)
    }

    pub fn inner(&self) -> &Transaction {
        &self.inner
    }

    /// Encode using the signer recorded on a confirmed inner transaction
    pub(crate) fn write_to(&self, w: &mut WireWriter) -> Result<(), TransactionError> {
        let signer = self
            .inner
            .signer()
            .ok_or(TransactionError::MissingInnerSigner)?;
        let inner_bytes = self.inner.to_wire_bytes(signer.public_key())?;
        w.write_bytes(&inner_bytes);
        Ok(())
    }
}

impl Transaction {
    /// Sign a multisig wrapper on behalf of `multisig_account`
    ///
    /// The inner transaction is encoded with the multisig account as signer
    /// and the wrapper is signed by `cosigner`. The wrapper hash and the inner
    /// hash are returned separately.
    pub fn sign_multisig_with(
        &self,
        cosigner: &KeyPair,
        multisig_account: &PublicAccount,
    ) -> Result<SignedMultisigTransaction, MultisigError> {
        let TransactionBody::Multisig(wrapper) = self.body() else {
            return Err(MultisigError::NotMultisig);
        };
        if self.is_confirmed() {
            return Err(TransactionError::AlreadyConfirmed.into());
        }
        if multisig_account.network_type() != self.network_type() {
            return Err(MultisigError::NetworkMismatch {
                expected: self.network_type(),
                actual: multisig_account.network_type(),
            });
        }
        if cosigner.public_key() == multisig_account.public_key() {
            return Err(MultisigError::CosignerIsMultisig);
        }
        if let Some(signer) = wrapper.inner().signer() {
            if signer.public_key() != multisig_account.public_key() {
                return Err(MultisigError::SignerMismatch(signer.public_key().to_hex()));
            }
        }

        let inner_bytes = wrapper.inner().to_wire_bytes(multisig_account.public_key())?;
        let mut w = self.header_writer(cosigner.public_key());
        w.write_bytes(&inner_bytes);
        let bytes = w.into_vec();

        let signature = cosigner.sign(&bytes);
        let signed = SignedTransaction::new(
            &bytes,
            &signature,
            *cosigner.public_key(),
            TransactionType::Multisig,
        );
        let inner_hash = hash_hex(&inner_bytes);
        log::debug!(
            "Signed multisig transaction {} for {} (inner {})",
            signed.hash(),
            multisig_account.address(),
            inner_hash
        );
        Ok(SignedMultisigTransaction::new(signed, inner_hash))
    }
}
