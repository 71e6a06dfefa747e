//! Cosignature transactions
//!
//! Once a multisig transaction has been announced, the remaining cosigners
//! each sign its inner hash with a cosignature transaction of their own.

use super::transaction::MultisigError;
use crate::account::{Address, NetworkType};
use crate::core::{Deadline, Transaction, TransactionBody, WireWriter};
use crate::crypto::KEY_LENGTH;

/// Length of the hash structure: length header plus hash
const HASH_STRUCT_LENGTH: u32 = 4 + KEY_LENGTH as u32;

/// Payload of a cosignature
#[derive(Debug, Clone, PartialEq)]
pub struct CosignatureTransaction {
    other_hash: [u8; KEY_LENGTH],
    multisig_address: Address,
}

impl CosignatureTransaction {
    /// Build a payload from the inner hash in hex
    pub fn new(inner_hash: &str, multisig_address: Address) -> Result<Self, MultisigError> {
        let bytes =
            hex::decode(inner_hash).map_err(|_| MultisigError::InvalidHash(inner_hash.to_string()))?;
        let other_hash: [u8; KEY_LENGTH] = bytes
            .try_into()
            .map_err(|_| MultisigError::InvalidHash(inner_hash.to_string()))?;
        Ok(Self {
            other_hash,
            multisig_address,
        })
    }

    /// Cosign the multisig transaction whose inner hash is `inner_hash`
    pub fn create(
        network: NetworkType,
        deadline: Deadline,
        fee: u64,
        inner_hash: &str,
        multisig_address: Address,
    ) -> Result<Transaction, MultisigError> {
        let address_network = multisig_address.network_type();
        let body = Self::new(inner_hash, multisig_address)?;
        let tx = Transaction::new(network, deadline, fee, TransactionBody::Cosignature(body))?;
        tx.check_network(address_network)?;
        Ok(tx)
    }

    /// Inner hash being cosigned, as lowercase hex
    pub fn other_hash(&self) -> String {
        hex::encode(self.other_hash)
    }

    pub fn multisig_address(&self) -> &Address {
        &self.multisig_address
    }

    pub(crate) fn write_to(&self, w: &mut WireWriter) {
        w.write_u32(HASH_STRUCT_LENGTH);
        w.write_bytes(&self.other_hash);
        w.write_address(&self.multisig_address);
    }
}
