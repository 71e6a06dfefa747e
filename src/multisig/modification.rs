//! Multisig aggregate modification transactions
//!
//! Converts an account into a multisig account, or changes the cosignatories
//! and the minimum number of cosignatures of an existing one.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::transaction::MultisigError;
use crate::account::{NetworkType, PublicAccount};
use crate::core::{Deadline, Transaction, TransactionBody, WireWriter};

/// Length of one encoded modification
const MODIFICATION_LENGTH: u32 = 40;

/// Whether a cosignatory joins or leaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u32)]
pub enum MultisigModificationType {
    Add = 1,
    Remove = 2,
}

/// One cosignatory change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigModification {
    pub modification_type: MultisigModificationType,
    pub cosignatory: PublicAccount,
}

impl MultisigModification {
    pub fn add(cosignatory: PublicAccount) -> Self {
        Self {
            modification_type: MultisigModificationType::Add,
            cosignatory,
        }
    }

    pub fn remove(cosignatory: PublicAccount) -> Self {
        Self {
            modification_type: MultisigModificationType::Remove,
            cosignatory,
        }
    }
}

/// Payload of a multisig aggregate modification
#[derive(Debug, Clone, PartialEq)]
pub struct MultisigAggregateModificationTransaction {
    modifications: Vec<MultisigModification>,
    relative_change: i32,
}

impl MultisigAggregateModificationTransaction {
    /// Build a payload
    ///
    /// `relative_change` moves the minimum number of cosignatures up or down;
    /// zero leaves it unchanged. Modifications are put in the order nodes
    /// serialize them in: adds before removes, then by address.
    pub fn new(
        mut modifications: Vec<MultisigModification>,
        relative_change: i32,
    ) -> Result<Self, MultisigError> {
        if modifications.is_empty() {
            return Err(MultisigError::NoModifications);
        }
        let mut seen = HashSet::new();
        for modification in &modifications {
            if !seen.insert(*modification.cosignatory.public_key()) {
                return Err(MultisigError::DuplicateCosignatory(
                    modification.cosignatory.public_key().to_hex(),
                ));
            }
        }
        modifications.sort_by(|a, b| {
            a.modification_type
                .cmp(&b.modification_type)
                .then_with(|| a.cosignatory.address().cmp(b.cosignatory.address()))
        });
        Ok(Self {
            modifications,
            relative_change,
        })
    }

    pub fn create(
        network: NetworkType,
        deadline: Deadline,
        fee: u64,
        modifications: Vec<MultisigModification>,
        relative_change: i32,
    ) -> Result<Transaction, MultisigError> {
        let networks: Vec<NetworkType> = modifications
            .iter()
            .map(|m| m.cosignatory.network_type())
            .collect();
        let body = Self::new(modifications, relative_change)?;
        let tx = Transaction::new(
            network,
            deadline,
            fee,
            TransactionBody::MultisigAggregateModification(body),
        )?;
        for cosignatory_network in networks {
            tx.check_network(cosignatory_network)?;
        }
        Ok(tx)
    }

    pub fn modifications(&self) -> &[MultisigModification] {
        &self.modifications
    }

    pub fn relative_change(&self) -> i32 {
        self.relative_change
    }

    pub(crate) fn write_to(&self, w: &mut WireWriter) {
        w.write_u32(self.modifications.len() as u32);
        for modification in &self.modifications {
            w.write_u32(MODIFICATION_LENGTH);
            w.write_u32(modification.modification_type as u32);
            w.write_public_key(modification.cosignatory.public_key());
        }
        if self.relative_change == 0 {
            w.write_u32(0);
        } else {
            w.write_u32(4);
            w.write_i32(self.relative_change);
        }
    }
}
