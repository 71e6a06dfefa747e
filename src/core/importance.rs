//! Importance transfer transactions
//!
//! Delegates the harvesting power of an account to a remote account, or
//! takes it back.

use serde::{Deserialize, Serialize};

use super::time::Deadline;
use super::transaction::{Transaction, TransactionBody, TransactionError};
use super::wire::WireWriter;
use crate::account::{NetworkType, PublicAccount};

/// Whether the remote account is being linked or unlinked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum ImportanceTransferMode {
    /// Add the remote account
    Activate = 1,
    /// Remove the remote account
    Deactivate = 2,
}

/// Payload of an importance transfer
#[derive(Debug, Clone, PartialEq)]
pub struct ImportanceTransferTransaction {
    mode: ImportanceTransferMode,
    remote_account: PublicAccount,
}

impl ImportanceTransferTransaction {
    pub fn new(mode: ImportanceTransferMode, remote_account: PublicAccount) -> Self {
        Self {
            mode,
            remote_account,
        }
    }

    pub fn create(
        network: NetworkType,
        deadline: Deadline,
        fee: u64,
        mode: ImportanceTransferMode,
        remote_account: PublicAccount,
    ) -> Result<Transaction, TransactionError> {
        let tx = Transaction::new(
            network,
            deadline,
            fee,
            TransactionBody::ImportanceTransfer(Self::new(mode, remote_account.clone())),
        )?;
        tx.check_network(remote_account.network_type())?;
        Ok(tx)
    }

    pub fn mode(&self) -> ImportanceTransferMode {
        self.mode
    }

    pub fn remote_account(&self) -> &PublicAccount {
        &self.remote_account
    }

    pub(crate) fn write_to(&self, w: &mut WireWriter) {
        w.write_u32(self.mode as u32);
        w.write_public_key(self.remote_account.public_key());
    }
}
