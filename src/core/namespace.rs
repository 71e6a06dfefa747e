//! Namespace provisioning transactions

use super::fee::RentalFees;
use super::time::Deadline;
use super::transaction::{Transaction, TransactionBody, TransactionError};
use super::wire::WireWriter;
use crate::account::{Address, NetworkType};
use crate::mosaic::{validate_namespace_part, MosaicError, MAX_NAMESPACE_DEPTH};

/// Payload of a namespace provisioning
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionNamespaceTransaction {
    rental_fee_sink: Address,
    rental_fee: u64,
    new_part: String,
    parent: Option<String>,
}

impl ProvisionNamespaceTransaction {
    /// Build a payload for `new_part`, under `parent` if given
    pub fn new(
        new_part: &str,
        parent: Option<&str>,
        rental: &RentalFees,
    ) -> Result<Self, TransactionError> {
        validate_namespace_part(new_part, parent.is_none())?;
        if let Some(parent) = parent {
            let parts: Vec<&str> = parent.split('.').collect();
            if parts.len() >= MAX_NAMESPACE_DEPTH {
                return Err(MosaicError::InvalidNamespace(format!("{}.{}", parent, new_part)).into());
            }
            for (level, part) in parts.iter().enumerate() {
                validate_namespace_part(part, level == 0)?;
            }
        }
        Ok(Self {
            rental_fee_sink: rental.namespace_sink.clone(),
            rental_fee: rental.namespace_fee(parent.is_none()),
            new_part: new_part.to_string(),
            parent: parent.map(str::to_string),
        })
    }

    /// Provision a namespace, paying the published rental fee of the network
    pub fn create(
        network: NetworkType,
        deadline: Deadline,
        fee: u64,
        new_part: &str,
        parent: Option<&str>,
    ) -> Result<Transaction, TransactionError> {
        let rental = RentalFees::for_network(network).ok_or(TransactionError::NoRentalSink(network))?;
        Self::create_with_rental(network, deadline, fee, new_part, parent, &rental)
    }

    /// Provision a namespace with explicit rental fees
    pub fn create_with_rental(
        network: NetworkType,
        deadline: Deadline,
        fee: u64,
        new_part: &str,
        parent: Option<&str>,
        rental: &RentalFees,
    ) -> Result<Transaction, TransactionError> {
        let body = Self::new(new_part, parent, rental)?;
        let tx = Transaction::new(network, deadline, fee, TransactionBody::ProvisionNamespace(body))?;
        tx.check_network(rental.namespace_sink.network_type())?;
        Ok(tx)
    }

    pub fn new_part(&self) -> &str {
        &self.new_part
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Fully qualified name of the new namespace
    pub fn full_name(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{}.{}", parent, self.new_part),
            None => self.new_part.clone(),
        }
    }

    pub fn rental_fee(&self) -> u64 {
        self.rental_fee
    }

    pub fn rental_fee_sink(&self) -> &Address {
        &self.rental_fee_sink
    }

    pub(crate) fn write_to(&self, w: &mut WireWriter) {
        w.write_address(&self.rental_fee_sink);
        w.write_u64(self.rental_fee);
        w.write_str(&self.new_part);
        w.write_opt_str(self.parent.as_deref());
    }
}
