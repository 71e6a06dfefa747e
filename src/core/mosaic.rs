//! Mosaic definition and supply change transactions

use serde::{Deserialize, Serialize};

use super::fee::RentalFees;
use super::time::Deadline;
use super::transaction::{Transaction, TransactionBody, TransactionError};
use super::wire::WireWriter;
use crate::account::{Address, NetworkType, PublicAccount};
use crate::mosaic::{MosaicId, MosaicLevy, MosaicProperties};

/// Longest mosaic description in bytes
pub const MAX_DESCRIPTION_LENGTH: usize = 512;

// =============================================================================
// Mosaic Definition
// =============================================================================

/// Payload defining a new mosaic
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicDefinitionTransaction {
    creator: PublicAccount,
    mosaic_id: MosaicId,
    description: String,
    properties: MosaicProperties,
    levy: Option<MosaicLevy>,
    creation_fee_sink: Address,
    creation_fee: u64,
}

impl MosaicDefinitionTransaction {
    pub fn new(
        creator: PublicAccount,
        mosaic_id: MosaicId,
        description: &str,
        properties: MosaicProperties,
        levy: Option<MosaicLevy>,
        rental: &RentalFees,
    ) -> Result<Self, TransactionError> {
        if description.len() > MAX_DESCRIPTION_LENGTH {
            return Err(TransactionError::InvalidTransaction(format!(
                "description of {} bytes exceeds {}",
                description.len(),
                MAX_DESCRIPTION_LENGTH
            )));
        }
        Ok(Self {
            creator,
            mosaic_id,
            description: description.to_string(),
            properties,
            levy,
            creation_fee_sink: rental.mosaic_sink.clone(),
            creation_fee: rental.mosaic_creation_fee,
        })
    }

    /// Define a mosaic, paying the published creation fee of the network
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        network: NetworkType,
        deadline: Deadline,
        fee: u64,
        creator: PublicAccount,
        mosaic_id: MosaicId,
        description: &str,
        properties: MosaicProperties,
        levy: Option<MosaicLevy>,
    ) -> Result<Transaction, TransactionError> {
        let rental = RentalFees::for_network(network).ok_or(TransactionError::NoRentalSink(network))?;
        let body = Self::new(creator, mosaic_id, description, properties, levy, &rental)?;
        Self::create_from(network, deadline, fee, body)
    }

    /// Wrap a payload built with [`MosaicDefinitionTransaction::new`]
    pub fn create_from(
        network: NetworkType,
        deadline: Deadline,
        fee: u64,
        body: MosaicDefinitionTransaction,
    ) -> Result<Transaction, TransactionError> {
        let creator_network = body.creator.network_type();
        let sink_network = body.creation_fee_sink.network_type();
        let levy_network = body.levy.as_ref().map(|levy| levy.recipient.network_type());

        let tx = Transaction::new(network, deadline, fee, TransactionBody::MosaicDefinition(body))?;
        tx.check_network(creator_network)?;
        tx.check_network(sink_network)?;
        if let Some(levy_network) = levy_network {
            tx.check_network(levy_network)?;
        }
        Ok(tx)
    }

    pub fn creator(&self) -> &PublicAccount {
        &self.creator
    }

    pub fn mosaic_id(&self) -> &MosaicId {
        &self.mosaic_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn properties(&self) -> &MosaicProperties {
        &self.properties
    }

    pub fn levy(&self) -> Option<&MosaicLevy> {
        self.levy.as_ref()
    }

    pub fn creation_fee(&self) -> u64 {
        self.creation_fee
    }

    pub(crate) fn write_to(&self, w: &mut WireWriter) {
        w.write_struct(|d| {
            d.write_public_key(self.creator.public_key());
            d.write_mosaic_id(&self.mosaic_id);
            d.write_str(&self.description);

            let pairs = self.properties.to_pairs();
            d.write_u32(pairs.len() as u32);
            for (name, value) in &pairs {
                d.write_struct(|p| {
                    p.write_str(name);
                    p.write_str(value);
                });
            }

            match &self.levy {
                Some(levy) => d.write_struct(|l| {
                    l.write_u32(levy.levy_type as u32);
                    l.write_address(&levy.recipient);
                    l.write_mosaic_id(&levy.mosaic_id);
                    l.write_u64(levy.fee);
                }),
                None => d.write_u32(0),
            }
        });
        w.write_address(&self.creation_fee_sink);
        w.write_u64(self.creation_fee);
    }
}

// =============================================================================
// Supply Change
// =============================================================================

/// Direction of a supply change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum SupplyType {
    Increase = 1,
    Decrease = 2,
}

/// Payload changing the supply of a mutable mosaic
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicSupplyChangeTransaction {
    mosaic_id: MosaicId,
    supply_type: SupplyType,
    delta: u64,
}

impl MosaicSupplyChangeTransaction {
    pub fn new(mosaic_id: MosaicId, supply_type: SupplyType, delta: u64) -> Result<Self, TransactionError> {
        if delta == 0 {
            return Err(TransactionError::InvalidTransaction(
                "supply change of zero".to_string(),
            ));
        }
        Ok(Self {
            mosaic_id,
            supply_type,
            delta,
        })
    }

    pub fn create(
        network: NetworkType,
        deadline: Deadline,
        fee: u64,
        mosaic_id: MosaicId,
        supply_type: SupplyType,
        delta: u64,
    ) -> Result<Transaction, TransactionError> {
        let body = Self::new(mosaic_id, supply_type, delta)?;
        Transaction::new(network, deadline, fee, TransactionBody::SupplyChange(body))
    }

    pub fn mosaic_id(&self) -> &MosaicId {
        &self.mosaic_id
    }

    pub fn supply_type(&self) -> SupplyType {
        self.supply_type
    }

    /// Whole units added or removed
    pub fn delta(&self) -> u64 {
        self.delta
    }

    pub(crate) fn write_to(&self, w: &mut WireWriter) {
        w.write_mosaic_id(&self.mosaic_id);
        w.write_u32(self.supply_type as u32);
        w.write_u64(self.delta);
    }
}
