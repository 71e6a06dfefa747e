//! Mosaic definitions and amounts
//!
//! A mosaic is a named asset living under a namespace, identified as
//! `namespace:name`. The native currency is the `nem:xem` mosaic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::account::Address;
use crate::crypto::PublicKey;

/// Namespace of the native currency
pub const NEM_NAMESPACE: &str = "nem";

/// Name of the native currency mosaic
pub const XEM_NAME: &str = "xem";

/// Divisibility of xem
pub const XEM_DIVISIBILITY: u8 = 6;

/// Fixed xem supply in whole units
pub const XEM_SUPPLY: u64 = 8_999_999_999;

/// Public key that created the xem mosaic in the nemesis block
pub const XEM_CREATOR: &str = "3e82e1c1e4a75adaa3cba8c101c3cd31d9817a2eb966eb3b511fb2ed45b8e262";

/// Largest divisibility a mosaic can declare
pub const MAX_DIVISIBILITY: u8 = 6;

/// Largest initial supply a mosaic can declare, in whole units
pub const MAX_SUPPLY: u64 = 9_000_000_000;

/// Mosaic-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MosaicError {
    #[error("Invalid mosaic identifier: {0}")]
    InvalidMosaicId(String),
    #[error("Invalid divisibility {0}: must be 0-6")]
    InvalidDivisibility(u8),
    #[error("Invalid supply {0}: must not exceed 9000000000")]
    InvalidSupply(u64),
    #[error("Divisibility of {0} is unknown")]
    UnknownDivisibility(String),
    #[error("Mosaic {expected} expected, got {actual}")]
    MosaicMismatch { expected: String, actual: String },
    #[error("Invalid namespace: {0}")]
    InvalidNamespace(String),
}

/// Identifier of a mosaic: `namespace:name`
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MosaicId {
    namespace_id: String,
    name: String,
}

impl MosaicId {
    /// Create an identifier from its two parts
    pub fn new(namespace_id: &str, name: &str) -> Result<Self, MosaicError> {
        if namespace_id.is_empty() || name.is_empty() {
            return Err(MosaicError::InvalidMosaicId(format!("{}:{}", namespace_id, name)));
        }
        if namespace_id.contains(':') || name.contains(':') {
            return Err(MosaicError::InvalidMosaicId(format!("{}:{}", namespace_id, name)));
        }
        Ok(Self {
            namespace_id: namespace_id.to_string(),
            name: name.to_string(),
        })
    }

    /// Parse `namespace:name`
    pub fn from_full_name(full_name: &str) -> Result<Self, MosaicError> {
        let (namespace_id, name) = full_name
            .split_once(':')
            .ok_or_else(|| MosaicError::InvalidMosaicId(full_name.to_string()))?;
        Self::new(namespace_id, name)
            .map_err(|_| MosaicError::InvalidMosaicId(full_name.to_string()))
    }

    /// The `nem:xem` identifier
    pub fn xem() -> Self {
        Self {
            namespace_id: NEM_NAMESPACE.to_string(),
            name: XEM_NAME.to_string(),
        }
    }

    pub fn namespace_id(&self) -> &str {
        &self.namespace_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> String {
        format!("{}:{}", self.namespace_id, self.name)
    }

    pub fn is_xem(&self) -> bool {
        self.namespace_id == NEM_NAMESPACE && self.name == XEM_NAME
    }
}

impl fmt::Display for MosaicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace_id, self.name)
    }
}

impl fmt::Debug for MosaicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MosaicId({}:{})", self.namespace_id, self.name)
    }
}

impl FromStr for MosaicId {
    type Err = MosaicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_full_name(s)
    }
}

/// Properties fixed when a mosaic is defined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MosaicProperties {
    pub divisibility: u8,
    pub initial_supply: u64,
    pub supply_mutable: bool,
    pub transferable: bool,
}

impl MosaicProperties {
    pub fn new(
        divisibility: u8,
        initial_supply: u64,
        supply_mutable: bool,
        transferable: bool,
    ) -> Result<Self, MosaicError> {
        if divisibility > MAX_DIVISIBILITY {
            return Err(MosaicError::InvalidDivisibility(divisibility));
        }
        if initial_supply > MAX_SUPPLY {
            return Err(MosaicError::InvalidSupply(initial_supply));
        }
        Ok(Self {
            divisibility,
            initial_supply,
            supply_mutable,
            transferable,
        })
    }

    /// Properties as the name/value string pairs carried on the wire
    pub fn to_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("divisibility", self.divisibility.to_string()),
            ("initialSupply", self.initial_supply.to_string()),
            ("supplyMutable", self.supply_mutable.to_string()),
            ("transferable", self.transferable.to_string()),
        ]
    }
}

/// How a levy fee is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum LevyType {
    /// A fixed quantity per transfer
    Absolute = 1,
    /// A fraction of the transferred quantity
    Percentile = 2,
}

/// Extra fee charged when a mosaic is transferred
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MosaicLevy {
    pub mosaic_id: MosaicId,
    pub fee: u64,
    pub recipient: Address,
    pub levy_type: LevyType,
}

/// What is known about a mosaic
///
/// Only the identifier is required; the rest is filled in when the mosaic
/// definition has been fetched from the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MosaicInfo {
    pub id: MosaicId,
    pub creator: Option<PublicKey>,
    pub description: String,
    pub supply: Option<u64>,
    pub properties: Option<MosaicProperties>,
    pub levy: Option<MosaicLevy>,
}

impl MosaicInfo {
    /// Info holding only an identifier
    pub fn from_id(id: MosaicId) -> Self {
        Self {
            id,
            creator: None,
            description: String::new(),
            supply: None,
            properties: None,
            levy: None,
        }
    }

    /// Full definition of the native currency
    pub fn xem() -> Self {
        Self {
            id: MosaicId::xem(),
            creator: PublicKey::from_hex(XEM_CREATOR).ok(),
            description: "reserved xem mosaic".to_string(),
            supply: Some(XEM_SUPPLY),
            properties: Some(MosaicProperties {
                divisibility: XEM_DIVISIBILITY,
                initial_supply: XEM_SUPPLY,
                supply_mutable: false,
                transferable: true,
            }),
            levy: None,
        }
    }

    pub fn divisibility(&self) -> Option<u8> {
        self.properties.map(|p| p.divisibility)
    }
}

/// A quantity of a mosaic, in its smallest units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MosaicAmount {
    pub mosaic: MosaicInfo,
    pub amount: u64,
}

impl MosaicAmount {
    /// Amount of a mosaic named `namespace:name`
    ///
    /// `nem:xem` is resolved to the full xem definition.
    pub fn new(full_name: &str, amount: u64) -> Result<Self, MosaicError> {
        let id = MosaicId::from_full_name(full_name)?;
        let mosaic = if id.is_xem() {
            MosaicInfo::xem()
        } else {
            MosaicInfo::from_id(id)
        };
        Ok(Self { mosaic, amount })
    }

    pub fn from_info(mosaic: MosaicInfo, amount: u64) -> Self {
        Self { mosaic, amount }
    }

    /// Amount of xem in micro-xem
    pub fn xem(micro_xem: u64) -> Self {
        Self::from_info(MosaicInfo::xem(), micro_xem)
    }

    /// Amount from a decimal quantity, scaled by the mosaic divisibility
    pub fn from_decimal(mosaic: MosaicInfo, quantity: f64) -> Result<Self, MosaicError> {
        let divisibility = mosaic
            .divisibility()
            .ok_or_else(|| MosaicError::UnknownDivisibility(mosaic.id.full_name()))?;
        let amount = (quantity * 10f64.powi(i32::from(divisibility))).round() as u64;
        Ok(Self { mosaic, amount })
    }

    pub fn id(&self) -> &MosaicId {
        &self.mosaic.id
    }

    /// The amount as a decimal quantity
    pub fn decimal_amount(&self) -> Result<f64, MosaicError> {
        let divisibility = self
            .mosaic
            .divisibility()
            .ok_or_else(|| MosaicError::UnknownDivisibility(self.mosaic.id.full_name()))?;
        Ok(self.amount as f64 / 10f64.powi(i32::from(divisibility)))
    }

    /// Replace the mosaic info with a fetched definition of the same mosaic
    pub fn set_mosaic_info(&mut self, info: MosaicInfo) -> Result<(), MosaicError> {
        if info.id != self.mosaic.id {
            return Err(MosaicError::MosaicMismatch {
                expected: self.mosaic.id.full_name(),
                actual: info.id.full_name(),
            });
        }
        self.mosaic = info;
        Ok(())
    }
}
