//! Fee schedule
//!
//! Fees are paid in micro-xem. Most transaction types have a flat default;
//! transfers are priced from the value moved, the message size and the
//! mosaics attached. Namespaces and mosaic definitions also pay a rental fee
//! to a network sink account.

use serde::{Deserialize, Serialize};

use crate::account::{Address, NetworkType};
use crate::mosaic::{MosaicAmount, XEM_SUPPLY};

// =============================================================================
// Constants
// =============================================================================

/// Micro-xem per xem
pub const MICRO_XEM_PER_XEM: u64 = 1_000_000;

/// Price of one fee unit (0.05 xem)
pub const FEE_FACTOR: u64 = 50_000;

/// Most fee units charged for the value of a single transfer
pub const MAX_VALUE_FEE_UNITS: u64 = 25;

/// Whole xem covered by one value fee unit
pub const XEM_PER_FEE_UNIT: u64 = 10_000;

/// Message bytes covered by one message fee unit
pub const MESSAGE_BYTES_PER_FEE_UNIT: usize = 32;

/// Flat fee of importance transfer, cosignature, multisig wrapper,
/// namespace, mosaic definition and supply change transactions
pub const DEFAULT_FEE: u64 = 150_000;

/// Flat fee of a multisig aggregate modification
pub const MULTISIG_MODIFICATION_FEE: u64 = 500_000;

/// Rental fee of a root namespace
pub const ROOT_NAMESPACE_RENTAL_FEE: u64 = 100 * MICRO_XEM_PER_XEM;

/// Rental fee of a sub-namespace
pub const SUB_NAMESPACE_RENTAL_FEE: u64 = 10 * MICRO_XEM_PER_XEM;

/// Fee for creating a mosaic definition
pub const MOSAIC_CREATION_FEE: u64 = 10 * MICRO_XEM_PER_XEM;

/// Mosaics at or below this supply with no divisibility pay a single unit
pub const SMALL_BUSINESS_SUPPLY: u64 = 10_000;

/// Largest quantity of any mosaic in its smallest units
const MAX_MOSAIC_QUANTITY: f64 = 9_000_000_000_000_000.0;

const MAIN_NAMESPACE_SINK: &str = "NAMESPACEWH4MKFMBCVFERDPOOP4FK7MTBXDPZZA";
const TEST_NAMESPACE_SINK: &str = "TAMESPACEWH4MKFMBCVFERDPOOP4FK7MTDJEYP35";
const MAIN_MOSAIC_SINK: &str = "NBMOSAICOD4F54EE5CDMR23CCBGOAM2XSIUX6TRS";
const TEST_MOSAIC_SINK: &str = "TBMOSAICOD4F54EE5CDMR23CCBGOAM2XSJBR5OLC";

// =============================================================================
// Transfer fees
// =============================================================================

/// Fee for moving `micro_xem` in a transfer without mosaics
pub fn xem_transfer_fee(micro_xem: u64) -> u64 {
    value_fee_units(micro_xem / MICRO_XEM_PER_XEM) * FEE_FACTOR
}

/// Fee for a message payload of `payload_len` bytes
pub fn message_fee(payload_len: usize) -> u64 {
    if payload_len == 0 {
        return 0;
    }
    (payload_len / MESSAGE_BYTES_PER_FEE_UNIT + 1) as u64 * FEE_FACTOR
}

/// Fee for one attached mosaic
///
/// `multiplier` is the transfer amount field, where 1 000 000 sends each
/// mosaic quantity once. Mosaics whose supply and divisibility are not known
/// pay a single unit.
pub fn mosaic_transfer_fee(multiplier: u64, mosaic: &MosaicAmount) -> u64 {
    let info = &mosaic.mosaic;
    let Some(properties) = info.properties else {
        return FEE_FACTOR;
    };
    let supply = info.supply.unwrap_or(properties.initial_supply);
    let divisibility = properties.divisibility;

    if supply <= SMALL_BUSINESS_SUPPLY && divisibility == 0 {
        return FEE_FACTOR;
    }
    if supply == 0 {
        return FEE_FACTOR;
    }

    let scale = 10f64.powi(i32::from(divisibility));
    let total_quantity = supply as f64 * scale;
    // Quantities past the network maximum get no supply discount
    let ratio = (MAX_MOSAIC_QUANTITY / total_quantity).floor().max(1.0);
    let adjustment = (0.8 * ratio.ln()).floor() as i64;

    let xem_equivalent = XEM_SUPPLY as f64 * mosaic.amount as f64 * multiplier as f64
        / supply as f64
        / (scale * MICRO_XEM_PER_XEM as f64);
    let units = value_fee_units(xem_equivalent.floor() as u64) as i64;

    units.saturating_sub(adjustment).max(1) as u64 * FEE_FACTOR
}

/// Total fee of a transfer
///
/// Without mosaics the amount is micro-xem; with mosaics it is the
/// multiplier applied to each of them.
pub fn transfer_fee(amount: u64, message_len: usize, mosaics: &[MosaicAmount]) -> u64 {
    let value_fee = if mosaics.is_empty() {
        xem_transfer_fee(amount)
    } else {
        mosaics
            .iter()
            .map(|mosaic| mosaic_transfer_fee(amount, mosaic))
            .sum()
    };
    value_fee + message_fee(message_len)
}

fn value_fee_units(whole_xem: u64) -> u64 {
    (whole_xem / XEM_PER_FEE_UNIT).clamp(1, MAX_VALUE_FEE_UNITS)
}

// =============================================================================
// Rental Fees
// =============================================================================

/// Where rental fees go and how much they are
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalFees {
    /// Receives namespace rental fees
    pub namespace_sink: Address,
    /// Receives mosaic creation fees
    pub mosaic_sink: Address,
    pub root_namespace_fee: u64,
    pub sub_namespace_fee: u64,
    pub mosaic_creation_fee: u64,
}

impl RentalFees {
    /// Standard fees paid to the given sinks
    pub fn new(namespace_sink: Address, mosaic_sink: Address) -> Self {
        Self {
            namespace_sink,
            mosaic_sink,
            root_namespace_fee: ROOT_NAMESPACE_RENTAL_FEE,
            sub_namespace_fee: SUB_NAMESPACE_RENTAL_FEE,
            mosaic_creation_fee: MOSAIC_CREATION_FEE,
        }
    }

    /// Published sinks of the public networks
    ///
    /// Private networks choose their own sinks, so `None` is returned for
    /// them and the caller has to supply a configuration.
    pub fn for_network(network: NetworkType) -> Option<Self> {
        let (namespace_sink, mosaic_sink) = match network {
            NetworkType::Main => (MAIN_NAMESPACE_SINK, MAIN_MOSAIC_SINK),
            NetworkType::Test => (TEST_NAMESPACE_SINK, TEST_MOSAIC_SINK),
            _ => return None,
        };
        Some(Self::new(
            Address::from_text(namespace_sink).ok()?,
            Address::from_text(mosaic_sink).ok()?,
        ))
    }

    /// Rental fee for a namespace with or without a parent
    pub fn namespace_fee(&self, is_root: bool) -> u64 {
        if is_root {
            self.root_namespace_fee
        } else {
            self.sub_namespace_fee
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
