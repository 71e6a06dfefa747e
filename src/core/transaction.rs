//! Transactions
//!
//! Every transaction shares a common header (type, version, network,
//! timestamp, signer, fee, deadline) followed by a payload specific to its
//! type. The set of types is closed and each one knows its exact wire layout.
//!
//! Transactions are built unsigned by the factory functions of each payload
//! type, optionally wrapped in a multisig transaction, and signed once with
//! [`Transaction::sign_with`]. Transactions read back from the network carry
//! their signer, signature and [`TransactionInfo`] and cannot be signed again.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::fee::{DEFAULT_FEE, MULTISIG_MODIFICATION_FEE};
use super::importance::ImportanceTransferTransaction;
use super::mosaic::{MosaicDefinitionTransaction, MosaicSupplyChangeTransaction};
use super::namespace::ProvisionNamespaceTransaction;
use super::signed::SignedTransaction;
use super::time::{Deadline, NetworkTime};
use super::transfer::TransferTransaction;
use super::wire::WireWriter;
use crate::account::{AccountError, AddressError, NetworkType, PublicAccount};
use crate::crypto::{keccak256, KeyError, KeyPair, PublicKey};
use crate::mosaic::MosaicError;
use crate::multisig::{
    CosignatureTransaction, MultisigAggregateModificationTransaction, MultisigTransaction,
};

// =============================================================================
// Error Types
// =============================================================================

/// Transaction-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransactionError {
    #[error("Transaction is already confirmed and cannot be signed again")]
    AlreadyConfirmed,
    #[error("Deadline {deadline} is before creation time {timestamp}")]
    DeadlineBeforeCreation { deadline: u32, timestamp: u32 },
    #[error("Network mismatch: transaction is for {expected}, got {actual}")]
    NetworkMismatch {
        expected: NetworkType,
        actual: NetworkType,
    },
    #[error("Inner transaction has no signer")]
    MissingInnerSigner,
    #[error("Message of {0} bytes exceeds the 1024 byte limit")]
    MessageTooLong(usize),
    #[error("Mosaic {0} attached more than once")]
    DuplicateMosaic(String),
    #[error("No rental fee sink known for {0} network")]
    NoRentalSink(NetworkType),
    #[error("Unknown transaction type: 0x{0:04x}")]
    UnknownType(u32),
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("Key error: {0}")]
    Key(#[from] KeyError),
    #[error("Address error: {0}")]
    Address(#[from] AddressError),
    #[error("Account error: {0}")]
    Account(#[from] AccountError),
    #[error("Mosaic error: {0}")]
    Mosaic(#[from] MosaicError),
}

// =============================================================================
// Transaction Type
// =============================================================================

/// Type tags fixed by network consensus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum TransactionType {
    Transfer = 0x0101,
    ImportanceTransfer = 0x0801,
    MultisigAggregateModification = 0x1001,
    Cosignature = 0x1002,
    Multisig = 0x1004,
    ProvisionNamespace = 0x2001,
    MosaicDefinition = 0x4001,
    SupplyChange = 0x4002,
}

impl TransactionType {
    pub fn tag(self) -> u32 {
        self as u32
    }

    pub fn from_tag(tag: u32) -> Result<Self, TransactionError> {
        match tag {
            0x0101 => Ok(TransactionType::Transfer),
            0x0801 => Ok(TransactionType::ImportanceTransfer),
            0x1001 => Ok(TransactionType::MultisigAggregateModification),
            0x1002 => Ok(TransactionType::Cosignature),
            0x1004 => Ok(TransactionType::Multisig),
            0x2001 => Ok(TransactionType::ProvisionNamespace),
            0x4001 => Ok(TransactionType::MosaicDefinition),
            0x4002 => Ok(TransactionType::SupplyChange),
            other => Err(TransactionError::UnknownType(other)),
        }
    }

    /// Flat fee used when the caller passes zero
    ///
    /// Transfers are priced from their contents, see
    /// [`transfer_fee`](super::fee::transfer_fee).
    pub fn flat_fee(self) -> Option<u64> {
        match self {
            TransactionType::Transfer => None,
            TransactionType::MultisigAggregateModification => Some(MULTISIG_MODIFICATION_FEE),
            _ => Some(DEFAULT_FEE),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}(0x{:04x})", self, self.tag())
    }
}

// =============================================================================
// Transaction Info
// =============================================================================

/// Where a confirmed transaction ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfo {
    pub height: u64,
    pub id: u64,
    pub hash: String,
    /// Hash of the wrapped transaction, for multisig transactions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_hash: Option<String>,
}

impl TransactionInfo {
    pub fn new(height: u64, id: u64, hash: &str) -> Self {
        Self {
            height,
            id,
            hash: hash.to_string(),
            inner_hash: None,
        }
    }

    pub fn multisig(height: u64, id: u64, hash: &str, inner_hash: &str) -> Self {
        Self {
            height,
            id,
            hash: hash.to_string(),
            inner_hash: Some(inner_hash.to_string()),
        }
    }

    pub fn is_multisig(&self) -> bool {
        self.inner_hash.is_some()
    }
}

// =============================================================================
// Transaction Body
// =============================================================================

/// Type-specific payload of a transaction
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionBody {
    Transfer(TransferTransaction),
    ImportanceTransfer(ImportanceTransferTransaction),
    MultisigAggregateModification(MultisigAggregateModificationTransaction),
    Cosignature(CosignatureTransaction),
    Multisig(MultisigTransaction),
    ProvisionNamespace(ProvisionNamespaceTransaction),
    MosaicDefinition(MosaicDefinitionTransaction),
    SupplyChange(MosaicSupplyChangeTransaction),
}

impl TransactionBody {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            TransactionBody::Transfer(_) => TransactionType::Transfer,
            TransactionBody::ImportanceTransfer(_) => TransactionType::ImportanceTransfer,
            TransactionBody::MultisigAggregateModification(_) => {
                TransactionType::MultisigAggregateModification
            }
            TransactionBody::Cosignature(_) => TransactionType::Cosignature,
            TransactionBody::Multisig(_) => TransactionType::Multisig,
            TransactionBody::ProvisionNamespace(_) => TransactionType::ProvisionNamespace,
            TransactionBody::MosaicDefinition(_) => TransactionType::MosaicDefinition,
            TransactionBody::SupplyChange(_) => TransactionType::SupplyChange,
        }
    }

    /// Version of the payload layout
    pub fn version(&self) -> u8 {
        match self {
            TransactionBody::Transfer(transfer) => transfer.version(),
            TransactionBody::MultisigAggregateModification(_) => 2,
            _ => 1,
        }
    }

    /// Fee charged when the caller passes zero
    pub fn default_fee(&self) -> u64 {
        match self {
            TransactionBody::Transfer(transfer) => transfer.default_fee(),
            other => other.transaction_type().flat_fee().unwrap_or(DEFAULT_FEE),
        }
    }

    fn write_to(&self, w: &mut WireWriter) -> Result<(), TransactionError> {
        match self {
            TransactionBody::Transfer(body) => body.write_to(w),
            TransactionBody::ImportanceTransfer(body) => body.write_to(w),
            TransactionBody::MultisigAggregateModification(body) => body.write_to(w),
            TransactionBody::Cosignature(body) => body.write_to(w),
            TransactionBody::Multisig(body) => body.write_to(w)?,
            TransactionBody::ProvisionNamespace(body) => body.write_to(w),
            TransactionBody::MosaicDefinition(body) => body.write_to(w),
            TransactionBody::SupplyChange(body) => body.write_to(w),
        }
        Ok(())
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A transaction of any type
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    network: NetworkType,
    timestamp: NetworkTime,
    deadline: Deadline,
    fee: u64,
    body: TransactionBody,
    signer: Option<PublicAccount>,
    signature: Option<String>,
    info: Option<TransactionInfo>,
}

impl Transaction {
    /// Create an unsigned transaction timestamped now
    ///
    /// A zero fee is replaced by the default of the payload.
    pub fn new(
        network: NetworkType,
        deadline: Deadline,
        fee: u64,
        body: TransactionBody,
    ) -> Result<Self, TransactionError> {
        Self::with_timestamp(network, NetworkTime::now(), deadline, fee, body)
    }

    /// Create an unsigned transaction with an explicit creation time
    pub fn with_timestamp(
        network: NetworkType,
        timestamp: NetworkTime,
        deadline: Deadline,
        fee: u64,
        body: TransactionBody,
    ) -> Result<Self, TransactionError> {
        if deadline.time() < timestamp {
            return Err(TransactionError::DeadlineBeforeCreation {
                deadline: deadline.timestamp(),
                timestamp: timestamp.timestamp(),
            });
        }
        let fee = if fee == 0 { body.default_fee() } else { fee };
        Ok(Self {
            network,
            timestamp,
            deadline,
            fee,
            body,
            signer: None,
            signature: None,
            info: None,
        })
    }

    /// A transaction as reported by the network
    #[allow(clippy::too_many_arguments)]
    pub fn confirmed(
        network: NetworkType,
        timestamp: NetworkTime,
        deadline: Deadline,
        fee: u64,
        body: TransactionBody,
        signer: PublicAccount,
        signature: String,
        info: TransactionInfo,
    ) -> Self {
        Self {
            network,
            timestamp,
            deadline,
            fee,
            body,
            signer: Some(signer),
            signature: Some(signature),
            info: Some(info),
        }
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.body.transaction_type()
    }

    pub fn version(&self) -> u8 {
        self.body.version()
    }

    /// Version word: network byte in the high byte, version in the low byte
    pub fn version_word(&self) -> u32 {
        (u32::from(self.network.byte()) << 24) | u32::from(self.version())
    }

    pub fn network_type(&self) -> NetworkType {
        self.network
    }

    pub fn timestamp(&self) -> NetworkTime {
        self.timestamp
    }

    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    pub fn fee(&self) -> u64 {
        self.fee
    }

    pub fn body(&self) -> &TransactionBody {
        &self.body
    }

    pub fn signer(&self) -> Option<&PublicAccount> {
        self.signer.as_ref()
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn info(&self) -> Option<&TransactionInfo> {
        self.info.as_ref()
    }

    pub fn is_confirmed(&self) -> bool {
        self.info.is_some()
    }

    /// Encode the transaction as it is signed and announced
    pub fn to_wire_bytes(&self, signer: &PublicKey) -> Result<Vec<u8>, TransactionError> {
        let mut w = self.header_writer(signer);
        self.body.write_to(&mut w)?;
        Ok(w.into_vec())
    }

    /// Writer holding the common header
    pub(crate) fn header_writer(&self, signer: &PublicKey) -> WireWriter {
        let mut w = WireWriter::with_capacity(256);
        w.write_u32(self.transaction_type().tag());
        w.write_u32(self.version_word());
        w.write_u32(self.timestamp.timestamp());
        w.write_public_key(signer);
        w.write_u64(self.fee);
        w.write_u32(self.deadline.timestamp());
        w
    }

    /// Sign the transaction
    pub fn sign_with(&self, key_pair: &KeyPair) -> Result<SignedTransaction, TransactionError> {
        if self.is_confirmed() {
            return Err(TransactionError::AlreadyConfirmed);
        }
        let bytes = self.to_wire_bytes(key_pair.public_key())?;
        let signature = key_pair.sign(&bytes);
        log::debug!(
            "Signed {} transaction {} by {}",
            self.transaction_type(),
            hash_hex(&bytes),
            key_pair.public_key()
        );
        Ok(SignedTransaction::new(
            &bytes,
            &signature,
            *key_pair.public_key(),
            self.transaction_type(),
        ))
    }

    /// Ensure an account belongs to the same network as this transaction
    pub(crate) fn check_network(&self, network: NetworkType) -> Result<(), TransactionError> {
        if network != self.network {
            return Err(TransactionError::NetworkMismatch {
                expected: self.network,
                actual: network,
            });
        }
        Ok(())
    }
}

/// Hash of encoded transaction bytes as lowercase hex
pub fn hash_hex(bytes: &[u8]) -> String {
    hex::encode(keccak256(bytes))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::importance::{ImportanceTransferMode, ImportanceTransferTransaction};
    use crate::core::transfer::Message;
    use crate::account::Address;

    const PRIVATE_KEY: &str = "575dbb3062267eff57c970a336ebbc8fbcfe12c5bd3ed7bc11eb0481d7704ced";

    fn remote() -> PublicAccount {
        PublicAccount::from_public_key_hex(
            "c5f54ba980fcbb657dbaaa42700539b207873e134d2375efeab5f1ab52f87844",
            NetworkType::Test,
        )
        .unwrap()
    }

    fn importance(fee: u64) -> Transaction {
        Transaction::with_timestamp(
            NetworkType::Test,
            NetworkTime::from_timestamp(1000),
            Deadline::from_timestamp(8200),
            fee,
            TransactionBody::ImportanceTransfer(ImportanceTransferTransaction::new(
                ImportanceTransferMode::Activate,
                remote(),
            )),
        )
        .unwrap()
    }

    #[test]
    fn test_type_tags() {
        for tag in [0x0101, 0x0801, 0x1001, 0x1002, 0x1004, 0x2001, 0x4001, 0x4002] {
            assert_eq!(TransactionType::from_tag(tag).unwrap().tag(), tag);
        }
        assert_eq!(
            TransactionType::from_tag(0x9999).unwrap_err(),
            TransactionError::UnknownType(0x9999)
        );
    }

    #[test]
    fn test_zero_fee_replaced_by_default() {
        assert_eq!(importance(0).fee(), 150_000);
        assert_eq!(importance(200_000).fee(), 200_000);
    }

    #[test]
    fn test_deadline_before_creation_rejected() {
        let result = Transaction::with_timestamp(
            NetworkType::Test,
            NetworkTime::from_timestamp(1000),
            Deadline::from_timestamp(999),
            0,
            TransactionBody::ImportanceTransfer(ImportanceTransferTransaction::new(
                ImportanceTransferMode::Activate,
                remote(),
            )),
        );
        assert!(matches!(
            result,
            Err(TransactionError::DeadlineBeforeCreation { .. })
        ));
    }

    #[test]
    fn test_common_header_layout() {
        let tx = importance(0);
        let kp = KeyPair::from_private_key_hex(PRIVATE_KEY).unwrap();
        let bytes = tx.to_wire_bytes(kp.public_key()).unwrap();

        assert_eq!(&bytes[0..4], &0x0801u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &[1, 0, 0, 0x98]);
        assert_eq!(&bytes[8..12], &1000u32.to_le_bytes());
        assert_eq!(&bytes[12..16], &32u32.to_le_bytes());
        assert_eq!(&bytes[16..48], kp.public_key().as_bytes());
        assert_eq!(&bytes[48..56], &150_000u64.to_le_bytes());
        assert_eq!(&bytes[56..60], &8200u32.to_le_bytes());
    }

    #[test]
    fn test_sign_with() {
        let tx = importance(0);
        let kp = KeyPair::from_private_key_hex(PRIVATE_KEY).unwrap();
        let signed = tx.sign_with(&kp).unwrap();

        let bytes = tx.to_wire_bytes(kp.public_key()).unwrap();
        assert_eq!(signed.payload(), hex::encode(&bytes));
        assert_eq!(signed.hash(), hash_hex(&bytes));
        assert_eq!(signed.hash().len(), 64);
        assert_eq!(signed.signer(), kp.public_key());
        assert_eq!(signed.transaction_type(), TransactionType::ImportanceTransfer);

        let signature = hex::decode(signed.signature()).unwrap();
        assert!(kp.verify(&bytes, &signature));

        // deterministic
        assert_eq!(tx.sign_with(&kp).unwrap(), signed);
    }

    #[test]
    fn test_confirmed_transaction_cannot_be_signed() {
        let tx = importance(0);
        let confirmed = Transaction::confirmed(
            tx.network_type(),
            tx.timestamp(),
            tx.deadline(),
            tx.fee(),
            tx.body().clone(),
            remote(),
            "00".repeat(64),
            TransactionInfo::new(1_516_704, 42, &"ab".repeat(32)),
        );
        assert!(confirmed.is_confirmed());
        assert_eq!(confirmed.signer(), Some(&remote()));
        let kp = KeyPair::generate();
        assert_eq!(
            confirmed.sign_with(&kp).unwrap_err(),
            TransactionError::AlreadyConfirmed
        );
    }

    #[test]
    fn test_transfer_version_word() {
        let recipient = Address::from_text("TACOPEXRLZTUWBQA3UXV66R455L76ENWK6OYITBJ").unwrap();
        let tx = crate::core::transfer::TransferTransaction::create_xem(
            NetworkType::Main,
            Deadline::create_hours(1),
            0,
            Address::from_text("NDD2CT6LQLIYQ56KIXI3ENTM6EK3D44P5JFXJ4R4").unwrap(),
            10,
            Message::Empty,
        )
        .unwrap();
        assert_eq!(tx.version_word(), 0x6800_0001);
        assert!(crate::core::transfer::TransferTransaction::create_xem(
            NetworkType::Main,
            Deadline::create_hours(1),
            0,
            recipient,
            10,
            Message::Empty,
        )
        .is_err());
    }
}
