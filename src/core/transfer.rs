//! Transfer transactions
//!
//! Version 1 moves xem only and its amount is in micro-xem. Version 2 carries
//! a list of mosaics; its amount is a multiplier where 1 000 000 sends every
//! listed quantity exactly once.

use serde::{Deserialize, Serialize};

use super::fee::{transfer_fee, MICRO_XEM_PER_XEM};
use super::time::Deadline;
use super::transaction::{Transaction, TransactionBody, TransactionError};
use super::wire::WireWriter;
use crate::account::{Address, NetworkType};
use crate::mosaic::MosaicAmount;

/// Largest message payload in bytes
pub const MAX_MESSAGE_LENGTH: usize = 1024;

/// Amount that sends each attached mosaic quantity once
pub const MOSAIC_MULTIPLIER: u64 = MICRO_XEM_PER_XEM;

/// Message attached to a transfer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    #[default]
    Empty,
    /// Readable by anyone
    Plain(Vec<u8>),
    /// Already encrypted for the recipient
    Secure(Vec<u8>),
}

impl Message {
    pub fn plain(text: &str) -> Self {
        Message::Plain(text.as_bytes().to_vec())
    }

    pub fn secure(encrypted: Vec<u8>) -> Self {
        Message::Secure(encrypted)
    }

    /// Wire tag, if the message has one
    pub fn message_type(&self) -> Option<u32> {
        match self {
            Message::Empty => None,
            Message::Plain(_) => Some(1),
            Message::Secure(_) => Some(2),
        }
    }

    pub fn payload(&self) -> &[u8] {
        match self {
            Message::Empty => &[],
            Message::Plain(payload) | Message::Secure(payload) => payload,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.payload().is_empty()
    }

    fn write_to(&self, w: &mut WireWriter) {
        match self.message_type() {
            Some(message_type) if !self.is_empty() => w.write_struct(|m| {
                m.write_u32(message_type);
                m.write_bytes(self.payload());
            }),
            _ => w.write_u32(0),
        }
    }
}

/// Payload of a transfer transaction
#[derive(Debug, Clone, PartialEq)]
pub struct TransferTransaction {
    recipient: Address,
    amount: u64,
    message: Message,
    mosaics: Vec<MosaicAmount>,
}

impl TransferTransaction {
    /// Build a payload
    ///
    /// Mosaics are ordered by identifier; listing one twice is an error.
    pub fn new(
        recipient: Address,
        amount: u64,
        mut mosaics: Vec<MosaicAmount>,
        message: Message,
    ) -> Result<Self, TransactionError> {
        if message.payload().len() > MAX_MESSAGE_LENGTH {
            return Err(TransactionError::MessageTooLong(message.payload().len()));
        }
        mosaics.sort_by(|a, b| a.id().cmp(b.id()));
        if let Some(pair) = mosaics.windows(2).find(|pair| pair[0].id() == pair[1].id()) {
            return Err(TransactionError::DuplicateMosaic(pair[0].id().full_name()));
        }
        Ok(Self {
            recipient,
            amount,
            message,
            mosaics,
        })
    }

    /// Transfer `micro_xem` to `recipient`
    pub fn create_xem(
        network: NetworkType,
        deadline: Deadline,
        fee: u64,
        recipient: Address,
        micro_xem: u64,
        message: Message,
    ) -> Result<Transaction, TransactionError> {
        check_recipient(network, &recipient)?;
        let body = Self::new(recipient, micro_xem, Vec::new(), message)?;
        Transaction::new(network, deadline, fee, TransactionBody::Transfer(body))
    }

    /// Transfer a list of mosaics to `recipient`
    pub fn create(
        network: NetworkType,
        deadline: Deadline,
        fee: u64,
        recipient: Address,
        mosaics: Vec<MosaicAmount>,
        message: Message,
    ) -> Result<Transaction, TransactionError> {
        check_recipient(network, &recipient)?;
        if mosaics.is_empty() {
            return Err(TransactionError::InvalidTransaction(
                "mosaic transfer without mosaics".to_string(),
            ));
        }
        let body = Self::new(recipient, MOSAIC_MULTIPLIER, mosaics, message)?;
        Transaction::new(network, deadline, fee, TransactionBody::Transfer(body))
    }

    pub fn recipient(&self) -> &Address {
        &self.recipient
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn mosaics(&self) -> &[MosaicAmount] {
        &self.mosaics
    }

    pub(crate) fn version(&self) -> u8 {
        if self.mosaics.is_empty() {
            1
        } else {
            2
        }
    }

    pub(crate) fn default_fee(&self) -> u64 {
        transfer_fee(self.amount, self.message.payload().len(), &self.mosaics)
    }

    pub(crate) fn write_to(&self, w: &mut WireWriter) {
        w.write_address(&self.recipient);
        w.write_u64(self.amount);
        self.message.write_to(w);
        if self.version() == 2 {
            w.write_u32(self.mosaics.len() as u32);
            for mosaic in &self.mosaics {
                w.write_struct(|m| {
                    m.write_mosaic_id(mosaic.id());
                    m.write_u64(mosaic.amount);
                });
            }
        }
    }
}

fn check_recipient(network: NetworkType, recipient: &Address) -> Result<(), TransactionError> {
    if recipient.network_type() != network {
        return Err(TransactionError::NetworkMismatch {
            expected: network,
            actual: recipient.network_type(),
        });
    }
    Ok(())
}
