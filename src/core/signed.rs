//! Signed transactions ready for announcement

use serde::{Deserialize, Serialize};

use super::transaction::{hash_hex, TransactionType};
use crate::crypto::PublicKey;

/// A signed transaction
///
/// Produced once by signing and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransaction {
    payload: String,
    signature: String,
    hash: String,
    signer: PublicKey,
    transaction_type: TransactionType,
}

impl SignedTransaction {
    pub(crate) fn new(
        bytes: &[u8],
        signature: &[u8],
        signer: PublicKey,
        transaction_type: TransactionType,
    ) -> Self {
        Self {
            payload: hex::encode(bytes),
            signature: hex::encode(signature),
            hash: hash_hex(bytes),
            signer,
            transaction_type,
        }
    }

    /// Encoded transaction as lowercase hex
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Keccak-256 of the payload as lowercase hex
    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn signer(&self) -> &PublicKey {
        &self.signer
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// Document posted to `/transaction/announce`
    pub fn announce_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "data": self.payload,
            "signature": self.signature,
        })
    }
}

/// A signed multisig wrapper and the hash of the transaction it carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedMultisigTransaction {
    #[serde(flatten)]
    signed: SignedTransaction,
    inner_transaction_hash: String,
}

impl SignedMultisigTransaction {
    pub(crate) fn new(signed: SignedTransaction, inner_transaction_hash: String) -> Self {
        Self {
            signed,
            inner_transaction_hash,
        }
    }

    pub fn signed_transaction(&self) -> &SignedTransaction {
        &self.signed
    }

    pub fn payload(&self) -> &str {
        self.signed.payload()
    }

    pub fn signature(&self) -> &str {
        self.signed.signature()
    }

    /// Hash of the wrapper
    pub fn hash(&self) -> &str {
        self.signed.hash()
    }

    /// Hash of the wrapped transaction, which cosigners sign
    pub fn inner_transaction_hash(&self) -> &str {
        &self.inner_transaction_hash
    }

    pub fn signer(&self) -> &PublicKey {
        self.signed.signer()
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.signed.transaction_type()
    }

    pub fn announce_payload(&self) -> serde_json::Value {
        self.signed.announce_payload()
    }
}

/// Result of announcing a transaction, as returned by the node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    #[serde(rename = "type")]
    pub response_type: i32,
    pub code: i32,
    pub message: String,
    pub hash: String,
    #[serde(default)]
    pub inner_hash: Option<String>,
}

impl TransactionResponse {
    /// Whether the node accepted the transaction
    pub fn is_success(&self) -> bool {
        self.message == "SUCCESS"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;

    fn signed() -> SignedTransaction {
        let kp = KeyPair::generate();
        let bytes = b"transaction bytes";
        SignedTransaction::new(
            bytes,
            &kp.sign(bytes),
            *kp.public_key(),
            TransactionType::Transfer,
        )
    }

    #[test]
    fn test_signed_transaction_fields() {
        let tx = signed();
        assert_eq!(tx.payload(), hex::encode(b"transaction bytes"));
        assert_eq!(tx.signature().len(), 128);
        assert_eq!(tx.hash(), hash_hex(b"transaction bytes"));
    }

    #[test]
    fn test_announce_payload() {
        let tx = signed();
        let payload = tx.announce_payload();
        assert_eq!(payload["data"], tx.payload());
        assert_eq!(payload["signature"], tx.signature());
        assert_eq!(payload.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_multisig_hashes() {
        let tx = signed();
        let inner = hash_hex(b"inner");
        let multisig = SignedMultisigTransaction::new(tx.clone(), inner.clone());
        assert_eq!(multisig.hash(), tx.hash());
        assert_eq!(multisig.inner_transaction_hash(), inner);
        assert_ne!(multisig.hash(), multisig.inner_transaction_hash());
    }

    #[test]
    fn test_transaction_response() {
        let json = r#"{"type":1,"code":1,"message":"SUCCESS","hash":"abc","innerHash":"def"}"#;
        let response: TransactionResponse = serde_json::from_str(json).unwrap();
        assert!(response.is_success());
        assert_eq!(response.inner_hash.as_deref(), Some("def"));

        let failed: TransactionResponse =
            serde_json::from_str(r#"{"type":1,"code":5,"message":"FAILURE_INSUFFICIENT_BALANCE","hash":""}"#)
                .unwrap();
        assert!(!failed.is_success());
        assert_eq!(failed.inner_hash, None);
    }
}
