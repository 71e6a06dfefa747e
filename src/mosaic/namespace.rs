//! Namespaces
//!
//! Namespaces are dot-separated names (`root.sub.leaf`, at most three levels)
//! owned by an account. Mosaics are defined under them.

use serde::{Deserialize, Serialize};

use super::mosaic::MosaicError;
use crate::account::Address;

/// Maximum number of levels in a namespace name
pub const MAX_NAMESPACE_DEPTH: usize = 3;

/// Maximum length of a root namespace part
pub const MAX_ROOT_LENGTH: usize = 16;

/// Maximum length of a sub-namespace part
pub const MAX_SUBLEVEL_LENGTH: usize = 64;

/// A namespace as reported by a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceInfo {
    /// Fully qualified name
    pub name: String,
    /// Height of the block that provisioned it
    pub height: u64,
    pub owner: Address,
}

impl NamespaceInfo {
    pub fn new(name: &str, height: u64, owner: Address) -> Self {
        Self {
            name: name.to_string(),
            height,
            owner,
        }
    }

    pub fn is_root(&self) -> bool {
        !self.name.contains('.')
    }

    /// Name of the parent namespace, if this is not a root
    pub fn parent(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(parent, _)| parent)
    }
}

/// Check one part of a namespace name
///
/// Parts start with a letter or digit and contain lowercase letters, digits,
/// `-` and `_`.
pub fn validate_namespace_part(part: &str, is_root: bool) -> Result<(), MosaicError> {
    let max = if is_root {
        MAX_ROOT_LENGTH
    } else {
        MAX_SUBLEVEL_LENGTH
    };
    let valid_start = part
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    let valid_chars = part
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if part.is_empty() || part.len() > max || !valid_start || !valid_chars {
        return Err(MosaicError::InvalidNamespace(part.to_string()));
    }
    Ok(())
}
