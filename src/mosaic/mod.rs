//! Mosaics and namespaces
//!
//! Model types for the assets a transaction can carry or define.

pub mod mosaic;
pub mod namespace;

pub use mosaic::{
    LevyType, MosaicAmount, MosaicError, MosaicId, MosaicInfo, MosaicLevy, MosaicProperties,
    MAX_DIVISIBILITY, MAX_SUPPLY, XEM_DIVISIBILITY, XEM_SUPPLY,
};
pub use namespace::{validate_namespace_part, NamespaceInfo, MAX_NAMESPACE_DEPTH};
