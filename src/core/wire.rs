//! Binary writer for the transaction wire format
//!
//! All integers are little endian. Variable-size fields carry a u32 byte
//! length in front of them.

use bytes::{BufMut, Bytes, BytesMut};

use crate::account::Address;
use crate::crypto::PublicKey;
use crate::mosaic::MosaicId;

/// Length marker written before an absent optional string
pub const ABSENT_LENGTH: u32 = 0xFFFF_FFFF;

/// Accumulates transaction bytes
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: BytesMut,
}

impl WireWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.put_u32_le(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.put_i32_le(value);
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.put_u64_le(value);
    }

    /// Raw bytes with no length header
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    /// Bytes preceded by their length
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.write_u32(bytes.len() as u32);
        self.write_raw(bytes);
    }

    /// UTF-8 string preceded by its byte length
    pub fn write_str(&mut self, value: &str) {
        self.write_bytes(value.as_bytes());
    }

    /// Optional string; absence is written as [`ABSENT_LENGTH`]
    pub fn write_opt_str(&mut self, value: Option<&str>) {
        match value {
            Some(value) => self.write_str(value),
            None => self.write_u32(ABSENT_LENGTH),
        }
    }

    pub fn write_public_key(&mut self, key: &PublicKey) {
        self.write_bytes(key.as_bytes());
    }

    /// Plain address as 40 ASCII bytes
    pub fn write_address(&mut self, address: &Address) {
        self.write_str(address.plain());
    }

    /// Mosaic identifier structure
    pub fn write_mosaic_id(&mut self, id: &MosaicId) {
        self.write_u32(mosaic_id_len(id));
        self.write_str(id.namespace_id());
        self.write_str(id.name());
    }

    /// Write a nested structure preceded by its byte length
    pub fn write_struct<F>(&mut self, f: F)
    where
        F: FnOnce(&mut WireWriter),
    {
        let mut inner = WireWriter::new();
        f(&mut inner);
        self.write_bytes(&inner.buf);
    }

    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf.to_vec()
    }
}

/// Byte length of an encoded mosaic identifier, excluding its own header
pub fn mosaic_id_len(id: &MosaicId) -> u32 {
    (4 + id.namespace_id().len() + 4 + id.name().len()) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_integers() {
        let mut w = WireWriter::new();
        w.write_u32(0x0101);
        w.write_u64(150_000);
        w.write_i32(-1);
        assert_eq!(
            w.into_vec(),
            vec![
                0x01, 0x01, 0, 0, //
                0xf0, 0x49, 0x02, 0, 0, 0, 0, 0, //
                0xff, 0xff, 0xff, 0xff
            ]
        );
    }

    #[test]
    fn test_length_prefixed_fields() {
        let mut w = WireWriter::new();
        w.write_str("nem");
        w.write_opt_str(None);
        assert_eq!(
            w.into_vec(),
            vec![3, 0, 0, 0, b'n', b'e', b'm', 0xff, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn test_mosaic_id_structure() {
        let mut w = WireWriter::new();
        w.write_mosaic_id(&MosaicId::xem());
        let bytes = w.into_vec();
        assert_eq!(bytes.len(), 4 + 14);
        assert_eq!(&bytes[..4], &14u32.to_le_bytes());
        assert_eq!(&bytes[8..11], b"nem");
        assert_eq!(&bytes[15..], b"xem");
    }

    #[test]
    fn test_write_struct_prefixes_length() {
        let mut w = WireWriter::new();
        w.write_struct(|inner| {
            inner.write_u32(1);
            inner.write_u64(2);
        });
        let bytes = w.into_vec();
        assert_eq!(&bytes[..4], &12u32.to_le_bytes());
        assert_eq!(bytes.len(), 16);
    }
}
