//! Database image encoding
//!
//! Encodes the whole database (every bucket and entry) as one checksummed
//! image. Header fields are little-endian.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::BoltError;

/// Magic bytes at the start of every database file
pub const MAGIC: &[u8; 4] = b"BBCI";

/// Current on-disk format version
pub const FORMAT_VERSION: u16 = 1;

/// magic (4) + version (2) + txid (8) + payload len (8) + crc (4)
pub const HEADER_SIZE: usize = 26;

/// In-memory image of a database file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Image {
    /// Id of the transaction that wrote this image (0 for a fresh file)
    pub txid: u64,

    /// Buckets by name
    pub buckets: BTreeMap<Vec<u8>, BTreeMap<Vec<u8>, Vec<u8>>>,
}

#[derive(Deserialize)]
struct Payload {
    buckets: BTreeMap<Vec<u8>, BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl Image {
    /// Serialize to the on-disk representation
    pub fn encode(&self) -> Result<Vec<u8>> {
        let payload = bincode::serialize(&PayloadRef {
            buckets: &self.buckets,
        })?;
        let crc = crc32fast::hash(&payload);

        let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        buf.extend_from_slice(&self.txid.to_le_bytes());
        buf.extend_from_slice(&(payload.len() as u64).to_le_bytes());
        buf.extend_from_slice(&crc.to_le_bytes());
        buf.extend_from_slice(&payload);
        Ok(buf)
    }

    /// Parse and validate an on-disk representation
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(BoltError::Corruption(format!(
                "file too short for header: {} bytes",
                bytes.len()
            )));
        }

        if &bytes[0..4] != MAGIC {
            return Err(BoltError::Corruption(format!(
                "invalid magic: expected BBCI, got {:?}",
                &bytes[0..4]
            )));
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != FORMAT_VERSION {
            return Err(BoltError::Corruption(format!(
                "unsupported format version: {}",
                version
            )));
        }

        let txid = read_u64(&bytes[6..14]);
        let payload_len = read_u64(&bytes[14..22]) as usize;
        let expected_crc = u32::from_le_bytes([bytes[22], bytes[23], bytes[24], bytes[25]]);

        let payload = &bytes[HEADER_SIZE..];
        if payload.len() != payload_len {
            return Err(BoltError::Corruption(format!(
                "payload length mismatch: header says {}, found {}",
                payload_len,
                payload.len()
            )));
        }

        let actual_crc = crc32fast::hash(payload);
        if actual_crc != expected_crc {
            return Err(BoltError::Corruption(format!(
                "checksum mismatch: expected {:08x}, got {:08x}",
                expected_crc, actual_crc
            )));
        }

        let decoded: Payload = bincode::deserialize(payload)?;
        Ok(Self {
            txid,
            buckets: decoded.buckets,
        })
    }
}

/// Borrowing twin of `Payload` so encoding does not clone the buckets
#[derive(Serialize)]
struct PayloadRef<'a> {
    buckets: &'a BTreeMap<Vec<u8>, BTreeMap<Vec<u8>, Vec<u8>>>,
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}
