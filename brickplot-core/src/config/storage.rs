//! Binary configuration persistence
//!
//! Stores a [`PlotterConfig`] as postcard-serialized bytes, framed so that
//! erased or stale flash is detected on load:
//!
//! ```text
//! ┌───────┬─────────┬────────┬─────────────┬───────┐
//! │ MAGIC │ VERSION │ LENGTH │ PAYLOAD     │ CRC32 │
//! │ 4B LE │ 1B      │ 2B LE  │ postcard    │ 4B LE │
//! └───────┴─────────┴────────┴─────────────┴───────┘
//! ```
//!
//! The CRC covers the payload only.

use super::types::PlotterConfig;

/// Magic number to identify valid configuration data
pub const CONFIG_MAGIC: u32 = 0x42504C54; // "BPLT"

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Bytes before the payload
const HEADER_SIZE: usize = 4 + 1 + 2;

/// Bytes after the payload
const TRAILER_SIZE: usize = 4;

/// Buffer size that always fits a stored configuration
pub const MAX_STORED_SIZE: usize = 256;

/// Storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Output buffer too small
    BufferTooSmall,
    /// Data shorter than its header says
    Truncated,
    /// Magic number does not match (erased or foreign data)
    BadMagic,
    /// Written by a different format version
    VersionMismatch(u8),
    /// Checksum mismatch
    CrcMismatch,
    /// Payload could not be encoded or decoded
    Serialization,
}

/// Serialize a configuration into `buf`
///
/// Returns the number of bytes written.
pub fn save(config: &PlotterConfig, buf: &mut [u8]) -> Result<usize, StorageError> {
    if buf.len() < HEADER_SIZE + TRAILER_SIZE {
        return Err(StorageError::BufferTooSmall);
    }

    let payload_area = buf.len() - HEADER_SIZE - TRAILER_SIZE;
    let payload_len = {
        let payload = &mut buf[HEADER_SIZE..HEADER_SIZE + payload_area];
        postcard::to_slice(config, payload)
            .map_err(|e| match e {
                postcard::Error::SerializeBufferFull => StorageError::BufferTooSmall,
                _ => StorageError::Serialization,
            })?
            .len()
    };
    let len = u16::try_from(payload_len).map_err(|_| StorageError::BufferTooSmall)?;

    buf[0..4].copy_from_slice(&CONFIG_MAGIC.to_le_bytes());
    buf[4] = CONFIG_VERSION;
    buf[5..7].copy_from_slice(&len.to_le_bytes());

    let crc_start = HEADER_SIZE + payload_len;
    let crc = crc32(&buf[HEADER_SIZE..crc_start]);
    buf[crc_start..crc_start + TRAILER_SIZE].copy_from_slice(&crc.to_le_bytes());

    Ok(crc_start + TRAILER_SIZE)
}

/// Load a configuration previously written by [`save`]
///
/// Trailing bytes after the frame are ignored, so a whole flash page
/// can be passed in.
pub fn load(data: &[u8]) -> Result<PlotterConfig, StorageError> {
    if data.len() < HEADER_SIZE + TRAILER_SIZE {
        return Err(StorageError::Truncated);
    }

    let magic = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    if magic != CONFIG_MAGIC {
        return Err(StorageError::BadMagic);
    }
    if data[4] != CONFIG_VERSION {
        return Err(StorageError::VersionMismatch(data[4]));
    }

    let len = u16::from_le_bytes([data[5], data[6]]) as usize;
    let crc_start = HEADER_SIZE + len;
    let trailer = data
        .get(crc_start..crc_start + TRAILER_SIZE)
        .ok_or(StorageError::Truncated)?;

    let payload = &data[HEADER_SIZE..crc_start];
    let stored_crc = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    if crc32(payload) != stored_crc {
        return Err(StorageError::CrcMismatch);
    }

    postcard::from_bytes(payload).map_err(|_| StorageError::Serialization)
}

/// CRC32 (IEEE 802.3 polynomial)
fn crc32(data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB88320;
    let mut crc: u32 = 0xFFFFFFFF;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    !crc
}
