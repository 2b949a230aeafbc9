//! HTTP/3 SETTINGS (RFC 9114 Section 7.2.4).
//!
//! A client advertises a fixed set of well-known settings derived from its
//! configuration plus caller-supplied extension settings. Extension
//! settings must never collide with identifiers owned by HTTP/3 itself.

use std::collections::BTreeMap;

use crate::error::{ProtoError, Result};

/// SETTINGS_QPACK_MAX_TABLE_CAPACITY.
pub const QPACK_MAX_TABLE_CAPACITY: u64 = 0x01;
/// SETTINGS_MAX_FIELD_SECTION_SIZE.
pub const MAX_FIELD_SECTION_SIZE: u64 = 0x06;
/// SETTINGS_QPACK_BLOCKED_STREAMS.
pub const QPACK_BLOCKED_STREAMS: u64 = 0x07;
/// SETTINGS_ENABLE_CONNECT_PROTOCOL (RFC 9220).
pub const ENABLE_CONNECT_PROTOCOL: u64 = 0x08;
/// SETTINGS_H3_DATAGRAM (RFC 9297).
pub const H3_DATAGRAM: u64 = 0x33;
/// H3_DATAGRAM code point used by draft-ietf-masque-h3-datagram.
pub const H3_DATAGRAM_DRAFT: u64 = 0xffd277;

/// Identifiers that extension settings may not use: the HTTP/2 settings
/// forbidden in HTTP/3 plus every setting this client manages itself.
pub const RESERVED: &[u64] = &[
    0x00,
    QPACK_MAX_TABLE_CAPACITY,
    0x02,
    0x03,
    0x04,
    0x05,
    MAX_FIELD_SECTION_SIZE,
    QPACK_BLOCKED_STREAMS,
    ENABLE_CONNECT_PROTOCOL,
    H3_DATAGRAM,
    H3_DATAGRAM_DRAFT,
];

/// Largest value a SETTINGS identifier or value can take (a QUIC
/// variable-length integer).
pub const VARINT_MAX: u64 = (1 << 62) - 1;

/// Returns true if `id` is owned by HTTP/3 or one of its extensions.
pub fn is_reserved(id: u64) -> bool {
    RESERVED.contains(&id)
}

/// Reject extension settings that collide with reserved identifiers or do
/// not fit in a varint.
pub fn check_additional(additional: &BTreeMap<u64, u64>) -> Result<()> {
    for (&id, &value) in additional {
        if is_reserved(id) {
            return Err(ProtoError::ReservedSetting(id));
        }
        if id > VARINT_MAX || value > VARINT_MAX {
            return Err(ProtoError::SettingOutOfRange { id, value });
        }
    }
    Ok(())
}

/// Settings a connection advertises on its control stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// SETTINGS_MAX_FIELD_SECTION_SIZE. `None` means unlimited.
    pub max_field_section_size: Option<u64>,
    /// SETTINGS_H3_DATAGRAM = 1.
    pub enable_datagrams: bool,
    /// Extension settings, keyed by identifier.
    pub additional: BTreeMap<u64, u64>,
}
