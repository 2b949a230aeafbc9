//! Frame and stream type identifiers seen by hijacker callbacks.

use std::fmt;

/// HTTP/3 frame type (RFC 9114 Section 7.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameType(pub u64);

impl FrameType {
    pub const DATA: FrameType = FrameType(0x00);
    pub const HEADERS: FrameType = FrameType(0x01);
    pub const CANCEL_PUSH: FrameType = FrameType(0x03);
    pub const SETTINGS: FrameType = FrameType(0x04);
    pub const PUSH_PROMISE: FrameType = FrameType(0x05);
    pub const GOAWAY: FrameType = FrameType(0x07);
    pub const MAX_PUSH_ID: FrameType = FrameType(0x0d);
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// HTTP/3 unidirectional stream type (RFC 9114 Section 6.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamType(pub u64);

impl StreamType {
    pub const CONTROL: StreamType = StreamType(0x00);
    pub const PUSH: StreamType = StreamType(0x01);
    pub const QPACK_ENCODER: StreamType = StreamType(0x02);
    pub const QPACK_DECODER: StreamType = StreamType(0x03);
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}
