//! Frame headers and wire identifiers

use bytes::{Buf, BufMut, BytesMut};

use crate::{Error, Result};

/// Frame type identifiers, one octet on the wire
pub mod frame_type {
    // Storage
    /// PUT frame - store a table under a command
    pub const PUT: u8 = 0x01;
    /// PUT_OK frame - acknowledge a stored table
    pub const PUT_OK: u8 = 0x02;

    // Retrieval
    /// GET frame - request the computed table for a command
    pub const GET: u8 = 0x10;
    /// TABLE frame - computed table payload
    pub const TABLE: u8 = 0x11;

    // Control
    /// ERROR frame - request failed
    pub const ERROR: u8 = 0x40;
}

/// Fault codes carried in ERROR frames
///
/// These keep server-side failures distinguishable at the client: a missing
/// command must not look like a transport problem.
pub mod fault {
    /// No table is stored under the requested command
    pub const NOT_FOUND: u32 = 1;
    /// A table failed to decode or its shapes are inconsistent
    pub const BAD_TABLE: u32 = 2;
    /// The request worked out to a mapping with no entries
    pub const EMPTY_INPUT: u32 = 3;
    /// The server-side transform failed
    pub const TRANSFORM: u32 = 4;
    /// Unclassified server failure
    pub const INTERNAL: u32 = 5;
}

/// Fixed 6-byte little-endian frame prefix
#[derive(Debug, Clone, Copy)]
pub struct FrameHeader {
    /// Frame type (see [`frame_type`])
    pub frame_type: u8,
    /// Flags (reserved)
    pub flags: u8,
    /// Payload length in bytes, header excluded
    pub length: u32,
}

impl FrameHeader {
    /// Encoded header size in bytes
    pub const SIZE: usize = 6;

    /// Append the header to `buf`
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.frame_type);
        buf.put_u8(self.flags);
        buf.put_u32_le(self.length);
    }

    /// Read a header off the front of `buf`
    pub fn decode(buf: &mut impl Buf) -> Result<Self> {
        if buf.remaining() < Self::SIZE {
            return Err(Error::Protocol("Incomplete header".into()));
        }

        Ok(Self {
            frame_type: buf.get_u8(),
            flags: buf.get_u8(),
            length: buf.get_u32_le(),
        })
    }
}
