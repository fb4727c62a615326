//! Frame codec for the wire format
//!
//! Tables ride as MessagePack payloads; commands as length-prefixed UTF-8.
//! The decoder is incremental: it consumes nothing until a whole frame is
//! buffered.

use bytes::{Buf, BufMut, BytesMut};
use ferry_record::Table;

use crate::frames::{frame_type, FrameHeader};
use crate::{Error, Result};

/// Maximum frame payload size (64MB)
const MAX_PAYLOAD_SIZE: u32 = 64 * 1024 * 1024;

/// One protocol message, typed by its payload
#[derive(Debug, Clone)]
pub enum Frame {
    /// Store a table under a command
    Put {
        /// Command the table is stored under
        command: String,
        /// Encoded table
        table: Table,
    },
    /// Acknowledge a stored table
    PutOk {
        /// Command echoed back
        command: String,
    },
    /// Request the computed table for a command
    Get {
        /// Command to compute
        command: String,
    },
    /// Computed table payload
    Table(Table),
    /// Request failed
    Error {
        /// Fault code (see [`crate::frames::fault`])
        code: u32,
        /// Human-readable reason
        message: String,
    },
}

impl Frame {
    /// Wire identifier for this frame
    pub fn frame_type(&self) -> u8 {
        match self {
            Self::Put { .. } => frame_type::PUT,
            Self::PutOk { .. } => frame_type::PUT_OK,
            Self::Get { .. } => frame_type::GET,
            Self::Table(_) => frame_type::TABLE,
            Self::Error { .. } => frame_type::ERROR,
        }
    }

    /// Append the encoded frame to `buf`
    pub fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        let payload_start = buf.len() + FrameHeader::SIZE;

        let header = FrameHeader {
            frame_type: self.frame_type(),
            flags: 0,
            length: 0,
        };
        header.encode(buf);

        match self {
            Self::Put { command, table } => {
                put_str(buf, command);
                let encoded = rmp_serde::to_vec(table)
                    .map_err(|e| Error::Protocol(format!("Failed to encode table: {}", e)))?;
                buf.put_slice(&encoded);
            }
            Self::PutOk { command } => {
                put_str(buf, command);
            }
            Self::Get { command } => {
                put_str(buf, command);
            }
            Self::Table(table) => {
                let encoded = rmp_serde::to_vec(table)
                    .map_err(|e| Error::Protocol(format!("Failed to encode table: {}", e)))?;
                buf.put_slice(&encoded);
            }
            Self::Error { code, message } => {
                buf.put_u32_le(*code);
                let msg_bytes = message.as_bytes();
                buf.put_u32_le(msg_bytes.len() as u32);
                buf.put_slice(msg_bytes);
            }
        }

        let payload_len = buf.len() - payload_start;
        if payload_len > MAX_PAYLOAD_SIZE as usize {
            return Err(Error::Protocol(format!(
                "Payload too large: {} bytes",
                payload_len
            )));
        }

        let length_bytes = (payload_len as u32).to_le_bytes();
        buf[payload_start - 4..payload_start].copy_from_slice(&length_bytes);

        Ok(())
    }

    /// Decode one frame off the front of `buf`
    ///
    /// Returns `Ok(None)` until a whole frame is buffered; nothing is
    /// consumed in that case.
    pub fn decode(buf: &mut BytesMut) -> Result<Option<Self>> {
        if buf.len() < FrameHeader::SIZE {
            return Ok(None);
        }

        let mut header_buf = &buf[..FrameHeader::SIZE];
        let header = FrameHeader::decode(&mut header_buf)?;

        if header.length > MAX_PAYLOAD_SIZE {
            return Err(Error::Protocol(format!(
                "Payload too large: {} bytes",
                header.length
            )));
        }

        let total_size = FrameHeader::SIZE + header.length as usize;
        if buf.len() < total_size {
            return Ok(None);
        }

        buf.advance(FrameHeader::SIZE);
        let mut payload = buf.split_to(header.length as usize);

        let frame = match header.frame_type {
            frame_type::PUT => {
                let command = get_str(&mut payload, "PUT command")?;
                let table = rmp_serde::from_slice(&payload)
                    .map_err(|e| Error::Protocol(format!("Failed to decode table: {}", e)))?;
                Self::Put { command, table }
            }
            frame_type::PUT_OK => {
                let command = get_str(&mut payload, "PUT_OK command")?;
                Self::PutOk { command }
            }
            frame_type::GET => {
                let command = get_str(&mut payload, "GET command")?;
                Self::Get { command }
            }
            frame_type::TABLE => {
                let table = rmp_serde::from_slice(&payload)
                    .map_err(|e| Error::Protocol(format!("Failed to decode table: {}", e)))?;
                Self::Table(table)
            }
            frame_type::ERROR => {
                if payload.remaining() < 8 {
                    return Err(Error::Protocol("Incomplete ERROR frame".into()));
                }
                let code = payload.get_u32_le();
                let msg_len = payload.get_u32_le() as usize;

                if payload.remaining() < msg_len {
                    return Err(Error::Protocol("Incomplete ERROR message".into()));
                }
                let msg_bytes = payload.split_to(msg_len);
                let message = std::str::from_utf8(&msg_bytes)
                    .map_err(|e| Error::Protocol(format!("Invalid UTF-8 in ERROR message: {}", e)))?
                    .to_string();

                Self::Error { code, message }
            }
            _ => {
                return Err(Error::Protocol(format!(
                    "Unknown frame type: {}",
                    header.frame_type
                )));
            }
        };

        Ok(Some(frame))
    }
}

/// Write a length-prefixed UTF-8 string
fn put_str(buf: &mut BytesMut, s: &str) {
    let bytes = s.as_bytes();
    buf.put_u32_le(bytes.len() as u32);
    buf.put_slice(bytes);
}

/// Read a length-prefixed UTF-8 string
fn get_str(buf: &mut BytesMut, what: &str) -> Result<String> {
    if buf.remaining() < 4 {
        return Err(Error::Protocol(format!("Incomplete {}", what)));
    }
    let len = buf.get_u32_le() as usize;
    if buf.remaining() < len {
        return Err(Error::Protocol(format!("Incomplete {}", what)));
    }
    let bytes = buf.split_to(len);
    let s = std::str::from_utf8(&bytes)
        .map_err(|e| Error::Protocol(format!("Invalid UTF-8 in {}: {}", what, e)))?
        .to_string();
    Ok(s)
}
