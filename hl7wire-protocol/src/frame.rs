//! MLLP framing for HL7 v2 messages.
//!
//! Frame layout (payload plus three marker bytes):
//!
//! ```text
//! +------+-----------------------+------+------+
//! | 0x0B | payload, UTF-8 text   | 0x1C | 0x0D |
//! | SB   | ER7 message bytes     | EB   | CR   |
//! +------+-----------------------+------+------+
//! ```
//!
//! No length prefix and no checksum. The marker bytes are control characters
//! outside the printable range used by ER7 payloads, so they cannot appear
//! inside real message content.

use bytes::{BufMut, BytesMut};

/// Start-block marker, prepended to every outbound frame.
pub const START_BLOCK: u8 = 0x0B;

/// End-block marker.
pub const END_BLOCK: u8 = 0x1C;

/// Carriage return, the final byte of every frame.
pub const CARRIAGE_RETURN: u8 = 0x0D;

/// The two-byte sequence terminating a complete frame.
pub const TRAILER: [u8; 2] = [END_BLOCK, CARRIAGE_RETURN];

/// Wraps a payload in MLLP framing for transmission.
///
/// Never fails; the payload is not inspected.
pub fn wrap(payload: &str) -> BytesMut {
    let mut buf = BytesMut::with_capacity(payload.len() + 3);
    buf.put_u8(START_BLOCK);
    buf.put_slice(payload.as_bytes());
    buf.put_u8(END_BLOCK);
    buf.put_u8(CARRIAGE_RETURN);
    buf
}

/// Strips MLLP framing from received text.
///
/// Strips exactly one leading start-block if present, then one trailing
/// carriage return if present, then one trailing end-block if present. Each
/// strip is independent and conditional: input missing the start-block still
/// has its trailer removed, and nothing is ever rejected as malformed.
/// Receivers in the field rely on this tolerance.
pub fn unwrap(framed: &str) -> &str {
    let text = framed.strip_prefix(START_BLOCK as char).unwrap_or(framed);
    let text = text.strip_suffix(CARRIAGE_RETURN as char).unwrap_or(text);
    text.strip_suffix(END_BLOCK as char).unwrap_or(text)
}
