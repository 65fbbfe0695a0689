//! # hl7wire-protocol
//!
//! MLLP (Minimal Lower Layer Protocol) implementation for HL7 v2 message
//! exchange.
//!
//! This crate provides:
//! - MLLP framing with start-block/end-block/carriage-return markers
//! - A buffering decoder for reassembling frames from stream reads
//! - Protocol error types

pub mod codec;
pub mod error;
pub mod frame;

pub use codec::Decoder;
pub use error::ProtocolError;
pub use frame::{unwrap, wrap, CARRIAGE_RETURN, END_BLOCK, START_BLOCK, TRAILER};

/// Conventional port for MLLP receivers.
pub const DEFAULT_PORT: u16 = 2575;

/// Maximum message size the decoder will buffer (16 MiB).
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;
