//! # hl7wire-client
//!
//! MLLP sending client for hl7wire.
//!
//! This crate provides:
//! - Async TCP delivery with one connection per exchange
//! - Timeout-bounded connect and acknowledgment reads
//! - A typed failure taxonomy (connection / send / receive / decode)

pub mod client;
pub mod connection;
pub mod error;

pub use client::Client;
pub use connection::ConnectionConfig;
pub use error::{ClientError, FailureKind};
