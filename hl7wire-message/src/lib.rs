//! # hl7wire-message
//!
//! ADT^A01 message construction for hl7wire.
//!
//! This crate provides:
//! - Patient record types deserializable from JSON
//! - ER7 rendering with `|` field and `^` component separators
//! - Required-field validation with typed errors
//!
//! The crate only produces payload text. Transport belongs to
//! `hl7wire-client`; the two share nothing but the payload string.

pub mod adt;
pub mod error;
pub mod segments;

pub use adt::{AdtA01, Al1, Evn, Msh, Nk1, Pid, Pv1};
pub use error::MessageError;
pub use segments::{Address, PatientLocation, PersonName, Practitioner};
