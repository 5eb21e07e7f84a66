//! Common types, the envelope wire record, and errors shared across `sealed-config` crates.

pub mod error;
pub mod protocol;

pub use error::CryptoError;
pub use protocol::EnvelopeRecord;
