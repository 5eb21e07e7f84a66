//! AES-256-GCM-SIV value encryption primitives.
//!
//! This module is intentionally free of key-store and envelope knowledge.
//! It provides the low-level seal/open operations used by the facade.
//!
//! # Payload format
//!
//! ```text
//! <nonce: 12 bytes><ciphertext: n bytes><tag: 16 bytes>
//! ```
//!
//! The layout carries no version; the envelope names the key, and the key
//! implies the algorithm.

pub mod cipher;

pub use cipher::{CipherError, KEY_LEN};
