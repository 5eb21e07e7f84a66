//! Wire types for the sealed-value envelope.
//!
//! The envelope is the only artifact this workspace persists or transmits. Its
//! text form is `base64(json(EnvelopeRecord))`; the outer encoding lives in the
//! codec, this module only defines the inner record.

use serde::{Deserialize, Serialize};

/// The structured record inside every envelope.
///
/// Field names are single letters on the wire to keep envelopes short when
/// embedded in configuration files. Both fields are required and no others
/// are accepted. The derived `Deserialize` also takes a positional sequence,
/// so the envelope codec checks for a JSON object before deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvelopeRecord {
    /// Name of the key the payload was sealed under.
    #[serde(rename = "k")]
    pub key_name: String,
    /// Standard base64 of `nonce || ciphertext || tag`.
    #[serde(rename = "d")]
    pub payload: String,
}

impl EnvelopeRecord {
    /// Construct an [`EnvelopeRecord`] from a key name and encoded payload.
    pub fn new(key_name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            key_name: key_name.into(),
            payload: payload.into(),
        }
    }
}
