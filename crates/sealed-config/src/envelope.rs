//! Envelope codec: the transportable text form of a sealed value.
//!
//! ```text
//! base64( {"k":"<key name>","d":"<base64(nonce || ciphertext || tag)>"} )
//! ```
//!
//! Both layers use the standard, padded base64 alphabet. Decoding is strict:
//! any deviation from this grammar is an [`EnvelopeError`]. The facade relies
//! on that failure to tell ordinary configuration text apart from envelopes.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::EnvelopeRecord;
use thiserror::Error;

/// Errors produced while decoding an envelope.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The outer layer is not valid base64.
    #[error("outer layer is not valid base64")]
    OuterEncoding,

    /// The text is not (or could not be rendered as) a valid `{k, d}` record.
    #[error("invalid envelope record: {0}")]
    Record(String),

    /// The `d` field is not valid base64.
    #[error("payload is not valid base64")]
    PayloadEncoding,
}

/// A decoded envelope: the key name and the raw cipher payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub key_name: String,
    pub payload: Vec<u8>,
}

impl Envelope {
    pub fn new(key_name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            key_name: key_name.into(),
            payload,
        }
    }

    /// Render this envelope as its opaque text form.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Record`] if the record cannot be serialised.
    pub fn encode(&self) -> Result<String, EnvelopeError> {
        let record = EnvelopeRecord::new(self.key_name.as_str(), STANDARD.encode(&self.payload));
        let json =
            serde_json::to_vec(&record).map_err(|e| EnvelopeError::Record(e.to_string()))?;
        Ok(STANDARD.encode(json))
    }

    /// Parse an envelope from its text form.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::OuterEncoding`] if `text` is not base64,
    /// [`EnvelopeError::Record`] if the decoded bytes are not a record with
    /// exactly the string fields `k` and `d`, and
    /// [`EnvelopeError::PayloadEncoding`] if `d` is not base64.
    pub fn decode(text: &str) -> Result<Self, EnvelopeError> {
        let json = STANDARD
            .decode(text)
            .map_err(|_| EnvelopeError::OuterEncoding)?;

        // serde's derived visitor also accepts a positional array; only an
        // object is a record.
        let value: serde_json::Value =
            serde_json::from_slice(&json).map_err(|e| EnvelopeError::Record(e.to_string()))?;
        if !value.is_object() {
            return Err(EnvelopeError::Record("expected a JSON object".into()));
        }
        let record: EnvelopeRecord =
            serde_json::from_value(value).map_err(|e| EnvelopeError::Record(e.to_string()))?;

        let payload = STANDARD
            .decode(&record.payload)
            .map_err(|_| EnvelopeError::PayloadEncoding)?;

        Ok(Self {
            key_name: record.key_name,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(json: &str) -> String {
        STANDARD.encode(json)
    }

    #[test]
    fn encode_produces_expected_record() {
        let env = Envelope::new("mac0", vec![0xde, 0xad, 0xbe, 0xef]);
        let text = env.encode().unwrap();
        let inner = String::from_utf8(STANDARD.decode(&text).unwrap()).unwrap();
        assert_eq!(inner, r#"{"k":"mac0","d":"3q2+7w=="}"#);
    }

    #[test]
    fn decode_reverses_encode() {
        let env = Envelope::new("mac0", (0u8..40).collect());
        assert_eq!(Envelope::decode(&env.encode().unwrap()).unwrap(), env);
    }

    #[test]
    fn decode_legacy_envelope_structure() {
        let text = "eyJrIjoibWFjMCIsImQiOiJKZXE2SXptUEQrZFNHcEhBWUxLODJYTW5JS2JlQ0czMng5U3g5OTNxaTZzPSJ9";
        let env = Envelope::decode(text).unwrap();
        assert_eq!(env.key_name, "mac0");
        assert_eq!(env.payload.len(), 32);
    }

    #[test]
    fn rejects_plain_text() {
        assert_eq!(
            Envelope::decode("hello world"),
            Err(EnvelopeError::OuterEncoding)
        );
    }

    #[test]
    fn rejects_unwrapped_json() {
        assert_eq!(
            Envelope::decode(r#"{"k":"x","d":"x"}"#),
            Err(EnvelopeError::OuterEncoding)
        );
    }

    #[test]
    fn rejects_base64_of_non_record() {
        assert!(matches!(
            Envelope::decode(&wrap("just some words")),
            Err(EnvelopeError::Record(_))
        ));
        assert!(matches!(
            Envelope::decode(&wrap(r#"["k","d"]"#)),
            Err(EnvelopeError::Record(_))
        ));
    }

    #[test]
    fn rejects_positional_record() {
        let d = STANDARD.encode([0u8; 40]);
        assert_eq!(
            Envelope::decode(&wrap(&format!(r#"["mac0","{d}"]"#))),
            Err(EnvelopeError::Record("expected a JSON object".into()))
        );
    }

    #[test]
    fn rejects_missing_payload_field() {
        assert!(matches!(
            Envelope::decode(&wrap(r#"{"k":"mac0"}"#)),
            Err(EnvelopeError::Record(_))
        ));
    }

    #[test]
    fn rejects_missing_key_name_field() {
        assert!(matches!(
            Envelope::decode(&wrap(r#"{"d":"AAAA"}"#)),
            Err(EnvelopeError::Record(_))
        ));
    }

    #[test]
    fn rejects_extra_fields() {
        assert!(matches!(
            Envelope::decode(&wrap(r#"{"k":"mac0","d":"AAAA","v":1}"#)),
            Err(EnvelopeError::Record(_))
        ));
    }

    #[test]
    fn rejects_non_base64_payload() {
        assert_eq!(
            Envelope::decode(&wrap(r#"{"k":"mac0","d":"!!not base64!!"}"#)),
            Err(EnvelopeError::PayloadEncoding)
        );
        assert_eq!(
            Envelope::decode(&wrap(r#"{"k":"x","d":"x"}"#)),
            Err(EnvelopeError::PayloadEncoding)
        );
    }

    #[test]
    fn rejects_unpadded_outer_layer() {
        // `{"k":"mac0","d":"AQID"}` is 23 bytes, so the outer layer ends in `=`.
        let padded = Envelope::new("mac0", vec![1, 2, 3]).encode().unwrap();
        assert!(padded.ends_with('='));
        assert_eq!(
            Envelope::decode(padded.trim_end_matches('=')),
            Err(EnvelopeError::OuterEncoding)
        );
    }
}
