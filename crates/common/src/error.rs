//! Common error types shared across crates.

use thiserror::Error;

/// Errors surfaced by the strict encrypt/decrypt entry points.
///
/// Every variant is recoverable per call. The pass-through entry point absorbs
/// all decryption errors and hands back the original input instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The requested key name is not present in the key store.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// The input is not a structurally valid envelope.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// The envelope is well formed but the payload did not authenticate under
    /// the named key (wrong key material, truncation, or tampering).
    #[error("authentication failure")]
    AuthenticationFailure,

    /// The payload authenticated but its plaintext is not valid UTF-8.
    #[error("decrypted plaintext is not valid UTF-8")]
    InvalidPlaintext,

    /// Sealing failed for a reason unrelated to the caller's input.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CryptoError {
    /// Short machine-readable error code, safe to log.
    pub fn code(&self) -> &'static str {
        match self {
            CryptoError::KeyNotFound(_) => "key_not_found",
            CryptoError::MalformedEnvelope(_) => "malformed_envelope",
            CryptoError::AuthenticationFailure => "authentication_failure",
            CryptoError::InvalidPlaintext => "invalid_plaintext",
            CryptoError::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes() {
        assert_eq!(CryptoError::KeyNotFound("x".into()).code(), "key_not_found");
        assert_eq!(
            CryptoError::MalformedEnvelope("x".into()).code(),
            "malformed_envelope"
        );
        assert_eq!(
            CryptoError::AuthenticationFailure.code(),
            "authentication_failure"
        );
        assert_eq!(CryptoError::InvalidPlaintext.code(), "invalid_plaintext");
        assert_eq!(CryptoError::Internal("x".into()).code(), "internal_error");
    }

    #[test]
    fn display_includes_key_name() {
        let e = CryptoError::KeyNotFound("mac0".into());
        assert!(e.to_string().contains("mac0"));
    }
}
