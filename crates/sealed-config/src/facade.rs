//! [`Crypto`]: strict and pass-through encryption of configuration strings.
//!
//! Two entry points with two error policies:
//!
//! - [`Crypto::encrypt_string`] / [`Crypto::decrypt_string`] surface every
//!   failure to the caller.
//! - [`Crypto::decrypt_string_with_pass_through`] never fails; anything that
//!   does not decrypt is returned verbatim. This is what configuration
//!   scanning uses, since most values are ordinary text.

use anyhow::{Context, Result};
use common::CryptoError;
use tracing::{debug, trace};

use crate::config::Settings;
use crate::crypto::cipher;
use crate::envelope::Envelope;
use crate::keys::{self, EncodedKeySource, KeyStore};

/// Facade over the key store, cipher, and envelope codec.
///
/// Holds only an immutable [`KeyStore`], so it is cheap to clone and safe to
/// share across threads.
#[derive(Clone, Debug)]
pub struct Crypto {
    keys: KeyStore,
}

impl Crypto {
    /// Create a facade over an already-loaded key store.
    pub fn new(keys: KeyStore) -> Self {
        Self { keys }
    }

    /// Provision the key store from the `keys` table of `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if any key fails to decode or validate. No facade is
    /// built from a partial key set.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let source = EncodedKeySource::new(settings.keys.clone());
        let store = keys::load(&source).context("failed to initialise key store")?;
        Ok(Self::new(store))
    }

    /// The key store this facade encrypts and decrypts with.
    pub fn key_store(&self) -> &KeyStore {
        &self.keys
    }

    /// Seal `plaintext` under the key named `key_name` and return the envelope text.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::KeyNotFound`] if no such key exists; encryption
    /// never falls back to another key.
    pub fn encrypt_string(&self, plaintext: &str, key_name: &str) -> Result<String, CryptoError> {
        let key = self
            .keys
            .lookup(key_name)
            .ok_or_else(|| CryptoError::KeyNotFound(key_name.to_owned()))?;

        let payload = cipher::encrypt(key.as_bytes(), plaintext.as_bytes())
            .map_err(|e| CryptoError::Internal(e.to_string()))?;

        let text = Envelope::new(key_name, payload)
            .encode()
            .map_err(|e| CryptoError::Internal(e.to_string()))?;

        debug!(key = %key_name, "value encrypted");
        Ok(text)
    }

    /// Open an envelope and return its plaintext.
    ///
    /// # Errors
    ///
    /// - [`CryptoError::MalformedEnvelope`] if `envelope` is not an envelope.
    /// - [`CryptoError::KeyNotFound`] if the named key is not in the store.
    /// - [`CryptoError::AuthenticationFailure`] if the payload does not
    ///   authenticate under that key.
    /// - [`CryptoError::InvalidPlaintext`] if the plaintext is not UTF-8.
    pub fn decrypt_string(&self, envelope: &str) -> Result<String, CryptoError> {
        let envelope =
            Envelope::decode(envelope).map_err(|e| CryptoError::MalformedEnvelope(e.to_string()))?;

        let key = self
            .keys
            .lookup(&envelope.key_name)
            .ok_or_else(|| CryptoError::KeyNotFound(envelope.key_name.clone()))?;

        let plaintext = cipher::decrypt(key.as_bytes(), &envelope.payload)
            .map_err(|_| CryptoError::AuthenticationFailure)?;

        debug!(key = %envelope.key_name, "value decrypted");
        String::from_utf8(plaintext).map_err(|_| CryptoError::InvalidPlaintext)
    }

    /// Decrypt `input` if it is an envelope this store can open, otherwise
    /// return it unchanged.
    pub fn decrypt_string_with_pass_through(&self, input: &str) -> String {
        match self.decrypt_string(input) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                // The input may be a secret; only the error code is logged.
                trace!(code = e.code(), "value passed through");
                input.to_owned()
            }
        }
    }
}
