//! Named key provisioning and the read-only [`KeyStore`].
//!
//! # Lifecycle
//!
//! 1. At startup, [`load`] asks a [`KeySource`] for every `(name, material)`
//!    pair it can provide.
//! 2. Every pair is validated (non-blank unique name, [`KEY_LEN`] bytes) and
//!    copied into a [`KeyStore`]; the provisioned buffers are zeroed.
//! 3. The store is handed to the facade and never changes again.
//!
//! # Security invariants
//!
//! - Key material is **never** written to disk, logged, or included in traces.
//!   Only key names and counts are logged.
//! - A failed load yields no store at all; there is no partial key set.
//!
//! [`KEY_LEN`]: crate::crypto::KEY_LEN

pub mod store;

pub use store::{BoxError, KeyMaterial, KeyStore, KeyStoreError};

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::info;

/// Provisioning boundary: anything able to produce raw named key material.
///
/// Backends (keystore files, secret managers, HSM exports) implement this
/// outside the workspace.
#[cfg_attr(test, mockall::automock)]
pub trait KeySource {
    /// Return every provisioned `(name, material)` pair.
    ///
    /// # Errors
    ///
    /// Implementations return [`KeyStoreError::Source`] when the backend
    /// cannot be read.
    fn provision(&self) -> Result<Vec<(String, Vec<u8>)>, KeyStoreError>;
}

/// In-memory key source holding raw key bytes.
#[derive(Default)]
pub struct StaticKeySource {
    keys: Vec<(String, Vec<u8>)>,
}

impl StaticKeySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named key.
    pub fn with_key(mut self, name: impl Into<String>, material: impl Into<Vec<u8>>) -> Self {
        self.keys.push((name.into(), material.into()));
        self
    }
}

impl KeySource for StaticKeySource {
    fn provision(&self) -> Result<Vec<(String, Vec<u8>)>, KeyStoreError> {
        Ok(self.keys.clone())
    }
}

/// Key source over standard-base64 encoded material, as found in the `keys`
/// table of [`Settings`](crate::config::Settings).
#[derive(Clone, Default)]
pub struct EncodedKeySource {
    keys: BTreeMap<String, String>,
}

impl std::fmt::Debug for EncodedKeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedKeySource")
            .field("keys", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl EncodedKeySource {
    /// Wrap a name → base64 mapping.
    pub fn new(keys: BTreeMap<String, String>) -> Self {
        Self { keys }
    }
}

impl KeySource for EncodedKeySource {
    fn provision(&self) -> Result<Vec<(String, Vec<u8>)>, KeyStoreError> {
        self.keys
            .iter()
            .map(|(name, encoded)| {
                let material = STANDARD
                    .decode(encoded.trim())
                    .map_err(|_| KeyStoreError::InvalidEncoding(name.clone()))?;
                Ok((name.clone(), material))
            })
            .collect()
    }
}

/// Provision every key from `source` and build the [`KeyStore`].
///
/// # Errors
///
/// Returns the source's error, or the first validation failure from
/// [`KeyStore::from_entries`].
pub fn load(source: &dyn KeySource) -> Result<KeyStore, KeyStoreError> {
    let mut entries = source.provision()?;
    let store = KeyStore::from_entries(
        entries
            .iter()
            .map(|(name, material)| (name.as_str(), material.as_slice())),
    );

    // The store holds its own copies; wipe the provisioned buffers either way.
    for (_, material) in entries.iter_mut() {
        material.iter_mut().for_each(|b| *b = 0);
    }

    let store = store?;
    info!(count = store.len(), keys = ?store.names(), "key store loaded");
    Ok(store)
}
