//! [`KeyStore`]: immutable, shareable map of named key material.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::crypto::KEY_LEN;

/// Boxed error returned by a provisioning source.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while building a [`KeyStore`].
///
/// All of them are fatal at startup: a store is either built from every
/// provisioned key or not at all.
#[derive(Debug, Error)]
pub enum KeyStoreError {
    /// A key name was empty or blank.
    #[error("key name must not be empty or blank")]
    EmptyName,

    /// The same key name was provisioned twice.
    #[error("duplicate key name: {0}")]
    DuplicateName(String),

    /// The key material has an unexpected length.
    #[error("key {name} has invalid length: expected {KEY_LEN} bytes, got {len}")]
    InvalidLength { name: String, len: usize },

    /// The key material could not be decoded from its provisioned form.
    #[error("key {0} is not valid base64")]
    InvalidEncoding(String),

    /// The provisioning source itself failed.
    #[error("key provisioning failed")]
    Source(#[source] BoxError),
}

/// Fixed-size key buffer that holds exactly [`KEY_LEN`] bytes.
///
/// Owned by [`KeyStore`] and only ever lent to the cipher. When this type is
/// dropped, the memory is overwritten with zeroes.
pub struct KeyMaterial(Box<[u8; KEY_LEN]>);

impl KeyMaterial {
    fn from_slice(name: &str, bytes: &[u8]) -> Result<Self, KeyStoreError> {
        if bytes.len() != KEY_LEN {
            return Err(KeyStoreError::InvalidLength {
                name: name.to_owned(),
                len: bytes.len(),
            });
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        // Zero the key material on drop.
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        f.write_str("KeyMaterial([REDACTED])")
    }
}

/// Read-only store of named keys.
///
/// Built once from provisioned key material and never mutated afterwards, so
/// clones share one `Arc`'d map and readers need no locking.
#[derive(Clone, Debug, Default)]
pub struct KeyStore {
    inner: Arc<HashMap<String, KeyMaterial>>,
}

impl KeyStore {
    /// Create an empty [`KeyStore`]. Every lookup against it misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(name, material)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`KeyStoreError::EmptyName`], [`KeyStoreError::DuplicateName`]
    /// or [`KeyStoreError::InvalidLength`] for the first offending entry.
    pub fn from_entries<I, N, B>(entries: I) -> Result<Self, KeyStoreError>
    where
        I: IntoIterator<Item = (N, B)>,
        N: Into<String>,
        B: AsRef<[u8]>,
    {
        let mut map = HashMap::new();
        for (name, material) in entries {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(KeyStoreError::EmptyName);
            }
            let key = KeyMaterial::from_slice(&name, material.as_ref())?;
            if map.contains_key(&name) {
                return Err(KeyStoreError::DuplicateName(name));
            }
            map.insert(name, key);
        }
        Ok(Self {
            inner: Arc::new(map),
        })
    }

    /// Exact-match lookup of a key by name.
    pub fn lookup(&self, name: &str) -> Option<&KeyMaterial> {
        self.inner.get(name)
    }

    /// Returns `true` if a key named `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Sorted list of key names, for diagnostics.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.inner.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initially_empty() {
        let store = KeyStore::new();
        assert!(store.is_empty());
        assert!(store.lookup("mac0").is_none());
    }

    #[test]
    fn store_and_lookup() {
        let key = vec![0x42u8; KEY_LEN];
        let store = KeyStore::from_entries([("mac0", key.clone())]).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.contains("mac0"));
        assert_eq!(store.lookup("mac0").unwrap().as_bytes(), key.as_slice());
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let store = KeyStore::from_entries([("mac0", [1u8; KEY_LEN])]).unwrap();
        assert!(store.lookup("MAC0").is_none());
        assert!(store.lookup("mac").is_none());
        assert!(store.lookup("mac00").is_none());
    }

    #[test]
    fn rejects_wrong_length() {
        let err = KeyStore::from_entries([("mac0", vec![0u8; 16])]).unwrap_err();
        assert!(matches!(
            err,
            KeyStoreError::InvalidLength { ref name, len: 16 } if name == "mac0"
        ));
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = KeyStore::from_entries([("a", [1u8; KEY_LEN]), ("a", [2u8; KEY_LEN])])
            .unwrap_err();
        assert!(matches!(err, KeyStoreError::DuplicateName(ref n) if n == "a"));
    }

    #[test]
    fn rejects_empty_name() {
        let err = KeyStore::from_entries([("", [1u8; KEY_LEN])]).unwrap_err();
        assert!(matches!(err, KeyStoreError::EmptyName));
    }

    #[test]
    fn rejects_blank_name() {
        let err = KeyStore::from_entries([(" \t", [1u8; KEY_LEN])]).unwrap_err();
        assert!(matches!(err, KeyStoreError::EmptyName));
    }

    #[test]
    fn names_are_sorted() {
        let store = KeyStore::from_entries([
            ("zeta", [1u8; KEY_LEN]),
            ("alpha", [2u8; KEY_LEN]),
            ("mac0", [3u8; KEY_LEN]),
        ])
        .unwrap();
        assert_eq!(store.names(), vec!["alpha", "mac0", "zeta"]);
    }

    #[test]
    fn clones_share_keys() {
        let store = KeyStore::from_entries([("mac0", [7u8; KEY_LEN])]).unwrap();
        let clone = store.clone();
        assert_eq!(
            clone.lookup("mac0").unwrap().as_bytes(),
            store.lookup("mac0").unwrap().as_bytes()
        );
    }

    #[test]
    fn key_material_redacted_in_debug() {
        let store = KeyStore::from_entries([("mac0", [0xFFu8; KEY_LEN])]).unwrap();
        let rendered = format!("{store:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("255"));
    }
}
