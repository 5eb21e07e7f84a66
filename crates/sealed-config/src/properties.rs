//! Bulk pass-through decryption of whole configuration sets.
//!
//! A configuration set is an ordered map of keys to JSON-shaped values. Keys
//! and structure are never touched; every string leaf, at any depth, goes
//! through [`Crypto::decrypt_string_with_pass_through`]. Numbers, booleans
//! and nulls are copied as they are.

use serde_json::{Map, Value};
use tracing::debug;

use crate::facade::Crypto;

/// An ordered key-value configuration set.
pub type Properties = Map<String, Value>;

impl Crypto {
    /// Return a copy of `props` with every string value pass-through decrypted.
    pub fn decrypt_properties(&self, props: &Properties) -> Properties {
        debug!(entries = props.len(), "decrypting properties");
        self.decrypt_table(props)
    }

    /// Pass-through decrypt every string inside `value`.
    pub fn decrypt_value(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.decrypt_string_with_pass_through(s)),
            Value::Array(items) => {
                Value::Array(items.iter().map(|v| self.decrypt_value(v)).collect())
            }
            Value::Object(table) => Value::Object(self.decrypt_table(table)),
            Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
        }
    }

    /// Return a new [`config::Config`] whose string values are pass-through
    /// decrypted.
    ///
    /// # Errors
    ///
    /// Returns a [`config::ConfigError`] if `cfg` cannot be represented as a
    /// key-value set or the result cannot be rebuilt.
    pub fn decrypt_config(
        &self,
        cfg: &::config::Config,
    ) -> Result<::config::Config, ::config::ConfigError> {
        let props: Properties = cfg.clone().try_deserialize()?;
        let decrypted = self.decrypt_properties(&props);
        ::config::Config::try_from(&decrypted)
    }

    fn decrypt_table(&self, table: &Properties) -> Properties {
        table
            .iter()
            .map(|(k, v)| (k.clone(), self.decrypt_value(v)))
            .collect()
    }
}
