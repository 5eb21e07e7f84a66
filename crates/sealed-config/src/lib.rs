//! `sealed-config`: envelope encryption of configuration values.
//!
//! Startup sequence for a host:
//! 1. Load [`Settings`] (or provision keys from a custom [`KeySource`]).
//! 2. Optionally install logging with [`telemetry::init_tracing`].
//! 3. Build the [`KeyStore`] once and wrap it in a [`Crypto`] facade.
//! 4. Run raw configuration through [`Crypto::decrypt_properties`] or
//!    [`Crypto::decrypt_config`] before binding it.
//!
//! ```no_run
//! use sealed_config::{Crypto, Settings};
//!
//! # fn main() -> anyhow::Result<()> {
//! let settings = Settings::from_env()?;
//! sealed_config::telemetry::init_tracing(&settings.log_level)?;
//! let crypto = Crypto::from_settings(&settings)?;
//!
//! let sealed = crypto.encrypt_string("hunter2", "mac0")?;
//! assert_eq!(crypto.decrypt_string_with_pass_through(&sealed), "hunter2");
//! assert_eq!(crypto.decrypt_string_with_pass_through("plain"), "plain");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crypto;
pub mod envelope;
pub mod facade;
pub mod keys;
pub mod properties;
pub mod telemetry;

pub use common::CryptoError;
pub use crate::config::Settings;
pub use envelope::{Envelope, EnvelopeError};
pub use facade::Crypto;
pub use keys::{EncodedKeySource, KeySource, KeyStore, KeyStoreError, StaticKeySource};
pub use properties::Properties;
