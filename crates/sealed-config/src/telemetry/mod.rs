//! Structured logging setup for host processes.
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! left to the host, which may call [`init_tracing`] once at startup.
//!
//! # Telemetry invariants
//!
//! - **No plaintext, envelope text, or key material** may appear in any log
//!   field. Key names, counts, and error codes are fine.
//! - Log level is configurable via `SEALED_CONFIG__LOG_LEVEL` (default: `info`)
//!   and overridden by `RUST_LOG` when set.

pub mod init;

pub use init::init_tracing;
